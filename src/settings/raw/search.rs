use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Result, bail};
use serde::Deserialize;
use typeahead::{SearchConfig, StageSelector};
use typeahead::source::{FilterSet, GeoPoint};

use crate::cli::CliArgs;

use super::super::util::parse_filters;

/// Coordinator tunables as they are read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct SearchSection {
    pub(super) quiet_ms: Option<u64>,
    pub(super) suggest_min_chars: Option<usize>,
    pub(super) results_min_chars: Option<usize>,
    pub(super) suggest_before_results: Option<bool>,
    pub(super) lang: Option<String>,
    pub(super) sort_key: Option<String>,
    pub(super) filters: Option<BTreeMap<String, String>>,
    pub(super) latitude: Option<f64>,
    pub(super) longitude: Option<f64>,
}

impl SearchSection {
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(value) = cli.quiet_ms {
            self.quiet_ms = Some(value);
        }
        if let Some(value) = cli.suggest_min_chars {
            self.suggest_min_chars = Some(value);
        }
        if let Some(value) = cli.results_min_chars {
            self.results_min_chars = Some(value);
        }
        if let Some(value) = cli.suggest_before_results {
            self.suggest_before_results = Some(value);
        }
        if let Some(value) = cli.lang.clone() {
            self.lang = Some(value);
        }
        if let Some(value) = cli.sort_key.clone() {
            self.sort_key = Some(value);
        }
        if let Some(value) = cli.latitude {
            self.latitude = Some(value);
        }
        if let Some(value) = cli.longitude {
            self.longitude = Some(value);
        }
    }

    /// Fill defaults and merge CLI filters over configured ones.
    pub(super) fn resolve(self, cli_filters: Option<&[String]>) -> Result<SearchConfig> {
        let defaults = SearchConfig::default();
        let default_selector = defaults.selector;

        let selector = StageSelector::new(
            self.suggest_min_chars
                .unwrap_or(default_selector.suggest_min_chars()),
            self.results_min_chars
                .unwrap_or(default_selector.results_min_chars()),
        )
        .with_suggestions_before_results(
            self.suggest_before_results
                .unwrap_or(default_selector.suggest_before_results()),
        );

        let mut filters: FilterSet = self.filters.unwrap_or_default().into_iter().collect();
        if let Some(values) = cli_filters {
            for (key, value) in parse_filters(values)?.iter() {
                filters.insert(key, value);
            }
        }

        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            (None, None) => None,
            _ => bail!("search.latitude and search.longitude must be set together"),
        };

        Ok(SearchConfig {
            quiet_interval: self
                .quiet_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.quiet_interval),
            selector,
            lang: self.lang.unwrap_or(defaults.lang),
            sort_key: self.sort_key.unwrap_or(defaults.sort_key),
            filters,
            location,
        })
    }
}
