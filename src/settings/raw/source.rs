use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use typeahead::source::CatalogOptions;

use crate::cli::CliArgs;

use super::super::resolved::SourceSettings;

/// Catalog source options as they are read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct SourceSection {
    pub(super) catalog: Option<PathBuf>,
    pub(super) suggest_latency_ms: Option<u64>,
    pub(super) results_latency_ms: Option<u64>,
    pub(super) max_suggestions: Option<usize>,
    pub(super) failure: Option<String>,
}

impl SourceSection {
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(path) = cli.catalog.clone() {
            self.catalog = Some(path);
        }
        if let Some(value) = cli.suggest_latency_ms {
            self.suggest_latency_ms = Some(value);
        }
        if let Some(value) = cli.results_latency_ms {
            self.results_latency_ms = Some(value);
        }
        if let Some(value) = cli.max_suggestions {
            self.max_suggestions = Some(value);
        }
        if let Some(message) = cli.simulate_failure.clone() {
            self.failure = Some(message);
        }
    }

    pub(super) fn resolve(self) -> SourceSettings {
        let defaults = CatalogOptions::default();
        SourceSettings {
            catalog: self.catalog,
            suggest_latency: self
                .suggest_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.suggest_latency),
            results_latency: self
                .results_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.results_latency),
            max_suggestions: self.max_suggestions.unwrap_or(defaults.max_suggestions),
            failure: self.failure.filter(|message| !message.trim().is_empty()),
        }
    }
}
