use anyhow::{Error, Result};
use serde::Deserialize;
use std::env;

use crate::cli::CliArgs;

use super::resolved::{ConfigSources, ResolvedConfig, SettingSource};

mod search;
mod source;

use search::SearchSection;
use source::SourceSection;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    search: SearchSection,
    source: SourceSection,
}

impl RawConfig {
    /// Apply CLI overrides on top of the raw configuration values.
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        self.search.apply_cli_overrides(cli);
        self.source.apply_cli_overrides(cli);
    }

    /// Convert the raw configuration into a [`ResolvedConfig`], validating and
    /// filling defaults where required.
    pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
        let sources = ConfigSources {
            quiet_ms: detect_source(
                cli.quiet_ms.is_some(),
                self.search.quiet_ms.is_some(),
                "TYPEAHEAD__SEARCH__QUIET_MS",
                "--quiet-ms",
                "search.quiet_ms",
            ),
            suggest_min_chars: detect_source(
                cli.suggest_min_chars.is_some(),
                self.search.suggest_min_chars.is_some(),
                "TYPEAHEAD__SEARCH__SUGGEST_MIN_CHARS",
                "--suggest-min-chars",
                "search.suggest_min_chars",
            ),
            results_min_chars: detect_source(
                cli.results_min_chars.is_some(),
                self.search.results_min_chars.is_some(),
                "TYPEAHEAD__SEARCH__RESULTS_MIN_CHARS",
                "--results-min-chars",
                "search.results_min_chars",
            ),
            sort_key: detect_source(
                cli.sort_key.is_some(),
                self.search.sort_key.is_some(),
                "TYPEAHEAD__SEARCH__SORT_KEY",
                "--sort",
                "search.sort_key",
            ),
            latitude: detect_source(
                cli.latitude.is_some(),
                self.search.latitude.is_some(),
                "TYPEAHEAD__SEARCH__LATITUDE",
                "--latitude",
                "search.latitude",
            ),
            longitude: detect_source(
                cli.longitude.is_some(),
                self.search.longitude.is_some(),
                "TYPEAHEAD__SEARCH__LONGITUDE",
                "--longitude",
                "search.longitude",
            ),
            max_suggestions: detect_source(
                cli.max_suggestions.is_some(),
                self.source.max_suggestions.is_some(),
                "TYPEAHEAD__SOURCE__MAX_SUGGESTIONS",
                "--max-suggestions",
                "source.max_suggestions",
            ),
        };

        let search = self.search.resolve(cli.filters.as_deref())?;
        let source = self.source.resolve();
        let config = ResolvedConfig { search, source };

        config.validate(&sources).map_err(Error::new)?;

        Ok(config)
    }
}

fn detect_source(
    cli_present: bool,
    value_present: bool,
    env_var: &'static str,
    cli_flag: &'static str,
    key: &'static str,
) -> Option<SettingSource> {
    if !value_present {
        return None;
    }

    if cli_present {
        return Some(SettingSource::CliFlag(cli_flag));
    }

    if env::var_os(env_var).is_some() {
        return Some(SettingSource::Environment(env_var));
    }

    Some(SettingSource::ConfigKey(key))
}

#[cfg(test)]
mod tests;
