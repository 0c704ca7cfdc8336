use std::path::PathBuf;
use std::time::Duration;

use typeahead::SearchConfig;
use typeahead::source::CatalogOptions;

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

/// Catalog source settings after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub catalog: Option<PathBuf>,
    pub suggest_latency: Duration,
    pub results_latency: Duration,
    pub max_suggestions: usize,
    pub failure: Option<String>,
}

impl SourceSettings {
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            suggest_latency: self.suggest_latency,
            results_latency: self.results_latency,
            max_suggestions: self.max_suggestions,
            failure: self.failure.clone(),
        }
    }
}

/// Application-ready configuration derived from user input, config files and
/// defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub search: SearchConfig,
    pub source: SourceSettings,
}

impl ResolvedConfig {
    pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
        validation::validate(self, sources)
    }

    /// Print a human readable summary of the effective configuration.
    pub fn print_summary(&self) {
        print!("{}", summary::format_summary(self));
    }
}
