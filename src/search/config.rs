use std::time::Duration;

use typeahead_source_api::{FilterSet, GeoPoint};

use super::debounce::DEFAULT_QUIET_INTERVAL;
use super::stage::StageSelector;

pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_SORT_KEY: &str = "relevance";

/// Tunables and request parameters used by a [`SearchCoordinator`](super::SearchCoordinator).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub quiet_interval: Duration,
    pub selector: StageSelector,
    pub lang: String,
    pub sort_key: String,
    pub filters: FilterSet,
    pub location: Option<GeoPoint>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quiet_interval: DEFAULT_QUIET_INTERVAL,
            selector: StageSelector::default(),
            lang: DEFAULT_LANG.to_string(),
            sort_key: DEFAULT_SORT_KEY.to_string(),
            filters: FilterSet::default(),
            location: None,
        }
    }
}
