use serde::Serialize;
use typeahead_source_api::{SearchResult, Suggestion};

use super::stage::Stage;

/// A lookup failure that belongs to the current query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub stage: Stage,
    pub query: String,
    pub message: String,
}

/// Everything the input field, suggestion list and result list observe.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Text as last entered or selected, untrimmed.
    pub live_query: String,
    pub suggestions: Vec<Suggestion>,
    pub results: Vec<SearchResult>,
    /// A results lookup for the live query is in flight.
    pub is_searching: bool,
    pub last_error: Option<ErrorInfo>,
    /// Whether the suggestion list should be shown.
    pub suggestions_open: bool,
}

impl SearchState {
    pub(crate) fn clear_output(&mut self) {
        self.suggestions.clear();
        self.results.clear();
    }

    /// Drop the error unless it was reported for `query`.
    pub(crate) fn retain_error_for(&mut self, query: &str) {
        if self.last_error.as_ref().is_some_and(|err| err.query != query) {
            self.last_error = None;
        }
    }

    pub(crate) fn clear_error_for(&mut self, stage: Stage) {
        if self.last_error.as_ref().is_some_and(|err| err.stage == stage) {
            self.last_error = None;
        }
    }
}
