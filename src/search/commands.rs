use typeahead_source_api::{SearchResult, SourceError, Suggestion};

use super::query::Query;
use super::sequencer::OperationId;
use super::stage::Stage;

/// Payload produced by a successful stage lookup.
#[derive(Debug)]
pub(crate) enum StagePayload {
    Suggestions(Vec<Suggestion>),
    Results(Vec<SearchResult>),
}

/// Message sent back to the coordinator when a spawned lookup finishes.
#[derive(Debug)]
pub(crate) struct StageCompletion {
    /// Identifier of the dispatch that produced this completion.
    pub(crate) op: OperationId,
    pub(crate) stage: Stage,
    /// Query captured when the lookup was dispatched.
    pub(crate) query: Query,
    pub(crate) outcome: Result<StagePayload, SourceError>,
}
