//! Search query coordination for type-ahead search surfaces.
//!
//! The crate turns a stream of keystrokes into debounced suggestion and result
//! lookups against a [`DataSource`](typeahead_source_api::DataSource), and
//! guarantees that answers to superseded queries never reach observable state.
//! Start with [`SearchCoordinator`].

pub mod app_dirs;
pub mod logging;
pub mod search;

pub use search::{
    DiscardReason, ErrorInfo, OperationId, Query, Resolution, SearchConfig, SearchCoordinator,
    SearchState, Stage, StagePlan, StageSelector, StageStatus, Tick,
};

pub use typeahead_source_api as source;
