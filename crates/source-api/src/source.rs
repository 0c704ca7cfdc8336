use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SourceError;
use crate::types::{ResultsRequest, SearchResult, Suggestion};

/// Remote lookup service consulted by the coordinator.
///
/// Implementations should watch `cancel` and return [`SourceError::Cancelled`]
/// once it fires. Sources that cannot abort in-flight work may ignore the
/// token; the coordinator discards late answers regardless.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Return quick completions for a short, partially typed query.
    async fn fetch_suggestions(
        &self,
        query: &str,
        lang: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<Suggestion>, SourceError>;

    /// Return the full result set for a query.
    async fn fetch_results(
        &self,
        request: &ResultsRequest,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchResult>, SourceError>;
}

/// Race `future` against `cancel`, resolving to [`SourceError::Cancelled`] if the
/// token fires first.
pub async fn cancellable<F, T>(cancel: &CancellationToken, future: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    tokio::select! {
        biased;

        _ = cancel.cancelled() => Err(SourceError::Cancelled),
        result = future => result,
    }
}
