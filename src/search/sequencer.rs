use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use typeahead_source_api::{DataSource, ResultsRequest, SourceError, cancellable};

use super::commands::{StageCompletion, StagePayload};
use super::query::Query;
use super::stage::Stage;

/// Identity of a single dispatch, unique for the lifetime of a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Last known lifecycle state of a stage.
///
/// `Idle → Pending → {Delivered | Discarded | Failed}`; a pending stage
/// drops back to `Idle` when it is preempted or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageStatus {
    #[default]
    Idle,
    Pending,
    Delivered,
    Discarded,
    Failed,
}

/// Why a completed lookup was dropped without touching observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The live query moved on while the lookup was in flight.
    Stale,
    /// A newer dispatch or a reset replaced the operation.
    Superseded,
    /// The source reported that the lookup was cancelled.
    Cancelled,
}

/// In-flight lookup owned by a stage slot.
#[derive(Debug)]
struct PendingOperation {
    id: OperationId,
    query: Query,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct StageSlot {
    pending: Option<PendingOperation>,
    status: StageStatus,
}

/// What the coordinator should do with a completion.
#[derive(Debug)]
pub(crate) enum Settled {
    Deliver {
        stage: Stage,
        query: Query,
        payload: StagePayload,
    },
    Discard {
        stage: Stage,
        reason: DiscardReason,
    },
    Fail {
        stage: Stage,
        query: Query,
        error: SourceError,
    },
}

/// Issues stage lookups and decides which completions may be delivered.
///
/// Each stage holds at most one pending operation. Dispatching a stage cancels
/// its predecessor, and a completion is only deliverable while it is still the
/// stage's pending operation *and* its captured query equals the live query
/// read at resolution time.
pub(crate) struct RequestSequencer {
    source: Arc<dyn DataSource>,
    completions: UnboundedSender<StageCompletion>,
    slots: [StageSlot; 2],
    next_op: u64,
}

impl RequestSequencer {
    pub(crate) fn new(
        source: Arc<dyn DataSource>,
        completions: UnboundedSender<StageCompletion>,
    ) -> Self {
        Self {
            source,
            completions,
            slots: Default::default(),
            next_op: 0,
        }
    }

    pub(crate) fn dispatch_suggestions(&mut self, query: Query, lang: String) -> OperationId {
        let text = query.as_str().to_owned();
        self.dispatch(Stage::Suggestions, query, move |source, cancel| async move {
            source
                .fetch_suggestions(&text, &lang, cancel)
                .await
                .map(StagePayload::Suggestions)
        })
    }

    pub(crate) fn dispatch_results(&mut self, request: ResultsRequest) -> OperationId {
        let query = Query::new(&request.query);
        self.dispatch(Stage::Results, query, move |source, cancel| async move {
            source
                .fetch_results(&request, cancel)
                .await
                .map(StagePayload::Results)
        })
    }

    /// Spawn the lookup built by `call`, replacing any pending operation for `stage`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    fn dispatch<F, Fut>(&mut self, stage: Stage, query: Query, call: F) -> OperationId
    where
        F: FnOnce(Arc<dyn DataSource>, CancellationToken) -> Fut,
        Fut: Future<Output = Result<StagePayload, SourceError>> + Send + 'static,
    {
        if let Some(previous) = self.cancel(stage) {
            tracing::debug!(%stage, op = %previous, "preempted pending lookup");
        }

        self.next_op = self.next_op.saturating_add(1);
        let op = OperationId(self.next_op);
        let cancel = CancellationToken::new();
        let lookup = call(Arc::clone(&self.source), cancel.clone());
        let tx = self.completions.clone();
        let task_cancel = cancel.clone();
        let token = query.clone();
        tokio::spawn(async move {
            let outcome = cancellable(&task_cancel, lookup).await;
            // The receiver only disappears when the coordinator is gone.
            let _ = tx.send(StageCompletion {
                op,
                stage,
                query: token,
                outcome,
            });
        });

        tracing::debug!(%stage, %op, query = %query, "dispatched lookup");
        let slot = &mut self.slots[stage.index()];
        slot.pending = Some(PendingOperation {
            id: op,
            query,
            cancel,
        });
        slot.status = StageStatus::Pending;
        op
    }

    /// Cancel the pending operation for `stage`, if any, and return its id.
    pub(crate) fn cancel(&mut self, stage: Stage) -> Option<OperationId> {
        let slot = &mut self.slots[stage.index()];
        let pending = slot.pending.take()?;
        pending.cancel.cancel();
        slot.status = StageStatus::Idle;
        Some(pending.id)
    }

    pub(crate) fn cancel_all(&mut self) {
        for stage in Stage::ALL {
            self.cancel(stage);
        }
    }

    /// Classify a completion against the live query, updating the stage status.
    pub(crate) fn resolve(&mut self, completion: StageCompletion, live: &Query) -> Settled {
        let StageCompletion {
            op,
            stage,
            query,
            outcome,
        } = completion;
        let slot = &mut self.slots[stage.index()];

        let is_current = slot.pending.as_ref().is_some_and(|pending| pending.id == op);
        if !is_current {
            return Settled::Discard {
                stage,
                reason: DiscardReason::Superseded,
            };
        }
        slot.pending = None;

        if query != *live {
            slot.status = StageStatus::Discarded;
            return Settled::Discard {
                stage,
                reason: DiscardReason::Stale,
            };
        }

        match outcome {
            Ok(payload) => {
                slot.status = StageStatus::Delivered;
                Settled::Deliver {
                    stage,
                    query,
                    payload,
                }
            }
            Err(err) if err.is_cancelled() => {
                slot.status = StageStatus::Discarded;
                Settled::Discard {
                    stage,
                    reason: DiscardReason::Cancelled,
                }
            }
            Err(error) => {
                slot.status = StageStatus::Failed;
                Settled::Fail {
                    stage,
                    query,
                    error,
                }
            }
        }
    }

    pub(crate) fn status(&self, stage: Stage) -> StageStatus {
        self.slots[stage.index()].status
    }

    /// Query captured by the pending operation for `stage`.
    pub(crate) fn pending_query(&self, stage: Stage) -> Option<&Query> {
        self.slots[stage.index()]
            .pending
            .as_ref()
            .map(|pending| &pending.query)
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.slots.iter().any(|slot| slot.pending.is_some())
    }
}

impl Drop for RequestSequencer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use typeahead_source_api::{FilterSet, SearchResult, Suggestion};

    use super::*;

    /// Answers immediately with the query echoed back, unless it is cancelled first.
    struct EchoSource;

    #[async_trait]
    impl DataSource for EchoSource {
        async fn fetch_suggestions(
            &self,
            query: &str,
            _lang: &str,
            _cancel: CancellationToken,
        ) -> Result<Vec<Suggestion>, SourceError> {
            if query == "boom" {
                return Err(SourceError::transport("boom"));
            }
            Ok(vec![Suggestion::new(query)])
        }

        async fn fetch_results(
            &self,
            request: &ResultsRequest,
            _cancel: CancellationToken,
        ) -> Result<Vec<SearchResult>, SourceError> {
            Ok(vec![SearchResult::new("1", request.query.clone())])
        }
    }

    fn sequencer() -> (RequestSequencer, UnboundedReceiver<StageCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RequestSequencer::new(Arc::new(EchoSource), tx), rx)
    }

    fn results_request(query: &str) -> ResultsRequest {
        ResultsRequest {
            query: query.into(),
            lang: "en".into(),
            filters: FilterSet::new(),
            sort_key: "relevance".into(),
            location: None,
        }
    }

    #[tokio::test]
    async fn current_completion_is_delivered() {
        let (mut seq, mut rx) = sequencer();
        let op = seq.dispatch_suggestions(Query::new("bm"), "en".into());
        assert_eq!(seq.status(Stage::Suggestions), StageStatus::Pending);
        assert_eq!(seq.pending_query(Stage::Suggestions), Some(&Query::new("bm")));

        let completion = rx.recv().await.expect("completion");
        assert_eq!(completion.op, op);
        match seq.resolve(completion, &Query::new("bm")) {
            Settled::Deliver {
                payload: StagePayload::Suggestions(items),
                ..
            } => assert_eq!(items, vec![Suggestion::new("bm")]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(seq.status(Stage::Suggestions), StageStatus::Delivered);
        assert!(!seq.has_pending());
    }

    #[tokio::test]
    async fn stale_query_is_discarded_at_resolution_time() {
        let (mut seq, mut rx) = sequencer();
        seq.dispatch_results(results_request("bmw"));
        let completion = rx.recv().await.expect("completion");

        let settled = seq.resolve(completion, &Query::new("bmw x"));
        assert!(matches!(
            settled,
            Settled::Discard {
                stage: Stage::Results,
                reason: DiscardReason::Stale
            }
        ));
        assert_eq!(seq.status(Stage::Results), StageStatus::Discarded);
    }

    #[tokio::test]
    async fn preempted_operation_cannot_deliver_even_for_same_query() {
        let (mut seq, mut rx) = sequencer();
        let first = seq.dispatch_suggestions(Query::new("ab"), "en".into());
        let second = seq.dispatch_suggestions(Query::new("ab"), "en".into());
        assert_ne!(first, second);

        let mut delivered = Vec::new();
        for _ in 0..2 {
            let completion = rx.recv().await.expect("completion");
            let op = completion.op;
            if let Settled::Deliver { .. } = seq.resolve(completion, &Query::new("ab")) {
                delivered.push(op);
            }
        }
        assert_eq!(delivered, vec![second]);
    }

    #[tokio::test]
    async fn stages_are_sequenced_independently() {
        let (mut seq, mut rx) = sequencer();
        seq.dispatch_suggestions(Query::new("bmw"), "en".into());
        seq.dispatch_results(results_request("bmw"));
        assert_eq!(seq.status(Stage::Suggestions), StageStatus::Pending);
        assert_eq!(seq.status(Stage::Results), StageStatus::Pending);

        for _ in 0..2 {
            let completion = rx.recv().await.expect("completion");
            assert!(matches!(
                seq.resolve(completion, &Query::new("bmw")),
                Settled::Deliver { .. }
            ));
        }
    }

    #[tokio::test]
    async fn transport_failure_for_current_query_is_reported() {
        let (mut seq, mut rx) = sequencer();
        seq.dispatch_suggestions(Query::new("boom"), "en".into());
        let completion = rx.recv().await.expect("completion");
        match seq.resolve(completion, &Query::new("boom")) {
            Settled::Fail { stage, error, .. } => {
                assert_eq!(stage, Stage::Suggestions);
                assert_eq!(error, SourceError::transport("boom"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(seq.status(Stage::Suggestions), StageStatus::Failed);
    }

    #[tokio::test]
    async fn cancelled_operation_is_superseded() {
        let (mut seq, mut rx) = sequencer();
        let op = seq.dispatch_results(results_request("bmw"));
        assert_eq!(seq.cancel(Stage::Results), Some(op));
        assert_eq!(seq.status(Stage::Results), StageStatus::Idle);
        assert_eq!(seq.cancel(Stage::Results), None);

        let completion = rx.recv().await.expect("completion");
        assert!(matches!(completion.outcome, Err(SourceError::Cancelled)));
        assert!(matches!(
            seq.resolve(completion, &Query::new("bmw")),
            Settled::Discard {
                reason: DiscardReason::Superseded,
                ..
            }
        ));
        assert_eq!(seq.status(Stage::Results), StageStatus::Idle);
    }
}
