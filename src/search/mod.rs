//! Debounced, race-free coordination of suggestion and result lookups.
//!
//! [`SearchCoordinator`] owns the live query and every piece of observable
//! search state. Lookups run as spawned tasks that never touch that state;
//! they report back over a channel which the owner drains through
//! [`SearchCoordinator::pump`] or [`SearchCoordinator::tick`]. Whether a
//! completion is applied is decided at that point, against the live query as
//! it is then, so late answers to superseded queries are dropped no matter
//! the order in which they arrive.

mod commands;
mod config;
mod debounce;
mod query;
mod sequencer;
mod stage;
mod state;

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{Instant, sleep_until};
use typeahead_source_api::{DataSource, FilterSet, GeoPoint, ResultsRequest};

use commands::{StageCompletion, StagePayload};
use debounce::Debouncer;
use sequencer::{RequestSequencer, Settled};

pub use self::config::{DEFAULT_LANG, DEFAULT_SORT_KEY, SearchConfig};
pub use debounce::DEFAULT_QUIET_INTERVAL;
pub use query::Query;
pub use sequencer::{DiscardReason, OperationId, StageStatus};
pub use stage::{
    DEFAULT_RESULTS_MIN_CHARS, DEFAULT_SUGGEST_MIN_CHARS, Stage, StagePlan, StageSelector,
};
pub use state::{ErrorInfo, SearchState};

/// How a completed lookup was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Delivered(Stage),
    Discarded(Stage, DiscardReason),
    Failed(Stage),
}

/// Something [`SearchCoordinator::tick`] processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The debounce timer expired and the pipeline ran for the live query.
    Fired,
    Settled(Resolution),
}

pub struct SearchCoordinator {
    config: SearchConfig,
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    completions: UnboundedReceiver<StageCompletion>,
    state: SearchState,
    active: bool,
}

impl SearchCoordinator {
    /// Create an active coordinator that queries `source`.
    pub fn new(source: Arc<dyn DataSource>, config: SearchConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            debouncer: Debouncer::new(config.quiet_interval),
            sequencer: RequestSequencer::new(source, tx),
            completions: rx,
            state: SearchState::default(),
            active: true,
            config,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stage_status(&self, stage: Stage) -> StageStatus {
        self.sequencer.status(stage)
    }

    /// When the debounce timer will fire, if it is armed.
    pub fn scheduled_at(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Whether a timer is armed or a lookup is in flight.
    pub fn is_busy(&self) -> bool {
        self.debouncer.deadline().is_some() || self.sequencer.has_pending()
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.config.lang = lang.into();
    }

    pub fn set_sort_key(&mut self, sort_key: impl Into<String>) {
        self.config.sort_key = sort_key.into();
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.config.filters = filters;
    }

    pub fn set_location(&mut self, location: Option<GeoPoint>) {
        self.config.location = location;
    }

    /// Record new input text and restart the quiet interval.
    ///
    /// Blank input clears suggestions, results and the last error on the spot
    /// and schedules nothing.
    pub fn on_query_change(&mut self, text: impl Into<String>) {
        self.state.live_query = text.into();
        let query = self.live_query();

        if query.is_empty() {
            self.debouncer.cancel();
            self.sequencer.cancel_all();
            self.state.clear_output();
            self.state.last_error = None;
            tracing::debug!("input emptied, output cleared");
        } else if self.active {
            self.state.suggestions_open = true;
            self.debouncer.arm();
            tracing::trace!(query = %query, "debounce armed");
        } else {
            tracing::debug!(query = %query, "coordinator inactive, lookup not scheduled");
        }

        self.refresh_searching();
    }

    /// Adopt a suggestion the user picked.
    ///
    /// The live query is replaced without debouncing and the suggestion list is
    /// closed. No results lookup is started; call [`submit`](Self::submit) for
    /// that.
    pub fn select_suggestion(&mut self, text: impl Into<String>) {
        self.debouncer.cancel();
        self.sequencer.cancel(Stage::Suggestions);
        self.state.live_query = text.into();
        self.state.suggestions.clear();
        self.state.suggestions_open = false;
        tracing::debug!(query = %self.state.live_query, "suggestion selected");
        self.refresh_searching();
    }

    /// Search for the live query now, skipping the quiet interval.
    ///
    /// Queries long enough for results go straight to the results stage;
    /// shorter ones run the normal pipeline.
    pub fn submit(&mut self) {
        self.debouncer.cancel();
        if !self.active {
            return;
        }

        let query = self.live_query();
        match self.config.selector.plan(&query) {
            StagePlan::SuggestionsThenResults | StagePlan::Results => {
                tracing::debug!(query = %query, "search submitted");
                self.sequencer.cancel_all();
                self.state.retain_error_for(query.as_str());
                self.dispatch_results(query);
                self.refresh_searching();
            }
            StagePlan::Suggestions | StagePlan::Clear => self.run_pipeline(),
        }
    }

    /// Reset the query and all output while keeping the surface active.
    pub fn clear(&mut self) {
        self.state.live_query.clear();
        self.reset_output();
        self.state.suggestions_open = false;
        tracing::debug!("search cleared");
    }

    pub fn activate(&mut self) {
        if !self.active {
            self.active = true;
            tracing::debug!("search surface activated");
        }
    }

    /// Dismiss the search surface, dropping every pending timer and lookup.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.reset_output();
        self.state.suggestions_open = false;
        tracing::debug!("search surface deactivated");
    }

    /// Fire the debounce timer if its deadline has passed.
    pub fn fire_due(&mut self) -> bool {
        if self.debouncer.take_if_due(Instant::now()) {
            self.fire();
            return true;
        }
        false
    }

    /// Apply every completion that has already arrived.
    pub fn pump(&mut self) -> Vec<Resolution> {
        let mut resolutions = Vec::new();
        while let Ok(completion) = self.completions.try_recv() {
            resolutions.push(self.apply_completion(completion));
        }
        resolutions
    }

    /// Wait for the next timer expiry or completion and process it.
    ///
    /// Returns `None` without waiting when nothing is scheduled or in flight.
    pub async fn tick(&mut self) -> Option<Tick> {
        if !self.is_busy() {
            return None;
        }
        let deadline = self.debouncer.deadline();

        tokio::select! {
            biased;

            Some(completion) = self.completions.recv() => {
                Some(Tick::Settled(self.apply_completion(completion)))
            }
            _ = sleep_until_deadline(deadline) => {
                self.debouncer.cancel();
                self.fire();
                Some(Tick::Fired)
            }
        }
    }

    /// Process timers and completions until nothing is scheduled or in flight.
    pub async fn settle(&mut self) {
        while self.tick().await.is_some() {}
    }

    fn live_query(&self) -> Query {
        Query::new(&self.state.live_query)
    }

    fn reset_output(&mut self) {
        self.debouncer.cancel();
        self.sequencer.cancel_all();
        self.state.clear_output();
        self.state.last_error = None;
        self.refresh_searching();
    }

    fn fire(&mut self) {
        if !self.active {
            return;
        }
        tracing::debug!(query = %self.live_query(), "debounce fired");
        self.run_pipeline();
    }

    fn run_pipeline(&mut self) {
        let query = self.live_query();
        let plan = self.config.selector.plan(&query);
        self.sequencer.cancel_all();
        self.state.retain_error_for(query.as_str());

        match plan.first_stage() {
            None => {
                self.state.clear_output();
                tracing::debug!(query = %query, "query too short, output cleared");
            }
            Some(Stage::Suggestions) => {
                if !plan.includes(Stage::Results) {
                    self.state.results.clear();
                }
                self.sequencer
                    .dispatch_suggestions(query, self.config.lang.clone());
            }
            Some(Stage::Results) => self.dispatch_results(query),
        }

        self.refresh_searching();
    }

    fn dispatch_results(&mut self, query: Query) {
        let request = ResultsRequest {
            query: query.as_str().to_owned(),
            lang: self.config.lang.clone(),
            filters: self.config.filters.clone(),
            sort_key: self.config.sort_key.clone(),
            location: self.config.location,
        };
        self.sequencer.dispatch_results(request);
    }

    fn apply_completion(&mut self, completion: StageCompletion) -> Resolution {
        let op = completion.op;
        let live = self.live_query();

        let resolution = match self.sequencer.resolve(completion, &live) {
            Settled::Deliver {
                stage,
                query,
                payload,
            } => {
                match payload {
                    StagePayload::Suggestions(suggestions) => {
                        tracing::debug!(
                            %op,
                            query = %query,
                            count = suggestions.len(),
                            "suggestions delivered"
                        );
                        self.state.suggestions = suggestions;
                    }
                    StagePayload::Results(results) => {
                        tracing::debug!(
                            %op,
                            query = %query,
                            count = results.len(),
                            "results delivered"
                        );
                        self.state.results = results;
                    }
                }
                self.state.clear_error_for(stage);
                self.continue_after(stage, query);
                Resolution::Delivered(stage)
            }
            Settled::Discard { stage, reason } => {
                tracing::debug!(%stage, %op, ?reason, "lookup discarded");
                Resolution::Discarded(stage, reason)
            }
            Settled::Fail {
                stage,
                query,
                error,
            } => {
                tracing::warn!(%stage, %op, query = %query, %error, "lookup failed");
                self.state.last_error = Some(ErrorInfo {
                    stage,
                    query: query.as_str().to_owned(),
                    message: error.to_string(),
                });
                self.continue_after(stage, query);
                Resolution::Failed(stage)
            }
        };

        self.refresh_searching();
        resolution
    }

    /// Start results once suggestions for the same, still live, query settle.
    fn continue_after(&mut self, stage: Stage, query: Query) {
        if stage != Stage::Suggestions || !self.active {
            return;
        }
        if self.config.selector.plan(&query) == StagePlan::SuggestionsThenResults {
            self.dispatch_results(query);
        }
    }

    fn refresh_searching(&mut self) {
        let live = self.live_query();
        self.state.is_searching = self
            .sequencer
            .pending_query(Stage::Results)
            .is_some_and(|query| *query == live);
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
