use std::fmt;

use serde::Serialize;

use super::query::Query;

pub const DEFAULT_SUGGEST_MIN_CHARS: usize = 2;
pub const DEFAULT_RESULTS_MIN_CHARS: usize = 3;

/// One of the two ordered lookup phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Suggestions,
    Results,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Suggestions, Stage::Results];

    pub fn label(self) -> &'static str {
        match self {
            Self::Suggestions => "suggestions",
            Self::Results => "results",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Suggestions => 0,
            Self::Results => 1,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which stages a debounce cycle runs for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePlan {
    /// Too short for any lookup; displayed output is cleared.
    Clear,
    Suggestions,
    /// Suggestions first; results start once suggestions settle for the same query.
    SuggestionsThenResults,
    Results,
}

impl StagePlan {
    /// Stage dispatched when the cycle fires.
    pub fn first_stage(self) -> Option<Stage> {
        match self {
            Self::Clear => None,
            Self::Suggestions | Self::SuggestionsThenResults => Some(Stage::Suggestions),
            Self::Results => Some(Stage::Results),
        }
    }

    pub fn includes(self, stage: Stage) -> bool {
        match (self, stage) {
            (Self::Clear, _) => false,
            (Self::Suggestions, Stage::Results) => false,
            (Self::Results, Stage::Suggestions) => false,
            _ => true,
        }
    }
}

/// Length thresholds deciding which stages a query is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSelector {
    suggest_min_chars: usize,
    results_min_chars: usize,
    suggest_before_results: bool,
}

impl Default for StageSelector {
    fn default() -> Self {
        Self {
            suggest_min_chars: DEFAULT_SUGGEST_MIN_CHARS,
            results_min_chars: DEFAULT_RESULTS_MIN_CHARS,
            suggest_before_results: true,
        }
    }
}

impl StageSelector {
    pub fn new(suggest_min_chars: usize, results_min_chars: usize) -> Self {
        Self {
            suggest_min_chars,
            results_min_chars,
            ..Self::default()
        }
    }

    /// Whether queries long enough for results also fetch suggestions first.
    #[must_use]
    pub fn with_suggestions_before_results(mut self, enabled: bool) -> Self {
        self.suggest_before_results = enabled;
        self
    }

    pub fn suggest_min_chars(&self) -> usize {
        self.suggest_min_chars
    }

    pub fn results_min_chars(&self) -> usize {
        self.results_min_chars
    }

    pub fn suggest_before_results(&self) -> bool {
        self.suggest_before_results
    }

    pub fn plan(&self, query: &Query) -> StagePlan {
        let len = query.len();
        if len == 0 {
            return StagePlan::Clear;
        }
        if len >= self.results_min_chars {
            if self.suggest_before_results {
                StagePlan::SuggestionsThenResults
            } else {
                StagePlan::Results
            }
        } else if len >= self.suggest_min_chars {
            StagePlan::Suggestions
        } else {
            StagePlan::Clear
        }
    }
}
