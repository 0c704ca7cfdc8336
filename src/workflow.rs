use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::time::{Instant, sleep_until};
use typeahead::source::Catalog;
use typeahead::{SearchConfig, SearchCoordinator, SearchState};

use crate::settings::ResolvedConfig;

/// Final state of a replayed script.
#[derive(Debug, Clone)]
pub(crate) struct ReplayOutcome {
    pub(crate) state: SearchState,
    pub(crate) steps: usize,
    pub(crate) elapsed: Duration,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("script line {line}: {reason}")]
pub(crate) struct ScriptError {
    line: usize,
    reason: String,
}

/// One user interaction in a keystroke script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScriptCommand {
    /// Replace the input text.
    Type(String),
    Select(String),
    Submit,
    Clear,
    Activate,
    Deactivate,
    /// Let every armed timer and in-flight lookup finish.
    Wait,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptStep {
    /// Time to let pass before the command runs.
    pub(crate) delay: Duration,
    pub(crate) command: ScriptCommand,
}

/// Parse a keystroke script.
///
/// Each non-blank line holds one command, optionally prefixed by `+MS` to
/// wait that many milliseconds first. Lines starting with `#` are ignored.
pub(crate) fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (delay, rest) = match trimmed.strip_prefix('+') {
            Some(after) => {
                let (millis, rest) = after.split_once(' ').unwrap_or((after, ""));
                let millis: u64 = millis.parse().map_err(|_| ScriptError {
                    line,
                    reason: format!("invalid delay `+{millis}`"),
                })?;
                (Duration::from_millis(millis), rest.trim_start())
            }
            None => (Duration::ZERO, trimmed),
        };

        let (word, argument) = rest.split_once(' ').unwrap_or((rest, ""));
        let command = match word.trim_end() {
            "type" => ScriptCommand::Type(argument.to_string()),
            "select" if !argument.trim().is_empty() => ScriptCommand::Select(argument.to_string()),
            "select" => {
                return Err(ScriptError {
                    line,
                    reason: "`select` needs the suggestion text".into(),
                });
            }
            "submit" => ScriptCommand::Submit,
            "clear" => ScriptCommand::Clear,
            "activate" => ScriptCommand::Activate,
            "deactivate" => ScriptCommand::Deactivate,
            "wait" => ScriptCommand::Wait,
            "" => {
                return Err(ScriptError {
                    line,
                    reason: "missing command after delay".into(),
                });
            }
            other => {
                return Err(ScriptError {
                    line,
                    reason: format!("unknown command `{other}`"),
                });
            }
        };

        steps.push(ScriptStep { delay, command });
    }

    Ok(steps)
}

/// Read a script from `path`, or from stdin when the path is absent or `-`.
pub(crate) fn load_script(path: Option<&Path>) -> Result<Vec<ScriptStep>> {
    let text = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read script from stdin")?;
            text
        }
    };
    Ok(parse_script(&text)?)
}

/// Drives a [`SearchCoordinator`] through a script against a catalog.
pub(crate) struct ReplayWorkflow {
    coordinator: SearchCoordinator,
    steps: Vec<ScriptStep>,
}

impl ReplayWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig, steps: Vec<ScriptStep>) -> Result<Self> {
        let catalog = match &config.source.catalog {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read catalog {}", path.display()))?;
                Catalog::from_json(&text)
                    .with_context(|| format!("failed to parse catalog {}", path.display()))?
            }
            None => Catalog::default(),
        }
        .with_options(config.source.catalog_options());

        tracing::info!(entries = catalog.len(), steps = steps.len(), "starting replay");
        Ok(Self::new(catalog, config.search, steps))
    }

    fn new(catalog: Catalog, search: SearchConfig, steps: Vec<ScriptStep>) -> Self {
        Self {
            coordinator: SearchCoordinator::new(Arc::new(catalog), search),
            steps,
        }
    }

    pub(crate) async fn run(mut self) -> ReplayOutcome {
        let started = Instant::now();
        let steps = std::mem::take(&mut self.steps);

        for step in &steps {
            self.idle_for(step.delay).await;
            self.apply(&step.command).await;
        }
        self.coordinator.settle().await;

        ReplayOutcome {
            state: self.coordinator.state().clone(),
            steps: steps.len(),
            elapsed: started.elapsed(),
        }
    }

    /// Let `delay` pass while timers fire and lookups complete.
    ///
    /// A debounce deadline falling exactly on the step boundary fires before
    /// the next command runs.
    async fn idle_for(&mut self, delay: Duration) {
        let until = Instant::now() + delay;
        loop {
            tokio::select! {
                biased;

                _ = sleep_until(until) => break,
                tick = self.coordinator.tick() => {
                    if tick.is_none() {
                        sleep_until(until).await;
                        break;
                    }
                }
            }
        }

        if self.coordinator.fire_due() {
            self.drain_ready().await;
        }
    }

    /// Apply completions of lookups that finish without time passing.
    async fn drain_ready(&mut self) {
        while self.coordinator.is_busy() {
            tokio::task::yield_now().await;
            if self.coordinator.pump().is_empty() {
                break;
            }
        }
    }

    async fn apply(&mut self, command: &ScriptCommand) {
        tracing::debug!(?command, "replaying");
        match command {
            ScriptCommand::Type(text) => self.coordinator.on_query_change(text.as_str()),
            ScriptCommand::Select(text) => self.coordinator.select_suggestion(text.as_str()),
            ScriptCommand::Submit => self.coordinator.submit(),
            ScriptCommand::Clear => self.coordinator.clear(),
            ScriptCommand::Activate => self.coordinator.activate(),
            ScriptCommand::Deactivate => self.coordinator.deactivate(),
            ScriptCommand::Wait => self.coordinator.settle().await,
        }
    }
}
