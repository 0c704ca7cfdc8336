use std::time::Duration;

use tokio::time::Instant;

/// Quiet period applied to keystrokes before the pipeline runs.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(300);

/// Single-shot timer that is pushed back on every keystroke.
///
/// The debouncer only tracks a deadline; the owner decides when to check it
/// (see [`SearchCoordinator::fire_due`](super::SearchCoordinator::fire_due)).
#[derive(Debug, Clone)]
pub(crate) struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub(crate) fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Replace any scheduled deadline with one a full quiet interval from now.
    pub(crate) fn arm(&mut self) -> Instant {
        let at = Instant::now() + self.quiet;
        self.deadline = Some(at);
        at
    }

    /// Drop the scheduled deadline. Returns whether one was armed.
    pub(crate) fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return `true` when the deadline has been reached.
    pub(crate) fn take_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
