//! Diagnostic output for the `typeahead` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the embedding application. The binary calls [`initialize`] once at start-up.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset, raised by each `-v`.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "typeahead=debug,typeahead_source_api=debug,info",
        _ => "trace",
    }
}

/// Install a stderr formatter filtered by `RUST_LOG` or the verbosity default.
pub fn initialize(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
