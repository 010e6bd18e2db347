//! Tracing subscriber setup
//!
//! Logs go to stderr, and additionally to a plain-text log file when
//! one is given (the hive rigs run headless and the file is what gets
//! inspected after a session).

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber. `RUST_LOG` overrides the default
/// filter; `debug` raises the default level.
pub fn init_logging(debug: bool, log_file: Option<&Path>) {
    let default_filter = if debug { "beepi=debug" } else { "beepi=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if let Some(path) = log_file {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
            return;
        }
        // Fall through: an unwritable log file should not stop a session
    }

    registry.init();
}
