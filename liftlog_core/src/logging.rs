//! Tracing setup for the `liftlog` binary and the core's unit tests.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber, writing compact lines to stderr.
///
/// `default_level` applies unless `RUST_LOG` is set. Stdout is left to
/// command output so `--json` results stay parseable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level subscriber routed through the test harness; safe to call from
/// every test.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
