//! Logging initialization for `traq`.
//!
//! Uses `tracing` with an env-filter: `TRAQ_LOG` overrides the level,
//! otherwise `-v`/`-q` from the CLI pick a default. Diagnostics go to
//! stderr so JSON output on stdout stays machine-readable.

use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TEST_INIT: Once = Once::new();

/// Initialize logging for the binary.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("TRAQ_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("traq={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;

    Ok(())
}

/// Initialize logging for tests. Idempotent; safe to call from every test.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("TRAQ_LOG").unwrap_or_else(|_| EnvFilter::new("traq=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_test_writer()
            .try_init();
    });
}
