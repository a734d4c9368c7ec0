//! Store configuration for `traq`.
//!
//! Resolution precedence (highest wins):
//! 1. Explicit CLI value
//! 2. Environment (`TRAQ_DB`, `TRAQ_LOCK_TIMEOUT_MS`)
//! 3. Defaults (`traq.db` in the working directory, 5s lock timeout)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default database filename when nothing else is configured.
const DEFAULT_DB_FILENAME: &str = "traq.db";

/// How long a writer waits on the SQLite write lock before giving up.
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Resolved store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database: PathBuf,
    /// Busy timeout applied to every connection, in milliseconds.
    pub lock_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DB_FILENAME),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Resolve configuration from an optional explicit path plus the
    /// environment.
    #[must_use]
    pub fn resolve(explicit_db: Option<PathBuf>) -> Self {
        let database = explicit_db
            .or_else(|| env::var_os("TRAQ_DB").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME));

        let lock_timeout_ms = env::var("TRAQ_LOCK_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOCK_TIMEOUT_MS);

        Self {
            database,
            lock_timeout_ms,
        }
    }
}
