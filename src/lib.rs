//! `traq` — work-tracking backend core.
//!
//! The crate's center of gravity is the issue positioning engine: the
//! transactional machinery that keeps every project status column a
//! contiguous, gap-free, duplicate-free sequence of issue positions while
//! issues are created, reordered, transferred between statuses, and
//! archived concurrently.
//!
//! Everything runs against SQLite through [`storage::SqliteStore`]. Mutations
//! execute inside a single immediate transaction so that concurrent writers
//! serialize at the store instead of racing the partial unique index that
//! backs the ordering.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;
pub mod validation;

pub use error::{Result, TraqError};
pub use storage::SqliteStore;
