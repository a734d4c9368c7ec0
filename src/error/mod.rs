//! Error types for `traq`.
//!
//! The taxonomy mirrors how callers are expected to react:
//! validation and not-found errors are reported back to the client,
//! integrity and conflict errors carry the store's explanation, and
//! database errors are surfaced untouched after the enclosing
//! transaction rolls back.

use thiserror::Error;

/// Primary error type for `traq` operations.
#[derive(Error, Debug)]
pub enum TraqError {
    // === Caller errors ===
    /// Field validation failed before any SQL ran.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Issue does not exist in the project, or is archived where an
    /// active issue is required.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Status does not exist in the project.
    #[error("Status not found: {id}")]
    StatusNotFound { id: String },

    /// Source or target status of a move does not belong to the project.
    #[error("Status invalid for project: {reason}")]
    StatusInvalid { reason: String },

    /// Issue type does not exist in the project.
    #[error("Issue type not found: {id}")]
    IssueTypeNotFound { id: String },

    /// Project does not exist.
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    // === Store errors ===
    /// A uniqueness constraint rejected the write (duplicate status name,
    /// duplicate position). Not retried automatically.
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// An integrity trigger fired (cross-project reference, hierarchy
    /// level inversion). The store's message is passed through.
    #[error("Integrity violation: {reason}")]
    Integrity { reason: String },

    /// A status still holding active issues cannot be archived.
    #[error("Status {id} still has {count} active issues")]
    StatusNotEmpty { id: String, count: i64 },

    /// `SQLite` error outside the classified cases above.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Infrastructure ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapped error from the binary edge.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TraqError {
    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Can the caller fix this without operator involvement?
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::IssueNotFound { .. }
                | Self::StatusNotFound { .. }
                | Self::StatusInvalid { .. }
                | Self::IssueTypeNotFound { .. }
                | Self::ProjectNotFound { .. }
                | Self::StatusNotEmpty { .. }
        )
    }
}

/// Result type using `TraqError`.
pub type Result<T> = std::result::Result<T, TraqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TraqError::IssueNotFound {
            id: "0b7f9c1e".to_string(),
        };
        assert_eq!(err.to_string(), "Issue not found: 0b7f9c1e");
    }

    #[test]
    fn validation_constructor() {
        let err = TraqError::validation("title", "cannot be empty");
        assert_eq!(err.to_string(), "Validation failed: title: cannot be empty");
        assert!(err.is_caller_error());
    }

    #[test]
    fn database_error_is_not_caller_error() {
        let err = TraqError::Database(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_caller_error());
    }
}
