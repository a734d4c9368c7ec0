//! Core data types for `traq`.
//!
//! This module defines the entities the positioning engine operates on:
//! - `Project` - owner of statuses, issue types and the number counter
//! - `Status` - a board column with a project-unique position
//! - `IssueType` - a leveled category (epic above story above task)
//! - `Issue` - the work item, carrying `number` and `status_position`
//!
//! plus the parameter structs for each store operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issue priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = crate::error::TraqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(crate::error::TraqError::validation(
                "priority",
                "must be 'low', 'medium', 'high' or 'critical'",
            )),
        }
    }
}

/// Board column category. Every status belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Todo,
    Doing,
    Done,
}

impl StatusCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusCategory {
    type Err = crate::error::TraqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(crate::error::TraqError::validation(
                "category",
                "must be 'todo', 'doing' or 'done'",
            )),
        }
    }
}

/// A project: the ordering scope for statuses and issue numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Short uppercase key, unique across projects.
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A status column within a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub category: StatusCategory,
    /// Column order on the board, unique among active statuses of the project.
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

/// A leveled issue category. Lower level sits higher in the hierarchy:
/// an issue's parent must have a strictly lower-leveled type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueType {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

/// The work item itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub project_id: String,
    /// Project-scoped monotonic number, assigned at creation.
    pub number: i64,
    pub issue_type_id: String,
    pub status_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<String>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    pub reporter_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Zero-based index within the status column, unique among active
    /// issues of `(project_id, status_id)`.
    pub status_position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// An issue is active iff it has not been archived.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }
}

// === Operation parameters ===

/// Parameters for `SqliteStore::create_issue`.
#[derive(Debug, Clone, Default)]
pub struct CreateIssueParams {
    pub project_id: String,
    pub issue_type_id: String,
    pub status_id: String,
    pub title: String,
    pub reporter_id: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub parent_issue_id: Option<String>,
    pub assignee_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Parameters for `SqliteStore::update_issue`.
///
/// `assignee_id` uses the outer `Option` for "change or not" and the inner
/// for "set or clear"; the remaining fields are full replacements.
#[derive(Debug, Clone, Default)]
pub struct UpdateIssueParams {
    pub issue_id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Parameters for `SqliteStore::list_issues`.
#[derive(Debug, Clone, Default)]
pub struct ListIssuesParams {
    pub project_id: String,
    pub status_id: Option<String>,
    pub assignee_id: Option<String>,
}

/// Parameters for `SqliteStore::move_issue`.
#[derive(Debug, Clone, Default)]
pub struct MoveIssueParams {
    pub project_id: String,
    pub issue_id: String,
    /// `None` means "stay in the current status".
    pub target_status_id: Option<String>,
    /// Clamped into the legal range of the target status.
    pub target_position: i64,
}

/// Parameters for `SqliteStore::create_status`.
#[derive(Debug, Clone)]
pub struct CreateStatusParams {
    pub project_id: String,
    pub name: String,
    pub category: StatusCategory,
}

/// Parameters for `SqliteStore::update_status`.
#[derive(Debug, Clone)]
pub struct UpdateStatusParams {
    pub status_id: String,
    pub project_id: String,
    pub name: String,
    pub category: StatusCategory,
}

/// Parameters for `SqliteStore::create_issue_type`.
#[derive(Debug, Clone)]
pub struct CreateIssueTypeParams {
    pub project_id: String,
    pub name: String,
    pub level: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trips_through_str() {
        for p in [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Critical,
        ] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
    }

    #[test]
    fn priority_rejects_unknown() {
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("DOING".parse::<StatusCategory>().unwrap(), StatusCategory::Doing);
    }

    #[test]
    fn category_rejects_unknown() {
        assert!("archived".parse::<StatusCategory>().is_err());
    }

    #[test]
    fn priority_serializes_snake_case() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
