//! `SQLite` storage implementation.
//!
//! Every mutating operation runs inside a single transaction opened with
//! `TransactionBehavior::Immediate`, so concurrent writers serialize at the
//! store. That writer lock is what lets the move coordinator reason about
//! positions without per-row locks: between BEGIN IMMEDIATE and COMMIT no
//! other mover can observe or touch the affected columns.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{Result, TraqError};
use crate::model::{
    CreateIssueParams, CreateIssueTypeParams, CreateStatusParams, Issue, IssueType,
    ListIssuesParams, MoveIssueParams, Priority, Project, Status, StatusCategory,
    UpdateIssueParams, UpdateStatusParams,
};
use crate::storage::positions;
use crate::storage::schema::apply_schema;
use crate::validation;

const ISSUE_COLS: &str = "id, project_id, number, issue_type_id, status_id, parent_issue_id,
    title, description, priority, assignee_id, reporter_id, due_date,
    status_position, created_at, updated_at, archived_at";

const STATUS_COLS: &str = "id, project_id, name, category, position, created_at, updated_at, archived_at";

/// SQLite-based store for the positioning engine.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, 5_000)
    }

    /// Open a connection with an explicit busy timeout (ms).
    ///
    /// Writers queue on SQLite's write lock; the timeout bounds how long a
    /// contended transaction waits before surfacing `SQLITE_BUSY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: u64) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(lock_timeout_ms))?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Run a mutation inside one immediate transaction.
    ///
    /// On error the transaction rolls back (dropped uncommitted) and
    /// constraint failures are classified into the crate's taxonomy.
    fn mutate<F, R>(&mut self, op: &'static str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(classify)?;
                tracing::debug!(op, "committed");
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(op, error = %err, "rolled back");
                Err(match err {
                    TraqError::Database(e) => classify(e),
                    other => other,
                })
            }
        }
    }

    // === Projects ===

    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for empty fields and `Conflict` when the key is
    /// already taken.
    pub fn create_project(&mut self, name: &str, key: &str) -> Result<Project> {
        if name.trim().is_empty() {
            return Err(TraqError::validation("name", "is required"));
        }
        if key.trim().is_empty() {
            return Err(TraqError::validation("key", "is required"));
        }

        let id = Uuid::new_v4().to_string();
        let now = now_str();
        let key = key.to_uppercase();

        self.mutate("create_project", |tx| {
            tx.execute(
                "INSERT INTO projects (id, name, key, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![id, name, key, now],
            )?;
            fetch_project(tx, &id)?.ok_or_else(|| TraqError::ProjectNotFound { id: id.clone() })
        })
    }

    /// Get a project by id.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if no such project exists.
    pub fn get_project(&self, project_id: &str) -> Result<Project> {
        fetch_project(&self.conn, project_id)?.ok_or_else(|| TraqError::ProjectNotFound {
            id: project_id.to_string(),
        })
    }

    // === Statuses ===

    /// Create a status, appended after the project's current last column.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input and `Conflict` for a duplicate
    /// name within the project.
    pub fn create_status(&mut self, p: &CreateStatusParams) -> Result<Status> {
        validation::validate_create_status(p)?;

        let id = Uuid::new_v4().to_string();
        let now = now_str();

        self.mutate("create_status", |tx| {
            tx.execute(
                "INSERT INTO statuses (id, project_id, name, category, position, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4,
                   COALESCE(
                     (SELECT MAX(position) + 1 FROM statuses
                      WHERE project_id = ?2 AND archived_at IS NULL),
                     0
                   ),
                   ?5, ?5)",
                params![id, p.project_id, p.name, p.category.as_str(), now],
            )?;
            fetch_status(tx, &p.project_id, &id)?
                .ok_or_else(|| TraqError::StatusNotFound { id: id.clone() })
        })
    }

    /// List the active statuses of a project, ordered by board position.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_statuses(&self, project_id: &str) -> Result<Vec<Status>> {
        if project_id.trim().is_empty() {
            return Err(TraqError::validation("project_id", "is required"));
        }

        let sql = format!(
            "SELECT {STATUS_COLS}
             FROM statuses
             WHERE project_id = ?1 AND archived_at IS NULL
             ORDER BY position ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let statuses = stmt
            .query_map([project_id], status_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(statuses)
    }

    /// Rename or recategorize a status. Never positional.
    ///
    /// # Errors
    ///
    /// Returns `StatusNotFound` if the status is missing or archived and
    /// `Conflict` for a duplicate name.
    pub fn update_status(&mut self, p: &UpdateStatusParams) -> Result<Status> {
        validation::validate_update_status(p)?;

        let now = now_str();
        self.mutate("update_status", |tx| {
            let changed = tx.execute(
                "UPDATE statuses
                 SET name = ?1, category = ?2, updated_at = ?3
                 WHERE id = ?4 AND project_id = ?5 AND archived_at IS NULL",
                params![p.name, p.category.as_str(), now, p.status_id, p.project_id],
            )?;
            if changed == 0 {
                return Err(TraqError::StatusNotFound {
                    id: p.status_id.clone(),
                });
            }
            fetch_status(tx, &p.project_id, &p.status_id)?.ok_or_else(|| {
                TraqError::StatusNotFound {
                    id: p.status_id.clone(),
                }
            })
        })
    }

    /// Archive a status. Refused while the column still holds active issues,
    /// which would otherwise strand their positions.
    ///
    /// # Errors
    ///
    /// Returns `StatusNotEmpty` or `StatusNotFound`.
    pub fn archive_status(&mut self, project_id: &str, status_id: &str) -> Result<()> {
        if project_id.trim().is_empty() {
            return Err(TraqError::validation("project_id", "is required"));
        }
        if status_id.trim().is_empty() {
            return Err(TraqError::validation("status_id", "is required"));
        }

        let now = now_str();
        self.mutate("archive_status", |tx| {
            let count = positions::active_count(tx, project_id, status_id)?;
            if count > 0 {
                return Err(TraqError::StatusNotEmpty {
                    id: status_id.to_string(),
                    count,
                });
            }

            let changed = tx.execute(
                "UPDATE statuses
                 SET archived_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND project_id = ?3 AND archived_at IS NULL",
                params![now, status_id, project_id],
            )?;
            if changed == 0 {
                return Err(TraqError::StatusNotFound {
                    id: status_id.to_string(),
                });
            }
            Ok(())
        })
    }

    // === Issue types ===

    /// Create an issue type.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input and `Conflict` for a duplicate
    /// name within the project.
    pub fn create_issue_type(&mut self, p: &CreateIssueTypeParams) -> Result<IssueType> {
        validation::validate_create_issue_type(p)?;

        let id = Uuid::new_v4().to_string();
        let now = now_str();

        self.mutate("create_issue_type", |tx| {
            tx.execute(
                "INSERT INTO issue_types (id, project_id, name, level, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, p.project_id, p.name, p.level, now],
            )?;
            fetch_issue_type(tx, &p.project_id, &id)?
                .ok_or_else(|| TraqError::IssueTypeNotFound { id: id.clone() })
        })
    }

    /// List the active issue types of a project, highest level first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_issue_types(&self, project_id: &str) -> Result<Vec<IssueType>> {
        if project_id.trim().is_empty() {
            return Err(TraqError::validation("project_id", "is required"));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, level, created_at, updated_at, archived_at
             FROM issue_types
             WHERE project_id = ?1 AND archived_at IS NULL
             ORDER BY level ASC, name ASC",
        )?;
        let types = stmt
            .query_map([project_id], issue_type_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(types)
    }

    // === Issues ===

    /// Create an issue: bump the project counter for its number and append
    /// it at the end of the target status column, atomically.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `ProjectNotFound`, or `Integrity` when a
    /// cross-project or hierarchy trigger fires.
    pub fn create_issue(&mut self, p: &CreateIssueParams) -> Result<Issue> {
        validation::validate_create_issue(p)?;

        let id = Uuid::new_v4().to_string();
        let now = now_str();
        let priority = p.priority.unwrap_or_default();

        self.mutate("create_issue", |tx| {
            let known: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM projects WHERE id = ?1",
                    [&p.project_id],
                    |row| row.get(0),
                )
                .optional()?;
            if known.is_none() {
                return Err(TraqError::ProjectNotFound {
                    id: p.project_id.clone(),
                });
            }

            let number: i64 = tx.query_row(
                "INSERT INTO project_issue_counters (project_id, last_number)
                 VALUES (?1, 1)
                 ON CONFLICT (project_id)
                 DO UPDATE SET last_number = last_number + 1
                 RETURNING last_number",
                [&p.project_id],
                |row| row.get(0),
            )?;

            // The append position is a sub-select so number assignment and
            // placement commit under the same writer lock.
            tx.execute(
                "INSERT INTO issues (
                    id, project_id, number, issue_type_id, status_id, parent_issue_id,
                    title, description, priority, assignee_id, reporter_id, due_date,
                    status_position, created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                    (SELECT COALESCE(MAX(status_position), -1) + 1
                     FROM issues
                     WHERE project_id = ?2 AND status_id = ?5 AND archived_at IS NULL),
                    ?13, ?13
                )",
                params![
                    id,
                    p.project_id,
                    number,
                    p.issue_type_id,
                    p.status_id,
                    p.parent_issue_id,
                    p.title,
                    p.description,
                    priority.as_str(),
                    p.assignee_id,
                    p.reporter_id,
                    p.due_date.map(|dt| dt.to_rfc3339()),
                    now,
                ],
            )?;

            tracing::debug!(issue = %id, number, "created issue");

            fetch_issue(tx, &p.project_id, &id)?
                .ok_or_else(|| TraqError::IssueNotFound { id: id.clone() })
        })
    }

    /// Get an issue by id. Archived issues are visible here; they carry
    /// their `archived_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if no such issue exists in the project.
    pub fn get_issue(&self, project_id: &str, issue_id: &str) -> Result<Issue> {
        if project_id.trim().is_empty() {
            return Err(TraqError::validation("project_id", "is required"));
        }
        if issue_id.trim().is_empty() {
            return Err(TraqError::validation("issue_id", "is required"));
        }

        fetch_issue(&self.conn, project_id, issue_id)?.ok_or_else(|| TraqError::IssueNotFound {
            id: issue_id.to_string(),
        })
    }

    /// List the active issues of a project ordered by
    /// `(status_id, status_position)`, so boards can render columns directly.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a missing project id.
    pub fn list_issues(&self, p: &ListIssuesParams) -> Result<Vec<Issue>> {
        validation::validate_list_issues(p)?;

        let mut sql = format!(
            "SELECT {ISSUE_COLS}
             FROM issues
             WHERE project_id = ?1 AND archived_at IS NULL"
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(p.project_id.clone())];

        if let Some(ref status_id) = p.status_id {
            args.push(Box::new(status_id.clone()));
            sql.push_str(&format!(" AND status_id = ?{}", args.len()));
        }
        if let Some(ref assignee_id) = p.assignee_id {
            args.push(Box::new(assignee_id.clone()));
            sql.push_str(&format!(" AND assignee_id = ?{}", args.len()));
        }

        sql.push_str(" ORDER BY status_id, status_position ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let args_refs: Vec<&dyn rusqlite::ToSql> = args.iter().map(AsRef::as_ref).collect();
        let issues = stmt
            .query_map(args_refs.as_slice(), issue_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(issues)
    }

    /// Update an issue's mutable attributes. Never touches `status_id` or
    /// `status_position`; repositioning goes through `move_issue`.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue is missing or archived.
    pub fn update_issue(&mut self, p: &UpdateIssueParams) -> Result<Issue> {
        validation::validate_update_issue(p)?;

        let now = now_str();
        self.mutate("update_issue", |tx| {
            let changed = tx.execute(
                "UPDATE issues
                 SET title = ?1,
                     description = ?2,
                     priority = ?3,
                     assignee_id = ?4,
                     due_date = ?5,
                     updated_at = ?6
                 WHERE id = ?7 AND project_id = ?8 AND archived_at IS NULL",
                params![
                    p.title,
                    p.description,
                    p.priority.as_str(),
                    p.assignee_id,
                    p.due_date.map(|dt| dt.to_rfc3339()),
                    now,
                    p.issue_id,
                    p.project_id,
                ],
            )?;
            if changed == 0 {
                return Err(TraqError::IssueNotFound {
                    id: p.issue_id.clone(),
                });
            }
            fetch_issue(tx, &p.project_id, &p.issue_id)?.ok_or_else(|| TraqError::IssueNotFound {
                id: p.issue_id.clone(),
            })
        })
    }

    /// Archive an active issue. Neighbor positions are left as they are;
    /// the next move touching the column re-compacts the active sequence.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue is missing or already archived.
    pub fn archive_issue(&mut self, project_id: &str, issue_id: &str) -> Result<()> {
        if project_id.trim().is_empty() {
            return Err(TraqError::validation("project_id", "is required"));
        }
        if issue_id.trim().is_empty() {
            return Err(TraqError::validation("issue_id", "is required"));
        }

        let now = now_str();
        self.mutate("archive_issue", |tx| {
            let changed = tx.execute(
                "UPDATE issues
                 SET archived_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND project_id = ?3 AND archived_at IS NULL",
                params![now, issue_id, project_id],
            )?;
            if changed == 0 {
                return Err(TraqError::IssueNotFound {
                    id: issue_id.to_string(),
                });
            }
            Ok(())
        })
    }

    /// Move an issue to a target `(status, position)`.
    ///
    /// The whole relocation is one immediate transaction: load the mover,
    /// resolve and verify the statuses, clamp the requested position, park
    /// the mover above its source column, two-phase-shift the neighbors,
    /// and finally place the mover at its clamped slot.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `IssueNotFound`, or `StatusInvalid`.
    pub fn move_issue(&mut self, p: &MoveIssueParams) -> Result<()> {
        validation::validate_move_issue(p)?;

        self.mutate("move_issue", |tx| {
            let current: Option<(String, i64)> = tx
                .query_row(
                    "SELECT status_id, status_position
                     FROM issues
                     WHERE id = ?1 AND project_id = ?2 AND archived_at IS NULL",
                    params![p.issue_id, p.project_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let Some((source_status, source_pos)) = current else {
                return Err(TraqError::IssueNotFound {
                    id: p.issue_id.clone(),
                });
            };

            let target_status = p
                .target_status_id
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(&source_status)
                .to_string();
            let same_status = target_status == source_status;

            let found: i64 = tx.query_row(
                "SELECT COUNT(*)
                 FROM statuses
                 WHERE project_id = ?1 AND (id = ?2 OR id = ?3) AND archived_at IS NULL",
                params![p.project_id, source_status, target_status],
                |row| row.get(0),
            )?;
            let required = if same_status { 1 } else { 2 };
            if found != required {
                return Err(TraqError::StatusInvalid {
                    reason: "source or target status not found in project".to_string(),
                });
            }

            let target_pos = positions::clamp_target_position(
                tx,
                &p.project_id,
                &target_status,
                p.target_position,
                same_status,
            )?;

            if same_status && target_pos == source_pos {
                tracing::debug!(issue = %p.issue_id, "move is a no-op");
                return Ok(());
            }

            positions::park_at_max(tx, &p.project_id, &p.issue_id, &source_status)?;

            if same_status {
                if target_pos < source_pos {
                    positions::shift_up_range(
                        tx,
                        &p.project_id,
                        &p.issue_id,
                        &source_status,
                        target_pos,
                        source_pos - 1,
                    )?;
                } else {
                    positions::shift_down_range(
                        tx,
                        &p.project_id,
                        &p.issue_id,
                        &source_status,
                        source_pos + 1,
                        Some(target_pos),
                    )?;
                }
            } else {
                positions::shift_down_range(
                    tx,
                    &p.project_id,
                    &p.issue_id,
                    &source_status,
                    source_pos + 1,
                    None,
                )?;
                positions::open_gap(tx, &p.project_id, &target_status, target_pos)?;
            }

            let now = now_str();
            tx.execute(
                "UPDATE issues
                 SET status_id = ?1, status_position = ?2, updated_at = ?3
                 WHERE id = ?4 AND project_id = ?5",
                params![target_status, target_pos, now, p.issue_id, p.project_id],
            )?;

            tracing::debug!(
                issue = %p.issue_id,
                from = %source_status,
                to = %target_status,
                position = target_pos,
                "moved issue"
            );

            Ok(())
        })
    }
}

/// Classify a rusqlite error into the crate taxonomy: unique-constraint
/// failures become `Conflict`, trigger aborts become `Integrity`, anything
/// else stays a database error.
fn classify(err: rusqlite::Error) -> TraqError {
    if let rusqlite::Error::SqliteFailure(e, ref msg) = err {
        let reason = || {
            msg.clone()
                .unwrap_or_else(|| "constraint violation".to_string())
        };
        match e.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return TraqError::Conflict { reason: reason() };
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
            | rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
            | rusqlite::ffi::SQLITE_CONSTRAINT_CHECK => {
                return TraqError::Integrity { reason: reason() };
            }
            _ => {}
        }
    }
    TraqError::Database(err)
}

fn now_str() -> String {
    Utc::now().to_rfc3339()
}

fn parse_ts(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_opt_ts(idx: usize, value: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_ts(idx, &v)).transpose()
}

fn issue_from_row(row: &Row<'_>) -> rusqlite::Result<Issue> {
    let priority_str: String = row.get(8)?;
    let priority = Priority::from_str(&priority_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Issue {
        id: row.get(0)?,
        project_id: row.get(1)?,
        number: row.get(2)?,
        issue_type_id: row.get(3)?,
        status_id: row.get(4)?,
        parent_issue_id: row.get(5)?,
        title: row.get(6)?,
        description: row.get(7)?,
        priority,
        assignee_id: row.get(9)?,
        reporter_id: row.get(10)?,
        due_date: parse_opt_ts(11, row.get(11)?)?,
        status_position: row.get(12)?,
        created_at: parse_ts(13, &row.get::<_, String>(13)?)?,
        updated_at: parse_ts(14, &row.get::<_, String>(14)?)?,
        archived_at: parse_opt_ts(15, row.get(15)?)?,
    })
}

fn status_from_row(row: &Row<'_>) -> rusqlite::Result<Status> {
    let category_str: String = row.get(3)?;
    let category = StatusCategory::from_str(&category_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Status {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        category,
        position: row.get(4)?,
        created_at: parse_ts(5, &row.get::<_, String>(5)?)?,
        updated_at: parse_ts(6, &row.get::<_, String>(6)?)?,
        archived_at: parse_opt_ts(7, row.get(7)?)?,
    })
}

fn issue_type_from_row(row: &Row<'_>) -> rusqlite::Result<IssueType> {
    Ok(IssueType {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        level: row.get(3)?,
        created_at: parse_ts(4, &row.get::<_, String>(4)?)?,
        updated_at: parse_ts(5, &row.get::<_, String>(5)?)?,
        archived_at: parse_opt_ts(6, row.get(6)?)?,
    })
}

fn fetch_project(conn: &Connection, project_id: &str) -> Result<Option<Project>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, key, created_at, updated_at
         FROM projects WHERE id = ?1",
    )?;
    let project = stmt
        .query_row([project_id], |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                key: row.get(2)?,
                created_at: parse_ts(3, &row.get::<_, String>(3)?)?,
                updated_at: parse_ts(4, &row.get::<_, String>(4)?)?,
            })
        })
        .optional()?;
    Ok(project)
}

fn fetch_status(conn: &Connection, project_id: &str, status_id: &str) -> Result<Option<Status>> {
    let sql = format!("SELECT {STATUS_COLS} FROM statuses WHERE id = ?1 AND project_id = ?2");
    let mut stmt = conn.prepare(&sql)?;
    let status = stmt
        .query_row(params![status_id, project_id], status_from_row)
        .optional()?;
    Ok(status)
}

fn fetch_issue_type(
    conn: &Connection,
    project_id: &str,
    issue_type_id: &str,
) -> Result<Option<IssueType>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, name, level, created_at, updated_at, archived_at
         FROM issue_types WHERE id = ?1 AND project_id = ?2",
    )?;
    let issue_type = stmt
        .query_row(params![issue_type_id, project_id], issue_type_from_row)
        .optional()?;
    Ok(issue_type)
}

fn fetch_issue(conn: &Connection, project_id: &str, issue_id: &str) -> Result<Option<Issue>> {
    let sql = format!("SELECT {ISSUE_COLS} FROM issues WHERE id = ?1 AND project_id = ?2");
    let mut stmt = conn.prepare(&sql)?;
    let issue = stmt
        .query_row(params![issue_id, project_id], issue_from_row)
        .optional()?;
    Ok(issue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_unique_violation_to_conflict() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            Some("UNIQUE constraint failed".to_string()),
        );
        assert!(matches!(classify(err), TraqError::Conflict { .. }));
    }

    #[test]
    fn classify_maps_trigger_abort_to_integrity() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER,
            },
            Some("parent issue belongs to a different project".to_string()),
        );
        assert!(matches!(classify(err), TraqError::Integrity { .. }));
    }

    #[test]
    fn classify_passes_through_other_errors() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(classify(err), TraqError::Database(_)));
    }
}
