//! Request validation for `traq`.
//!
//! These routines reject malformed parameters before any SQL runs, so the
//! store only ever sees requests that can fail for data reasons, not shape
//! reasons.

use crate::error::{Result, TraqError};
use crate::model::{
    CreateIssueParams, CreateIssueTypeParams, CreateStatusParams, ListIssuesParams,
    MoveIssueParams, UpdateIssueParams, UpdateStatusParams,
};

const MAX_TITLE_LEN: usize = 500;

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TraqError::validation(field, "is required"));
    }
    Ok(())
}

/// Validate issue creation parameters.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_create_issue(p: &CreateIssueParams) -> Result<()> {
    require("project_id", &p.project_id)?;
    require("issue_type_id", &p.issue_type_id)?;
    require("status_id", &p.status_id)?;
    require("title", &p.title)?;
    require("reporter_id", &p.reporter_id)?;
    if p.title.len() > MAX_TITLE_LEN {
        return Err(TraqError::validation("title", "exceeds 500 characters"));
    }
    Ok(())
}

/// Validate issue update parameters.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_update_issue(p: &UpdateIssueParams) -> Result<()> {
    require("issue_id", &p.issue_id)?;
    require("project_id", &p.project_id)?;
    require("title", &p.title)?;
    if p.title.len() > MAX_TITLE_LEN {
        return Err(TraqError::validation("title", "exceeds 500 characters"));
    }
    Ok(())
}

/// Validate listing parameters.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_list_issues(p: &ListIssuesParams) -> Result<()> {
    require("project_id", &p.project_id)
}

/// Validate move parameters. Negative positions are rejected here; anything
/// non-negative is clamped later inside the move transaction.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_move_issue(p: &MoveIssueParams) -> Result<()> {
    require("project_id", &p.project_id)?;
    require("issue_id", &p.issue_id)?;
    if p.target_position < 0 {
        return Err(TraqError::validation(
            "target_position",
            "must be >= 0",
        ));
    }
    Ok(())
}

/// Validate status creation parameters.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_create_status(p: &CreateStatusParams) -> Result<()> {
    require("project_id", &p.project_id)?;
    require("name", &p.name)
}

/// Validate status update parameters.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_update_status(p: &UpdateStatusParams) -> Result<()> {
    require("status_id", &p.status_id)?;
    require("project_id", &p.project_id)?;
    require("name", &p.name)
}

/// Validate issue type creation parameters.
///
/// # Errors
///
/// Returns `TraqError::Validation` naming the offending field.
pub fn validate_create_issue_type(p: &CreateIssueTypeParams) -> Result<()> {
    require("project_id", &p.project_id)?;
    require("name", &p.name)?;
    if p.level < 0 {
        return Err(TraqError::validation("level", "must be >= 0"));
    }
    Ok(())
}
