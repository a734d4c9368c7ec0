//! Position arithmetic for the move coordinator.
//!
//! Every range shift against the partial unique index runs as two UPDATEs:
//! phase 1 lifts the affected rows by `REORDER_OFFSET`, far above any live
//! position, and phase 2 lands them back down with the net delta applied.
//! Each phase is individually collision-free, so the index is satisfied at
//! every row the scan visits. A single-statement `position = position + 1`
//! shift would fail mid-scan whenever the update order walks into a row
//! that still holds its old position.
//!
//! All helpers exclude the moving issue, which the coordinator has already
//! parked at `MAX(position) + 1` of its source status.

use rusqlite::{params, Transaction};

use crate::error::Result;

/// Lift distance for phase 1. Anything comfortably above the largest
/// realistic column size works; the shifted rows only need to clear the
/// live position range while keeping their relative order.
pub const REORDER_OFFSET: i64 = 1_000_000;

/// Count the active issues of a status column.
pub fn active_count(tx: &Transaction<'_>, project_id: &str, status_id: &str) -> Result<i64> {
    let count = tx.query_row(
        "SELECT COUNT(*)
         FROM issues
         WHERE project_id = ?1 AND status_id = ?2 AND archived_at IS NULL",
        params![project_id, status_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Clamp a requested position into the legal range of the target status.
///
/// When moving within the same status the moving issue is already counted,
/// so the maximum is `count - 1`; when entering from another status the
/// issue extends the column and may land at `count`.
pub fn clamp_target_position(
    tx: &Transaction<'_>,
    project_id: &str,
    status_id: &str,
    requested: i64,
    same_status: bool,
) -> Result<i64> {
    let count = active_count(tx, project_id, status_id)?;

    let mut max_pos = if same_status { count - 1 } else { count };
    if max_pos < 0 {
        max_pos = 0;
    }

    Ok(requested.clamp(0, max_pos))
}

/// Park the moving issue one past the current maximum of its source status,
/// freeing its position for the shifts that follow.
pub fn park_at_max(
    tx: &Transaction<'_>,
    project_id: &str,
    issue_id: &str,
    status_id: &str,
) -> Result<()> {
    let temp_pos: i64 = tx.query_row(
        "SELECT COALESCE(MAX(status_position), -1) + 1
         FROM issues
         WHERE project_id = ?1 AND status_id = ?2 AND archived_at IS NULL",
        params![project_id, status_id],
        |row| row.get(0),
    )?;

    tx.execute(
        "UPDATE issues
         SET status_position = ?1
         WHERE id = ?2 AND project_id = ?3",
        params![temp_pos, issue_id, project_id],
    )?;

    Ok(())
}

/// Shift `[start_pos, end_pos]` up by one (opening a gap below the range).
pub fn shift_up_range(
    tx: &Transaction<'_>,
    project_id: &str,
    issue_id: &str,
    status_id: &str,
    start_pos: i64,
    end_pos: i64,
) -> Result<()> {
    if start_pos > end_pos {
        return Ok(());
    }

    tx.execute(
        "UPDATE issues
         SET status_position = status_position + ?1
         WHERE project_id = ?2
           AND status_id = ?3
           AND archived_at IS NULL
           AND id <> ?4
           AND status_position BETWEEN ?5 AND ?6",
        params![REORDER_OFFSET, project_id, status_id, issue_id, start_pos, end_pos],
    )?;

    tx.execute(
        "UPDATE issues
         SET status_position = status_position - ?1 + 1
         WHERE project_id = ?2
           AND status_id = ?3
           AND archived_at IS NULL
           AND id <> ?4
           AND status_position BETWEEN ?5 + ?1 AND ?6 + ?1",
        params![REORDER_OFFSET, project_id, status_id, issue_id, start_pos, end_pos],
    )?;

    Ok(())
}

/// Shift `[start_pos, end_pos]` down by one; `end_pos = None` means
/// "to the end of the column" (collapsing the gap the mover left behind).
pub fn shift_down_range(
    tx: &Transaction<'_>,
    project_id: &str,
    issue_id: &str,
    status_id: &str,
    start_pos: i64,
    end_pos: Option<i64>,
) -> Result<()> {
    if let Some(end) = end_pos {
        if start_pos > end {
            return Ok(());
        }

        tx.execute(
            "UPDATE issues
             SET status_position = status_position + ?1
             WHERE project_id = ?2
               AND status_id = ?3
               AND archived_at IS NULL
               AND id <> ?4
               AND status_position BETWEEN ?5 AND ?6",
            params![REORDER_OFFSET, project_id, status_id, issue_id, start_pos, end],
        )?;

        tx.execute(
            "UPDATE issues
             SET status_position = status_position - ?1 - 1
             WHERE project_id = ?2
               AND status_id = ?3
               AND archived_at IS NULL
               AND id <> ?4
               AND status_position BETWEEN ?5 + ?1 AND ?6 + ?1",
            params![REORDER_OFFSET, project_id, status_id, issue_id, start_pos, end],
        )?;
    } else {
        tx.execute(
            "UPDATE issues
             SET status_position = status_position + ?1
             WHERE project_id = ?2
               AND status_id = ?3
               AND archived_at IS NULL
               AND id <> ?4
               AND status_position >= ?5",
            params![REORDER_OFFSET, project_id, status_id, issue_id, start_pos],
        )?;

        tx.execute(
            "UPDATE issues
             SET status_position = status_position - ?1 - 1
             WHERE project_id = ?2
               AND status_id = ?3
               AND archived_at IS NULL
               AND id <> ?4
               AND status_position >= ?5 + ?1",
            params![REORDER_OFFSET, project_id, status_id, issue_id, start_pos],
        )?;
    }

    Ok(())
}

/// Open a gap at `target_pos` in a status the moving issue is not yet part
/// of: everything at or above the slot shifts up by one.
pub fn open_gap(
    tx: &Transaction<'_>,
    project_id: &str,
    status_id: &str,
    target_pos: i64,
) -> Result<()> {
    tx.execute(
        "UPDATE issues
         SET status_position = status_position + ?1
         WHERE project_id = ?2
           AND status_id = ?3
           AND archived_at IS NULL
           AND status_position >= ?4",
        params![REORDER_OFFSET, project_id, status_id, target_pos],
    )?;

    tx.execute(
        "UPDATE issues
         SET status_position = status_position - ?1 + 1
         WHERE project_id = ?2
           AND status_id = ?3
           AND archived_at IS NULL
           AND status_position >= ?4 + ?1",
        params![REORDER_OFFSET, project_id, status_id, target_pos],
    )?;

    Ok(())
}
