#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use traq::model::{CreateIssueParams, Priority};

use super::ProjectSeed;

static KEY_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Project keys are globally unique; derive one per call so tests sharing a
/// database file never collide.
pub fn unique_key() -> String {
    let n = KEY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("P{}{n}", std::process::id() % 1000)
}

/// Baseline creation parameters against the seeded project's Todo column.
pub fn create_params(seed: &ProjectSeed, title: &str) -> CreateIssueParams {
    CreateIssueParams {
        project_id: seed.project_id.clone(),
        issue_type_id: seed.task_type_id.clone(),
        status_id: seed.todo_id.clone(),
        title: title.to_string(),
        reporter_id: seed.reporter_id.clone(),
        ..Default::default()
    }
}

/// Fully-populated creation parameters.
pub fn create_params_full(seed: &ProjectSeed, title: &str) -> CreateIssueParams {
    CreateIssueParams {
        description: "detailed description".to_string(),
        priority: Some(Priority::High),
        assignee_id: Some("assignee-1".to_string()),
        due_date: Some(chrono::Utc::now() + chrono::Duration::days(2)),
        ..create_params(seed, title)
    }
}
