#![allow(dead_code)]

use std::sync::Once;

use tempfile::TempDir;
use traq::model::{CreateIssueParams, CreateIssueTypeParams, CreateStatusParams, StatusCategory};
use traq::storage::SqliteStore;

pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(traq::logging::init_test_logging);
}

/// In-memory store for single-connection tests.
pub fn test_store() -> SqliteStore {
    init_test_logging();
    SqliteStore::open_memory().expect("open in-memory store")
}

/// File-backed store for tests that reopen or share the database. The
/// `TempDir` must outlive the store.
pub fn test_store_with_dir() -> (SqliteStore, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::open(&dir.path().join("traq.db")).expect("open store");
    (store, dir)
}

/// A seeded project with two status columns and two issue type levels,
/// the fixture every engine test starts from.
pub struct ProjectSeed {
    pub project_id: String,
    pub todo_id: String,
    pub doing_id: String,
    pub epic_type_id: String,
    pub task_type_id: String,
    pub reporter_id: String,
}

pub fn seed_project(store: &mut SqliteStore) -> ProjectSeed {
    let project = store
        .create_project("Project", &fixtures::unique_key())
        .expect("create project");

    let epic = store
        .create_issue_type(&CreateIssueTypeParams {
            project_id: project.id.clone(),
            name: "Epic".to_string(),
            level: 0,
        })
        .expect("create epic type");
    let task = store
        .create_issue_type(&CreateIssueTypeParams {
            project_id: project.id.clone(),
            name: "Task".to_string(),
            level: 1,
        })
        .expect("create task type");

    let todo = store
        .create_status(&CreateStatusParams {
            project_id: project.id.clone(),
            name: "Todo".to_string(),
            category: StatusCategory::Todo,
        })
        .expect("create todo status");
    let doing = store
        .create_status(&CreateStatusParams {
            project_id: project.id.clone(),
            name: "Doing".to_string(),
            category: StatusCategory::Doing,
        })
        .expect("create doing status");

    ProjectSeed {
        project_id: project.id,
        todo_id: todo.id,
        doing_id: doing.id,
        epic_type_id: epic.id,
        task_type_id: task.id,
        reporter_id: "reporter-1".to_string(),
    }
}

/// Create an issue appended to the given status, returning its id.
pub fn create_issue_in(store: &mut SqliteStore, seed: &ProjectSeed, title: &str, status_id: &str) -> String {
    store
        .create_issue(&CreateIssueParams {
            project_id: seed.project_id.clone(),
            issue_type_id: seed.task_type_id.clone(),
            status_id: status_id.to_string(),
            title: title.to_string(),
            reporter_id: seed.reporter_id.clone(),
            ..Default::default()
        })
        .expect("create issue")
        .id
}

/// Fetch `(issue_id, status_position)` pairs of a status column in board
/// order.
pub fn fetch_status_order(
    store: &SqliteStore,
    project_id: &str,
    status_id: &str,
) -> Vec<(String, i64)> {
    store
        .list_issues(&traq::model::ListIssuesParams {
            project_id: project_id.to_string(),
            status_id: Some(status_id.to_string()),
            assignee_id: None,
        })
        .expect("list issues")
        .into_iter()
        .map(|issue| (issue.id, issue.status_position))
        .collect()
}

/// Assert a column holds exactly the given ids at the given positions.
pub fn assert_order(got: &[(String, i64)], want: &[(&str, i64)]) {
    assert_eq!(got.len(), want.len(), "column length mismatch: {got:?}");
    for (i, ((got_id, got_pos), (want_id, want_pos))) in got.iter().zip(want).enumerate() {
        assert_eq!(got_id, want_id, "row {i}: wrong issue");
        assert_eq!(got_pos, want_pos, "row {i}: wrong position");
    }
}

/// Assert positions are exactly `{0..N-1}` in order (no duplicates, no gaps).
pub fn assert_contiguous(got: &[(String, i64)]) {
    for (i, (_, pos)) in got.iter().enumerate() {
        assert_eq!(*pos, i as i64, "positions not contiguous: {got:?}");
    }
}

/// Assert a column holds exactly the given id set, in any order.
pub fn assert_same_ids(got: &[(String, i64)], want_ids: &[String]) {
    assert_eq!(got.len(), want_ids.len(), "id set size mismatch");
    let mut want: std::collections::HashSet<&str> =
        want_ids.iter().map(String::as_str).collect();
    for (id, _) in got {
        assert!(want.remove(id.as_str()), "unexpected issue id: {id}");
    }
    assert!(want.is_empty(), "missing issue ids: {want:?}");
}
