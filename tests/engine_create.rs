//! Issue creation tests with real SQLite (no mocks).
//!
//! Covers counter-backed numbering, append positioning, validation, and
//! the integrity triggers guarding cross-project references and the parent
//! hierarchy.

mod common;

use common::{create_issue_in, fixtures, seed_project, test_store};
use traq::model::{CreateIssueParams, Priority};
use traq::TraqError;

#[test]
fn create_assigns_number_and_append_position() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let issue = store
        .create_issue(&fixtures::create_params(&seed, "First"))
        .unwrap();

    assert_eq!(issue.number, 1);
    assert_eq!(issue.status_position, 0);
    assert_eq!(issue.priority, Priority::Medium);
    assert!(issue.archived_at.is_none());
}

#[test]
fn numbers_increment_per_project() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let first = store
        .create_issue(&fixtures::create_params(&seed, "One"))
        .unwrap();
    let second = store
        .create_issue(&fixtures::create_params(&seed, "Two"))
        .unwrap();

    assert_eq!(second.number, first.number + 1);
    assert_eq!(second.status_position, first.status_position + 1);
}

#[test]
fn counters_are_independent_across_projects() {
    let mut store = test_store();
    let seed_a = seed_project(&mut store);
    let seed_b = seed_project(&mut store);

    store
        .create_issue(&fixtures::create_params(&seed_a, "A1"))
        .unwrap();
    store
        .create_issue(&fixtures::create_params(&seed_a, "A2"))
        .unwrap();
    let b1 = store
        .create_issue(&fixtures::create_params(&seed_b, "B1"))
        .unwrap();

    assert_eq!(b1.number, 1);
}

#[test]
fn positions_are_per_status() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    create_issue_in(&mut store, &seed, "T1", &seed.todo_id);
    create_issue_in(&mut store, &seed, "T2", &seed.todo_id);
    let doing_first = store
        .create_issue(&CreateIssueParams {
            status_id: seed.doing_id.clone(),
            ..fixtures::create_params(&seed, "D1")
        })
        .unwrap();

    // A fresh column starts at zero regardless of siblings elsewhere
    assert_eq!(doing_first.status_position, 0);
}

#[test]
fn create_with_all_optional_fields() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let issue = store
        .create_issue(&fixtures::create_params_full(&seed, "Full"))
        .unwrap();

    assert_eq!(issue.priority, Priority::High);
    assert_eq!(issue.assignee_id, Some("assignee-1".to_string()));
    assert_eq!(issue.description, "detailed description");
    assert!(issue.due_date.is_some());
}

#[test]
fn create_with_parent_of_lower_level() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let epic = store
        .create_issue(&CreateIssueParams {
            issue_type_id: seed.epic_type_id.clone(),
            ..fixtures::create_params(&seed, "Epic")
        })
        .unwrap();

    let child = store
        .create_issue(&CreateIssueParams {
            parent_issue_id: Some(epic.id.clone()),
            ..fixtures::create_params(&seed, "Child task")
        })
        .unwrap();

    assert_eq!(child.parent_issue_id, Some(epic.id));
}

#[test]
fn create_rejects_missing_title() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let err = store
        .create_issue(&fixtures::create_params(&seed, "  "))
        .unwrap_err();
    assert!(matches!(err, TraqError::Validation { .. }));
}

#[test]
fn create_rejects_missing_reporter() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let mut params = fixtures::create_params(&seed, "No reporter");
    params.reporter_id = String::new();
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Validation { field, .. } if field == "reporter_id"));
}

#[test]
fn create_rejects_unknown_project() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let mut params = fixtures::create_params(&seed, "Orphan");
    params.project_id = "00000000-0000-0000-0000-000000000000".to_string();
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::ProjectNotFound { .. }));
}

#[test]
fn create_rejects_status_from_other_project() {
    let mut store = test_store();
    let seed_a = seed_project(&mut store);
    let seed_b = seed_project(&mut store);

    let mut params = fixtures::create_params(&seed_a, "Wrong column");
    params.status_id = seed_b.todo_id;
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Integrity { .. }));
}

#[test]
fn create_rejects_issue_type_from_other_project() {
    let mut store = test_store();
    let seed_a = seed_project(&mut store);
    let seed_b = seed_project(&mut store);

    let mut params = fixtures::create_params(&seed_a, "Wrong type");
    params.issue_type_id = seed_b.task_type_id;
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Integrity { .. }));
}

#[test]
fn create_rejects_parent_from_other_project() {
    let mut store = test_store();
    let seed_a = seed_project(&mut store);
    let seed_b = seed_project(&mut store);

    let foreign_parent = store
        .create_issue(&CreateIssueParams {
            issue_type_id: seed_b.epic_type_id.clone(),
            ..fixtures::create_params(&seed_b, "Foreign epic")
        })
        .unwrap();

    let mut params = fixtures::create_params(&seed_a, "Cross-project child");
    params.parent_issue_id = Some(foreign_parent.id);
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Integrity { .. }));
}

#[test]
fn create_rejects_level_inversion() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let task = store
        .create_issue(&fixtures::create_params(&seed, "Plain task"))
        .unwrap();

    // An epic (level 0) cannot hang below a task (level 1)
    let mut params = fixtures::create_params(&seed, "Upside-down epic");
    params.issue_type_id = seed.epic_type_id.clone();
    params.parent_issue_id = Some(task.id);
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Integrity { .. }));
}

#[test]
fn create_rejects_same_level_parent() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let sibling = store
        .create_issue(&fixtures::create_params(&seed, "Sibling"))
        .unwrap();

    let mut params = fixtures::create_params(&seed, "Not a child");
    params.parent_issue_id = Some(sibling.id);
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Integrity { .. }));
}

#[test]
fn create_rejects_archived_parent() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    let epic = store
        .create_issue(&CreateIssueParams {
            issue_type_id: seed.epic_type_id.clone(),
            ..fixtures::create_params(&seed, "Closed epic")
        })
        .unwrap();
    store.archive_issue(&seed.project_id, &epic.id).unwrap();

    let mut params = fixtures::create_params(&seed, "Late child");
    params.parent_issue_id = Some(epic.id);
    let err = store.create_issue(&params).unwrap_err();
    assert!(matches!(err, TraqError::Integrity { .. }));
}

#[test]
fn failed_create_rolls_back_counter() {
    let mut store = test_store();
    let seed = seed_project(&mut store);

    store
        .create_issue(&fixtures::create_params(&seed, "Numbered"))
        .unwrap();

    // Trigger failure after the counter bump inside the same transaction
    let mut params = fixtures::create_params(&seed, "Doomed");
    params.issue_type_id = "00000000-0000-0000-0000-000000000000".to_string();
    store.create_issue(&params).unwrap_err();

    // The rollback must rewind the counter too
    let next = store
        .create_issue(&fixtures::create_params(&seed, "Recovered"))
        .unwrap();
    assert_eq!(next.number, 2);
}
