//! Database schema definitions.

use rusqlite::{Connection, Result};

/// The complete SQL schema for the traq database.
///
/// The partial unique index `idx_issues_status_position` is the backbone of
/// the positioning engine: any statement that would give two active issues
/// of one status the same position fails immediately, including mid-scan
/// inside a single UPDATE. Range shifts must therefore use the two-phase
/// offset discipline (see `storage::positions`).
pub const SCHEMA_SQL: &str = r"
    -- Projects
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        key TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK (length(name) >= 1),
        CHECK (length(key) >= 1 AND length(key) <= 10)
    );

    -- Issue types (leveled hierarchy: lower level = higher in the tree)
    CREATE TABLE IF NOT EXISTS issue_types (
        id TEXT PRIMARY KEY,
        project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        level INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        archived_at TEXT,
        CHECK (level >= 0),
        UNIQUE (project_id, name)
    );
    CREATE INDEX IF NOT EXISTS idx_issue_types_project ON issue_types(project_id);

    -- Statuses (board columns)
    CREATE TABLE IF NOT EXISTS statuses (
        id TEXT PRIMARY KEY,
        project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        archived_at TEXT,
        CHECK (category IN ('todo', 'doing', 'done')),
        CHECK (position >= 0),
        UNIQUE (project_id, name)
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_statuses_position
        ON statuses(project_id, position) WHERE archived_at IS NULL;
    CREATE INDEX IF NOT EXISTS idx_statuses_project ON statuses(project_id);

    -- Issues
    CREATE TABLE IF NOT EXISTS issues (
        id TEXT PRIMARY KEY,
        project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        number INTEGER NOT NULL,
        issue_type_id TEXT NOT NULL REFERENCES issue_types(id),
        status_id TEXT NOT NULL REFERENCES statuses(id),
        parent_issue_id TEXT REFERENCES issues(id),
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        priority TEXT NOT NULL DEFAULT 'medium',
        assignee_id TEXT,
        reporter_id TEXT NOT NULL,
        due_date TEXT,
        status_position INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        archived_at TEXT,
        CHECK (length(title) >= 1 AND length(title) <= 500),
        CHECK (priority IN ('low', 'medium', 'high', 'critical')),
        CHECK (number > 0),
        CHECK (status_position >= 0),
        UNIQUE (project_id, number)
    );

    -- The engine's consistency backbone: active issues of one status column
    -- can never share a position, not even transiently within a statement.
    CREATE UNIQUE INDEX IF NOT EXISTS idx_issues_status_position
        ON issues(project_id, status_id, status_position) WHERE archived_at IS NULL;

    CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project_id);
    CREATE INDEX IF NOT EXISTS idx_issues_status ON issues(status_id);
    CREATE INDEX IF NOT EXISTS idx_issues_assignee ON issues(assignee_id);
    CREATE INDEX IF NOT EXISTS idx_issues_parent ON issues(parent_issue_id);

    -- Per-project monotonic issue number counter
    CREATE TABLE IF NOT EXISTS project_issue_counters (
        project_id TEXT PRIMARY KEY REFERENCES projects(id) ON DELETE CASCADE,
        last_number INTEGER NOT NULL,
        CHECK (last_number >= 0)
    );

    -- Integrity triggers: a status or issue type referenced by an issue must
    -- belong to the issue's project, and a parent must be an active issue of
    -- the same project with a strictly lower-leveled type.
    CREATE TRIGGER IF NOT EXISTS trg_issues_insert_status_project
    BEFORE INSERT ON issues
    FOR EACH ROW
    WHEN (SELECT project_id FROM statuses WHERE id = NEW.status_id) IS NOT NEW.project_id
    BEGIN
        SELECT RAISE(ABORT, 'status does not belong to issue project');
    END;

    CREATE TRIGGER IF NOT EXISTS trg_issues_update_status_project
    BEFORE UPDATE OF status_id ON issues
    FOR EACH ROW
    WHEN (SELECT project_id FROM statuses WHERE id = NEW.status_id) IS NOT NEW.project_id
    BEGIN
        SELECT RAISE(ABORT, 'status does not belong to issue project');
    END;

    CREATE TRIGGER IF NOT EXISTS trg_issues_insert_type_project
    BEFORE INSERT ON issues
    FOR EACH ROW
    WHEN (SELECT project_id FROM issue_types WHERE id = NEW.issue_type_id) IS NOT NEW.project_id
    BEGIN
        SELECT RAISE(ABORT, 'issue type does not belong to issue project');
    END;

    CREATE TRIGGER IF NOT EXISTS trg_issues_insert_parent
    BEFORE INSERT ON issues
    FOR EACH ROW
    WHEN NEW.parent_issue_id IS NOT NULL
    BEGIN
        SELECT CASE
            WHEN (SELECT project_id FROM issues WHERE id = NEW.parent_issue_id)
                 IS NOT NEW.project_id
                THEN RAISE(ABORT, 'parent issue belongs to a different project')
            WHEN (SELECT archived_at FROM issues WHERE id = NEW.parent_issue_id) IS NOT NULL
                THEN RAISE(ABORT, 'parent issue is archived')
            WHEN (SELECT t.level
                  FROM issues p JOIN issue_types t ON t.id = p.issue_type_id
                  WHERE p.id = NEW.parent_issue_id)
                 >= (SELECT level FROM issue_types WHERE id = NEW.issue_type_id)
                THEN RAISE(ABORT, 'parent issue type level must be lower than child')
        END;
    END;
";

/// Apply the schema to the database.
///
/// Idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // WAL keeps readers unblocked while a writer holds the write lock
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}
