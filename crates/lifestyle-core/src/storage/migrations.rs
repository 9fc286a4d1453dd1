//! Database schema migrations.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: goals, tasks and task logs.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS goals (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT,
            category    TEXT NOT NULL DEFAULT '',
            deadline    TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            is_archived INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id          TEXT PRIMARY KEY,
            goal_id     TEXT NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
            title       TEXT NOT NULL,
            frequency   TEXT NOT NULL DEFAULT 'daily',
            custom_days INTEGER,
            start_date  TEXT NOT NULL,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_logs (
            id           TEXT PRIMARY KEY,
            task_id      TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            due_date     TEXT NOT NULL,
            status       TEXT NOT NULL DEFAULT 'pending',
            completed_at TEXT,
            UNIQUE(task_id, due_date)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_goal_id ON tasks(goal_id);
        CREATE INDEX IF NOT EXISTS idx_task_logs_task_id ON task_logs(task_id);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: weekly reviews and due-date lookups.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS weekly_reviews (
            goal_id           TEXT NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
            review_date       TEXT NOT NULL,
            stayed_on_track   INTEGER NOT NULL,
            reflection_text   TEXT NOT NULL DEFAULT '',
            improvement_notes TEXT NOT NULL DEFAULT '',
            auto_suggestions  TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (goal_id, review_date)
        );

        CREATE INDEX IF NOT EXISTS idx_task_logs_due_date ON task_logs(due_date);
        CREATE INDEX IF NOT EXISTS idx_task_logs_status_due ON task_logs(status, due_date);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}
