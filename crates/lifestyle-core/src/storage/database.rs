//! SQLite-based storage for goals, tasks, task logs and weekly reviews.
//!
//! Besides plain CRUD this provides the routines the application relies on
//! before showing today's tasks:
//! - generating pending logs for every task due on a date
//! - marking past-due pending logs as missed
//! - marking one log completed

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

use super::data_dir;
use super::migrations;
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::goal::{Goal, GoalHistory, Recurrence, Task, TaskLog};
use crate::review::WeeklyReview;

const DATE_FORMAT: &str = "%Y-%m-%d";

const GOAL_COLUMNS: &str =
    "id, title, description, category, deadline, created_at, is_archived";
const TASK_COLUMNS: &str =
    "id, goal_id, title, frequency, custom_days, start_date, is_active, created_at";
const LOG_COLUMNS: &str = "id, task_id, due_date, status, completed_at";

// === Helper Functions ===

fn conversion_error(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, err.into())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn timestamp_col(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn optional_timestamp_col(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

fn date_col(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn row_to_goal(row: &Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        deadline: timestamp_col(row, 4)?,
        created_at: timestamp_col(row, 5)?,
        is_archived: row.get(6)?,
    })
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let frequency: String = row.get(3)?;
    let custom_days: Option<u32> = row.get(4)?;
    let recurrence = Recurrence::from_parts(&frequency, custom_days)
        .ok_or_else(|| conversion_error(3, format!("unknown frequency: {frequency}")))?;
    Ok(Task {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        title: row.get(2)?,
        recurrence,
        start_date: date_col(row, 5)?,
        is_active: row.get(6)?,
        created_at: timestamp_col(row, 7)?,
    })
}

fn row_to_log(row: &Row) -> rusqlite::Result<TaskLog> {
    let status: String = row.get(3)?;
    Ok(TaskLog {
        id: row.get(0)?,
        task_id: row.get(1)?,
        due_date: date_col(row, 2)?,
        status: status.parse().map_err(|e: String| conversion_error(3, e))?,
        completed_at: optional_timestamp_col(row, 4)?,
    })
}

fn row_to_review(row: &Row) -> rusqlite::Result<WeeklyReview> {
    Ok(WeeklyReview {
        goal_id: row.get(0)?,
        review_date: date_col(row, 1)?,
        stayed_on_track: row.get(2)?,
        reflection_text: row.get(3)?,
        improvement_notes: row.get(4)?,
        auto_suggestions: row.get(5)?,
    })
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field).into());
    }
    Ok(())
}

/// Counts from one log maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMaintenance {
    /// Pending logs created for the target date
    pub generated: usize,
    /// Past-due pending logs switched to missed
    pub marked_missed: usize,
}

/// A log due on a given day, with the names needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayLog {
    pub log: TaskLog,
    pub task_title: String,
    pub frequency: String,
    pub goal_title: String,
    pub goal_category: String,
}

/// Counts from an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub goals: usize,
    pub tasks: usize,
    pub logs: usize,
}

/// SQLite database for goal storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/lifestyle.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("lifestyle.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Goals ===

    pub fn create_goal(&self, goal: &Goal) -> Result<()> {
        require_text("title", &goal.title)?;
        require_text("category", &goal.category)?;
        self.conn.execute(
            "INSERT INTO goals (id, title, description, category, deadline, created_at, is_archived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.category,
                goal.deadline.to_rfc3339(),
                goal.created_at.to_rfc3339(),
                goal.is_archived,
            ],
        )?;
        tracing::info!(goal_id = %goal.id, "created goal");
        Ok(())
    }

    pub fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        let goal = self
            .conn
            .query_row(
                &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
                params![id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// Goals newest first. Archived goals only when `include_archived`.
    pub fn list_goals(&self, include_archived: bool) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals
             WHERE ?1 OR is_archived = 0
             ORDER BY created_at DESC, id"
        ))?;
        let goals = stmt
            .query_map(params![include_archived], row_to_goal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    pub fn update_goal(&self, goal: &Goal) -> Result<()> {
        require_text("title", &goal.title)?;
        require_text("category", &goal.category)?;
        let changed = self.conn.execute(
            "UPDATE goals SET title = ?2, description = ?3, category = ?4, deadline = ?5,
                              is_archived = ?6
             WHERE id = ?1",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.category,
                goal.deadline.to_rfc3339(),
                goal.is_archived,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found("goal", &goal.id));
        }
        Ok(())
    }

    pub fn archive_goal(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("UPDATE goals SET is_archived = 1 WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::not_found("goal", id));
        }
        tracing::info!(goal_id = %id, "archived goal");
        Ok(())
    }

    /// Delete a goal with its tasks, logs and reviews.
    pub fn delete_goal(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::not_found("goal", id));
        }
        tracing::info!(goal_id = %id, "deleted goal");
        Ok(())
    }

    // === Tasks ===

    pub fn create_task(&self, task: &Task) -> Result<()> {
        require_text("title", &task.title)?;
        if self.get_goal(&task.goal_id)?.is_none() {
            return Err(CoreError::not_found("goal", &task.goal_id));
        }
        let (frequency, custom_days) = task.recurrence.as_parts();
        self.conn.execute(
            "INSERT INTO tasks (id, goal_id, title, frequency, custom_days, start_date, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.goal_id,
                task.title,
                frequency,
                custom_days,
                format_date(task.start_date),
                task.is_active,
                task.created_at.to_rfc3339(),
            ],
        )?;
        tracing::info!(task_id = %task.id, goal_id = %task.goal_id, "created task");
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Active tasks, newest first, optionally for one goal.
    pub fn list_tasks(&self, goal_id: Option<&str>) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE is_active = 1 AND (?1 IS NULL OR goal_id = ?1)
             ORDER BY created_at DESC, id"
        ))?;
        let tasks = stmt
            .query_map(params![goal_id], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Stop generating logs for a task but keep its history.
    pub fn deactivate_task(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("UPDATE tasks SET is_active = 0 WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::not_found("task", id));
        }
        Ok(())
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::not_found("task", id));
        }
        tracing::info!(task_id = %id, "deleted task");
        Ok(())
    }

    // === Task logs ===

    pub fn insert_log(&self, log: &TaskLog) -> Result<()> {
        self.conn.execute(
            "INSERT INTO task_logs (id, task_id, due_date, status, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                log.id,
                log.task_id,
                format_date(log.due_date),
                log.status.as_str(),
                log.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    pub fn get_log(&self, id: &str) -> Result<Option<TaskLog>> {
        let log = self
            .conn
            .query_row(
                &format!("SELECT {LOG_COLUMNS} FROM task_logs WHERE id = ?1"),
                params![id],
                row_to_log,
            )
            .optional()?;
        Ok(log)
    }

    /// Create a pending log for every active task of a non-archived goal that
    /// is due on `date`. Existing logs are left alone.
    ///
    /// Returns the number of logs created.
    pub fn generate_logs_for_date(&self, date: NaiveDate) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let tasks = {
            let mut stmt = tx.prepare(
                "SELECT t.id, t.goal_id, t.title, t.frequency, t.custom_days, t.start_date,
                        t.is_active, t.created_at
                 FROM tasks t
                 JOIN goals g ON g.id = t.goal_id
                 WHERE t.is_active = 1 AND g.is_archived = 0",
            )?;
            let tasks = stmt
                .query_map([], row_to_task)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            tasks
        };

        let due_date = format_date(date);
        let mut generated = 0;
        for task in tasks.iter().filter(|task| task.is_due_on(date)) {
            generated += tx.execute(
                "INSERT OR IGNORE INTO task_logs (id, task_id, due_date, status)
                 VALUES (?1, ?2, ?3, 'pending')",
                params![Uuid::new_v4().to_string(), task.id, due_date],
            )?;
        }
        tx.commit()?;

        tracing::info!(%date, generated, "generated task logs");
        Ok(generated)
    }

    /// Mark pending logs due before `today` as missed.
    ///
    /// Returns the number of logs updated.
    pub fn mark_overdue_as_missed(&self, today: NaiveDate) -> Result<usize> {
        let updated = self.conn.execute(
            "UPDATE task_logs SET status = 'missed'
             WHERE status = 'pending' AND due_date < ?1",
            params![format_date(today)],
        )?;
        tracing::info!(%today, updated, "marked overdue task logs as missed");
        Ok(updated)
    }

    /// Generate today's logs, then mark anything older and still pending as
    /// missed.
    pub fn ensure_logs_up_to_date(&self, today: NaiveDate) -> Result<LogMaintenance> {
        let generated = self.generate_logs_for_date(today)?;
        let marked_missed = self.mark_overdue_as_missed(today)?;
        Ok(LogMaintenance {
            generated,
            marked_missed,
        })
    }

    /// Mark one log completed at `at`.
    pub fn complete_log(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE task_logs SET status = 'completed', completed_at = ?2 WHERE id = ?1",
            params![id, at.to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found("task log", id));
        }
        tracing::info!(log_id = %id, "completed task log");
        Ok(())
    }

    /// Logs due on `date` with task and goal names, oldest task first.
    pub fn logs_due_on(&self, date: NaiveDate) -> Result<Vec<TodayLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.task_id, l.due_date, l.status, l.completed_at,
                    t.title, t.frequency, t.custom_days, g.title, g.category
             FROM task_logs l
             JOIN tasks t ON t.id = l.task_id
             JOIN goals g ON g.id = t.goal_id
             WHERE l.due_date = ?1
             ORDER BY t.created_at, l.id",
        )?;
        let rows = stmt
            .query_map(params![format_date(date)], |row| {
                let frequency: String = row.get(6)?;
                let custom_days: Option<u32> = row.get(7)?;
                let frequency = Recurrence::from_parts(&frequency, custom_days)
                    .map(|r| r.describe())
                    .unwrap_or(frequency);
                Ok(TodayLog {
                    log: row_to_log(row)?,
                    task_title: row.get(5)?,
                    frequency,
                    goal_title: row.get(8)?,
                    goal_category: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // === Histories ===

    /// Every goal (newest first) with all of its tasks and logs.
    pub fn load_histories(&self, include_archived: bool) -> Result<Vec<GoalHistory>> {
        let goals = self.list_goals(include_archived)?;

        let mut tasks_by_goal: HashMap<String, Vec<Task>> = HashMap::new();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at, id"))?;
        for task in stmt.query_map([], row_to_task)? {
            let task = task?;
            tasks_by_goal.entry(task.goal_id.clone()).or_default().push(task);
        }

        let mut logs_by_task: HashMap<String, Vec<TaskLog>> = HashMap::new();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LOG_COLUMNS} FROM task_logs ORDER BY due_date, id"))?;
        for log in stmt.query_map([], row_to_log)? {
            let log = log?;
            logs_by_task.entry(log.task_id.clone()).or_default().push(log);
        }

        let histories = goals
            .into_iter()
            .map(|goal| {
                let tasks = tasks_by_goal.remove(&goal.id).unwrap_or_default();
                let mut logs: Vec<TaskLog> = tasks
                    .iter()
                    .flat_map(|task| logs_by_task.remove(&task.id).unwrap_or_default())
                    .collect();
                logs.sort_by(|a, b| (a.due_date, &a.id).cmp(&(b.due_date, &b.id)));
                GoalHistory { goal, tasks, logs }
            })
            .collect();
        Ok(histories)
    }

    /// One goal with its tasks and logs.
    pub fn load_history(&self, goal_id: &str) -> Result<Option<GoalHistory>> {
        let Some(goal) = self.get_goal(goal_id)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE goal_id = ?1 ORDER BY created_at, id"
        ))?;
        let tasks = stmt
            .query_map(params![goal_id], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.task_id, l.due_date, l.status, l.completed_at
             FROM task_logs l
             JOIN tasks t ON t.id = l.task_id
             WHERE t.goal_id = ?1
             ORDER BY l.due_date, l.id",
        )?;
        let logs = stmt
            .query_map(params![goal_id], row_to_log)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(GoalHistory { goal, tasks, logs }))
    }

    /// Insert or update every record in `histories`.
    pub fn import_histories(&self, histories: &[GoalHistory]) -> Result<ImportSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let mut summary = ImportSummary::default();

        for history in histories {
            let goal = &history.goal;
            tx.execute(
                "INSERT INTO goals (id, title, description, category, deadline, created_at, is_archived)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    category = excluded.category,
                    deadline = excluded.deadline,
                    created_at = excluded.created_at,
                    is_archived = excluded.is_archived",
                params![
                    goal.id,
                    goal.title,
                    goal.description,
                    goal.category,
                    goal.deadline.to_rfc3339(),
                    goal.created_at.to_rfc3339(),
                    goal.is_archived,
                ],
            )?;
            summary.goals += 1;

            for task in &history.tasks {
                let (frequency, custom_days) = task.recurrence.as_parts();
                tx.execute(
                    "INSERT INTO tasks (id, goal_id, title, frequency, custom_days, start_date, is_active, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(id) DO UPDATE SET
                        goal_id = excluded.goal_id,
                        title = excluded.title,
                        frequency = excluded.frequency,
                        custom_days = excluded.custom_days,
                        start_date = excluded.start_date,
                        is_active = excluded.is_active",
                    params![
                        task.id,
                        task.goal_id,
                        task.title,
                        frequency,
                        custom_days,
                        format_date(task.start_date),
                        task.is_active,
                        task.created_at.to_rfc3339(),
                    ],
                )?;
                summary.tasks += 1;
            }

            for log in history.flattened_logs() {
                tx.execute(
                    "INSERT INTO task_logs (id, task_id, due_date, status, completed_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(task_id, due_date) DO UPDATE SET
                        status = excluded.status,
                        completed_at = excluded.completed_at",
                    params![
                        log.id,
                        log.task_id,
                        format_date(log.due_date),
                        log.status.as_str(),
                        log.completed_at.map(|dt| dt.to_rfc3339()),
                    ],
                )?;
                summary.logs += 1;
            }
        }

        tx.commit()?;
        tracing::info!(
            goals = summary.goals,
            tasks = summary.tasks,
            logs = summary.logs,
            "imported goal histories"
        );
        Ok(summary)
    }

    // === Weekly reviews ===

    /// Save a review, replacing any earlier one for the same goal and date.
    pub fn upsert_review(&self, review: &WeeklyReview) -> Result<()> {
        self.conn.execute(
            "INSERT INTO weekly_reviews
                (goal_id, review_date, stayed_on_track, reflection_text, improvement_notes, auto_suggestions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(goal_id, review_date) DO UPDATE SET
                stayed_on_track = excluded.stayed_on_track,
                reflection_text = excluded.reflection_text,
                improvement_notes = excluded.improvement_notes,
                auto_suggestions = excluded.auto_suggestions",
            params![
                review.goal_id,
                format_date(review.review_date),
                review.stayed_on_track,
                review.reflection_text,
                review.improvement_notes,
                review.auto_suggestions,
            ],
        )?;
        tracing::info!(goal_id = %review.goal_id, date = %review.review_date, "saved weekly review");
        Ok(())
    }

    /// Reviews written on `date`, keyed by goal id.
    pub fn reviews_on(&self, date: NaiveDate) -> Result<HashMap<String, WeeklyReview>> {
        let mut stmt = self.conn.prepare(
            "SELECT goal_id, review_date, stayed_on_track, reflection_text, improvement_notes, auto_suggestions
             FROM weekly_reviews WHERE review_date = ?1",
        )?;
        let reviews = stmt
            .query_map(params![format_date(date)], row_to_review)?
            .map(|review| review.map(|r| (r.goal_id.clone(), r)))
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(reviews)
    }
}
