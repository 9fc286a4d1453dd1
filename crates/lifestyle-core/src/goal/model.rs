//! Flat goal, task and log records.
//!
//! These mirror the three stored tables with explicit foreign keys. Nothing
//! here knows how the records were fetched; see [`crate::adapter`] for the
//! translation from the backend's nested payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::recurrence::Recurrence;

/// A long-term outcome with a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_archived: bool,
}

impl Goal {
    /// Create a goal with a fresh id.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        deadline: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            category: category.into(),
            deadline,
            created_at,
            is_archived: false,
        }
    }
}

/// A recurring lead-measure activity under a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Task {
    pub fn new(
        goal_id: impl Into<String>,
        title: impl Into<String>,
        recurrence: Recurrence,
        start_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            goal_id: goal_id.into(),
            title: title.into(),
            recurrence,
            start_date,
            is_active: true,
            created_at,
        }
    }

    /// Active and due on `date` by its recurrence.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.recurrence.is_due_on(self.start_date, date)
    }
}

/// Completion status of one scheduled occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Pending,
    Completed,
    Missed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Pending => "pending",
            LogStatus::Completed => "completed",
            LogStatus::Missed => "missed",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LogStatus::Pending),
            "completed" => Ok(LogStatus::Completed),
            "missed" => Ok(LogStatus::Missed),
            other => Err(format!("unknown log status: {other}")),
        }
    }
}

/// One scheduled occurrence of a task on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: String,
    pub task_id: String,
    pub due_date: NaiveDate,
    pub status: LogStatus,
    /// Set only when `status` is completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskLog {
    pub fn pending(task_id: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            due_date,
            status: LogStatus::Pending,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == LogStatus::Completed
    }

    /// Mark completed at `at`.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.status = LogStatus::Completed;
        self.completed_at = Some(at);
    }
}

/// One goal with every task and log that belongs to it.
///
/// Logs are linked to tasks through `task_id`; logs whose task is not in
/// `tasks` are ignored by [`GoalHistory::flattened_logs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalHistory {
    pub goal: Goal,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub logs: Vec<TaskLog>,
}

impl GoalHistory {
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            tasks: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// All logs of this goal's tasks, ascending by due date (ties by id).
    pub fn flattened_logs(&self) -> Vec<&TaskLog> {
        let task_ids: HashSet<&str> = self.tasks.iter().map(|t| t.id.as_str()).collect();
        let mut logs: Vec<&TaskLog> = self
            .logs
            .iter()
            .filter(|log| task_ids.contains(log.task_id.as_str()))
            .collect();
        logs.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
        logs
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
