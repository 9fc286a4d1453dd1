//! Translation from the hosted backend's nested payload to flat records.
//!
//! The backend returns goals with tasks embedded, and task logs embedded in
//! each task:
//!
//! ```json
//! [{ "id": "g1", "title": "...", "category": "...", "deadline": "2024-06-30",
//!    "created_at": "2024-01-01T09:00:00Z", "is_archived": false,
//!    "tasks": [{ "id": "t1", "title": "...", "frequency": "daily",
//!                "custom_days": null, "start_date": "2024-01-01", "is_active": true,
//!                "task_logs": [{ "id": "l1", "status": "completed",
//!                                "due_date": "2024-01-01", "completed_at": null }] }] }]
//! ```
//!
//! Missing or null `tasks` / `task_logs` collections are empty, not errors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::dates::{parse_date, parse_timestamp};
use crate::error::AdapterError;
use crate::goal::{Goal, GoalHistory, LogStatus, Recurrence, Task, TaskLog};

#[derive(Debug, Deserialize)]
struct NestedGoal {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: String,
    deadline: String,
    created_at: String,
    #[serde(default)]
    is_archived: bool,
    #[serde(default)]
    tasks: Option<Vec<NestedTask>>,
}

#[derive(Debug, Deserialize)]
struct NestedTask {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    custom_days: Option<u32>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    task_logs: Option<Vec<NestedLog>>,
}

#[derive(Debug, Deserialize)]
struct NestedLog {
    #[serde(default)]
    id: Option<String>,
    status: String,
    due_date: String,
    #[serde(default)]
    completed_at: Option<String>,
}

/// Parse a JSON array of nested goals.
pub fn histories_from_json(json: &str) -> Result<Vec<GoalHistory>, AdapterError> {
    let goals: Vec<NestedGoal> = serde_json::from_str(json)?;
    goals.into_iter().map(flatten_goal).collect()
}

/// Parse an already decoded JSON value holding a nested goal array.
pub fn histories_from_value(value: serde_json::Value) -> Result<Vec<GoalHistory>, AdapterError> {
    let goals: Vec<NestedGoal> = serde_json::from_value(value)?;
    goals.into_iter().map(flatten_goal).collect()
}

fn flatten_goal(nested: NestedGoal) -> Result<GoalHistory, AdapterError> {
    let created_at = timestamp(&nested.id, "created_at", &nested.created_at)?;
    let goal = Goal {
        deadline: timestamp(&nested.id, "deadline", &nested.deadline)?,
        id: nested.id,
        title: nested.title,
        description: nested.description,
        category: nested.category,
        created_at,
        is_archived: nested.is_archived,
    };

    let mut history = GoalHistory::new(goal);
    for task in nested.tasks.unwrap_or_default() {
        let (task, logs) = flatten_task(&history.goal, task)?;
        history.tasks.push(task);
        history.logs.extend(logs);
    }
    Ok(history)
}

fn flatten_task(goal: &Goal, nested: NestedTask) -> Result<(Task, Vec<TaskLog>), AdapterError> {
    let frequency = nested.frequency.as_deref().unwrap_or("daily");
    let recurrence = Recurrence::from_parts(frequency, nested.custom_days).ok_or_else(|| {
        AdapterError::UnknownFrequency {
            task_id: nested.id.clone(),
            value: frequency.to_string(),
        }
    })?;
    let created_at = match nested.created_at.as_deref() {
        Some(raw) => timestamp(&nested.id, "created_at", raw)?,
        None => goal.created_at,
    };
    let start_date = match nested.start_date.as_deref() {
        Some(raw) => date(&nested.id, "start_date", raw)?,
        None => created_at.date_naive(),
    };

    let mut logs = Vec::new();
    for log in nested.task_logs.unwrap_or_default() {
        let status: LogStatus = log.status.parse().map_err(|_| AdapterError::UnknownStatus {
            task_id: nested.id.clone(),
            value: log.status.clone(),
        })?;
        let due_date = date(&nested.id, "due_date", &log.due_date)?;
        let completed_at = match (status, log.completed_at.as_deref()) {
            (LogStatus::Completed, Some(raw)) => Some(timestamp(&nested.id, "completed_at", raw)?),
            _ => None,
        };
        logs.push(TaskLog {
            id: log
                .id
                .unwrap_or_else(|| format!("{}:{}", nested.id, due_date)),
            task_id: nested.id.clone(),
            due_date,
            status,
            completed_at,
        });
    }

    let task = Task {
        id: nested.id,
        goal_id: goal.id.clone(),
        title: nested.title,
        recurrence,
        start_date,
        is_active: nested.is_active.unwrap_or(true),
        created_at,
    };
    Ok((task, logs))
}

fn timestamp(owner: &str, field: &'static str, raw: &str) -> Result<DateTime<Utc>, AdapterError> {
    parse_timestamp(raw).map_err(|source| AdapterError::BadDate {
        owner: owner.to_string(),
        field,
        source,
    })
}

/// Log due dates may arrive as a bare date or a full timestamp.
fn date(owner: &str, field: &'static str, raw: &str) -> Result<NaiveDate, AdapterError> {
    parse_date(raw)
        .or_else(|_| parse_timestamp(raw).map(|dt| dt.date_naive()))
        .map_err(|source| AdapterError::BadDate {
            owner: owner.to_string(),
            field,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
      {
        "id": "g1",
        "title": "Run a marathon",
        "category": "Health",
        "deadline": "2024-06-30",
        "created_at": "2024-01-01T09:00:00Z",
        "is_archived": false,
        "tasks": [
          {
            "id": "t1",
            "title": "Run",
            "frequency": "every_2_days",
            "start_date": "2024-01-01",
            "task_logs": [
              { "id": "l2", "status": "missed", "due_date": "2024-01-03" },
              { "id": "l1", "status": "completed", "due_date": "2024-01-01",
                "completed_at": "2024-01-01T19:00:00+00:00" }
            ]
          },
          { "id": "t2", "title": "Stretch", "frequency": "custom", "custom_days": 3, "task_logs": null }
        ]
      },
      { "id": "g2", "title": "Empty", "category": "Misc",
        "deadline": "2024-03-01", "created_at": "2024-01-01T00:00:00Z" }
    ]"#;

    #[test]
    fn flattens_nested_goals() {
        let histories = histories_from_json(PAYLOAD).unwrap();
        assert_eq!(histories.len(), 2);

        let first = &histories[0];
        assert_eq!(first.tasks.len(), 2);
        assert_eq!(first.logs.len(), 2);
        assert!(first.logs.iter().all(|l| l.task_id == "t1"));
        assert!(first.tasks.iter().all(|t| t.goal_id == "g1"));
        assert_eq!(first.tasks[0].recurrence, Recurrence::EveryTwoDays);
        assert_eq!(first.tasks[1].recurrence, Recurrence::Custom(3));

        let sorted = first.flattened_logs();
        assert_eq!(sorted[0].id, "l1");
        assert!(sorted[0].completed_at.is_some());
    }

    #[test]
    fn missing_collections_are_empty() {
        let histories = histories_from_json(PAYLOAD).unwrap();
        let empty = &histories[1];
        assert!(empty.tasks.is_empty());
        assert!(empty.logs.is_empty());
    }

    #[test]
    fn task_without_start_date_starts_on_goal_creation() {
        let histories = histories_from_json(PAYLOAD).unwrap();
        let stretch = histories[0].task("t2").unwrap();
        assert_eq!(stretch.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(stretch.is_active);
    }

    #[test]
    fn missing_log_id_is_synthesized() {
        let json = r#"[{ "id": "g", "deadline": "2024-02-01", "created_at": "2024-01-01",
            "tasks": [{ "id": "t", "task_logs": [{ "status": "pending", "due_date": "2024-01-05" }] }] }]"#;
        let histories = histories_from_json(json).unwrap();
        assert_eq!(histories[0].logs[0].id, "t:2024-01-05");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = r#"[{ "id": "g", "deadline": "2024-02-01", "created_at": "2024-01-01",
            "tasks": [{ "id": "t", "task_logs": [{ "status": "skipped", "due_date": "2024-01-05" }] }] }]"#;
        let err = histories_from_json(json).unwrap_err();
        assert!(matches!(err, AdapterError::UnknownStatus { .. }));
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        let json = r#"[{ "id": "g", "deadline": "2024-02-01", "created_at": "2024-01-01",
            "tasks": [{ "id": "t", "frequency": "hourly" }] }]"#;
        assert!(matches!(
            histories_from_json(json).unwrap_err(),
            AdapterError::UnknownFrequency { .. }
        ));
    }

    #[test]
    fn decoded_value_matches_text_input() {
        let value: serde_json::Value = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(
            histories_from_value(value).unwrap(),
            histories_from_json(PAYLOAD).unwrap()
        );
    }

    #[test]
    fn bad_deadline_names_field() {
        let json = r#"[{ "id": "g", "deadline": "soon", "created_at": "2024-01-01" }]"#;
        let err = histories_from_json(json).unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }
}
