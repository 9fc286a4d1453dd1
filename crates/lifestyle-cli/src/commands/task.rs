//! Task management commands for CLI.

use clap::Subcommand;
use lifestyle_core::{Database, LogStatus, Recurrence, Task};

use super::{open_synced, print_json, resolve_date, resolve_now, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a recurring task under a goal
    Create {
        /// Goal ID
        goal_id: String,
        /// Task title
        title: String,
        /// daily, every_2_days, weekly or custom
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Interval in days for the custom frequency
        #[arg(long)]
        custom_days: Option<u32>,
        /// First due date (defaults to today)
        #[arg(long)]
        start: Option<String>,
    },
    /// List active tasks
    List {
        /// Filter by goal ID
        #[arg(long)]
        goal: Option<String>,
    },
    /// Stop scheduling a task, keeping its history
    Deactivate {
        /// Task ID
        id: String,
    },
    /// Delete a task and its logs
    Delete {
        /// Task ID
        id: String,
    },
    /// Show the tasks due on a day
    Today {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a task log completed
    Complete {
        /// Task log ID
        log_id: String,
        /// Completion time (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
}

pub fn run(action: TaskAction, json: bool) -> CmdResult {
    match action {
        TaskAction::Create {
            goal_id,
            title,
            frequency,
            custom_days,
            start,
        } => {
            let db = Database::open()?;
            let recurrence = Recurrence::from_parts(&frequency, custom_days)
                .ok_or_else(|| format!("unknown frequency: {frequency}"))?;
            let start_date = resolve_date(start.as_deref())?;
            let task = Task::new(goal_id, title, recurrence, start_date, resolve_now(None)?);
            db.create_task(&task)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Task created: {}", task.id);
            }
        }
        TaskAction::List { goal } => {
            let db = Database::open()?;
            let tasks = db.list_tasks(goal.as_deref())?;
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    println!(
                        "{}  {} ({}) goal {}",
                        task.id,
                        task.title,
                        task.recurrence.describe(),
                        task.goal_id
                    );
                }
            }
        }
        TaskAction::Deactivate { id } => {
            Database::open()?.deactivate_task(&id)?;
            println!("Task deactivated: {id}");
        }
        TaskAction::Delete { id } => {
            Database::open()?.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::Today { date } => {
            let date = resolve_date(date.as_deref())?;
            let db = open_synced(date)?;
            let entries = db.logs_due_on(date)?;
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("Nothing due on {date}.");
            } else {
                for entry in &entries {
                    let mark = match entry.log.status {
                        LogStatus::Completed => "x",
                        LogStatus::Missed => "-",
                        LogStatus::Pending => " ",
                    };
                    println!(
                        "[{mark}] {}  {} ({}) - {} [{}]",
                        entry.log.id,
                        entry.task_title,
                        entry.frequency,
                        entry.goal_title,
                        entry.goal_category
                    );
                }
            }
        }
        TaskAction::Complete { log_id, at } => {
            let at = resolve_now(at.as_deref())?;
            let db = Database::open()?;
            db.complete_log(&log_id, at)?;
            println!("Task log completed: {log_id}");
        }
    }
    Ok(())
}
