//! Goal management commands for CLI.

use clap::Subcommand;
use lifestyle_core::dates::parse_timestamp;
use lifestyle_core::{CoreError, Database, Goal};

use super::{print_json, resolve_now, CmdResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal
    Create {
        /// Goal title
        title: String,
        /// Category, e.g. "Health"
        #[arg(long)]
        category: String,
        /// Deadline as YYYY-MM-DD or RFC 3339
        #[arg(long)]
        deadline: String,
        /// Goal description
        #[arg(long)]
        description: Option<String>,
        /// Creation time (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// List goals, newest first
    List {
        /// Include archived goals
        #[arg(long)]
        all: bool,
    },
    /// Update a goal
    Update {
        /// Goal ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New deadline
        #[arg(long)]
        deadline: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Archive a goal
    Archive {
        /// Goal ID
        id: String,
    },
    /// Delete a goal with its tasks and logs
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction, json: bool) -> CmdResult {
    let db = Database::open()?;

    match action {
        GoalAction::Create {
            title,
            category,
            deadline,
            description,
            at,
        } => {
            let created_at = resolve_now(at.as_deref())?;
            let mut goal = Goal::new(title, category, parse_timestamp(&deadline)?, created_at);
            goal.description = description;
            db.create_goal(&goal)?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Goal created: {}", goal.id);
            }
        }
        GoalAction::List { all } => {
            let goals = db.list_goals(all)?;
            if json {
                print_json(&goals)?;
            } else if goals.is_empty() {
                println!("No goals.");
            } else {
                for goal in &goals {
                    let archived = if goal.is_archived { " (archived)" } else { "" };
                    println!(
                        "{}  {} [{}] due {}{archived}",
                        goal.id,
                        goal.title,
                        goal.category,
                        goal.deadline.date_naive()
                    );
                }
            }
        }
        GoalAction::Update {
            id,
            title,
            category,
            deadline,
            description,
        } => {
            let mut goal = db
                .get_goal(&id)?
                .ok_or_else(|| CoreError::not_found("goal", &id))?;
            if let Some(title) = title {
                goal.title = title;
            }
            if let Some(category) = category {
                goal.category = category;
            }
            if let Some(deadline) = deadline {
                goal.deadline = parse_timestamp(&deadline)?;
            }
            if description.is_some() {
                goal.description = description;
            }
            db.update_goal(&goal)?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Goal updated: {}", goal.id);
            }
        }
        GoalAction::Archive { id } => {
            db.archive_goal(&id)?;
            println!("Goal archived: {id}");
        }
        GoalAction::Delete { id } => {
            db.delete_goal(&id)?;
            println!("Goal deleted: {id}");
        }
    }
    Ok(())
}
