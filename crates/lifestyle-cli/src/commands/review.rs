//! Weekly review commands for CLI.

use clap::Subcommand;
use lifestyle_core::{Config, CoreError, ReviewInput, ReviewPlanner, WeeklyReview, WeeklyStats};
use serde::Serialize;

use super::{local_date, open_synced, print_json, resolve_now, CmdResult};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Show this week's stats and suggestion for every goal
    Show {
        /// Review as of this instant (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        at: Option<String>,
    },
    /// Record a weekly review for a goal
    Submit {
        /// Goal ID
        goal_id: String,
        /// Whether you stayed on track this week
        #[arg(long)]
        on_track: bool,
        /// What went well or badly
        #[arg(long, default_value = "")]
        reflection: String,
        /// What to change next week
        #[arg(long, default_value = "")]
        improvement: String,
        /// Allow submitting on any day
        #[arg(long)]
        force: bool,
        /// Review as of this instant (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(Serialize)]
struct ReviewRow {
    goal_id: String,
    title: String,
    week: WeeklyStats,
    suggestion: &'static str,
    review: Option<WeeklyReview>,
}

pub fn run(action: ReviewAction, config: &Config, json: bool) -> CmdResult {
    let planner = config.review_planner()?;

    match action {
        ReviewAction::Show { at } => {
            let now = resolve_now(at.as_deref())?;
            let today = now.date_naive();
            let db = open_synced(local_date(now))?;
            let mut saved = db.reviews_on(today)?;

            let rows: Vec<ReviewRow> = db
                .load_histories(false)?
                .iter()
                .map(|history| {
                    let (week, suggestion) = planner.preview(history, now);
                    ReviewRow {
                        goal_id: history.goal.id.clone(),
                        title: history.goal.title.clone(),
                        week,
                        suggestion,
                        review: saved.remove(&history.goal.id),
                    }
                })
                .collect();

            if json {
                return print_json(&rows);
            }

            let (monday, sunday) = planner.week_of(today);
            println!("Week {monday} to {sunday}");
            if !planner.is_open(today) {
                println!("Reviews open on {}.", planner.review_day());
            }
            for row in &rows {
                println!(
                    "{}: {}/{} done ({}%), momentum {}",
                    row.title,
                    row.week.completed,
                    row.week.total,
                    row.week.percentage,
                    row.week.momentum()
                );
                println!("  {}", row.suggestion);
                if let Some(review) = &row.review {
                    let track = if review.stayed_on_track { "on track" } else { "off track" };
                    println!("  Reviewed: {track}. {}", review.reflection_text);
                }
            }
        }
        ReviewAction::Submit {
            goal_id,
            on_track,
            reflection,
            improvement,
            force,
            at,
        } => {
            let now = resolve_now(at.as_deref())?;
            let db = open_synced(local_date(now))?;
            let history = db
                .load_history(&goal_id)?
                .ok_or_else(|| CoreError::not_found("goal", &goal_id))?;

            let planner = if force {
                ReviewPlanner::new(planner.review_day(), false)
            } else {
                planner
            };
            let input = ReviewInput {
                stayed_on_track: on_track,
                reflection,
                improvement,
            };
            let review = planner.build(&history, input, now)?;
            db.upsert_review(&review)?;

            if json {
                print_json(&review)?;
            } else {
                println!("Review saved for {} on {}", history.goal.title, review.review_date);
                println!("  {}", review.auto_suggestions);
            }
        }
    }
    Ok(())
}
