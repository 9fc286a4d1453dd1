use clap::Args;
use lifestyle_core::stats::goal_completion_percentage;
use lifestyle_core::{score_goals, DashboardAnalyzer, DashboardStats, FixedClock, MomentumScore};
use serde::Serialize;

use super::{local_date, open_synced, print_json, resolve_now, CmdResult};

#[derive(Args)]
pub struct DashboardArgs {
    /// Show the dashboard as of this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    at: Option<String>,
}

#[derive(Serialize)]
struct GoalRow {
    goal_id: String,
    title: String,
    category: String,
    completion_percentage: u32,
    momentum: MomentumScore,
}

#[derive(Serialize)]
struct Dashboard {
    stats: DashboardStats,
    goals: Vec<GoalRow>,
}

pub fn run(args: DashboardArgs, json: bool) -> CmdResult {
    let now = resolve_now(args.at.as_deref())?;
    let db = open_synced(local_date(now))?;
    // Archived goals still count towards today's and this week's totals.
    let histories = db.load_histories(true)?;
    let stats = DashboardAnalyzer::new().analyze(&histories, now);

    let active: Vec<_> = histories.into_iter().filter(|h| !h.goal.is_archived).collect();
    let goals: Vec<GoalRow> = score_goals(&active, &FixedClock::new(now))
        .into_iter()
        .zip(&active)
        .map(|(scored, history)| GoalRow {
            goal_id: scored.goal_id,
            title: scored.title,
            category: scored.category,
            completion_percentage: goal_completion_percentage(history),
            momentum: scored.score,
        })
        .collect();

    if json {
        return print_json(&Dashboard { stats, goals });
    }

    println!("Active goals:       {}", stats.active_goals);
    println!("Completed today:    {}", stats.completed_today);
    println!("Weekly completion:  {}%", stats.weekly_completion);
    println!("Perfect-day streak: {}", stats.perfect_day_streak);
    for row in &goals {
        println!(
            "  {} [{}]  {}% done, momentum {}",
            row.title, row.category, row.completion_percentage, row.momentum
        );
    }
    Ok(())
}
