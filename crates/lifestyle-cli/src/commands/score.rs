//! Momentum score command for CLI.

use clap::Args;
use lifestyle_core::{score_goals, CoreError, FixedClock};

use super::{local_date, open_synced, print_json, resolve_now, CmdResult};

#[derive(Args)]
pub struct ScoreArgs {
    /// Score a single goal
    #[arg(long)]
    goal: Option<String>,
    /// Score at this instant instead of now (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    at: Option<String>,
    /// Include archived goals
    #[arg(long)]
    all: bool,
    /// Show how each score was built
    #[arg(long)]
    explain: bool,
}

pub fn run(args: ScoreArgs, json: bool) -> CmdResult {
    let now = resolve_now(args.at.as_deref())?;
    let db = open_synced(local_date(now))?;

    let histories = match &args.goal {
        Some(id) => vec![db
            .load_history(id)?
            .ok_or_else(|| CoreError::not_found("goal", id))?],
        None => db.load_histories(args.all)?,
    };
    let scored = score_goals(&histories, &FixedClock::new(now));

    if json {
        return print_json(&scored);
    }
    if scored.is_empty() {
        println!("No goals.");
        return Ok(());
    }
    for goal in &scored {
        println!(
            "{:>4}  {:<15} {} [{}]  {:.0}%",
            format!("{:+}", goal.score.value),
            goal.score.label(),
            goal.title,
            goal.category,
            goal.score.progress_fill()
        );
        if args.explain {
            let b = &goal.breakdown;
            println!(
                "      {:?} stage, day {} of {}; {} completed, {} missed, {} pending",
                b.stage, b.days_elapsed, b.total_goal_days, b.completed, b.missed, b.pending
            );
            println!(
                "      base {:+.1}, streak {:+.1}, timeline {:+.1}, trend {:+.1}",
                b.base, b.streak_adjustment, b.timeline_adjustment, b.trend_adjustment
            );
        }
    }
    Ok(())
}
