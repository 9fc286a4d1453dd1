//! Goal momentum scoring.
//!
//! Converts a goal's task-log history into a single score in `[-100, 100]`.
//! The score is built from four parts:
//!
//! | Part | Applies when |
//! |------|--------------|
//! | Base (completion rate around 50%) | always |
//! | Streak bonus / penalty | after the grace period |
//! | Timeline adjustment | established goals with at least 7 logs, past 25% of the timeline |
//! | Recent trend | at least 3 logs |
//!
//! During the first three days only positive signal counts and the grace
//! score is returned as-is.
//!
//! The scorer is a pure function of its inputs. "Now" is always passed in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::whole_days_between;
use crate::goal::{Goal, GoalHistory, LogStatus, TaskLog};

pub const MIN_SCORE: i32 = -100;
pub const MAX_SCORE: i32 = 100;

const GRACE_PERIOD_DAYS: i64 = 3;
const EARLY_STAGE_DAYS: i64 = 7;

const GRACE_MAX_SCORE: f64 = 30.0;
const GRACE_MISS_PENALTY: f64 = 5.0;
const GRACE_MIN_SCORE: f64 = -15.0;

const EARLY_BASE_WEIGHT: f64 = 0.6;
const EARLY_FLOOR: f64 = 5.0;

const STREAK_MIN_COMPLETED: u32 = 3;
const STREAK_BONUS_PER_DAY: f64 = 3.0;
const STREAK_BONUS_CAP: f64 = 20.0;
const STREAK_MIN_MISSED: u32 = 2;
const STREAK_PENALTY_PER_DAY: f64 = 4.0;
const STREAK_PENALTY_CAP: f64 = 15.0;

const TIMELINE_MIN_LOGS: usize = 7;
const TIMELINE_MIN_PROGRESS: f64 = 0.25;
const EXPECTED_COMPLETION_RATE: f64 = 0.7;
const AHEAD_GAP: f64 = 0.2;
const BEHIND_GAP: f64 = -0.3;
const AHEAD_BONUS_CAP: f64 = 15.0;
const BEHIND_PENALTY_CAP: f64 = -25.0;

const TREND_MIN_LOGS: usize = 3;
const TREND_WINDOW: usize = 7;
const TREND_WEIGHT: f64 = 10.0;

/// Which part of a goal's life the scorer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// First three days
    Grace,
    /// Days four to seven
    Early,
    /// Beyond the first week
    Established,
}

impl Stage {
    pub fn from_days_elapsed(days: i64) -> Self {
        if days <= GRACE_PERIOD_DAYS {
            Stage::Grace
        } else if days <= EARLY_STAGE_DAYS {
            Stage::Early
        } else {
            Stage::Established
        }
    }
}

/// Every intermediate value behind a score, for explaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumBreakdown {
    pub stage: Stage,
    pub total_goal_days: i64,
    pub days_elapsed: i64,
    pub timeline_progress: f64,
    pub completed: u32,
    pub missed: u32,
    pub pending: u32,
    pub total: u32,
    pub completion_rate: f64,
    pub completion_streak: u32,
    pub miss_streak: u32,
    pub base: f64,
    pub streak_adjustment: f64,
    pub timeline_adjustment: f64,
    pub trend_adjustment: f64,
    /// Rounded and clamped final score
    pub score: i32,
}

/// Score a goal at `now`.
pub fn momentum_score(history: &GoalHistory, now: DateTime<Utc>) -> i32 {
    momentum_breakdown(history, now).score
}

/// Score a goal at `now` and keep the intermediate terms.
pub fn momentum_breakdown(history: &GoalHistory, now: DateTime<Utc>) -> MomentumBreakdown {
    let logs = history.flattened_logs();
    score_logs(&history.goal, &logs, now)
}

/// Score an already flattened, date-sorted log list against `goal`'s
/// timeline.
pub(crate) fn score_logs(goal: &Goal, logs: &[&TaskLog], now: DateTime<Utc>) -> MomentumBreakdown {
    let total_goal_days = whole_days_between(goal.created_at, goal.deadline).max(1);
    let days_elapsed = whole_days_between(goal.created_at, now).max(0);
    let timeline_progress = (days_elapsed as f64 / total_goal_days as f64).min(1.0);
    let stage = Stage::from_days_elapsed(days_elapsed);

    let counts = StatusCounts::tally(logs);
    let (completion_streak, miss_streak) = current_streaks(logs, now.date_naive());

    let mut breakdown = MomentumBreakdown {
        stage,
        total_goal_days,
        days_elapsed,
        timeline_progress,
        completed: counts.completed,
        missed: counts.missed,
        pending: counts.pending,
        total: counts.total(),
        completion_rate: counts.rate(),
        completion_streak,
        miss_streak,
        base: 0.0,
        streak_adjustment: 0.0,
        timeline_adjustment: 0.0,
        trend_adjustment: 0.0,
        score: 0,
    };

    if logs.is_empty() {
        return breakdown;
    }

    if stage == Stage::Grace {
        breakdown.base = grace_score(&counts);
        breakdown.score = finalize(breakdown.base);
        return breakdown;
    }

    let rate = counts.rate();
    breakdown.base = match stage {
        Stage::Early => {
            let base = (rate * 100.0 - 50.0) * EARLY_BASE_WEIGHT;
            if counts.completed > counts.missed {
                base.max(EARLY_FLOOR)
            } else {
                base
            }
        }
        _ => rate * 100.0 - 50.0,
    };

    breakdown.streak_adjustment = streak_adjustment(completion_streak, miss_streak, stage);

    if stage == Stage::Established
        && logs.len() >= TIMELINE_MIN_LOGS
        && timeline_progress > TIMELINE_MIN_PROGRESS
    {
        breakdown.timeline_adjustment = timeline_adjustment(rate, timeline_progress);
    }

    if logs.len() >= TREND_MIN_LOGS {
        let recent = &logs[logs.len().saturating_sub(TREND_WINDOW)..];
        let recent_rate = StatusCounts::tally(recent).rate();
        breakdown.trend_adjustment = (recent_rate - rate) * TREND_WEIGHT;
    }

    breakdown.score = finalize(
        breakdown.base
            + breakdown.streak_adjustment
            + breakdown.timeline_adjustment
            + breakdown.trend_adjustment,
    );
    tracing::debug!(
        goal_id = %goal.id,
        ?stage,
        score = breakdown.score,
        "scored goal momentum"
    );
    breakdown
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusCounts {
    completed: u32,
    missed: u32,
    pending: u32,
}

impl StatusCounts {
    fn tally(logs: &[&TaskLog]) -> Self {
        let mut counts = Self::default();
        for log in logs {
            match log.status {
                LogStatus::Completed => counts.completed += 1,
                LogStatus::Missed => counts.missed += 1,
                LogStatus::Pending => counts.pending += 1,
            }
        }
        counts
    }

    fn total(&self) -> u32 {
        self.completed + self.missed + self.pending
    }

    fn rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.completed) / f64::from(total),
        }
    }
}

fn grace_score(counts: &StatusCounts) -> f64 {
    if counts.completed > 0 {
        let decided = f64::from(counts.completed + counts.missed);
        (f64::from(counts.completed) / decided * GRACE_MAX_SCORE).min(GRACE_MAX_SCORE)
    } else if counts.missed == 0 {
        0.0
    } else {
        (-f64::from(counts.missed) * GRACE_MISS_PENALTY).max(GRACE_MIN_SCORE)
    }
}

/// Length of the completed run and the missed run ending at the most recent
/// log. Pending logs due on or after `today` are not actionable yet and are
/// skipped; an older pending log ends both runs.
fn current_streaks(logs: &[&TaskLog], today: NaiveDate) -> (u32, u32) {
    let mut actionable = logs
        .iter()
        .rev()
        .filter(|log| !(log.status == LogStatus::Pending && log.due_date >= today))
        .peekable();

    let Some(head) = actionable.peek().map(|log| log.status) else {
        return (0, 0);
    };
    if head == LogStatus::Pending {
        return (0, 0);
    }

    let run = actionable.take_while(|log| log.status == head).count() as u32;
    match head {
        LogStatus::Completed => (run, 0),
        _ => (0, run),
    }
}

fn streak_adjustment(completion_streak: u32, miss_streak: u32, stage: Stage) -> f64 {
    let mut adjustment = 0.0;
    if completion_streak >= STREAK_MIN_COMPLETED {
        adjustment += (f64::from(completion_streak) * STREAK_BONUS_PER_DAY).min(STREAK_BONUS_CAP);
    }
    if miss_streak >= STREAK_MIN_MISSED {
        adjustment -= (f64::from(miss_streak) * STREAK_PENALTY_PER_DAY).min(STREAK_PENALTY_CAP);
    }
    if stage == Stage::Early {
        adjustment / 2.0
    } else {
        adjustment
    }
}

fn timeline_adjustment(rate: f64, timeline_progress: f64) -> f64 {
    let gap = rate - EXPECTED_COMPLETION_RATE;
    if gap > AHEAD_GAP {
        (gap * 30.0).min(AHEAD_BONUS_CAP)
    } else if gap < BEHIND_GAP {
        (gap * 25.0 * timeline_progress).max(BEHIND_PENALTY_CAP)
    } else {
        0.0
    }
}

fn finalize(raw: f64) -> i32 {
    (raw.round() as i32).clamp(MIN_SCORE, MAX_SCORE)
}
