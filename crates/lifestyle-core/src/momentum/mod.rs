//! Goal momentum: the canonical score, its labels, and the weekly variant.
//!
//! Every place that shows a score goes through this module. A scoring pass
//! over many goals reads the clock once via [`score_goals`] so the results
//! are consistent with each other.

mod scorer;
mod status;
mod weekly;

pub use scorer::{
    momentum_breakdown, momentum_score, MomentumBreakdown, Stage, MAX_SCORE, MIN_SCORE,
};
pub use status::{MomentumScore, MomentumStatus};
pub use weekly::{weekly_stats, WeeklyStats};

pub(crate) use weekly::percentage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::goal::GoalHistory;

/// Momentum of one goal within a scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalMomentum {
    pub goal_id: String,
    pub title: String,
    pub category: String,
    pub score: MomentumScore,
    pub breakdown: MomentumBreakdown,
}

impl GoalMomentum {
    pub fn compute(history: &GoalHistory, now: DateTime<Utc>) -> Self {
        let breakdown = momentum_breakdown(history, now);
        Self {
            goal_id: history.goal.id.clone(),
            title: history.goal.title.clone(),
            category: history.goal.category.clone(),
            score: MomentumScore::new(breakdown.score),
            breakdown,
        }
    }
}

/// Score every goal against a single reading of `clock`.
pub fn score_goals<C: Clock>(histories: &[GoalHistory], clock: &C) -> Vec<GoalMomentum> {
    let now = clock.now();
    histories
        .iter()
        .map(|history| GoalMomentum::compute(history, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::Goal;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    struct CountingClock {
        at: DateTime<Utc>,
        reads: Cell<u32>,
    }

    impl Clock for CountingClock {
        fn now(&self) -> DateTime<Utc> {
            self.reads.set(self.reads.get() + 1);
            self.at
        }
    }

    #[test]
    fn score_goals_reads_clock_once() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let histories: Vec<_> = (0..3)
            .map(|i| {
                GoalHistory::new(Goal::new(
                    format!("Goal {i}"),
                    "Misc",
                    created + Duration::days(30),
                    created,
                ))
            })
            .collect();
        let clock = CountingClock {
            at: created + Duration::days(10),
            reads: Cell::new(0),
        };

        let scores = score_goals(&histories, &clock);
        assert_eq!(scores.len(), 3);
        assert_eq!(clock.reads.get(), 1);
        assert!(scores
            .iter()
            .all(|m| m.score.value == 0 && m.score.status == MomentumStatus::Maintaining));
    }
}
