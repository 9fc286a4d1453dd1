//! Weekly momentum: the canonical policy over the current Monday–Sunday week.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scorer::score_logs;
use super::status::MomentumScore;
use crate::dates::in_same_week;
use crate::goal::GoalHistory;

/// Completion and momentum for one goal over the week containing `now`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub completed: u32,
    pub total: u32,
    /// `completed / total` as a rounded percentage, 0 when `total` is 0
    pub percentage: u32,
    pub score: i32,
}

impl WeeklyStats {
    pub fn momentum(&self) -> MomentumScore {
        MomentumScore::new(self.score)
    }
}

/// Weekly stats for `history` at `now`. Empty week yields all zeros.
pub fn weekly_stats(history: &GoalHistory, now: DateTime<Utc>) -> WeeklyStats {
    let today = now.date_naive();
    let logs: Vec<_> = history
        .flattened_logs()
        .into_iter()
        .filter(|log| in_same_week(log.due_date, today))
        .collect();

    if logs.is_empty() {
        return WeeklyStats::default();
    }

    let breakdown = score_logs(&history.goal, &logs, now);
    WeeklyStats {
        completed: breakdown.completed,
        total: breakdown.total,
        percentage: percentage(breakdown.completed, breakdown.total),
        score: breakdown.score,
    }
}

pub(crate) fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Goal, LogStatus, Recurrence, Task, TaskLog};
    use crate::momentum::scorer::{momentum_breakdown, momentum_score};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn history(dates_and_status: &[(NaiveDate, LogStatus)]) -> GoalHistory {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let mut history = GoalHistory::new(Goal::new(
            "Save money",
            "Finance",
            created + Duration::days(90),
            created,
        ));
        let task = Task::new(&history.goal.id, "Log spending", Recurrence::Daily, created.date_naive(), created);
        for (date, status) in dates_and_status {
            let mut log = TaskLog::pending(&task.id, *date);
            log.status = *status;
            history.logs.push(log);
        }
        history.tasks.push(task);
        history
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn empty_week_is_all_zero() {
        // Logs only in the week of Jan 1; now is Wed Jan 17.
        let history = history(&[(d(2), LogStatus::Completed), (d(3), LogStatus::Missed)]);
        let now = Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap();
        assert_eq!(weekly_stats(&history, now), WeeklyStats::default());
    }

    #[test]
    fn counts_only_current_week() {
        let history = history(&[
            (d(14), LogStatus::Missed),    // previous Sunday
            (d(15), LogStatus::Completed), // Monday
            (d(16), LogStatus::Completed),
            (d(17), LogStatus::Missed),
            (d(22), LogStatus::Missed), // next Monday
        ]);
        let now = Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap();
        let stats = weekly_stats(&history, now);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.percentage, 67);
    }

    #[test]
    fn score_uses_only_this_weeks_logs() {
        let mut entries: Vec<_> = (15..=21).map(|day| (d(day), LogStatus::Missed)).collect();
        entries.extend((22..=24).map(|day| (d(day), LogStatus::Completed)));
        let history = history(&entries);
        let now = Utc.with_ymd_and_hms(2024, 1, 24, 12, 0, 0).unwrap();

        // Established: base 50, completion streak 3 gives +9, too few logs
        // for the timeline term and a flat trend.
        let stats = weekly_stats(&history, now);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.percentage, 100);
        assert_eq!(stats.score, 59);

        // Over the whole history the missed week drags the score negative.
        assert_eq!(momentum_score(&history, now), -12);
    }

    #[test]
    fn misses_before_monday_do_not_extend_the_streak() {
        let history = history(&[
            (d(19), LogStatus::Missed),
            (d(20), LogStatus::Missed),
            (d(21), LogStatus::Missed), // Sunday
            (d(22), LogStatus::Missed), // Monday
        ]);
        let now = Utc.with_ymd_and_hms(2024, 1, 22, 20, 0, 0).unwrap();

        let stats = weekly_stats(&history, now);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.score, -50);

        let full = momentum_breakdown(&history, now);
        assert_eq!(full.miss_streak, 4);
        assert_eq!(full.score, -65);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 3), 100);
    }
}
