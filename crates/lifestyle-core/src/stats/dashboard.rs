//! Headline numbers for the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dates::in_same_week;
use crate::goal::{GoalHistory, LogStatus, TaskLog};
use crate::momentum::percentage;

/// Summary across all of a user's goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Goals that are not archived
    pub active_goals: u32,
    /// Logs due today that are completed
    pub completed_today: u32,
    /// Completed share of this week's logs, as a percentage
    pub weekly_completion: u32,
    /// Consecutive most-recent dates on which every log was completed
    pub perfect_day_streak: u32,
}

/// Builds [`DashboardStats`] from goal histories.
#[derive(Debug, Clone, Default)]
pub struct DashboardAnalyzer;

impl DashboardAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compute dashboard stats at `now`.
    pub fn analyze(&self, histories: &[GoalHistory], now: DateTime<Utc>) -> DashboardStats {
        let today = now.date_naive();
        let logs: Vec<&TaskLog> = histories
            .iter()
            .flat_map(|history| history.flattened_logs())
            .collect();

        let completed_today = logs
            .iter()
            .filter(|log| log.due_date == today && log.is_completed())
            .count() as u32;

        let (week_done, week_total) = logs
            .iter()
            .filter(|log| in_same_week(log.due_date, today))
            .fold((0u32, 0u32), |(done, total), log| {
                (done + u32::from(log.is_completed()), total + 1)
            });

        DashboardStats {
            active_goals: histories.iter().filter(|h| !h.goal.is_archived).count() as u32,
            completed_today,
            weekly_completion: percentage(week_done, week_total),
            perfect_day_streak: self.perfect_day_streak(&logs),
        }
    }

    /// Walk dates newest first, counting days where every log is completed.
    pub fn perfect_day_streak(&self, logs: &[&TaskLog]) -> u32 {
        let mut by_date: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
        for log in logs {
            let entry = by_date.entry(log.due_date).or_insert((0, 0));
            if log.status == LogStatus::Completed {
                entry.0 += 1;
            }
            entry.1 += 1;
        }

        by_date
            .values()
            .rev()
            .take_while(|(completed, total)| completed == total)
            .count() as u32
    }
}

/// Plain completed / total percentage for one goal, 0 without logs.
pub fn goal_completion_percentage(history: &GoalHistory) -> u32 {
    let logs = history.flattened_logs();
    let completed = logs.iter().filter(|log| log.is_completed()).count() as u32;
    percentage(completed, logs.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Goal, Recurrence, Task};
    use chrono::{Duration, TimeZone};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn history(entries: &[(NaiveDate, LogStatus)]) -> GoalHistory {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut history = GoalHistory::new(Goal::new("Learn Spanish", "Learning", created + Duration::days(60), created));
        let task = Task::new(&history.goal.id, "Flashcards", Recurrence::Daily, d(1), created);
        for (date, status) in entries {
            let mut log = TaskLog::pending(&task.id, *date);
            log.status = *status;
            history.logs.push(log);
        }
        history.tasks.push(task);
        history
    }

    #[test]
    fn perfect_day_streak_stops_at_first_imperfect_day() {
        let h = history(&[
            (d(10), LogStatus::Completed),
            (d(11), LogStatus::Missed),
            (d(12), LogStatus::Completed),
            (d(13), LogStatus::Completed),
            (d(13), LogStatus::Completed),
        ]);
        let logs = h.flattened_logs();
        assert_eq!(DashboardAnalyzer::new().perfect_day_streak(&logs), 2);
    }

    #[test]
    fn perfect_day_streak_is_zero_without_logs() {
        assert_eq!(DashboardAnalyzer::new().perfect_day_streak(&[]), 0);
    }

    #[test]
    fn analyze_counts_today_and_week() {
        let mut archived = history(&[]);
        archived.goal.is_archived = true;
        let active = history(&[
            (d(14), LogStatus::Completed), // previous week
            (d(15), LogStatus::Completed),
            (d(16), LogStatus::Missed),
            (d(17), LogStatus::Completed),
            (d(17), LogStatus::Pending),
        ]);
        let now = Utc.with_ymd_and_hms(2024, 1, 17, 18, 0, 0).unwrap();

        let stats = DashboardAnalyzer::new().analyze(&[active, archived], now);
        assert_eq!(stats.active_goals, 1);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.weekly_completion, 50);
        assert_eq!(stats.perfect_day_streak, 0);
    }

    #[test]
    fn goal_completion_percentage_rounds() {
        let h = history(&[
            (d(1), LogStatus::Completed),
            (d(2), LogStatus::Missed),
            (d(3), LogStatus::Missed),
        ]);
        assert_eq!(goal_completion_percentage(&h), 33);
        assert_eq!(goal_completion_percentage(&history(&[])), 0);
    }
}
