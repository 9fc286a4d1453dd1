//! Task recurrence schedules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often a task comes due, counted from its start date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    Daily,
    #[serde(rename = "every_2_days")]
    EveryTwoDays,
    Weekly,
    /// Every N days
    Custom(u32),
}

impl Recurrence {
    /// Build from the stored `frequency` string and optional `custom_days`.
    ///
    /// Returns `None` for an unknown frequency. A custom schedule without a
    /// day count falls back to one day.
    pub fn from_parts(frequency: &str, custom_days: Option<u32>) -> Option<Self> {
        match frequency {
            "daily" => Some(Recurrence::Daily),
            "every_2_days" => Some(Recurrence::EveryTwoDays),
            "weekly" => Some(Recurrence::Weekly),
            "custom" => Some(Recurrence::Custom(custom_days.unwrap_or(1))),
            _ => None,
        }
    }

    /// Split into the `frequency` string and `custom_days` column values.
    pub fn as_parts(&self) -> (&'static str, Option<u32>) {
        match self {
            Recurrence::Daily => ("daily", None),
            Recurrence::EveryTwoDays => ("every_2_days", None),
            Recurrence::Weekly => ("weekly", None),
            Recurrence::Custom(n) => ("custom", Some(*n)),
        }
    }

    /// Interval in days. Custom intervals below one are treated as daily.
    pub fn interval_days(&self) -> i64 {
        match self {
            Recurrence::Daily => 1,
            Recurrence::EveryTwoDays => 2,
            Recurrence::Weekly => 7,
            Recurrence::Custom(n) => i64::from((*n).max(1)),
        }
    }

    /// Whether a task started on `start` is due on `date`.
    pub fn is_due_on(&self, start: NaiveDate, date: NaiveDate) -> bool {
        if date < start {
            return false;
        }
        (date - start).num_days() % self.interval_days() == 0
    }

    /// Display text shown next to a task.
    pub fn describe(&self) -> String {
        match self {
            Recurrence::Daily => "Daily".to_string(),
            Recurrence::EveryTwoDays => "Every 2 days".to_string(),
            Recurrence::Weekly => "Weekly".to_string(),
            Recurrence::Custom(n) => format!("Every {} days", (*n).max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_due_every_day_after_start() {
        let start = date(2024, 1, 10);
        assert!(Recurrence::Daily.is_due_on(start, start));
        assert!(Recurrence::Daily.is_due_on(start, date(2024, 1, 11)));
        assert!(!Recurrence::Daily.is_due_on(start, date(2024, 1, 9)));
    }

    #[test]
    fn every_two_days_skips_odd_offsets() {
        let start = date(2024, 1, 10);
        assert!(Recurrence::EveryTwoDays.is_due_on(start, date(2024, 1, 12)));
        assert!(!Recurrence::EveryTwoDays.is_due_on(start, date(2024, 1, 13)));
    }

    #[test]
    fn weekly_lands_on_same_weekday() {
        let start = date(2024, 1, 10);
        assert!(Recurrence::Weekly.is_due_on(start, date(2024, 1, 17)));
        assert!(!Recurrence::Weekly.is_due_on(start, date(2024, 1, 16)));
    }

    #[test]
    fn custom_zero_behaves_as_daily() {
        let start = date(2024, 1, 10);
        assert!(Recurrence::Custom(0).is_due_on(start, date(2024, 1, 13)));
        assert_eq!(Recurrence::Custom(0).interval_days(), 1);
        assert_eq!(Recurrence::Custom(0).describe(), "Every 1 days");
    }

    #[test]
    fn parts_round_trip_for_custom() {
        let r = Recurrence::from_parts("custom", Some(3)).unwrap();
        assert_eq!(r, Recurrence::Custom(3));
        assert_eq!(r.as_parts(), ("custom", Some(3)));
        assert!(Recurrence::from_parts("hourly", None).is_none());
    }

    #[test]
    fn describe_matches_task_list_labels() {
        assert_eq!(Recurrence::Daily.describe(), "Daily");
        assert_eq!(Recurrence::EveryTwoDays.describe(), "Every 2 days");
        assert_eq!(Recurrence::Weekly.describe(), "Weekly");
        assert_eq!(Recurrence::Custom(5).describe(), "Every 5 days");
    }
}
