//! Weekly reflective reviews.
//!
//! A review is recorded per goal per review date. The suggestion text is
//! chosen from the goal's weekly completion percentage at the time of
//! saving and stored alongside the user's reflection.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::dates::week_bounds;
use crate::error::ValidationError;
use crate::goal::GoalHistory;
use crate::momentum::{weekly_stats, WeeklyStats};

/// One goal's weekly review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReview {
    pub goal_id: String,
    pub review_date: NaiveDate,
    pub stayed_on_track: bool,
    #[serde(default)]
    pub reflection_text: String,
    #[serde(default)]
    pub improvement_notes: String,
    pub auto_suggestions: String,
}

/// What the user fills in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub stayed_on_track: bool,
    pub reflection: String,
    pub improvement: String,
}

/// Suggestion text for a weekly completion percentage.
pub fn suggestion_for(percentage: u32) -> &'static str {
    match percentage {
        90.. => "Excellent execution! Consider adding more challenging lead measures or increasing frequency.",
        70..=89 => "Good progress! Look for small optimizations to reach 90%+ consistency.",
        50..=69 => "Room for improvement. Consider simplifying your lead measures or adjusting frequency.",
        _ => "Significant improvement needed. You might be overcommitting - try focusing on fewer, simpler tasks.",
    }
}

/// Decides when reviews are open and builds review records.
#[derive(Debug, Clone)]
pub struct ReviewPlanner {
    review_day: Weekday,
    restrict_to_review_day: bool,
}

impl Default for ReviewPlanner {
    fn default() -> Self {
        Self {
            review_day: Weekday::Sun,
            restrict_to_review_day: true,
        }
    }
}

impl ReviewPlanner {
    pub fn new(review_day: Weekday, restrict_to_review_day: bool) -> Self {
        Self {
            review_day,
            restrict_to_review_day,
        }
    }

    pub fn review_day(&self) -> Weekday {
        self.review_day
    }

    /// Whether reviews can be written on `date`.
    pub fn is_open(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        !self.restrict_to_review_day || date.weekday() == self.review_day
    }

    /// Monday and Sunday of the week under review.
    pub fn week_of(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        week_bounds(date)
    }

    /// Weekly stats and the suggestion shown before the user writes a review.
    pub fn preview(&self, history: &GoalHistory, now: DateTime<Utc>) -> (WeeklyStats, &'static str) {
        let stats = weekly_stats(history, now);
        (stats, suggestion_for(stats.percentage))
    }

    /// Build the review record for `history` dated `now`.
    ///
    /// # Errors
    /// Returns an error when reviews are closed on that date.
    pub fn build(
        &self,
        history: &GoalHistory,
        input: ReviewInput,
        now: DateTime<Utc>,
    ) -> Result<WeeklyReview, ValidationError> {
        let review_date = now.date_naive();
        if !self.is_open(review_date) {
            return Err(ValidationError::InvalidValue {
                field: "review_date".into(),
                message: format!("weekly reviews are only available on {}", self.review_day),
            });
        }
        let (_, suggestion) = self.preview(history, now);
        Ok(WeeklyReview {
            goal_id: history.goal.id.clone(),
            review_date,
            stayed_on_track: input.stayed_on_track,
            reflection_text: input.reflection,
            improvement_notes: input.improvement,
            auto_suggestions: suggestion.to_string(),
        })
    }
}

/// Parse a weekday name such as "Sun" or "sunday".
pub fn parse_weekday(value: &str) -> Result<Weekday, ValidationError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| ValidationError::InvalidValue {
            field: "review.weekday".into(),
            message: format!("'{value}' is not a weekday"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Goal, LogStatus, Recurrence, Task, TaskLog};
    use chrono::{Duration, TimeZone};

    #[test]
    fn suggestion_thresholds() {
        assert!(suggestion_for(100).starts_with("Excellent"));
        assert!(suggestion_for(90).starts_with("Excellent"));
        assert!(suggestion_for(89).starts_with("Good progress"));
        assert!(suggestion_for(70).starts_with("Good progress"));
        assert!(suggestion_for(69).starts_with("Room for improvement"));
        assert!(suggestion_for(50).starts_with("Room for improvement"));
        assert!(suggestion_for(49).starts_with("Significant"));
        assert!(suggestion_for(0).starts_with("Significant"));
    }

    #[test]
    fn reviews_open_only_on_review_day() {
        let planner = ReviewPlanner::default();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        assert!(planner.is_open(sunday));
        assert!(!planner.is_open(sunday - Duration::days(1)));

        let anytime = ReviewPlanner::new(Weekday::Sun, false);
        assert!(anytime.is_open(sunday - Duration::days(3)));
    }

    #[test]
    fn build_uses_weekly_completion_for_suggestion() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut history = GoalHistory::new(Goal::new("Launch shop", "Business", created + Duration::days(90), created));
        let task = Task::new(&history.goal.id, "Outreach", Recurrence::Daily, created.date_naive(), created);
        for day in 15..=21 {
            let mut log = TaskLog::pending(&task.id, NaiveDate::from_ymd_opt(2024, 1, day).unwrap());
            log.status = LogStatus::Completed;
            history.logs.push(log);
        }
        history.tasks.push(task);

        let sunday_evening = Utc.with_ymd_and_hms(2024, 1, 21, 20, 0, 0).unwrap();
        let review = ReviewPlanner::default()
            .build(
                &history,
                ReviewInput {
                    stayed_on_track: true,
                    reflection: "Consistent mornings".into(),
                    improvement: String::new(),
                },
                sunday_evening,
            )
            .unwrap();
        assert_eq!(review.review_date, NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
        assert!(review.auto_suggestions.starts_with("Excellent"));
    }

    #[test]
    fn build_rejects_closed_day() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let history = GoalHistory::new(Goal::new("x", "y", created + Duration::days(9), created));
        let wednesday = Utc.with_ymd_and_hms(2024, 1, 17, 9, 0, 0).unwrap();
        assert!(ReviewPlanner::default()
            .build(&history, ReviewInput::default(), wednesday)
            .is_err());
    }

    #[test]
    fn parse_weekday_accepts_short_and_long_names() {
        assert_eq!(parse_weekday("Sun").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("saturday").unwrap(), Weekday::Sat);
        assert!(parse_weekday("someday").is_err());
    }
}
