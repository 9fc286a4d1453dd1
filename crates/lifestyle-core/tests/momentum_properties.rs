//! Property tests for the momentum score.
//!
//! Histories are generated as one daily task with a run of logs, scored at
//! an arbitrary day after goal creation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lifestyle_core::{
    momentum_breakdown, momentum_score, score_goals, weekly_stats, FixedClock, Goal, GoalHistory,
    LogStatus, MomentumScore, MomentumStatus, Recurrence, Stage, Task, TaskLog,
};
use proptest::prelude::*;

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap()
}

fn build(statuses: &[LogStatus], goal_days: i64) -> GoalHistory {
    let goal = Goal::new("Learn piano", "Music", created() + Duration::days(goal_days), created());
    let task = Task::new(&goal.id, "Practice scales", Recurrence::Daily, created().date_naive(), created());
    let mut history = GoalHistory::new(goal);
    for (i, status) in statuses.iter().enumerate() {
        let mut log = TaskLog::pending(&task.id, created().date_naive() + Duration::days(i as i64));
        log.id = format!("p-{i:04}");
        log.status = *status;
        history.logs.push(log);
    }
    history.tasks.push(task);
    history
}

fn status() -> impl Strategy<Value = LogStatus> {
    prop_oneof![
        Just(LogStatus::Completed),
        Just(LogStatus::Missed),
        Just(LogStatus::Pending),
    ]
}

fn settled_status() -> impl Strategy<Value = LogStatus> {
    prop_oneof![Just(LogStatus::Completed), Just(LogStatus::Missed)]
}

proptest! {
    #[test]
    fn score_stays_within_bounds(
        statuses in prop::collection::vec(status(), 0..120),
        goal_days in -30i64..400,
        elapsed in -10i64..500,
    ) {
        let history = build(&statuses, goal_days);
        let score = momentum_score(&history, created() + Duration::days(elapsed));
        prop_assert!((-100..=100).contains(&score));
    }

    #[test]
    fn scoring_is_idempotent(
        statuses in prop::collection::vec(status(), 0..60),
        elapsed in 0i64..120,
    ) {
        let history = build(&statuses, 90);
        let now = created() + Duration::days(elapsed);
        let first = momentum_breakdown(&history, now);
        let second = momentum_breakdown(&history, now);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn completing_a_miss_never_lowers_established_score(
        statuses in prop::collection::vec(settled_status(), 1..60),
        pick in any::<prop::sample::Index>(),
    ) {
        let now = created() + Duration::days(statuses.len() as i64 + 10);
        let before = build(&statuses, 120);
        prop_assume!(momentum_breakdown(&before, now).stage == Stage::Established);

        let misses: Vec<usize> = statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == LogStatus::Missed)
            .map(|(i, _)| i)
            .collect();
        prop_assume!(!misses.is_empty());

        let mut improved = statuses.clone();
        improved[misses[pick.index(misses.len())]] = LogStatus::Completed;
        let after = build(&improved, 120);

        prop_assert!(momentum_score(&after, now) >= momentum_score(&before, now));
    }

    #[test]
    fn status_tag_agrees_with_label(score in -100i32..=100) {
        let momentum = MomentumScore::new(score);
        let expected = match momentum.label() {
            "Struggling" | "Falling Behind" => MomentumStatus::Struggling,
            "Maintaining" => MomentumStatus::Maintaining,
            _ => MomentumStatus::Excelling,
        };
        prop_assert_eq!(momentum.status, expected);
        prop_assert!((0.0..=100.0).contains(&momentum.progress_fill()));
    }
}

#[test]
fn empty_history_is_neutral() {
    let history = build(&[], 30);
    let score = MomentumScore::new(momentum_score(&history, created() + Duration::days(12)));
    assert_eq!(score.value, 0);
    assert_eq!(score.status, MomentumStatus::Maintaining);
}

#[test]
fn grace_period_ignores_streaks() {
    use LogStatus::Completed as C;
    let history = build(&[C, C, C], 30);
    let b = momentum_breakdown(&history, created() + Duration::days(2));
    assert_eq!(b.stage, Stage::Grace);
    assert_eq!(b.score, 30);
    assert_eq!(b.streak_adjustment, 0.0);
}

#[test]
fn half_completed_with_recent_streak_scores_seventeen() {
    use LogStatus::{Completed as C, Missed as M};
    let history = build(&[M, M, M, M, M, C, C, C, C, C], 100);
    assert_eq!(momentum_score(&history, created() + Duration::days(30)), 17);
}

#[test]
fn empty_week_yields_zeros() {
    use LogStatus::Completed as C;
    let history = build(&[C, C, C], 100);
    let stats = weekly_stats(&history, created() + Duration::days(60));
    assert_eq!((stats.completed, stats.total, stats.percentage, stats.score), (0, 0, 0, 0));
}

#[test]
fn deadline_before_creation_still_scores() {
    use LogStatus::{Completed as C, Missed as M};
    let history = build(&[C, M, C, C, M, C, C, C, M, C], -20);
    let score = momentum_score(&history, created() + Duration::days(15));
    assert!((-100..=100).contains(&score));
}

#[test]
fn score_goals_uses_one_instant_for_every_goal() {
    use LogStatus::{Completed as C, Missed as M};
    let now = created() + Duration::days(25);
    let histories = vec![build(&[C; 12], 60), build(&[M; 12], 60), build(&[], 60)];

    let results = score_goals(&histories, &FixedClock::new(now));
    let expected: Vec<i32> = histories.iter().map(|h| momentum_score(h, now)).collect();
    let actual: Vec<i32> = results.iter().map(|m| m.score.value).collect();
    assert_eq!(actual, expected);
    assert_eq!(results[1].score.status, MomentumStatus::Struggling);
    assert_eq!(results[2].score.value, 0);
}
