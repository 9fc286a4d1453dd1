//! Statistics module for Lifestyle Execution
//!
//! Dashboard counters that sit alongside the momentum score: today's
//! completions, weekly completion rate and perfect-day streaks.

mod dashboard;

pub use dashboard::{goal_completion_percentage, DashboardAnalyzer, DashboardStats};
