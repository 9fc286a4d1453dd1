//! # Lifestyle Core Library
//!
//! This library provides the core logic for Lifestyle Execution, a personal
//! goal tracker built on lead measures: every goal has recurring tasks, each
//! task produces one log per due day, and the history of those logs drives a
//! single momentum score per goal.
//!
//! ## Architecture
//!
//! - **Goals**: Flat goal, task and task-log records linked by ids
//! - **Momentum**: The canonical scoring policy, its status labels and the
//!   weekly variant
//! - **Storage**: SQLite persistence with versioned migrations and TOML-based
//!   configuration
//! - **Adapter**: Translation from the hosted backend's nested JSON payload
//!
//! ## Key Components
//!
//! - [`momentum_score`]: Score one goal at an explicit instant
//! - [`score_goals`]: Score many goals against one clock reading
//! - [`Database`]: Goal, task, log and review persistence
//! - [`Config`]: Application configuration management

pub mod adapter;
pub mod clock;
pub mod dates;
pub mod error;
pub mod goal;
pub mod momentum;
pub mod review;
pub mod stats;
pub mod storage;

pub use adapter::{histories_from_json, histories_from_value};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AdapterError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use goal::{Goal, GoalHistory, LogStatus, Recurrence, Task, TaskLog};
pub use momentum::{
    momentum_breakdown, momentum_score, score_goals, weekly_stats, GoalMomentum,
    MomentumBreakdown, MomentumScore, MomentumStatus, Stage, WeeklyStats,
};
pub use review::{ReviewInput, ReviewPlanner, WeeklyReview};
pub use stats::{DashboardAnalyzer, DashboardStats};
pub use storage::{Config, Database, ImportSummary, LogMaintenance, TodayLog};
