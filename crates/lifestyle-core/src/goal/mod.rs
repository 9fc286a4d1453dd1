//! Goals, recurring tasks and their daily logs.

mod model;
mod recurrence;

pub use model::{Goal, GoalHistory, LogStatus, Task, TaskLog};
pub use recurrence::Recurrence;
