//! Error taxonomy for the analytics engine.
//!
//! Structural errors carry the offending task ids so callers can highlight
//! them. Degenerate-but-valid states (zero velocity, empty sprint) are not
//! errors; they surface as explicit no-data values in the result types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The dependency graph contains a cycle, given as an ordered task-id list.
    #[error("dependency cycle detected: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    /// A task depends on itself.
    #[error("task '{task_id}' depends on itself")]
    SelfDependency { task_id: String },

    /// A dependency edge references a task id not present in the task set.
    #[error("dependency {from} -> {to} references unknown task '{to}'")]
    DanglingDependency { from: String, to: String },

    /// A task duration resolved to a negative number of days.
    #[error("task '{task_id}' has negative duration ({days} days)")]
    NegativeDuration { task_id: String, days: i64 },

    /// A sprint whose end date is not after its start date.
    #[error("sprint '{sprint_id}' has invalid range: {start} .. {end}")]
    InvalidSprintRange {
        sprint_id: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
