pub mod burndown;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod health;
pub mod model;
pub mod parser;
pub mod schedule;
pub mod velocity;

pub use burndown::{compute_burndown, BurndownOptions, BurndownSeries};
pub use calendar::LagUnit;
pub use config::Config;
pub use engine::{analyze, ProjectReport};
pub use error::EngineError;
pub use graph::DependencyGraph;
pub use health::{derive_health, HealthInputs, HealthStatus};
pub use model::{
    DependencyEdge, DependencyType, ProjectSnapshot, Sprint, SprintStatus, Task, TaskStatus,
    UserStory, VelocityRecord,
};
pub use parser::{load_snapshot, save_snapshot};
pub use schedule::{compute_critical_path, ScheduleResult};
pub use velocity::{compute_velocity, VelocitySummary};
