//! Health status deriver.
//!
//! Combines burndown deviation, days remaining, completion ratio, schedule
//! slack and project status into a tri-state signal. The rules form an
//! explicit ordered decision table (first match wins) so behavior stays
//! auditable; no scattered conditionals.

use serde::Serialize;

use crate::model::ProjectStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// Inputs to the decision table, typically assembled by the engine from the
/// burndown series and schedule result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthInputs {
    /// `real - ideal` as of today; positive = behind. Echoed into reports;
    /// the table itself keys on the ratio and the clock instead.
    pub burndown_deviation: f64,
    pub days_remaining: i64,
    /// Share of committed points done, 0.0..=1.0.
    pub completion_ratio: f64,
    /// Smallest slack on the schedule, when one was computed. Negative
    /// means the schedule is already inconsistent.
    pub min_slack: Option<i64>,
    pub project_status: ProjectStatus,
}

/// Evaluate the decision table.
pub fn derive_health(inputs: &HealthInputs) -> HealthStatus {
    let HealthInputs {
        days_remaining,
        completion_ratio,
        min_slack,
        project_status,
        ..
    } = *inputs;

    let slack_overrun = min_slack.map(|s| s < 0).unwrap_or(false);

    if (days_remaining < 3 && completion_ratio < 0.8)
        || slack_overrun
        || project_status == ProjectStatus::Cancelled
    {
        return HealthStatus::Critical;
    }

    if (days_remaining < 7 && completion_ratio < 0.6)
        || (completion_ratio < 0.4 && days_remaining < 10)
        || project_status == ProjectStatus::OnHold
    {
        return HealthStatus::Warning;
    }

    HealthStatus::Healthy
}
