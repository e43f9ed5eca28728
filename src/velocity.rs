//! Velocity aggregator.
//!
//! Historical velocity over completed sprints, a windowed average, and a
//! simple capacity forecast. A team with no completed sprints (or only
//! zero-point ones) has no defined velocity; that is represented as `None`
//! in the summary rather than an error, so dashboards can render a
//! placeholder state.

use serde::Serialize;

use crate::model::VelocityRecord;

/// Aggregated velocity over a project's completed sprints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocitySummary {
    /// One entry per completed sprint, chronological.
    pub velocities: Vec<VelocityRecord>,
    /// Mean story points completed over the averaging window. `None` when
    /// there are no completed sprints (velocity undefined).
    pub average_velocity: Option<f64>,
    /// Number of most-recent sprints averaged over.
    pub window: usize,
}

impl VelocitySummary {
    /// Sprints needed to burn `remaining_points` at the average velocity.
    /// `None` when velocity is undefined or zero.
    pub fn forecast_sprints_to_complete(&self, remaining_points: f64) -> Option<u64> {
        match self.average_velocity {
            Some(avg) if avg > 0.0 => Some((remaining_points / avg).ceil() as u64),
            _ => None,
        }
    }
}

/// Aggregate velocity records. `window` limits the average to the most
/// recent N sprints; `None` averages everything.
pub fn compute_velocity(records: &[VelocityRecord], window: Option<usize>) -> VelocitySummary {
    let window = match window {
        Some(n) if n > 0 => n.min(records.len()),
        _ => records.len(),
    };

    let average_velocity = if records.is_empty() {
        None
    } else {
        let recent = &records[records.len() - window..];
        let sum: u64 = recent.iter().map(|r| r.story_points_completed as u64).sum();
        Some(sum as f64 / recent.len() as f64)
    };

    VelocitySummary {
        velocities: records.to_vec(),
        average_velocity,
        window,
    }
}
