//! Engine orchestration.
//!
//! One call runs the full analytics pipeline over a snapshot: duration
//! derivation, graph construction, the CPM passes, burndown for the active
//! sprint, velocity over completed sprints, and the health join at the end.
//! Every stage is a pure function of the snapshot plus an explicit `as_of`
//! date; callers can equally invoke the individual calculators directly.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::burndown::{compute_burndown, BurndownOptions, BurndownSeries};
use crate::calendar::date_at_offset;
use crate::config::{Config, DurationSource};
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::health::{derive_health, HealthInputs, HealthStatus};
use crate::model::{ProjectSnapshot, Sprint, Task, VelocityRecord};
use crate::schedule::{compute_critical_path, ScheduleResult};
use crate::velocity::{compute_velocity, VelocitySummary};

/// Schedule offsets mapped onto concrete dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDates {
    pub task_id: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

/// Health signal together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub inputs: HealthInputs,
}

/// The joined output of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub project: String,
    pub as_of: NaiveDate,
    pub schedule: ScheduleResult,
    /// Day offset 0 of the schedule as a date.
    pub schedule_start: NaiveDate,
    pub task_dates: Vec<TaskDates>,
    /// Burndown for the active sprint, when one exists.
    pub burndown: Option<BurndownSeries>,
    pub velocity: VelocitySummary,
    pub health: HealthReport,
}

/// Derive per-task durations in whole days per the configured source.
/// Tasks with no usable source are omitted (the schedule stage records a
/// diagnostic and assumes 0). Negative date ranges are passed through so
/// the schedule stage can reject them by name.
pub fn derive_durations(tasks: &[Task], config: &Config) -> HashMap<String, i64> {
    let hours_per_day = config.schedule.hours_per_day.max(1.0);
    let mut durations = HashMap::new();
    for task in tasks {
        let from_estimate = task
            .estimated_hours
            .map(|h| (h / hours_per_day).ceil() as i64);
        let from_range = match (task.start_date, task.due_date) {
            (Some(start), Some(due)) => Some((due - start).num_days()),
            _ => None,
        };
        let days = match config.schedule.duration_source {
            DurationSource::EstimatedHours => from_estimate.or(from_range),
            DurationSource::DateRange => from_range.or(from_estimate),
        };
        if let Some(days) = days {
            durations.insert(task.id.clone(), days);
        }
    }
    durations
}

/// Earliest fixed start date across tasks, used as day offset 0.
fn schedule_start(snapshot: &ProjectSnapshot, as_of: NaiveDate) -> NaiveDate {
    snapshot
        .tasks
        .iter()
        .filter_map(|t| t.start_date)
        .min()
        .or_else(|| snapshot.active_sprint().map(|s| s.start_date))
        .unwrap_or(as_of)
}

/// Fixed-start anchors as day offsets from `start`.
fn anchors(snapshot: &ProjectSnapshot, start: NaiveDate) -> HashMap<String, i64> {
    snapshot
        .tasks
        .iter()
        .filter_map(|t| {
            t.start_date
                .map(|date| (t.id.clone(), (date - start).num_days()))
        })
        .collect()
}

/// Velocity records for completed sprints, chronological. A record counts
/// the points of stories finished by sprint end; it is derived fresh from
/// the snapshot on every run rather than stored.
pub fn velocity_records(snapshot: &ProjectSnapshot) -> Vec<VelocityRecord> {
    snapshot
        .completed_sprints()
        .into_iter()
        .map(|sprint| {
            let completed: u32 = snapshot
                .sprint_stories(sprint)
                .iter()
                .filter(|s| {
                    s.completed_at
                        .map(|done| done <= sprint.end_date)
                        .unwrap_or(false)
                })
                .map(|s| s.story_points)
                .sum();
            VelocityRecord {
                sprint_id: sprint.id.clone(),
                story_points_completed: completed,
                duration_days: sprint.duration_days(),
            }
        })
        .collect()
}

fn active_burndown(
    snapshot: &ProjectSnapshot,
    config: &Config,
    as_of: NaiveDate,
) -> Result<Option<(BurndownSeries, i64)>> {
    let Some(sprint) = snapshot.active_sprint() else {
        return Ok(None);
    };
    let stories = snapshot.sprint_stories(sprint);
    let opts = BurndownOptions {
        project_future: config.analytics.project_future,
        as_of,
    };
    let series = compute_burndown(sprint, &stories, opts)?;
    let days_remaining = days_remaining(sprint, as_of);
    Ok(Some((series, days_remaining)))
}

fn days_remaining(sprint: &Sprint, as_of: NaiveDate) -> i64 {
    (sprint.end_date - as_of).num_days().max(0)
}

/// Run the full pipeline. All-or-nothing: structural or input errors abort
/// the report.
pub fn analyze(snapshot: &ProjectSnapshot, config: &Config, as_of: NaiveDate) -> Result<ProjectReport> {
    debug!(
        tasks = snapshot.tasks.len(),
        edges = snapshot.dependencies.len(),
        sprints = snapshot.sprints.len(),
        "building dependency graph"
    );
    let graph = DependencyGraph::build(&snapshot.tasks, &snapshot.dependencies)?;

    let start = schedule_start(snapshot, as_of);
    let durations = derive_durations(&snapshot.tasks, config);
    let anchors = anchors(snapshot, start);
    let schedule = compute_critical_path(&graph, &durations, &anchors)?;
    debug!(
        total_duration = schedule.total_duration,
        critical = schedule.critical_path.len(),
        "schedule computed"
    );

    let lag_unit = config.schedule.lag_unit;
    let task_dates = schedule
        .tasks
        .iter()
        .map(|t| TaskDates {
            task_id: t.task_id.clone(),
            start: date_at_offset(start, t.early_start, lag_unit),
            finish: date_at_offset(start, t.early_finish, lag_unit),
        })
        .collect();

    let burndown = active_burndown(snapshot, config, as_of)?;
    let velocity = compute_velocity(&velocity_records(snapshot), config.analytics.velocity_window);

    // Join point: health consumes the burndown and schedule results. With
    // no active sprint the clock inputs are neutral and only the schedule
    // and project status can degrade the signal.
    let inputs = match &burndown {
        Some((series, days_remaining)) => HealthInputs {
            burndown_deviation: series.deviation,
            days_remaining: *days_remaining,
            completion_ratio: series.completion_ratio,
            min_slack: schedule.min_slack(),
            project_status: snapshot.status,
        },
        None => HealthInputs {
            burndown_deviation: 0.0,
            days_remaining: 0,
            completion_ratio: 1.0,
            min_slack: schedule.min_slack(),
            project_status: snapshot.status,
        },
    };
    let health = HealthReport {
        status: derive_health(&inputs),
        inputs,
    };

    Ok(ProjectReport {
        project: snapshot.name.clone(),
        as_of,
        schedule,
        schedule_start: start,
        task_dates,
        burndown: burndown.map(|(series, _)| series),
        velocity,
        health,
    })
}
