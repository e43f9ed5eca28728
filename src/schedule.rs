//! Critical path calculator (CPM).
//!
//! Two passes over the topological order of the dependency graph: a forward
//! pass computing earliest start/finish per task and a backward pass
//! computing latest start/finish, from which slack falls out. All four
//! dependency relationship kinds contribute constraints, each shifted by the
//! edge's lag (negative lag = lead time).
//!
//! All-or-nothing: a structural or input error yields no partial schedule.
//! Inconsistencies that are computable but suspect (negative slack) are
//! reported as diagnostics on the result instead.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::graph::DependencyGraph;
use crate::model::DependencyType;

/// Schedule values for one task, in day offsets from project start.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TaskSchedule {
    pub task_id: String,
    pub duration: i64,
    pub early_start: i64,
    pub early_finish: i64,
    pub late_start: i64,
    pub late_finish: i64,
    /// `late_start - early_start`; 0 on the critical path.
    pub slack: i64,
}

/// Full CPM output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleResult {
    /// One entry per task, in topological order.
    pub tasks: Vec<TaskSchedule>,
    /// Zero-slack tasks in execution order (early_start, then id).
    pub critical_path: Vec<String>,
    /// Max early finish across tasks with no dependents.
    pub total_duration: i64,
    /// Non-fatal inconsistencies, e.g. negative slack.
    pub diagnostics: Vec<String>,
}

impl ScheduleResult {
    pub fn get(&self, task_id: &str) -> Option<&TaskSchedule> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// Smallest slack among critical-and-near-critical tasks; feeds the
    /// health deriver. None for an empty schedule.
    pub fn min_slack(&self) -> Option<i64> {
        self.tasks.iter().map(|t| t.slack).min()
    }
}

/// Compute the CPM schedule.
///
/// `durations` maps task id to non-negative whole days; `anchors` maps task
/// id to a fixed earliest-start day offset (from a fixed `start_date`).
/// Tasks absent from `durations` get duration 0 plus a diagnostic.
pub fn compute_critical_path(
    graph: &DependencyGraph,
    durations: &HashMap<String, i64>,
    anchors: &HashMap<String, i64>,
) -> Result<ScheduleResult> {
    for (task_id, days) in durations {
        if *days < 0 {
            return Err(EngineError::NegativeDuration {
                task_id: task_id.clone(),
                days: *days,
            });
        }
    }

    let order = graph.topological_order();
    let mut diagnostics = Vec::new();

    let duration_of = |id: &str| durations.get(id).copied().unwrap_or(0);
    for id in graph.task_ids() {
        if !durations.contains_key(id) {
            diagnostics.push(format!("task '{id}' has no duration source, assuming 0 days"));
        }
    }

    // Forward pass: earliest times.
    let mut early: HashMap<&str, (i64, i64)> = HashMap::new(); // id -> (es, ef)
    for id in &order {
        let dur = duration_of(id);
        let mut es = anchors.get(id.as_str()).copied().unwrap_or(0);
        for edge in graph.dependencies_of(id) {
            let (pred_es, pred_ef) = early[edge.depends_on_id.as_str()];
            let bound = match edge.dep_type {
                DependencyType::FinishToStart => pred_ef + edge.lag_days,
                DependencyType::StartToStart => pred_es + edge.lag_days,
                // Finish-side constraints solved for the start.
                DependencyType::FinishToFinish => pred_ef + edge.lag_days - dur,
                DependencyType::StartToFinish => pred_es + edge.lag_days - dur,
            };
            es = es.max(bound);
        }
        // A task cannot start before the project does, even with lead time.
        es = es.max(0);
        early.insert(id.as_str(), (es, es + dur));
    }

    let total_duration = graph
        .sinks()
        .iter()
        .map(|id| early[id].1)
        .max()
        .unwrap_or(0);

    // Backward pass: latest times, mirroring each constraint onto the
    // predecessor side.
    let mut late: HashMap<&str, (i64, i64)> = HashMap::new(); // id -> (ls, lf)
    for id in order.iter().rev() {
        let dur = duration_of(id);
        let mut lf = total_duration;
        for succ_id in graph.dependents_of(id) {
            let (succ_ls, succ_lf) = late[succ_id.as_str()];
            for edge in graph.dependencies_of(succ_id) {
                if edge.depends_on_id != *id {
                    continue;
                }
                let bound = match edge.dep_type {
                    DependencyType::FinishToStart => succ_ls - edge.lag_days,
                    DependencyType::StartToStart => succ_ls - edge.lag_days + dur,
                    DependencyType::FinishToFinish => succ_lf - edge.lag_days,
                    DependencyType::StartToFinish => succ_lf - edge.lag_days + dur,
                };
                lf = lf.min(bound);
            }
        }
        late.insert(id.as_str(), (lf - dur, lf));
    }

    let mut tasks = Vec::with_capacity(order.len());
    for id in &order {
        let (es, ef) = early[id.as_str()];
        let (ls, lf) = late[id.as_str()];
        let slack = ls - es;
        if slack < 0 {
            diagnostics.push(format!(
                "task '{id}' has negative slack ({slack}): schedule is inconsistent"
            ));
        }
        tasks.push(TaskSchedule {
            task_id: id.clone(),
            duration: duration_of(id),
            early_start: es,
            early_finish: ef,
            late_start: ls,
            late_finish: lf,
            slack,
        });
    }

    let mut critical: Vec<&TaskSchedule> = tasks.iter().filter(|t| t.slack == 0).collect();
    critical.sort_by(|a, b| {
        a.early_start
            .cmp(&b.early_start)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });
    let critical_path = critical.into_iter().map(|t| t.task_id.clone()).collect();

    Ok(ScheduleResult {
        tasks,
        critical_path,
        total_duration,
        diagnostics,
    })
}
