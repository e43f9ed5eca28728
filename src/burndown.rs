//! Burndown trajectory calculator.
//!
//! Produces the ideal (linear) and real (observed) remaining-story-points
//! series for a sprint. "Today" is always an explicit `as_of` parameter so
//! the calculation stays deterministic; the engine never reads an ambient
//! clock.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::model::{Sprint, UserStory};

/// Options for burndown computation.
#[derive(Debug, Clone, Copy)]
pub struct BurndownOptions {
    /// Extend the real series past `as_of` flat at the last known value.
    /// Default false: no forward guessing, the real series just stops.
    pub project_future: bool,
    /// The date the series is computed "as of".
    pub as_of: NaiveDate,
}

impl BurndownOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            project_future: false,
            as_of,
        }
    }
}

/// Ideal vs. real burndown for one sprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurndownSeries {
    pub sprint_id: String,
    pub total_points: u32,
    pub total_days: i64,
    /// Linear target, indexed by day offset 0..=total_days.
    pub ideal: Vec<f64>,
    /// Observed remaining points. Runs to `as_of` for an in-progress sprint
    /// (or the whole range with `project_future`), so it may be shorter than
    /// `ideal`.
    pub real: Vec<f64>,
    /// `real[today] - ideal[today]`; positive = behind schedule.
    pub deviation: f64,
    /// Share of committed points completed as of `as_of`. 1.0 for an empty
    /// sprint (nothing to do is not penalized).
    pub completion_ratio: f64,
    /// Day offset used as "today", clamped into the sprint range.
    pub as_of_day: i64,
}

impl BurndownSeries {
    /// Remaining points as of the observation day.
    pub fn remaining_points(&self) -> f64 {
        self.real.last().copied().unwrap_or(self.total_points as f64)
    }
}

/// Compute ideal and real burndown for `sprint` over its assigned stories.
pub fn compute_burndown(
    sprint: &Sprint,
    stories: &[&UserStory],
    opts: BurndownOptions,
) -> Result<BurndownSeries> {
    let total_days = (sprint.end_date - sprint.start_date).num_days();
    if total_days < 1 {
        return Err(EngineError::InvalidSprintRange {
            sprint_id: sprint.id.clone(),
            start: sprint.start_date,
            end: sprint.end_date,
        });
    }

    let total_points: u32 = stories.iter().map(|s| s.story_points).sum();
    let total = total_points as f64;

    let ideal: Vec<f64> = (0..=total_days)
        .map(|d| total * (1.0 - d as f64 / total_days as f64))
        .collect();

    let as_of_day = (opts.as_of - sprint.start_date).num_days().clamp(0, total_days);
    let observed_through = if opts.project_future { total_days } else { as_of_day };

    let mut real = Vec::with_capacity(observed_through as usize + 1);
    for d in 0..=observed_through {
        // Never observe past as_of; projection holds the last value flat.
        let day = d.min(as_of_day);
        let date = sprint.start_date + chrono::Duration::days(day);
        let completed: u32 = stories
            .iter()
            .filter(|s| s.completed_at.map(|done| done <= date).unwrap_or(false))
            .map(|s| s.story_points)
            .sum();
        real.push(total - completed as f64);
    }

    let real_today = real[as_of_day as usize];
    let deviation = real_today - ideal[as_of_day as usize];
    let completion_ratio = if total_points > 0 {
        1.0 - real_today / total
    } else {
        1.0
    };

    Ok(BurndownSeries {
        sprint_id: sprint.id.clone(),
        total_points,
        total_days,
        ideal,
        real,
        deviation,
        completion_ratio,
        as_of_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SprintStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_sprint(days: i64) -> Sprint {
        Sprint {
            id: "s1".to_string(),
            name: "Sprint 1".to_string(),
            start_date: date(2025, 6, 2),
            end_date: date(2025, 6, 2) + chrono::Duration::days(days),
            status: SprintStatus::Active,
            story_ids: vec![],
        }
    }

    fn story(id: &str, points: u32, completed: Option<NaiveDate>) -> UserStory {
        UserStory {
            id: id.to_string(),
            title: id.to_string(),
            story_points: points,
            sprint_id: Some("s1".to_string()),
            completed_at: completed,
        }
    }

    #[test]
    fn test_ideal_endpoints() {
        let sprint = make_sprint(10);
        let stories = [story("a", 12, None), story("b", 8, None)];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(sprint.end_date)).unwrap();
        assert_eq!(series.ideal[0], 20.0);
        assert_eq!(series.ideal[10], 0.0);
        assert_eq!(series.ideal.len(), 11);
    }

    #[test]
    fn test_no_completions_keeps_real_flat() {
        let sprint = make_sprint(5);
        let stories = [story("a", 10, None)];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(sprint.end_date)).unwrap();
        assert_eq!(series.real.len(), 6);
        assert!(series.real.iter().all(|&r| r == 10.0));
    }

    #[test]
    fn test_real_drops_on_completion_dates() {
        let sprint = make_sprint(4);
        let stories = [
            story("a", 5, Some(date(2025, 6, 3))), // day 1
            story("b", 3, Some(date(2025, 6, 5))), // day 3
            story("c", 2, None),
        ];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(sprint.end_date)).unwrap();
        assert_eq!(series.real, vec![10.0, 5.0, 5.0, 2.0, 2.0]);
    }

    #[test]
    fn test_in_progress_sprint_stops_at_as_of() {
        let sprint = make_sprint(10);
        let stories = [story("a", 10, Some(date(2025, 6, 3)))];
        let refs: Vec<&UserStory> = stories.iter().collect();
        // Two days in.
        let opts = BurndownOptions::new(date(2025, 6, 4));
        let series = compute_burndown(&sprint, &refs, opts).unwrap();
        assert_eq!(series.real.len(), 3);
        assert_eq!(series.ideal.len(), 11);
    }

    #[test]
    fn test_project_future_extends_flat() {
        let sprint = make_sprint(10);
        let stories = [story("a", 6, Some(date(2025, 6, 3))), story("b", 4, None)];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let opts = BurndownOptions {
            project_future: true,
            as_of: date(2025, 6, 4),
        };
        let series = compute_burndown(&sprint, &refs, opts).unwrap();
        assert_eq!(series.real.len(), 11);
        // Last known value (4 remaining) carried forward.
        assert_eq!(series.real[2], 4.0);
        assert_eq!(series.real[10], 4.0);
    }

    #[test]
    fn test_deviation_behind_schedule_is_positive() {
        let sprint = make_sprint(10);
        let stories = [story("a", 10, None)];
        let refs: Vec<&UserStory> = stories.iter().collect();
        // Halfway through, nothing done: ideal says 5 left, real says 10.
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(date(2025, 6, 7))).unwrap();
        assert_eq!(series.deviation, 5.0);
        assert_eq!(series.completion_ratio, 0.0);
    }

    #[test]
    fn test_deviation_ahead_of_schedule_is_negative() {
        let sprint = make_sprint(10);
        let stories = [story("a", 10, Some(date(2025, 6, 3)))];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(date(2025, 6, 4))).unwrap();
        // ideal[2] = 8, real[2] = 0.
        assert_eq!(series.deviation, -8.0);
        assert_eq!(series.completion_ratio, 1.0);
    }

    #[test]
    fn test_empty_sprint_is_complete_by_default() {
        let sprint = make_sprint(5);
        let series =
            compute_burndown(&sprint, &[], BurndownOptions::new(sprint.start_date)).unwrap();
        assert_eq!(series.total_points, 0);
        assert_eq!(series.completion_ratio, 1.0);
        assert_eq!(series.deviation, 0.0);
    }

    #[test]
    fn test_as_of_before_sprint_clamps_to_day_zero() {
        let sprint = make_sprint(5);
        let stories = [story("a", 5, None)];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(date(2025, 5, 1))).unwrap();
        assert_eq!(series.as_of_day, 0);
        assert_eq!(series.deviation, 0.0);
    }

    #[test]
    fn test_zero_length_sprint_rejected() {
        let mut sprint = make_sprint(5);
        sprint.end_date = sprint.start_date;
        let err =
            compute_burndown(&sprint, &[], BurndownOptions::new(sprint.start_date)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSprintRange { .. }));
    }

    #[test]
    fn test_completion_before_sprint_counts_from_day_zero() {
        let sprint = make_sprint(5);
        let stories = [story("a", 4, Some(date(2025, 5, 30))), story("b", 6, None)];
        let refs: Vec<&UserStory> = stories.iter().collect();
        let series =
            compute_burndown(&sprint, &refs, BurndownOptions::new(sprint.end_date)).unwrap();
        assert_eq!(series.real[0], 6.0);
    }
}
