//! Snapshot data model.
//!
//! The engine consumes a read-only [`ProjectSnapshot`] assembled by the
//! caller (CRUD layer, import, fixture file) and never mutates it. Every
//! calculator returns fresh derived-value structs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    InReview,
    Testing,
    Completed,
    Cancelled,
}

/// A single work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    /// Effort estimate, converted to days via config (hours per day).
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Owning user story, if any.
    #[serde(default)]
    pub story_id: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: TaskStatus::Todo,
            estimated_hours: None,
            start_date: None,
            due_date: None,
            story_id: None,
        }
    }
}

/// The four CPM dependency relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

/// A typed, lagged dependency: `task_id` depends on `depends_on_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub task_id: String,
    pub depends_on_id: String,
    #[serde(default = "default_dep_type")]
    pub dep_type: DependencyType,
    /// Offset in days beyond the base relationship; negative = lead time.
    #[serde(default)]
    pub lag_days: i64,
}

fn default_dep_type() -> DependencyType {
    DependencyType::FinishToStart
}

impl DependencyEdge {
    pub fn new(task_id: impl Into<String>, depends_on_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            depends_on_id: depends_on_id.into(),
            dep_type: DependencyType::FinishToStart,
            lag_days: 0,
        }
    }

    pub fn with_type(mut self, dep_type: DependencyType) -> Self {
        self.dep_type = dep_type;
        self
    }

    pub fn with_lag(mut self, lag_days: i64) -> Self {
        self.lag_days = lag_days;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    Planning,
    Active,
    Completed,
    Cancelled,
}

/// A timeboxed iteration. Invariant: `end_date > start_date` (checked by the
/// burndown calculator, which is the first consumer of the range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SprintStatus,
    #[serde(default)]
    pub story_ids: Vec<String>,
}

impl Sprint {
    /// Whole days spanned by the sprint.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// A user story with a story-point estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub story_points: u32,
    #[serde(default)]
    pub sprint_id: Option<String>,
    /// Date the story was completed, if it has been.
    #[serde(default)]
    pub completed_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
    Cancelled,
}

/// One completed sprint's contribution to velocity. Immutable once the
/// sprint transitions to Completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityRecord {
    pub sprint_id: String,
    pub story_points_completed: u32,
    pub duration_days: i64,
}

/// Full read-only input to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
    #[serde(default)]
    pub stories: Vec<UserStory>,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

impl ProjectSnapshot {
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_sprint(&self, id: &str) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.id == id)
    }

    /// The active sprint. Usually there is exactly one; if the CRUD layer
    /// let several overlap, the most recently started wins.
    pub fn active_sprint(&self) -> Option<&Sprint> {
        self.sprints
            .iter()
            .filter(|s| s.status == SprintStatus::Active)
            .max_by_key(|s| s.start_date)
    }

    /// Completed sprints in chronological (start date) order.
    pub fn completed_sprints(&self) -> Vec<&Sprint> {
        let mut done: Vec<&Sprint> = self
            .sprints
            .iter()
            .filter(|s| s.status == SprintStatus::Completed)
            .collect();
        done.sort_by_key(|s| s.start_date);
        done
    }

    /// Stories assigned to a sprint.
    pub fn sprint_stories(&self, sprint: &Sprint) -> Vec<&UserStory> {
        self.stories
            .iter()
            .filter(|st| {
                st.sprint_id.as_deref() == Some(sprint.id.as_str())
                    || sprint.story_ids.iter().any(|id| id == &st.id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sprint_duration_days() {
        let sprint = Sprint {
            id: "s1".to_string(),
            name: "Sprint 1".to_string(),
            start_date: date(2025, 3, 3),
            end_date: date(2025, 3, 17),
            status: SprintStatus::Active,
            story_ids: vec![],
        };
        assert_eq!(sprint.duration_days(), 14);
    }

    #[test]
    fn test_active_sprint_picks_latest_start() {
        let mut snapshot = ProjectSnapshot::default();
        for (id, start) in [("s1", date(2025, 1, 6)), ("s2", date(2025, 1, 20))] {
            snapshot.sprints.push(Sprint {
                id: id.to_string(),
                name: id.to_string(),
                start_date: start,
                end_date: start + chrono::Duration::days(14),
                status: SprintStatus::Active,
                story_ids: vec![],
            });
        }
        assert_eq!(snapshot.active_sprint().unwrap().id, "s2");
    }

    #[test]
    fn test_completed_sprints_chronological() {
        let mut snapshot = ProjectSnapshot::default();
        for (id, start) in [("late", date(2025, 2, 3)), ("early", date(2025, 1, 6))] {
            snapshot.sprints.push(Sprint {
                id: id.to_string(),
                name: id.to_string(),
                start_date: start,
                end_date: start + chrono::Duration::days(14),
                status: SprintStatus::Completed,
                story_ids: vec![],
            });
        }
        let done = snapshot.completed_sprints();
        assert_eq!(done[0].id, "early");
        assert_eq!(done[1].id, "late");
    }

    #[test]
    fn test_sprint_stories_matches_either_link_direction() {
        let mut snapshot = ProjectSnapshot::default();
        let sprint = Sprint {
            id: "s1".to_string(),
            name: "Sprint 1".to_string(),
            start_date: date(2025, 1, 6),
            end_date: date(2025, 1, 20),
            status: SprintStatus::Active,
            story_ids: vec!["by-list".to_string()],
        };
        snapshot.stories.push(UserStory {
            id: "by-field".to_string(),
            title: "linked via sprint_id".to_string(),
            story_points: 3,
            sprint_id: Some("s1".to_string()),
            completed_at: None,
        });
        snapshot.stories.push(UserStory {
            id: "by-list".to_string(),
            title: "linked via story_ids".to_string(),
            story_points: 5,
            sprint_id: None,
            completed_at: None,
        });
        snapshot.stories.push(UserStory {
            id: "unlinked".to_string(),
            title: "elsewhere".to_string(),
            story_points: 8,
            sprint_id: None,
            completed_at: None,
        });
        let stories = snapshot.sprint_stories(&sprint);
        assert_eq!(stories.len(), 2);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut snapshot = ProjectSnapshot {
            name: "demo".to_string(),
            ..Default::default()
        };
        let mut task = Task::new("t1", "Build API");
        task.estimated_hours = Some(16.0);
        snapshot.tasks.push(task);
        snapshot.dependencies.push(
            DependencyEdge::new("t1", "t0")
                .with_type(DependencyType::StartToStart)
                .with_lag(-2),
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ProjectSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.dependencies[0].lag_days, -2);
    }
}
