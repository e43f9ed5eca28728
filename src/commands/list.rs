use anyhow::{Context, Result};
use std::path::Path;

use sprintgraph::model::TaskStatus;
use sprintgraph::parser::load_snapshot;

use super::snapshot_path;

pub fn run(dir: &Path, status_filter: Option<&str>, json: bool) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;

    let status_filter: Option<TaskStatus> = match status_filter {
        Some("todo") => Some(TaskStatus::Todo),
        Some("in-progress") => Some(TaskStatus::InProgress),
        Some("in-review") => Some(TaskStatus::InReview),
        Some("testing") => Some(TaskStatus::Testing),
        Some("completed") => Some(TaskStatus::Completed),
        Some("cancelled") => Some(TaskStatus::Cancelled),
        Some(s) => anyhow::bail!("Unknown status: {}", s),
        None => None,
    };

    let tasks: Vec<_> = snapshot
        .tasks
        .iter()
        .filter(|t| status_filter.map_or(true, |s| t.status == s))
        .collect();

    if json {
        let output: Vec<_> = tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "status": t.status,
                    "estimated_hours": t.estimated_hours,
                    "story_id": t.story_id,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if tasks.is_empty() {
        println!("No tasks found");
    } else {
        for task in tasks {
            let status = match task.status {
                TaskStatus::Todo => "[ ]",
                TaskStatus::InProgress => "[~]",
                TaskStatus::InReview => "[R]",
                TaskStatus::Testing => "[T]",
                TaskStatus::Completed => "[x]",
                TaskStatus::Cancelled => "[C]",
            };
            println!("{} {} - {}", status, task.id, task.title);
        }
    }

    Ok(())
}
