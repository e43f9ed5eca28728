use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use sprintgraph::engine::analyze;
use sprintgraph::parser::load_snapshot;
use sprintgraph::Config;

use super::snapshot_path;

pub fn run(dir: &Path, as_of: NaiveDate, json: bool) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;
    let config = Config::load(dir).context("Failed to load config")?;

    let report = analyze(&snapshot, &config, as_of).context("Failed to compute schedule")?;
    let schedule = &report.schedule;

    if json {
        let output = serde_json::json!({
            "schedule_start": report.schedule_start,
            "total_duration": schedule.total_duration,
            "critical_path": schedule.critical_path,
            "tasks": schedule.tasks,
            "dates": report.task_dates,
            "diagnostics": schedule.diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if schedule.tasks.is_empty() {
        println!("No tasks to schedule");
        return Ok(());
    }

    println!("{:<16} {:>4} {:>4} {:>4} {:>4} {:>4} {:>6}", "task", "dur", "ES", "EF", "LS", "LF", "slack");
    for t in &schedule.tasks {
        println!(
            "{:<16} {:>4} {:>4} {:>4} {:>4} {:>4} {:>6}",
            t.task_id, t.duration, t.early_start, t.early_finish, t.late_start, t.late_finish, t.slack
        );
    }
    println!();
    println!("Total duration: {} days (from {})", schedule.total_duration, report.schedule_start);
    println!("Critical path: {}", schedule.critical_path.join(" -> "));
    for diag in &schedule.diagnostics {
        println!("Warning: {}", diag);
    }

    Ok(())
}
