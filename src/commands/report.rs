use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use sprintgraph::engine::analyze;
use sprintgraph::parser::load_snapshot;
use sprintgraph::Config;

use super::snapshot_path;

/// Full joined report; JSON is the primary consumer format (dashboards).
pub fn run(dir: &Path, as_of: NaiveDate, json: bool) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;
    let config = Config::load(dir).context("Failed to load config")?;

    let report = analyze(&snapshot, &config, as_of).context("Failed to analyze project")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Project: {} (as of {})", report.project, report.as_of);
    println!(
        "Schedule: {} days total, critical path {}",
        report.schedule.total_duration,
        report.schedule.critical_path.join(" -> ")
    );
    match &report.burndown {
        Some(series) => println!(
            "Burndown: sprint '{}', {:.1} of {} points remaining, deviation {:+.1}",
            series.sprint_id,
            series.remaining_points(),
            series.total_points,
            series.deviation
        ),
        None => println!("Burndown: no active sprint"),
    }
    match report.velocity.average_velocity {
        Some(avg) => println!("Velocity: {:.1} points/sprint over {} sprint(s)", avg, report.velocity.window),
        None => println!("Velocity: undefined (no completed sprints)"),
    }
    println!("Health: {:?}", report.health.status);
    for diag in &report.schedule.diagnostics {
        println!("Warning: {}", diag);
    }

    Ok(())
}
