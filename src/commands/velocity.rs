use anyhow::{Context, Result};
use std::path::Path;

use sprintgraph::engine::velocity_records;
use sprintgraph::parser::load_snapshot;
use sprintgraph::velocity::compute_velocity;
use sprintgraph::Config;

use super::snapshot_path;

pub fn run(dir: &Path, window: Option<usize>, remaining: Option<f64>, json: bool) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;
    let config = Config::load(dir).context("Failed to load config")?;

    let records = velocity_records(&snapshot);
    let summary = compute_velocity(&records, window.or(config.analytics.velocity_window));
    let forecast = remaining.map(|points| (points, summary.forecast_sprints_to_complete(points)));

    if json {
        let output = serde_json::json!({
            "velocities": summary.velocities,
            "average_velocity": summary.average_velocity,
            "window": summary.window,
            "forecast": forecast.map(|(points, sprints)| serde_json::json!({
                "remaining_points": points,
                "sprints_to_complete": sprints,
            })),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if summary.velocities.is_empty() {
        println!("No completed sprints; velocity undefined");
        return Ok(());
    }

    println!("Velocity history:");
    for record in &summary.velocities {
        println!(
            "  {} - {} points / {} days",
            record.sprint_id, record.story_points_completed, record.duration_days
        );
    }
    match summary.average_velocity {
        Some(avg) => println!("Average over last {} sprint(s): {:.1} points", summary.window, avg),
        None => println!("Velocity undefined"),
    }
    if let Some((points, sprints)) = forecast {
        match sprints {
            Some(n) => println!("Forecast: {} sprint(s) to burn {:.0} remaining points", n, points),
            None => println!("Forecast unavailable: velocity undefined or zero"),
        }
    }

    Ok(())
}
