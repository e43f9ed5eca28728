use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use sprintgraph::engine::analyze;
use sprintgraph::parser::load_snapshot;
use sprintgraph::Config;
use sprintgraph::HealthStatus;

use super::snapshot_path;

pub fn run(dir: &Path, as_of: NaiveDate, json: bool) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;
    let config = Config::load(dir).context("Failed to load config")?;

    let report = analyze(&snapshot, &config, as_of).context("Failed to derive health")?;
    let health = &report.health;

    if json {
        println!("{}", serde_json::to_string_pretty(health)?);
        return Ok(());
    }

    let label = match health.status {
        HealthStatus::Healthy => "HEALTHY",
        HealthStatus::Warning => "WARNING",
        HealthStatus::Critical => "CRITICAL",
    };
    println!("Project health: {}", label);
    println!("  days remaining:    {}", health.inputs.days_remaining);
    println!("  completion ratio:  {:.0}%", health.inputs.completion_ratio * 100.0);
    println!("  burndown deviation: {:+.1}", health.inputs.burndown_deviation);
    match health.inputs.min_slack {
        Some(slack) => println!("  min schedule slack: {}", slack),
        None => println!("  min schedule slack: n/a"),
    }

    Ok(())
}
