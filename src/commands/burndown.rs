use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use sprintgraph::burndown::{compute_burndown, BurndownOptions};
use sprintgraph::parser::load_snapshot;
use sprintgraph::Config;

use super::snapshot_path;

pub fn run(
    dir: &Path,
    sprint_id: Option<&str>,
    as_of: NaiveDate,
    project_future: bool,
    json: bool,
) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;
    let config = Config::load(dir).context("Failed to load config")?;

    let sprint = match sprint_id {
        Some(id) => snapshot
            .get_sprint(id)
            .ok_or_else(|| anyhow::anyhow!("Sprint '{}' not found", id))?,
        None => snapshot
            .active_sprint()
            .ok_or_else(|| anyhow::anyhow!("No active sprint; pass --sprint ID"))?,
    };

    let stories = snapshot.sprint_stories(sprint);
    let opts = BurndownOptions {
        project_future: project_future || config.analytics.project_future,
        as_of,
    };
    let series = compute_burndown(sprint, &stories, opts).context("Failed to compute burndown")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!("Burndown for '{}' ({} points over {} days)", sprint.name, series.total_points, series.total_days);
    println!("{:<5} {:>8} {:>8}", "day", "ideal", "real");
    for d in 0..=series.total_days as usize {
        let real = series
            .real
            .get(d)
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<5} {:>8.1} {:>8}", d, series.ideal[d], real);
    }
    println!();
    let trend = if series.deviation > 0.0 {
        "behind schedule"
    } else if series.deviation < 0.0 {
        "ahead of schedule"
    } else {
        "on track"
    };
    println!(
        "As of day {}: deviation {:+.1} points ({}), {:.0}% complete",
        series.as_of_day,
        series.deviation,
        trend,
        series.completion_ratio * 100.0
    );

    Ok(())
}
