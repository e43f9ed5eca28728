use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use sprintgraph::model::ProjectSnapshot;
use sprintgraph::parser::save_snapshot;
use sprintgraph::Config;

use super::snapshot_path;

pub fn run(dir: &Path) -> Result<()> {
    if dir.exists() {
        anyhow::bail!("Sprintgraph already initialized at {}", dir.display());
    }

    fs::create_dir_all(dir).context("Failed to create sprintgraph directory")?;

    let path = snapshot_path(dir);
    save_snapshot(&ProjectSnapshot::default(), &path).context("Failed to create project.json")?;
    Config::init(dir).context("Failed to create config.toml")?;

    println!("Initialized sprintgraph at {}", dir.display());
    Ok(())
}
