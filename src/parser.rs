//! Snapshot load/save.
//!
//! The snapshot lives in `.sprintgraph/project.json` as one JSON document.
//! How the data got there (REST export, DB dump, hand-written fixture) is
//! the caller's concern; the engine only ever reads it.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::model::ProjectSnapshot;

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<ProjectSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(ProjectSnapshot::default());
    }
    let snapshot: ProjectSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(snapshot)
}

/// Save a snapshot as pretty-printed JSON.
pub fn save_snapshot(snapshot: &ProjectSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
