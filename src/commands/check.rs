use anyhow::{Context, Result};
use std::path::Path;

use sprintgraph::error::EngineError;
use sprintgraph::graph::DependencyGraph;
use sprintgraph::parser::load_snapshot;

use super::snapshot_path;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let path = snapshot_path(dir);

    if !path.exists() {
        anyhow::bail!("Sprintgraph not initialized. Run 'sg init' first.");
    }

    let snapshot = load_snapshot(&path).context("Failed to load snapshot")?;

    match DependencyGraph::build(&snapshot.tasks, &snapshot.dependencies) {
        Ok(graph) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ok": true,
                        "tasks": graph.len(),
                        "edges": snapshot.dependencies.len(),
                    })
                );
            } else {
                println!(
                    "Graph OK: {} tasks, {} dependencies, no issues found",
                    graph.len(),
                    snapshot.dependencies.len()
                );
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let detail = match &err {
                    EngineError::CycleDetected { cycle } => serde_json::json!({
                        "ok": false, "error": "cycle_detected", "cycle": cycle,
                    }),
                    EngineError::SelfDependency { task_id } => serde_json::json!({
                        "ok": false, "error": "self_dependency", "task_id": task_id,
                    }),
                    EngineError::DanglingDependency { from, to } => serde_json::json!({
                        "ok": false, "error": "dangling_dependency", "from": from, "to": to,
                    }),
                    other => serde_json::json!({
                        "ok": false, "error": other.to_string(),
                    }),
                };
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                match &err {
                    EngineError::CycleDetected { cycle } => {
                        println!("Error: dependency cycle:");
                        println!("  {}", cycle.join(" -> "));
                    }
                    other => println!("Error: {}", other),
                }
            }
            anyhow::bail!("Structural check failed: {}", err)
        }
    }
}
