pub mod burndown;
pub mod check;
pub mod health;
pub mod init;
pub mod list;
pub mod report;
pub mod schedule;
pub mod velocity;

use std::path::Path;

pub fn snapshot_path(dir: &Path) -> std::path::PathBuf {
    dir.join("project.json")
}
