mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sg",
    about = "Sprint & release scheduling analytics: critical path, burndown, velocity, health",
    version
)]
struct Args {
    /// Sprintgraph data directory
    #[arg(long, global = true, default_value = ".sprintgraph")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize an empty snapshot and default config
    Init,
    /// Validate the dependency graph (cycles, self-deps, dangling edges)
    Check {
        #[arg(long)]
        json: bool,
    },
    /// Compute the critical-path schedule
    Schedule {
        /// Analysis date (defaults to today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Ideal vs. real burndown for a sprint
    Burndown {
        /// Sprint id (defaults to the active sprint)
        #[arg(long)]
        sprint: Option<String>,
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,
        /// Extend the real series past as-of, flat at the last value
        #[arg(long)]
        project_future: bool,
        #[arg(long)]
        json: bool,
    },
    /// Velocity history, average, and forecast
    Velocity {
        /// Average over the most recent N sprints
        #[arg(long)]
        window: Option<usize>,
        /// Forecast sprints needed for this many remaining points
        #[arg(long)]
        remaining: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Tri-state project health signal
    Health {
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Full joined report
    Report {
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// List tasks in the snapshot
    List {
        /// Filter: todo, in-progress, in-review, testing, completed, cancelled
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let dir = args.dir.as_path();

    match args.command {
        Command::Init => commands::init::run(dir),
        Command::Check { json } => commands::check::run(dir, json),
        Command::Schedule { as_of, json } => {
            commands::schedule::run(dir, as_of.unwrap_or_else(today), json)
        }
        Command::Burndown {
            sprint,
            as_of,
            project_future,
            json,
        } => commands::burndown::run(
            dir,
            sprint.as_deref(),
            as_of.unwrap_or_else(today),
            project_future,
            json,
        ),
        Command::Velocity {
            window,
            remaining,
            json,
        } => commands::velocity::run(dir, window, remaining, json),
        Command::Health { as_of, json } => {
            commands::health::run(dir, as_of.unwrap_or_else(today), json)
        }
        Command::Report { as_of, json } => {
            commands::report::run(dir, as_of.unwrap_or_else(today), json)
        }
        Command::List { status, json } => commands::list::run(dir, status.as_deref(), json),
    }
}
