//! Plan a route around keep-out zones for a built-in or JSON scenario.

use anyhow::{bail, Context, Result};
use clap::Parser;
use detour_cli::{builtin_names, builtin_scenario, load_scenario, render, OutputFormat};
use detour_core::{ClearanceMargin, Navigator, PlannerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Keep-out zone avoidance route planner
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Built-in scenario name
    #[arg(long, default_value = "default", conflicts_with = "file")]
    scenario: String,

    /// Scenario JSON file
    #[arg(long)]
    file: Option<PathBuf>,

    /// List built-in scenarios and exit
    #[arg(long)]
    list: bool,

    /// Current vehicle heading in degrees (overrides the scenario)
    #[arg(long)]
    heading: Option<f64>,

    /// Waypoint spacing in kilometers
    #[arg(long)]
    step_size_km: Option<f64>,

    /// Replanning iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Maximum heading change per turning step in degrees
    #[arg(long)]
    max_turn_deg: Option<f64>,

    /// Flat clearance added to every zone radius in meters
    #[arg(long)]
    clearance_m: Option<f64>,

    /// Skip curve smoothing and only prune redundant waypoints
    #[arg(long)]
    no_smoothing: bool,

    /// Keep only every n-th waypoint (plus via points and the goal)
    #[arg(long)]
    keep_every_n: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Args {
    fn planner_config(&self) -> PlannerConfig {
        let defaults = PlannerConfig::default();
        PlannerConfig {
            step_size_km: self.step_size_km.unwrap_or(defaults.step_size_km),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            max_turn_angle_deg: self.max_turn_deg.unwrap_or(defaults.max_turn_angle_deg),
            clearance: self
                .clearance_m
                .map(|meters| ClearanceMargin::Fixed { meters })
                .unwrap_or(defaults.clearance),
            smoothing: !self.no_smoothing,
            keep_every_n: self.keep_every_n,
            ..defaults
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("detour_cli=info".parse()?))
        .init();

    let args = Args::parse();

    if args.list {
        for name in builtin_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut scenario = match &args.file {
        Some(path) => load_scenario(path)?,
        None => match builtin_scenario(&args.scenario) {
            Some(scenario) => scenario,
            None => bail!(
                "unknown scenario '{}' (known: {})",
                args.scenario,
                builtin_names().join(", ")
            ),
        },
    };
    if args.heading.is_some() {
        scenario.current_heading = args.heading;
    }

    let navigator = Navigator::new(
        scenario.zones.clone(),
        scenario.boundary.clone(),
        args.planner_config(),
    )
    .context("invalid planner settings")?;
    let route = navigator
        .navigate(&scenario.request())
        .with_context(|| format!("planning scenario '{}' failed", scenario.name))?;

    tracing::info!(
        scenario = %scenario.name,
        status = ?route.status,
        turn = ?route.turn,
        iterations = route.iterations,
        "Planned route"
    );
    if !route.status.is_success() {
        tracing::warn!("No clear route within the iteration budget; output is best-effort");
    }

    let rendered = render(args.format, &route, navigator.field())?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}
