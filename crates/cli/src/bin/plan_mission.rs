use std::path::PathBuf;

use adr_planner::pipeline::{self, InputPaths};
use adr_planner::primitives::time::seconds_to_days;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plan a multi-vehicle debris servicing campaign and export its artifacts.
#[derive(Parser, Debug)]
#[command(author, version, about = "Debris servicing mission planner (genetic route search)")]
struct Cli {
    /// Target catalog (YAML list, TOML file, or directory of TOML files)
    #[arg(long, default_value = "configs/targets.yaml")]
    targets: PathBuf,

    /// Fleet catalog (YAML list, TOML file, or directory of TOML files)
    #[arg(long, default_value = "configs/fleet")]
    fleet: PathBuf,

    /// Planner settings (TOML or YAML)
    #[arg(long, default_value = "configs/settings.toml")]
    settings: PathBuf,

    /// Output directory (defaults to a timestamped folder under artifacts/)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the random seed from the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Log progress at debug level (RUST_LOG takes precedence)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = InputPaths {
        targets: cli.targets,
        fleet: cli.fleet,
        settings: cli.settings,
    };
    let planner = pipeline::load_planner(&paths, cli.seed)?;
    info!(
        targets = planner.targets().len(),
        vehicles = planner.fleet().len(),
        seed = planner.settings().seed,
        "inputs loaded"
    );

    let plan = planner.plan()?;
    let output = cli
        .output
        .unwrap_or_else(|| pipeline::default_output_dir(&PathBuf::from("artifacts")));
    let files = pipeline::export_plan(&planner, &plan, &output)?;

    let best = &plan.best;
    let result = &best.result;
    let catalog_risk: f64 = planner.targets().iter().map(|t| t.risk_score).sum();
    println!("=== Mission Plan ===");
    println!("Seed           : {}", planner.settings().seed);
    println!(
        "Fitness        : {:.6} ({} generations, converged = {})",
        best.fitness,
        plan.history.len().saturating_sub(1),
        plan.converged
    );
    println!(
        "Risk remediated: {:.3} of {:.3} ({} of {} targets)",
        result.risk_remediated,
        catalog_risk,
        result.serviced_targets.len(),
        planner.targets().len()
    );
    println!(
        "Duration       : {:.2} days (longest vehicle)",
        seconds_to_days(result.max_tof_s)
    );
    println!(
        "Mass           : fleet used = {:.1} kg, refuel propellant = {:.1} kg",
        result.fleet_mass_used_kg, result.refuel_mass_used_kg
    );
    for (index, vehicle) in planner.fleet().iter().enumerate() {
        let route: Vec<&str> = best
            .routes
            .route(index)
            .iter()
            .filter_map(|&t| planner.targets().get(t).map(|t| t.id.as_str()))
            .collect();
        println!(
            "  {:<16} {:<10} route = [{}]",
            vehicle.name(),
            vehicle.role.label(),
            route.join(", ")
        );
    }
    println!("Artifacts      : {}", output.display());
    info!(summary = %files.summary.display(), "artifacts written");
    Ok(())
}
