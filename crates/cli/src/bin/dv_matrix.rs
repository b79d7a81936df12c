use std::io::Write;
use std::path::PathBuf;

use adr_planner::config::load_targets;
use adr_planner::export::{matrix, writer_for_path};
use adr_planner::transfer::{delta_v_matrix, target};
use clap::Parser;

/// Tabulate the low-thrust delta-v between every ordered pair of catalog targets.
#[derive(Parser, Debug)]
#[command(author, version, about = "Edelbaum delta-v matrix (CSV) for a target catalog")]
struct Cli {
    /// Target catalog (YAML list, TOML file, or directory of TOML files)
    #[arg(long, default_value = "configs/targets.yaml")]
    targets: PathBuf,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let targets = target::catalog_from_configs(&load_targets(&cli.targets)?);
    if targets.is_empty() {
        anyhow::bail!("target catalog '{}' is empty", cli.targets.display());
    }
    let values = delta_v_matrix(&targets)?;
    let labels: Vec<&str> = targets.iter().map(|t| t.id.as_str()).collect();

    let mut writer = writer_for_path(&cli.output)?;
    matrix::write_square(&mut *writer, "from\\to", &labels, &values)?;
    writer.flush()?;
    Ok(())
}
