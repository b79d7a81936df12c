//! Load configuration, plan, and export artifacts in one pass.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use adr_config::{ConfigError, load_fleet, load_settings, load_targets};
use adr_export::{events, matrix, profiles, summary, writer_for_path};
use adr_transfer::vehicle::{VehicleError, fleet_from_configs};
use adr_transfer::{
    FitnessBreakdown, MissionError, MissionEvaluation, MissionPlan, MissionPlanner,
    MissionSettings, Target, TerminationReason, TransferError, Vehicle, VehicleRole,
    delta_v_matrix, settings, target,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::primitives::time::seconds_to_days;

pub const EVENTS_FILE: &str = "events.csv";
pub const PROFILES_FILE: &str = "raan_profiles.csv";
pub const MATRIX_FILE: &str = "delta_v_matrix.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Errors surfaced anywhere along the planning pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vehicle(#[from] VehicleError),
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error("delta-v matrix failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("failed to write artifact: {0}")]
    Io(#[from] io::Error),
}

/// Locations of the three input documents.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub targets: PathBuf,
    pub fleet: PathBuf,
    pub settings: PathBuf,
}

/// Parse and convert every input, optionally pinning the seed.
pub fn load_planner(
    paths: &InputPaths,
    seed: Option<u64>,
) -> Result<MissionPlanner, PipelineError> {
    let targets = target::catalog_from_configs(&load_targets(&paths.targets)?);
    let fleet = fleet_from_configs(&load_fleet(&paths.fleet)?)?;
    let mut settings: MissionSettings = settings::from_config(&load_settings(&paths.settings)?)?;
    if let Some(seed) = seed {
        settings.seed = seed;
    }
    Ok(MissionPlanner::new(targets, fleet, settings)?)
}

/// Timestamped default output directory under `root`.
pub fn default_output_dir(root: &Path) -> PathBuf {
    root.join(format!("plan-{}", Utc::now().format("%Y%m%dT%H%M%SZ")))
}

/// Files written by [`export_plan`].
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub events: PathBuf,
    pub profiles: PathBuf,
    pub matrix: PathBuf,
    pub summary: PathBuf,
}

/// Write the event log, RAAN profiles, delta-v matrix, and JSON summary under `dir`.
pub fn export_plan(
    planner: &MissionPlanner,
    plan: &MissionPlan,
    dir: &Path,
) -> Result<ExportedFiles, PipelineError> {
    let files = ExportedFiles {
        events: dir.join(EVENTS_FILE),
        profiles: dir.join(PROFILES_FILE),
        matrix: dir.join(MATRIX_FILE),
        summary: dir.join(SUMMARY_FILE),
    };

    let mut writer = writer_for_path(&files.events)?;
    write_events(&mut *writer, planner, &plan.best)?;
    writer.flush()?;

    let mut writer = writer_for_path(&files.profiles)?;
    write_profiles(&mut *writer, planner, &plan.best)?;
    writer.flush()?;

    let labels: Vec<&str> = planner.targets().iter().map(|t| t.id.as_str()).collect();
    let dv = delta_v_matrix(planner.targets())?;
    let mut writer = writer_for_path(&files.matrix)?;
    matrix::write_square(&mut *writer, "from\\to", &labels, &dv)?;
    writer.flush()?;

    summary::write_json(
        &files.summary,
        concat!("adr_planner ", env!("CARGO_PKG_VERSION")),
        &PlanSummary::new(planner, plan),
    )?;
    Ok(files)
}

/// Agents in reporting order: each vehicle followed by its deorbit modules.
fn agents(fleet: &[Vehicle]) -> Vec<(&str, &'static str)> {
    let mut agents = Vec::new();
    for vehicle in fleet {
        agents.push((vehicle.name(), vehicle.role.label()));
        if let VehicleRole::Mothership { modules, .. } = &vehicle.role {
            agents.extend(modules.iter().map(|m| (m.name.as_str(), "module")));
        }
    }
    agents
}

fn target_id(targets: &[Target], index: Option<usize>) -> &str {
    index
        .and_then(|i| targets.get(i))
        .map(|t| t.id.as_str())
        .unwrap_or("")
}

/// Event-log CSV of every agent that has a log.
pub fn write_events(
    writer: &mut dyn Write,
    planner: &MissionPlanner,
    evaluation: &MissionEvaluation,
) -> io::Result<()> {
    events::write_header(writer)?;
    let targets = planner.targets();
    for (agent, role) in agents(planner.fleet()) {
        let Some(log) = evaluation.result.logs.get(agent) else {
            continue;
        };
        for event in &log.events {
            let kind = serde_label(&event.kind);
            events::Record {
                agent,
                role,
                time_days: seconds_to_days(event.time_s),
                event: &kind,
                target: target_id(targets, event.target),
                captured: event.captured,
                released: event.released,
                score: event.score,
                propellant_kg: event.propellant_kg,
                delta_v_km_s: event.delta_v_km_s,
                wait_days: seconds_to_days(event.wait_s),
                refuels_remaining: event.refuels_remaining,
                a_km: event.orbit.a_km,
                inc_deg: event.orbit.inc_deg,
                raan_deg: event.orbit.raan_deg,
            }
            .write_to(writer)?;
        }
    }
    Ok(())
}

/// RAAN history CSV of every vehicle.
pub fn write_profiles(
    writer: &mut dyn Write,
    planner: &MissionPlanner,
    evaluation: &MissionEvaluation,
) -> io::Result<()> {
    profiles::write_header(writer)?;
    for vehicle in planner.fleet() {
        let Some(log) = evaluation.result.logs.get(vehicle.name()) else {
            continue;
        };
        for sample in &log.raan_profile {
            profiles::Record {
                agent: vehicle.name(),
                time_days: seconds_to_days(sample.time_s),
                raan_deg: sample.raan_deg,
            }
            .write_to(writer)?;
        }
    }
    Ok(())
}

fn serde_label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct VehicleSummary<'a> {
    name: &'a str,
    role: &'static str,
    used: bool,
    route: Vec<&'a str>,
    termination: Option<TerminationReason>,
    delta_v_km_s: f64,
    end_time_days: f64,
}

/// JSON summary of a planning run.
#[derive(Debug, Serialize)]
pub struct PlanSummary<'a> {
    fitness: f64,
    breakdown: FitnessBreakdown,
    risk_remediated: f64,
    catalog_risk: f64,
    serviced: Vec<&'a str>,
    skipped_targets: usize,
    degenerate_legs: usize,
    max_tof_days: f64,
    fleet_mass_used_kg: f64,
    refuel_mass_used_kg: f64,
    total_delta_v_km_s: f64,
    vehicles: Vec<VehicleSummary<'a>>,
    genome: &'a [usize],
    converged: bool,
    generations: usize,
    settings: &'a MissionSettings,
    optimizer: &'a adr_transfer::genetic::GaConfig,
}

impl<'a> PlanSummary<'a> {
    pub fn new(planner: &'a MissionPlanner, plan: &'a MissionPlan) -> Self {
        let targets = planner.targets();
        let best = &plan.best;
        let result = &best.result;
        let simulator = planner.simulator();
        let vehicles = planner
            .fleet()
            .iter()
            .enumerate()
            .map(|(i, vehicle)| {
                let log = result.logs.get(vehicle.name());
                VehicleSummary {
                    name: vehicle.name(),
                    role: vehicle.role.label(),
                    used: result.vehicle_used.get(i).copied().unwrap_or(false),
                    route: best
                        .routes
                        .route(i)
                        .iter()
                        .map(|&t| target_id(targets, Some(t)))
                        .collect(),
                    termination: log.and_then(|l| l.termination),
                    delta_v_km_s: log.map(|l| l.total_delta_v_km_s()).unwrap_or(0.0),
                    end_time_days: seconds_to_days(log.map(|l| l.end_time_s()).unwrap_or(0.0)),
                }
            })
            .collect();
        Self {
            fitness: best.fitness,
            breakdown: FitnessBreakdown::compute(simulator.scales(), result),
            risk_remediated: result.risk_remediated,
            catalog_risk: simulator.scales().max_risk,
            serviced: result
                .serviced_targets
                .iter()
                .map(|&t| target_id(targets, Some(t)))
                .collect(),
            skipped_targets: result.skipped_targets,
            degenerate_legs: result.degenerate_legs,
            max_tof_days: seconds_to_days(result.max_tof_s),
            fleet_mass_used_kg: result.fleet_mass_used_kg,
            refuel_mass_used_kg: result.refuel_mass_used_kg,
            total_delta_v_km_s: result.total_delta_v_km_s,
            vehicles,
            genome: &best.genome,
            converged: plan.converged,
            generations: plan.history.len().saturating_sub(1),
            settings: planner.settings(),
            optimizer: &plan.optimizer,
        }
    }
}
