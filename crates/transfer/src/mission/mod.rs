//! Mission planning orchestrator: validates inputs, runs the genetic search over route
//! genomes, and re-simulates the winner with full logging.

pub mod fitness;
pub mod log;
pub mod simulate;
mod state;

use std::collections::BTreeSet;

use adr_genetic::{GaConfig, GaOverrides, GenerationStats, GeneticError, GeneticOptimizer};
use adr_propulsion::{Vehicle, VehicleRole};
use adr_routing::{RoutePlan, RoutingError};
use serde::Serialize;
use tracing::info;

use self::fitness::FitnessWeights;
use self::simulate::{MissionResult, MissionSimulator};
use crate::catalog::Target;

/// Top-level mission planning error.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("target catalog is empty")]
    EmptyCatalog,
    #[error("fleet is empty")]
    EmptyFleet,
    #[error("agent name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("expected 4 fitness weights (risk, time, mass, ownership), got {0}")]
    WeightArity(usize),
    #[error("setting '{name}' has invalid value {value}")]
    InvalidSetting { name: &'static str, value: f64 },
    #[error("target '{id}' is invalid: {reason}")]
    InvalidTarget { id: String, reason: &'static str },
    #[error("vehicle '{name}' is invalid: {reason}")]
    InvalidVehicle { name: String, reason: &'static str },
    #[error("genome has length {actual}, expected {expected}")]
    GenomeLength { expected: usize, actual: usize },
    #[error("route decoding failed: {0}")]
    Routing(#[from] RoutingError),
    #[error("optimizer configuration rejected: {0}")]
    Optimizer(#[from] GeneticError),
}

/// Scalar settings of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionSettings {
    pub weights: FitnessWeights,
    /// Mission time horizon (years).
    pub year_limit: f64,
    /// Standard-deviation multiplier `k` for conservative estimates.
    pub conservatism: f64,
    pub monte_carlo_samples: usize,
    /// Sampling interval of the RAAN profile log (s).
    pub time_step_s: f64,
    /// Force the floor fitness when any vehicle is left without targets.
    pub require_all_routes: bool,
    /// Residual RAAN gap accepted without phasing (deg).
    pub raan_tolerance_deg: f64,
    /// Seed of the per-evaluation random sources.
    pub seed: u64,
    pub optimizer: GaOverrides,
}

impl MissionSettings {
    pub fn new(weights: FitnessWeights, year_limit: f64) -> Self {
        Self {
            weights,
            year_limit,
            conservatism: 1.0,
            monte_carlo_samples: 10,
            time_step_s: 600.0,
            require_all_routes: false,
            raan_tolerance_deg: 0.5,
            seed: 0,
            optimizer: GaOverrides::default(),
        }
    }

    fn validate(&self) -> Result<(), MissionError> {
        let checks = [
            ("year_limit", self.year_limit, self.year_limit > 0.0),
            ("conservatism", self.conservatism, self.conservatism >= 0.0),
            (
                "monte_carlo_samples",
                self.monte_carlo_samples as f64,
                self.monte_carlo_samples > 0,
            ),
            ("time_step_s", self.time_step_s, self.time_step_s > 0.0),
            (
                "raan_tolerance_deg",
                self.raan_tolerance_deg,
                self.raan_tolerance_deg >= 0.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(MissionError::InvalidSetting { name, value });
            }
        }
        let w = &self.weights;
        for (name, value) in [
            ("weights.risk", w.risk),
            ("weights.time", w.time),
            ("weights.mass", w.mass),
            ("weights.ownership", w.ownership),
        ] {
            if !value.is_finite() {
                return Err(MissionError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

/// A scored genome with its decoded routes and simulated outcome.
#[derive(Debug, Clone, Serialize)]
pub struct MissionEvaluation {
    pub genome: Vec<usize>,
    pub routes: RoutePlan,
    pub result: MissionResult,
    pub fitness: f64,
}

/// Best plan found by the optimizer, with its convergence history.
#[derive(Debug, Clone, Serialize)]
pub struct MissionPlan {
    pub best: MissionEvaluation,
    pub history: Vec<GenerationStats>,
    pub converged: bool,
    pub optimizer: GaConfig,
}

/// Validated planning problem: catalog, fleet, and settings.
#[derive(Debug, Clone)]
pub struct MissionPlanner {
    targets: Vec<Target>,
    fleet: Vec<Vehicle>,
    settings: MissionSettings,
    optimizer: GaConfig,
}

impl MissionPlanner {
    pub fn new(
        targets: Vec<Target>,
        fleet: Vec<Vehicle>,
        settings: MissionSettings,
    ) -> Result<Self, MissionError> {
        if targets.is_empty() {
            return Err(MissionError::EmptyCatalog);
        }
        if fleet.is_empty() {
            return Err(MissionError::EmptyFleet);
        }
        settings.validate()?;
        for target in &targets {
            validate_target(target)?;
        }
        let mut names = BTreeSet::new();
        for vehicle in &fleet {
            validate_vehicle(vehicle)?;
            let modules = match &vehicle.role {
                VehicleRole::Mothership { modules, .. } => modules.as_slice(),
                _ => &[],
            };
            for name in std::iter::once(vehicle.name()).chain(modules.iter().map(|m| m.name.as_str())) {
                if !names.insert(name.to_string()) {
                    return Err(MissionError::DuplicateName(name.to_string()));
                }
            }
        }

        let mut optimizer = GaConfig::scaled_for(targets.len()).with_overrides(&settings.optimizer);
        if optimizer.seed.is_none() {
            optimizer.seed = Some(settings.seed);
        }
        optimizer.validate(targets.len() + fleet.len())?;

        Ok(Self {
            targets,
            fleet,
            settings,
            optimizer,
        })
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn settings(&self) -> &MissionSettings {
        &self.settings
    }

    pub fn optimizer_config(&self) -> &GaConfig {
        &self.optimizer
    }

    pub fn genome_len(&self) -> usize {
        self.targets.len() + self.fleet.len()
    }

    pub fn simulator(&self) -> MissionSimulator<'_> {
        MissionSimulator::new(&self.targets, &self.fleet, &self.settings)
    }

    /// Simulate one genome with full logging (including RAAN profiles).
    pub fn evaluate(&self, genome: &[usize]) -> Result<MissionEvaluation, MissionError> {
        if genome.len() != self.genome_len() {
            return Err(MissionError::GenomeLength {
                expected: self.genome_len(),
                actual: genome.len(),
            });
        }
        let (routes, result, fitness) = self.simulator().evaluate_genome(genome, true)?;
        Ok(MissionEvaluation {
            genome: genome.to_vec(),
            routes,
            result,
            fitness,
        })
    }

    /// Search for the best route assignment and re-simulate it with full logging.
    pub fn plan(&self) -> Result<MissionPlan, MissionError> {
        let simulator = self.simulator();
        let optimizer = GeneticOptimizer::new(self.optimizer.clone(), self.genome_len(), &simulator)?;
        info!(
            targets = self.targets.len(),
            vehicles = self.fleet.len(),
            population = self.optimizer.population_size,
            min_generations = self.optimizer.min_generations,
            "planning mission"
        );
        let evolution = optimizer.run();
        let best = self.evaluate(&evolution.best.genome)?;
        info!(
            fitness = best.fitness,
            risk = best.result.risk_remediated,
            serviced = best.result.serviced_targets.len(),
            "mission planned"
        );
        Ok(MissionPlan {
            best,
            history: evolution.history,
            converged: evolution.converged,
            optimizer: self.optimizer.clone(),
        })
    }
}

fn validate_target(target: &Target) -> Result<(), MissionError> {
    let invalid = |reason| MissionError::InvalidTarget {
        id: target.id.clone(),
        reason,
    };
    if !target.elements.is_physical() {
        return Err(invalid("orbital elements must be finite with a positive semi-major axis"));
    }
    let sigma = &target.sigma;
    if !(sigma.a_km >= 0.0 && sigma.inc_deg >= 0.0 && sigma.raan_deg >= 0.0) {
        return Err(invalid("element uncertainties must be non-negative"));
    }
    if !(target.risk_score >= 0.0) || !target.risk_score.is_finite() {
        return Err(invalid("risk score must be non-negative"));
    }
    if !(target.mass_kg >= 0.0) {
        return Err(invalid("mass must be non-negative"));
    }
    Ok(())
}

fn validate_vehicle(vehicle: &Vehicle) -> Result<(), MissionError> {
    let craft = &vehicle.craft;
    let invalid = |reason| MissionError::InvalidVehicle {
        name: craft.name.clone(),
        reason,
    };
    if !craft.initial_orbit.is_physical() {
        return Err(invalid("initial orbit must be finite with a positive semi-major axis"));
    }
    if !(craft.wet_mass_kg > 0.0) {
        return Err(invalid("wet mass must be positive"));
    }
    if !(0.0..1.0).contains(&craft.propellant_mass_fraction) {
        return Err(invalid("propellant mass fraction must lie in [0, 1)"));
    }
    if !(craft.propulsion.isp_seconds() > 0.0) || !(craft.propulsion.thrust_newtons() > 0.0) {
        return Err(invalid("thrust and specific impulse must be positive"));
    }
    if let VehicleRole::Mothership { modules, .. } = &vehicle.role {
        for module in modules {
            if !(module.wet_mass_kg > 0.0)
                || !(0.0..1.0).contains(&module.propellant_mass_fraction)
                || !(module.propulsion.isp_seconds() > 0.0)
                || !(module.propulsion.thrust_newtons() > 0.0)
            {
                return Err(invalid("deorbit module has invalid mass or propulsion"));
            }
        }
    }
    Ok(())
}
