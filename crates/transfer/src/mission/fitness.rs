//! Weighted multi-objective fitness of a simulated mission.

use adr_routing::RoutePlan;
use serde::Serialize;

use super::MissionError;
use super::simulate::MissionResult;

/// Fitness assigned to missions that remediate nothing, so selection keeps some pressure.
pub const FITNESS_FLOOR: f64 = 1e-5;

/// Weights of the risk, time, mass, and ownership sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessWeights {
    pub risk: f64,
    pub time: f64,
    pub mass: f64,
    pub ownership: f64,
}

impl FitnessWeights {
    /// Build from `[risk, time, mass, ownership]`.
    pub fn from_slice(weights: &[f64]) -> Result<Self, MissionError> {
        match *weights {
            [risk, time, mass, ownership] => Ok(Self {
                risk,
                time,
                mass,
                ownership,
            }),
            _ => Err(MissionError::WeightArity(weights.len())),
        }
    }
}

/// Normalisers derived once from the catalog, fleet, and settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessScales {
    /// Risk of the whole catalog.
    pub max_risk: f64,
    pub year_limit_s: f64,
    /// Wet mass of the whole fleet including modules.
    pub max_fleet_mass_kg: f64,
    /// Distinct owners in the catalog.
    pub total_owners: usize,
}

/// Individual sub-scores, each in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessBreakdown {
    pub risk: f64,
    pub time: f64,
    pub mass: f64,
    pub ownership: f64,
}

impl FitnessBreakdown {
    pub fn compute(scales: &FitnessScales, result: &MissionResult) -> Self {
        let risk = 0.5 + 0.5 * result.risk_remediated / scales.max_risk;
        let time = 1.0 / (1.0 + result.max_tof_s / scales.year_limit_s);
        let mass = 1.0 / (1.0 + result.fleet_mass_used_kg / scales.max_fleet_mass_kg);
        let ownership = if scales.total_owners <= 1 || result.vehicle_owners.is_empty() {
            1.0
        } else {
            let total = scales.total_owners as f64;
            result
                .vehicle_owners
                .iter()
                .map(|&owners| 1.0 / (1.0 + owners as f64 / total))
                .sum::<f64>()
                / result.vehicle_owners.len() as f64
        };
        Self {
            risk,
            time,
            mass,
            ownership,
        }
    }

    pub fn weighted(&self, weights: &FitnessWeights) -> f64 {
        weights.risk * self.risk
            + weights.time * self.time
            + weights.mass * self.mass
            + weights.ownership * self.ownership
    }
}

/// Scalar fitness of a simulated plan, never below [`FITNESS_FLOOR`].
pub fn fitness(
    weights: &FitnessWeights,
    scales: &FitnessScales,
    require_all_routes: bool,
    plan: &RoutePlan,
    result: &MissionResult,
) -> f64 {
    if !(result.risk_remediated > 0.0) || !(scales.max_risk > 0.0) {
        return FITNESS_FLOOR;
    }
    if require_all_routes && plan.has_empty_route() {
        return FITNESS_FLOOR;
    }
    let value = FitnessBreakdown::compute(scales, result).weighted(weights);
    if value.is_finite() {
        value.max(FITNESS_FLOOR)
    } else {
        tracing::warn!(value, "non-finite fitness replaced by floor");
        FITNESS_FLOOR
    }
}
