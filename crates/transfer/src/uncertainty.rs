//! Monte-Carlo wrapper that turns element uncertainty into conservative cost estimates.
//!
//! Each sample redraws every element of both endpoints uniformly within
//! `mean ± k·sigma`; the reported figure for each output is `sample_mean + k·sample_std`.

use adr_core::elements::{ElementUncertainty, OrbitalElements};
use adr_orbits::{NodeState, phasing_wait_s};
use adr_propulsion::PropulsionMode;
use rand::Rng;
use statrs::statistics::Statistics;

use crate::cost::{TransferCost, TransferError, transfer_cost};

/// Orbit with its one-sigma element uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertainOrbit {
    pub mean: OrbitalElements,
    pub sigma: ElementUncertainty,
}

impl UncertainOrbit {
    pub fn exact(mean: OrbitalElements) -> Self {
        Self {
            mean,
            sigma: ElementUncertainty::ZERO,
        }
    }

    fn draw<R: Rng + ?Sized>(&self, spread: f64, rng: &mut R) -> OrbitalElements {
        let mut jitter = || rng.gen_range(-1.0_f64..=1.0) * spread;
        OrbitalElements {
            a_km: self.mean.a_km + jitter() * self.sigma.a_km,
            inc_deg: self.mean.inc_deg + jitter() * self.sigma.inc_deg,
            raan_deg: self.mean.raan_deg + jitter() * self.sigma.raan_deg,
        }
    }
}

/// Sampling settings shared by every leg of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    /// Multiplier `k` on the element and output standard deviations.
    pub conservatism: f64,
    pub sample_count: usize,
    /// Residual RAAN gap accepted without phasing (deg).
    pub raan_tolerance_deg: f64,
}

/// Conservative figures for one leg: transfer plus the phasing wait before it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegEstimate {
    pub delta_v_km_s: f64,
    pub propellant_kg: f64,
    pub time_of_flight_s: f64,
    pub wait_s: f64,
}

impl LegEstimate {
    pub fn transfer(&self) -> TransferCost {
        TransferCost {
            delta_v_km_s: self.delta_v_km_s,
            propellant_kg: self.propellant_kg,
            time_of_flight_s: self.time_of_flight_s,
        }
    }
}

impl SamplerSettings {
    fn is_deterministic(&self, from: &UncertainOrbit, to: &UncertainOrbit) -> bool {
        self.conservatism == 0.0 || (from.sigma.is_zero() && to.sigma.is_zero())
    }

    /// Conservative transfer and phasing estimate between two uncertain orbits.
    ///
    /// Any sample whose phasing is degenerate fails the whole estimate.
    pub fn estimate_leg<R: Rng + ?Sized>(
        &self,
        from: &UncertainOrbit,
        to: &UncertainOrbit,
        propulsion: &PropulsionMode,
        mass_kg: f64,
        rng: &mut R,
    ) -> Result<LegEstimate, TransferError> {
        let evaluate = |origin: &OrbitalElements, target: &OrbitalElements| {
            let cost = transfer_cost(origin, target, propulsion, mass_kg)?;
            let origin_node = NodeState::of_orbit(origin.a_km, origin.inc_deg, origin.raan_deg)?;
            let target_node = NodeState::of_orbit(target.a_km, target.inc_deg, target.raan_deg)?;
            let wait_s = phasing_wait_s(
                origin_node,
                target_node,
                cost.time_of_flight_s,
                self.raan_tolerance_deg,
            )?;
            Ok::<_, TransferError>([
                cost.delta_v_km_s,
                cost.propellant_kg,
                cost.time_of_flight_s,
                wait_s,
            ])
        };

        let figures = if self.is_deterministic(from, to) {
            evaluate(&from.mean, &to.mean)?
        } else {
            let mut columns: [Vec<f64>; 4] = Default::default();
            for _ in 0..self.sample_count.max(1) {
                let origin = from.draw(self.conservatism, rng);
                let target = to.draw(self.conservatism, rng);
                let sample = evaluate(&origin, &target)?;
                for (column, value) in columns.iter_mut().zip(sample) {
                    column.push(value);
                }
            }
            columns.map(|column| self.conservative(&column))
        };

        let [delta_v_km_s, propellant_kg, time_of_flight_s, wait_s] = figures;
        Ok(LegEstimate {
            delta_v_km_s,
            propellant_kg,
            time_of_flight_s,
            wait_s,
        })
    }

    /// Conservative transfer estimate without phasing, for legs flown in the current plane
    /// (deorbit drops).
    pub fn estimate_transfer<R: Rng + ?Sized>(
        &self,
        from: &UncertainOrbit,
        to: &UncertainOrbit,
        propulsion: &PropulsionMode,
        mass_kg: f64,
        rng: &mut R,
    ) -> Result<TransferCost, TransferError> {
        if self.is_deterministic(from, to) {
            return transfer_cost(&from.mean, &to.mean, propulsion, mass_kg);
        }
        let mut columns: [Vec<f64>; 3] = Default::default();
        for _ in 0..self.sample_count.max(1) {
            let origin = from.draw(self.conservatism, rng);
            let target = to.draw(self.conservatism, rng);
            let cost = transfer_cost(&origin, &target, propulsion, mass_kg)?;
            for (column, value) in columns.iter_mut().zip([
                cost.delta_v_km_s,
                cost.propellant_kg,
                cost.time_of_flight_s,
            ]) {
                column.push(value);
            }
        }
        let [delta_v_km_s, propellant_kg, time_of_flight_s] =
            columns.map(|column| self.conservative(&column));
        Ok(TransferCost {
            delta_v_km_s,
            propellant_kg,
            time_of_flight_s,
        })
    }

    fn conservative(&self, samples: &[f64]) -> f64 {
        if samples.len() < 2 {
            return samples.iter().mean();
        }
        samples.iter().mean() + self.conservatism * samples.iter().population_std_dev()
    }
}
