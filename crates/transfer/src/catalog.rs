//! Debris targets and catalog-wide transfer summaries.

use adr_core::constants::MU_EARTH_KM3_S2;
use adr_core::elements::{ElementUncertainty, OrbitalElements};
use adr_lowthrust::edelbaum_delta_v;
use adr_orbits::raan_rate_deg_s;
use rayon::prelude::*;

use crate::cost::TransferError;
use crate::uncertainty::UncertainOrbit;

/// Debris object to be serviced. Immutable during planning.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: String,
    pub name: Option<String>,
    pub elements: OrbitalElements,
    pub sigma: ElementUncertainty,
    pub mass_kg: f64,
    pub risk_score: f64,
    pub owner: String,
}

impl Target {
    /// Display label: the name when known, the identifier otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Mean orbit with the node advanced by `elapsed_s` seconds of J2 drift.
    pub fn orbit_at(&self, elapsed_s: f64) -> Result<UncertainOrbit, TransferError> {
        let rate = raan_rate_deg_s(self.elements.a_km, self.elements.inc_deg)?;
        Ok(UncertainOrbit {
            mean: self
                .elements
                .with_raan(self.elements.raan_deg + rate * elapsed_s),
            sigma: self.sigma,
        })
    }
}

/// Low-thrust (Edelbaum) delta-v between every ordered pair of targets, in km/s.
///
/// The diagonal is zero and never evaluated.
pub fn delta_v_matrix(targets: &[Target]) -> Result<Vec<Vec<f64>>, TransferError> {
    targets
        .par_iter()
        .enumerate()
        .map(|(i, origin)| {
            targets
                .iter()
                .enumerate()
                .map(|(j, destination)| -> Result<f64, TransferError> {
                    if i == j {
                        return Ok(0.0);
                    }
                    Ok(edelbaum_delta_v(
                        origin.elements.a_km,
                        destination.elements.a_km,
                        destination.elements.inc_deg - origin.elements.inc_deg,
                        MU_EARTH_KM3_S2,
                    )?)
                })
                .collect::<Result<Vec<f64>, TransferError>>()
        })
        .collect()
}
