//! Closed-form transfer costs between circular orbits, dispatched on propulsion mode.

use adr_core::constants::MU_EARTH_KM3_S2;
use adr_core::elements::OrbitalElements;
use adr_impulsive::{ImpulsiveError, hohmann_plane_change};
use adr_lowthrust::{LowThrustError, spiral_transfer};
use adr_orbits::OrbitError;
use adr_propulsion::{PropulsionMode, propellant_mass_kg};
use thiserror::Error;

/// Errors raised while costing a single transfer.
#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    #[error("impulsive transfer failed: {0}")]
    Impulsive(#[from] ImpulsiveError),
    #[error("low-thrust transfer failed: {0}")]
    LowThrust(#[from] LowThrustError),
    #[error("phasing failed: {0}")]
    Orbit(#[from] OrbitError),
    #[error("transfer estimate is not finite (dv={delta_v_km_s}, tof={time_of_flight_s})")]
    NonFinite {
        delta_v_km_s: f64,
        time_of_flight_s: f64,
    },
}

impl TransferError {
    /// True for equal-precession phasing failures.
    pub fn is_degenerate_phasing(&self) -> bool {
        matches!(self, Self::Orbit(OrbitError::DegeneratePrecession { .. }))
    }
}

/// Delta-v, propellant, and time of flight of one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransferCost {
    pub delta_v_km_s: f64,
    pub propellant_kg: f64,
    pub time_of_flight_s: f64,
}

/// Cost of moving a stack of `mass_kg` from `from` to `to`.
///
/// Continuous engines fly an Edelbaum spiral; impulsive engines fly a Hohmann transfer
/// with the plane change folded into the slower burn.
pub fn transfer_cost(
    from: &OrbitalElements,
    to: &OrbitalElements,
    propulsion: &PropulsionMode,
    mass_kg: f64,
) -> Result<TransferCost, TransferError> {
    let delta_inc_deg = to.inc_deg - from.inc_deg;
    let isp = propulsion.isp_seconds();
    let cost = match *propulsion {
        PropulsionMode::Continuous { thrust_newtons, .. } => {
            let spiral = spiral_transfer(
                from.a_km,
                to.a_km,
                delta_inc_deg,
                MU_EARTH_KM3_S2,
                thrust_newtons,
                mass_kg,
                |dv| propellant_mass_kg(mass_kg, dv, isp),
            )?;
            TransferCost {
                delta_v_km_s: spiral.delta_v_km_s,
                propellant_kg: spiral.propellant_used_kg,
                time_of_flight_s: spiral.time_of_flight_s,
            }
        }
        PropulsionMode::Impulsive { .. } => {
            let burns = hohmann_plane_change(from.a_km, to.a_km, delta_inc_deg, MU_EARTH_KM3_S2)?;
            TransferCost {
                delta_v_km_s: burns.dv_total_km_s,
                propellant_kg: propellant_mass_kg(mass_kg, burns.dv_total_km_s, isp),
                time_of_flight_s: burns.tof_seconds,
            }
        }
    };

    if cost.delta_v_km_s.is_finite()
        && cost.propellant_kg.is_finite()
        && cost.time_of_flight_s.is_finite()
    {
        Ok(cost)
    } else {
        Err(TransferError::NonFinite {
            delta_v_km_s: cost.delta_v_km_s,
            time_of_flight_s: cost.time_of_flight_s,
        })
    }
}
