//! Continuous-thrust analytical utilities.
//!
//! Edelbaum's minimum delta-v law for a combined altitude and inclination change between
//! circular orbits, plus the constant-thrust spiral duration that goes with it.

use adr_core::units::kms_to_ms;
use thiserror::Error;

/// Errors raised for non-physical spiral inputs.
#[derive(Debug, Error, PartialEq)]
pub enum LowThrustError {
    #[error("orbit radii and gravitational parameter must be positive (a0={a0_km}, af={af_km}, mu={mu_km3_s2})")]
    NonPositiveInput { a0_km: f64, af_km: f64, mu_km3_s2: f64 },
    #[error("thrust must be positive, got {0} N")]
    NonPositiveThrust(f64),
}

/// Summary of a continuous-thrust spiral between two circular orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralTransfer {
    pub delta_v_km_s: f64,
    pub propellant_used_kg: f64,
    pub time_of_flight_s: f64,
}

/// Edelbaum delta-v between circular orbits `a0_km` and `af_km` separated by `delta_inc_deg`.
///
/// The inclination term is scaled by π/2 to approximate the optimal out-of-plane steering.
pub fn edelbaum_delta_v(
    a0_km: f64,
    af_km: f64,
    delta_inc_deg: f64,
    mu_km3_s2: f64,
) -> Result<f64, LowThrustError> {
    if !(a0_km > 0.0 && af_km > 0.0 && mu_km3_s2 > 0.0) {
        return Err(LowThrustError::NonPositiveInput {
            a0_km,
            af_km,
            mu_km3_s2,
        });
    }
    let v0 = (mu_km3_s2 / a0_km).sqrt();
    let vf = (mu_km3_s2 / af_km).sqrt();
    let angle = delta_inc_deg.abs().to_radians() * std::f64::consts::FRAC_PI_2;
    Ok((v0 * v0 + vf * vf - 2.0 * v0 * vf * angle.cos()).max(0.0).sqrt())
}

/// Burn duration for a constant-thrust spiral, using the mid-burn mass.
pub fn spiral_time_of_flight_s(
    delta_v_km_s: f64,
    thrust_newtons: f64,
    initial_mass_kg: f64,
    propellant_used_kg: f64,
) -> Result<f64, LowThrustError> {
    if thrust_newtons <= 0.0 {
        return Err(LowThrustError::NonPositiveThrust(thrust_newtons));
    }
    Ok(kms_to_ms(delta_v_km_s) / thrust_newtons * (initial_mass_kg - 0.5 * propellant_used_kg))
}

/// Complete spiral estimate given a propellant model for the stack.
pub fn spiral_transfer<F>(
    a0_km: f64,
    af_km: f64,
    delta_inc_deg: f64,
    mu_km3_s2: f64,
    thrust_newtons: f64,
    initial_mass_kg: f64,
    propellant_for: F,
) -> Result<SpiralTransfer, LowThrustError>
where
    F: Fn(f64) -> f64,
{
    let delta_v_km_s = edelbaum_delta_v(a0_km, af_km, delta_inc_deg, mu_km3_s2)?;
    let propellant_used_kg = propellant_for(delta_v_km_s);
    let time_of_flight_s = spiral_time_of_flight_s(
        delta_v_km_s,
        thrust_newtons,
        initial_mass_kg,
        propellant_used_kg,
    )?;
    Ok(SpiralTransfer {
        delta_v_km_s,
        propellant_used_kg,
        time_of_flight_s,
    })
}
