//! Analytic estimators for impulsive transfers between circular orbits.
//!
//! Provides the coplanar Hohmann transfer and a variant that folds an inclination change
//! into whichever burn happens at the lower orbital speed.

use thiserror::Error;

/// Errors raised when a transfer is requested between non-physical orbits.
#[derive(Debug, Error, PartialEq)]
pub enum ImpulsiveError {
    #[error("orbit radii and gravitational parameter must be positive (r1={r1_km}, r2={r2_km}, mu={mu_km3_s2})")]
    NonPositiveInput {
        r1_km: f64,
        r2_km: f64,
        mu_km3_s2: f64,
    },
}

/// Result for a two-burn transfer between circular orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannResult {
    pub dv1_km_s: f64,      // signed in the coplanar case: negative for an inward burn
    pub dv2_km_s: f64,      // signed in the coplanar case: negative for an inward capture
    pub dv_total_km_s: f64, // |dv1| + |dv2|
    pub tof_seconds: f64,
}

fn check_inputs(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> Result<(), ImpulsiveError> {
    if r1_km > 0.0 && r2_km > 0.0 && mu_km3_s2 > 0.0 {
        Ok(())
    } else {
        Err(ImpulsiveError::NonPositiveInput {
            r1_km,
            r2_km,
            mu_km3_s2,
        })
    }
}

/// Hohmann half-period for the transfer ellipse between `r1_km` and `r2_km`; zero when there
/// is nothing to transfer.
fn half_period(r1_km: f64, r2_km: f64, delta_inc_deg: f64, mu_km3_s2: f64) -> f64 {
    if r1_km == r2_km && delta_inc_deg == 0.0 {
        return 0.0;
    }
    let a_t = 0.5 * (r1_km + r2_km);
    std::f64::consts::PI * (a_t.powi(3) / mu_km3_s2).sqrt()
}

/// Compute the classical Hohmann transfer between two circular coplanar orbits.
///
/// Inputs:
/// - `r1_km`: initial circular orbit radius (km)
/// - `r2_km`: target circular orbit radius (km)
/// - `mu_km3_s2`: gravitational parameter of central body (km^3/s^2)
pub fn hohmann(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> Result<HohmannResult, ImpulsiveError> {
    check_inputs(r1_km, r2_km, mu_km3_s2)?;

    let v1 = (mu_km3_s2 / r1_km).sqrt();
    let v2 = (mu_km3_s2 / r2_km).sqrt();
    let a_t = 0.5 * (r1_km + r2_km);

    // Transfer periapsis speed (at r1) and apoapsis speed (at r2)
    let v_t1 = (mu_km3_s2 * (2.0 / r1_km - 1.0 / a_t)).sqrt();
    let v_t2 = (mu_km3_s2 * (2.0 / r2_km - 1.0 / a_t)).sqrt();

    let dv1 = v_t1 - v1;
    let dv2 = v2 - v_t2;

    Ok(HohmannResult {
        dv1_km_s: dv1,
        dv2_km_s: dv2,
        dv_total_km_s: dv1.abs() + dv2.abs(),
        tof_seconds: half_period(r1_km, r2_km, 0.0, mu_km3_s2),
    })
}

/// Two-burn transfer with an inclination change of `delta_inc_deg`.
///
/// The plane change is combined with the burn performed at the larger radius, where the
/// orbital speed is lowest: the circularisation burn when raising, the departure burn when
/// lowering. Both reported burns are magnitudes.
pub fn hohmann_plane_change(
    r1_km: f64,
    r2_km: f64,
    delta_inc_deg: f64,
    mu_km3_s2: f64,
) -> Result<HohmannResult, ImpulsiveError> {
    check_inputs(r1_km, r2_km, mu_km3_s2)?;

    let delta_inc = delta_inc_deg.abs().to_radians();
    let sum = r1_km + r2_km;
    let v_circ_1 = (mu_km3_s2 / r1_km).sqrt();
    let v_transfer_1 = (2.0 * mu_km3_s2 / r1_km - 2.0 * mu_km3_s2 / sum).sqrt();
    let v_transfer_2 = (2.0 * mu_km3_s2 / r2_km - 2.0 * mu_km3_s2 / sum).sqrt();
    let v_circ_2 = (mu_km3_s2 / r2_km).sqrt();

    let combined = |u: f64, w: f64| (u * u + w * w - 2.0 * u * w * delta_inc.cos()).max(0.0).sqrt();

    let (dv1, dv2) = if r2_km > r1_km {
        (
            (v_circ_1 - v_transfer_1).abs(),
            combined(v_transfer_2, v_circ_2),
        )
    } else {
        (
            combined(v_circ_1, v_transfer_1),
            (v_transfer_2 - v_circ_2).abs(),
        )
    };

    Ok(HohmannResult {
        dv1_km_s: dv1,
        dv2_km_s: dv2,
        dv_total_km_s: dv1 + dv2,
        tof_seconds: half_period(r1_km, r2_km, delta_inc_deg, mu_km3_s2),
    })
}
