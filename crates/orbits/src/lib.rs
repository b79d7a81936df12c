//! Orbit perturbation helpers (J2 nodal precession and RAAN phasing).
use adr_core::angles::wrap_180;
use adr_core::constants::{EARTH_EQUATORIAL_RADIUS_KM, J2, MU_EARTH_KM3_S2};
use thiserror::Error;

/// Relative precession rates below this magnitude cannot close a RAAN gap (deg/s).
pub const MIN_RELATIVE_PRECESSION_DEG_S: f64 = 1e-12;

/// Errors raised by plane-phasing calculations.
#[derive(Debug, Error, PartialEq)]
pub enum OrbitError {
    #[error("semi-major axis must be positive, got {0} km")]
    NonPositiveSemiMajorAxis(f64),
    #[error(
        "precession rates are equal ({rate_deg_s:e} deg/s) with an open RAAN gap of {gap_deg:.4} deg"
    )]
    DegeneratePrecession { rate_deg_s: f64, gap_deg: f64 },
}

/// Secular RAAN drift due to J2 for a circular orbit, in degrees per second.
pub fn raan_rate_deg_s(a_km: f64, inc_deg: f64) -> Result<f64, OrbitError> {
    if !(a_km > 0.0) {
        return Err(OrbitError::NonPositiveSemiMajorAxis(a_km));
    }
    let mean_motion = (MU_EARTH_KM3_S2 / a_km.powi(3)).sqrt();
    let ratio = EARTH_EQUATORIAL_RADIUS_KM / a_km;
    let rate_rad_s = -1.5 * J2 * ratio * ratio * mean_motion * inc_deg.to_radians().cos();
    Ok(rate_rad_s.to_degrees())
}

/// Node angle and drift rate of an orbital plane at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub raan_deg: f64,
    pub rate_deg_s: f64,
}

impl NodeState {
    /// Node state of a circular orbit with the given elements.
    pub fn of_orbit(a_km: f64, inc_deg: f64, raan_deg: f64) -> Result<Self, OrbitError> {
        Ok(Self {
            raan_deg,
            rate_deg_s: raan_rate_deg_s(a_km, inc_deg)?,
        })
    }

    /// Node angle after drifting for `dt_s` seconds.
    pub fn advanced(&self, dt_s: f64) -> f64 {
        self.raan_deg + self.rate_deg_s * dt_s
    }
}

/// Time the origin plane must loiter before starting a transfer of `transfer_time_s` so the
/// planes are aligned on arrival.
///
/// During the transfer the vehicle drifts at the mean of both rates, so half of the relative
/// rate acts over the transfer. A residual gap within `tolerance_deg` needs no wait. Otherwise
/// the wait closes the gap at the relative rate, lapping a full revolution when the origin
/// node is moving away from the target node.
pub fn phasing_wait_s(
    origin: NodeState,
    target: NodeState,
    transfer_time_s: f64,
    tolerance_deg: f64,
) -> Result<f64, OrbitError> {
    let relative_rate = origin.rate_deg_s - target.rate_deg_s;
    let transfer_drift = 0.5 * relative_rate * transfer_time_s;
    let gap = wrap_180(target.raan_deg - (origin.raan_deg + transfer_drift));
    if gap.abs() <= tolerance_deg {
        return Ok(0.0);
    }
    if relative_rate.abs() < MIN_RELATIVE_PRECESSION_DEG_S {
        return Err(OrbitError::DegeneratePrecession {
            rate_deg_s: origin.rate_deg_s,
            gap_deg: gap,
        });
    }

    let origin_ahead = gap < 0.0;
    let origin_gaining = relative_rate > 0.0;
    let laps = (origin_ahead && origin_gaining) || (!origin_ahead && !origin_gaining);
    let angle = if laps { 360.0 - gap.abs() } else { gap.abs() };
    Ok(angle / relative_rate.abs())
}
