//! Core units, constants, and shared primitives for the debris servicing planner workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity used by the rocket equation (m/s²).
    pub const G0: f64 = 9.81;
    /// Earth gravitational parameter (km³/s²).
    pub const MU_EARTH_KM3_S2: f64 = 398_600.441_8;
    /// Earth equatorial radius (km).
    pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.136_6;
    /// Earth second zonal harmonic (dimensionless).
    pub const J2: f64 = 1.082_626_68e-3;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Seconds per Julian year (365.25 days).
    pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert kilometres per second to metres per second.
    #[inline]
    pub fn kms_to_ms(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres per second to kilometres per second.
    #[inline]
    pub fn ms_to_kms(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert an altitude above the equatorial radius to a semi-major axis (km).
    #[inline]
    pub fn altitude_to_sma_km(altitude_km: f64) -> f64 {
        altitude_km + super::constants::EARTH_EQUATORIAL_RADIUS_KM
    }

    /// Convert a semi-major axis to an altitude above the equatorial radius (km).
    #[inline]
    pub fn sma_to_altitude_km(sma_km: f64) -> f64 {
        sma_km - super::constants::EARTH_EQUATORIAL_RADIUS_KM
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_YEAR};

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Convert years to seconds.
    #[inline]
    pub fn years_to_seconds(years: f64) -> f64 {
        years * SECONDS_PER_YEAR
    }

    /// Convert seconds to years.
    #[inline]
    pub fn seconds_to_years(seconds: f64) -> f64 {
        seconds / SECONDS_PER_YEAR
    }
}

/// Angle helpers in degrees.
pub mod angles {
    /// Wrap an angle into `[0, 360)`.
    #[inline]
    pub fn wrap_360(deg: f64) -> f64 {
        deg.rem_euclid(360.0)
    }

    /// Wrap an angle into `(-180, 180]`.
    #[inline]
    pub fn wrap_180(deg: f64) -> f64 {
        let wrapped = deg.rem_euclid(360.0);
        if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
    }
}

/// Mean circular-orbit elements shared by targets and vehicles.
pub mod elements {
    use serde::{Deserialize, Serialize};

    /// Circular orbit described by semi-major axis, inclination, and RAAN.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct OrbitalElements {
        pub a_km: f64,
        pub inc_deg: f64,
        pub raan_deg: f64,
    }

    impl OrbitalElements {
        pub fn new(a_km: f64, inc_deg: f64, raan_deg: f64) -> Self {
            Self {
                a_km,
                inc_deg,
                raan_deg,
            }
        }

        /// Same plane, different RAAN.
        pub fn with_raan(self, raan_deg: f64) -> Self {
            Self { raan_deg, ..self }
        }

        /// True when every element is finite and the orbit radius is positive.
        pub fn is_physical(&self) -> bool {
            self.a_km.is_finite()
                && self.inc_deg.is_finite()
                && self.raan_deg.is_finite()
                && self.a_km > 0.0
        }
    }

    /// One-sigma uncertainty on each mean element.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct ElementUncertainty {
        pub a_km: f64,
        pub inc_deg: f64,
        pub raan_deg: f64,
    }

    impl ElementUncertainty {
        /// No uncertainty on any element.
        pub const ZERO: Self = Self {
            a_km: 0.0,
            inc_deg: 0.0,
            raan_deg: 0.0,
        };

        pub fn is_zero(&self) -> bool {
            self.a_km == 0.0 && self.inc_deg == 0.0 && self.raan_deg == 0.0
        }
    }
}
