//! Propulsion mode descriptors, the rocket equation, and servicing vehicle definitions.

use adr_core::constants::G0;
use adr_core::elements::OrbitalElements;
use adr_core::units::kms_to_ms;

/// Engines above this specific impulse are treated as low-thrust (seconds).
pub const LOW_THRUST_ISP_THRESHOLD_S: f64 = 500.0;

/// Propellant consumed to impart `delta_v_km_s` on a stack of `total_mass_kg`
/// using the ideal rocket equation.
pub fn propellant_mass_kg(total_mass_kg: f64, delta_v_km_s: f64, isp_seconds: f64) -> f64 {
    let exhaust_velocity_m_s = isp_seconds * G0;
    total_mass_kg * (1.0 - (-kms_to_ms(delta_v_km_s.max(0.0)) / exhaust_velocity_m_s).exp())
}

/// Propulsion mode, selected from the engine's specific impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropulsionMode {
    /// Chemical engine; transfers are modelled as instantaneous burns.
    Impulsive {
        thrust_newtons: f64,
        isp_seconds: f64,
    },
    /// Electric engine; transfers are modelled as continuous spirals.
    Continuous {
        thrust_newtons: f64,
        isp_seconds: f64,
    },
}

impl PropulsionMode {
    /// Classify an engine by its specific impulse.
    pub fn from_engine(thrust_newtons: f64, isp_seconds: f64) -> Self {
        if isp_seconds > LOW_THRUST_ISP_THRESHOLD_S {
            Self::Continuous {
                thrust_newtons,
                isp_seconds,
            }
        } else {
            Self::Impulsive {
                thrust_newtons,
                isp_seconds,
            }
        }
    }

    pub fn isp_seconds(&self) -> f64 {
        match *self {
            Self::Impulsive { isp_seconds, .. } | Self::Continuous { isp_seconds, .. } => {
                isp_seconds
            }
        }
    }

    pub fn thrust_newtons(&self) -> f64 {
        match *self {
            Self::Impulsive { thrust_newtons, .. } | Self::Continuous { thrust_newtons, .. } => {
                thrust_newtons
            }
        }
    }

    pub fn is_low_thrust(&self) -> bool {
        matches!(self, Self::Continuous { .. })
    }
}

/// Mass and propulsion properties shared by every servicing vehicle.
#[derive(Debug, Clone)]
pub struct Spacecraft {
    pub name: String,
    pub wet_mass_kg: f64,
    pub propellant_mass_fraction: f64,
    pub propulsion: PropulsionMode,
    pub initial_orbit: OrbitalElements,
    pub docking_time_s: f64,
    pub docking_delta_v_km_s: f64,
}

impl Spacecraft {
    /// Nominal (full tank) propellant load.
    pub fn propellant_mass_kg(&self) -> f64 {
        self.wet_mass_kg * self.propellant_mass_fraction
    }

    pub fn dry_mass_kg(&self) -> f64 {
        self.wet_mass_kg - self.propellant_mass_kg()
    }
}

/// Single-use deorbit module carried by a mothership.
#[derive(Debug, Clone)]
pub struct DeorbitModule {
    pub name: String,
    pub wet_mass_kg: f64,
    pub propellant_mass_fraction: f64,
    pub propulsion: PropulsionMode,
}

impl DeorbitModule {
    pub fn propellant_mass_kg(&self) -> f64 {
        self.wet_mass_kg * self.propellant_mass_fraction
    }

    pub fn dry_mass_kg(&self) -> f64 {
        self.wet_mass_kg - self.propellant_mass_kg()
    }
}

/// Role-specific capabilities layered on top of the common spacecraft record.
#[derive(Debug, Clone)]
pub enum VehicleRole {
    /// Captures one target and stays attached to it.
    Picker,
    /// Drags each captured target down to a disposal orbit and returns for the next.
    Shuttle {
        max_drop_altitude_km: f64,
        refuels: u32,
    },
    /// Ferries deorbit modules; each captured target consumes one module.
    Mothership {
        max_drop_altitude_km: f64,
        refuels: u32,
        modules: Vec<DeorbitModule>,
    },
}

impl VehicleRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Picker => "picker",
            Self::Shuttle { .. } => "shuttle",
            Self::Mothership { .. } => "mothership",
        }
    }
}

/// Configured servicing vehicle. Read-only once a planning run starts.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub craft: Spacecraft,
    pub role: VehicleRole,
}

impl Vehicle {
    pub fn name(&self) -> &str {
        &self.craft.name
    }

    /// Number of full refuels available at deployment.
    pub fn refuels(&self) -> u32 {
        match &self.role {
            VehicleRole::Picker => 0,
            VehicleRole::Shuttle { refuels, .. } | VehicleRole::Mothership { refuels, .. } => {
                *refuels
            }
        }
    }

    /// Wet mass of the vehicle plus every module it carries.
    pub fn total_wet_mass_kg(&self) -> f64 {
        let modules: f64 = match &self.role {
            VehicleRole::Mothership { modules, .. } => {
                modules.iter().map(|module| module.wet_mass_kg).sum()
            }
            _ => 0.0,
        };
        self.craft.wet_mass_kg + modules
    }
}
