//! Re-exported APIs and configuration conversions for consumers of the transfer crate.

pub use crate::catalog::{Target, delta_v_matrix};
pub use crate::cost::{TransferCost, TransferError, transfer_cost};
pub use crate::mission::fitness::{FITNESS_FLOOR, FitnessBreakdown, FitnessWeights};
pub use crate::mission::log::{AgentLog, EventKind, MissionEvent, RaanSample, TerminationReason};
pub use crate::mission::simulate::{MissionResult, MissionSimulator};
pub use crate::mission::{
    MissionError, MissionEvaluation, MissionPlan, MissionPlanner, MissionSettings,
};
pub use crate::uncertainty::{LegEstimate, SamplerSettings, UncertainOrbit};
pub use adr_propulsion::{PropulsionMode, Vehicle, VehicleRole};

pub mod vehicle {
    use adr_config::{ModuleConfig, VehicleConfig, VehicleRoleConfig};
    use adr_core::elements::OrbitalElements;
    use adr_core::time::days_to_seconds;
    use adr_core::units::ms_to_kms;
    use adr_propulsion::{DeorbitModule, PropulsionMode, Spacecraft, Vehicle, VehicleRole};
    use thiserror::Error;

    /// Errors surfaced when converting vehicle records.
    #[derive(Debug, Error)]
    pub enum VehicleError {
        #[error("vehicle catalog is empty")]
        EmptyCatalog,
        #[error("vehicle '{0}' has an unsupported role")]
        UnsupportedRole(String),
    }

    /// Convert a `VehicleConfig` into runtime `Vehicle` representation.
    pub fn from_config(config: &VehicleConfig) -> Result<Vehicle, VehicleError> {
        let role = match &config.role {
            VehicleRoleConfig::Picker => VehicleRole::Picker,
            VehicleRoleConfig::Shuttle {
                max_drop_altitude_km,
                refuels,
            } => VehicleRole::Shuttle {
                max_drop_altitude_km: *max_drop_altitude_km,
                refuels: *refuels,
            },
            VehicleRoleConfig::Mothership {
                max_drop_altitude_km,
                refuels,
                modules,
            } => VehicleRole::Mothership {
                max_drop_altitude_km: *max_drop_altitude_km,
                refuels: *refuels,
                modules: modules.iter().map(module_from_config).collect(),
            },
            VehicleRoleConfig::Unsupported => {
                return Err(VehicleError::UnsupportedRole(config.name.clone()));
            }
        };

        Ok(Vehicle {
            craft: Spacecraft {
                name: config.name.clone(),
                wet_mass_kg: config.wet_mass_kg,
                propellant_mass_fraction: config.propellant_mass_fraction,
                propulsion: PropulsionMode::from_engine(config.thrust_newtons, config.isp_seconds),
                initial_orbit: OrbitalElements::new(config.a_km, config.inc_deg, config.raan_deg),
                docking_time_s: days_to_seconds(config.docking_time_days),
                docking_delta_v_km_s: ms_to_kms(config.docking_delta_v_m_s),
            },
            role,
        })
    }

    /// Convert a whole fleet catalog, preserving order.
    pub fn fleet_from_configs(configs: &[VehicleConfig]) -> Result<Vec<Vehicle>, VehicleError> {
        if configs.is_empty() {
            return Err(VehicleError::EmptyCatalog);
        }
        configs.iter().map(from_config).collect()
    }

    fn module_from_config(config: &ModuleConfig) -> DeorbitModule {
        DeorbitModule {
            name: config.name.clone(),
            wet_mass_kg: config.wet_mass_kg,
            propellant_mass_fraction: config.propellant_mass_fraction,
            propulsion: PropulsionMode::from_engine(config.thrust_newtons, config.isp_seconds),
        }
    }
}

pub mod target {
    use adr_config::TargetConfig;
    use adr_core::elements::{ElementUncertainty, OrbitalElements};

    use crate::catalog::Target;

    pub fn from_config(config: &TargetConfig) -> Target {
        Target {
            id: config.id.clone(),
            name: config.name.clone(),
            elements: OrbitalElements::new(config.a_km, config.inc_deg, config.raan_deg),
            sigma: ElementUncertainty {
                a_km: config.a_std_km,
                inc_deg: config.inc_std_deg,
                raan_deg: config.raan_std_deg,
            },
            mass_kg: config.mass_kg,
            risk_score: config.risk_score,
            owner: config.owner.clone(),
        }
    }

    pub fn catalog_from_configs(configs: &[TargetConfig]) -> Vec<Target> {
        configs.iter().map(from_config).collect()
    }
}

pub mod settings {
    use adr_config::SettingsConfig;

    use crate::mission::fitness::FitnessWeights;
    use crate::mission::{MissionError, MissionSettings};

    /// Convert parsed settings. A missing seed is drawn from entropy so runs differ unless
    /// pinned.
    pub fn from_config(config: &SettingsConfig) -> Result<MissionSettings, MissionError> {
        let weights = FitnessWeights::from_slice(&config.weights)?;
        Ok(MissionSettings {
            weights,
            year_limit: config.year_limit,
            conservatism: config.conservatism,
            monte_carlo_samples: config.monte_carlo_samples,
            time_step_s: config.time_step_s,
            require_all_routes: config.require_all_routes,
            raan_tolerance_deg: config.raan_tolerance_deg,
            seed: config.seed.unwrap_or_else(rand::random),
            optimizer: config.optimizer.clone(),
        })
    }
}
