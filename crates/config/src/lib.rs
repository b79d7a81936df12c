//! Configuration models and loaders for the debris servicing planner.

use std::fs::File;
use std::path::{Path, PathBuf};

use adr_genetic::GaOverrides;
use serde::Deserialize;
use thiserror::Error;

/// Debris object as listed in a target catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub a_km: f64,
    pub inc_deg: f64,
    pub raan_deg: f64,
    #[serde(default)]
    pub a_std_km: f64,
    #[serde(default)]
    pub inc_std_deg: f64,
    #[serde(default)]
    pub raan_std_deg: f64,
    pub mass_kg: f64,
    pub risk_score: f64,
    pub owner: String,
}

/// Servicing vehicle as listed in a fleet catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct VehicleConfig {
    pub name: String,
    pub wet_mass_kg: f64,
    pub propellant_mass_fraction: f64,
    pub thrust_newtons: f64,
    pub isp_seconds: f64,
    pub a_km: f64,
    pub inc_deg: f64,
    pub raan_deg: f64,
    #[serde(default)]
    pub docking_time_days: f64,
    #[serde(default)]
    pub docking_delta_v_m_s: f64,
    pub role: VehicleRoleConfig,
}

/// Role-specific vehicle settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum VehicleRoleConfig {
    #[serde(rename = "picker")]
    Picker,
    #[serde(rename = "shuttle")]
    Shuttle {
        #[serde(default = "default_drop_altitude_km")]
        max_drop_altitude_km: f64,
        #[serde(default)]
        refuels: u32,
    },
    #[serde(rename = "mothership")]
    Mothership {
        #[serde(default = "default_drop_altitude_km")]
        max_drop_altitude_km: f64,
        #[serde(default)]
        refuels: u32,
        #[serde(default)]
        modules: Vec<ModuleConfig>,
    },
    #[serde(other)]
    Unsupported,
}

/// Deorbit module carried by a mothership.
#[derive(Debug, Deserialize, Clone)]
pub struct ModuleConfig {
    pub name: String,
    pub wet_mass_kg: f64,
    pub propellant_mass_fraction: f64,
    pub thrust_newtons: f64,
    pub isp_seconds: f64,
}

/// Scalar planner settings.
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    /// Risk, time, mass, and ownership weights, in that order.
    pub weights: Vec<f64>,
    pub year_limit: f64,
    #[serde(default = "default_conservatism")]
    pub conservatism: f64,
    #[serde(default = "default_monte_carlo_samples")]
    pub monte_carlo_samples: usize,
    #[serde(default = "default_time_step_s")]
    pub time_step_s: f64,
    #[serde(default)]
    pub require_all_routes: bool,
    #[serde(default = "default_raan_tolerance_deg")]
    pub raan_tolerance_deg: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub optimizer: GaOverrides,
}

fn default_drop_altitude_km() -> f64 {
    300.0
}

fn default_conservatism() -> f64 {
    1.0
}

fn default_monte_carlo_samples() -> usize {
    10
}

fn default_time_step_s() -> f64 {
    600.0
}

fn default_raan_tolerance_deg() -> f64 {
    0.5
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load target records from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_targets<P: AsRef<Path>>(path: P) -> Result<Vec<TargetConfig>, ConfigError> {
    load_records(path)
}

/// Load vehicle records from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_fleet<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleConfig>, ConfigError> {
    load_records(path)
}

/// Load planner settings from a TOML or YAML document.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<SettingsConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
