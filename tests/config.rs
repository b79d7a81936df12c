use std::fs;
use std::path::PathBuf;

use adr_planner::config::{VehicleRoleConfig, load_fleet, load_settings, load_targets};
use adr_planner::transfer::vehicle::{VehicleError, fleet_from_configs};
use adr_planner::transfer::{MissionSettings, PropulsionMode, VehicleRole, settings, target};

fn sample(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(path)
}

#[test]
fn sample_catalog_loads() {
    let targets = load_targets(sample("targets.yaml")).expect("targets");
    assert_eq!(targets.len(), 6);
    assert_eq!(targets[1].id, "2002-009A");
    assert_eq!(targets[4].name, None);

    let catalog = target::catalog_from_configs(&targets);
    assert_eq!(catalog[1].label(), "Envisat");
    assert_eq!(catalog[4].label(), "1996-046A");
    assert!((catalog[0].sigma.raan_deg - 0.05).abs() < 1e-12);
}

#[test]
fn fleet_directory_loads_in_file_order() {
    let configs = load_fleet(sample("fleet")).expect("fleet");
    let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Shuttle-1", "Mothership-1", "Picker-1"]);
    assert!(matches!(
        &configs[1].role,
        VehicleRoleConfig::Mothership { modules, .. } if modules.len() == 2
    ));

    let fleet = fleet_from_configs(&configs).expect("conversion");
    assert!(fleet[0].craft.propulsion.is_low_thrust());
    assert!(matches!(fleet[2].craft.propulsion, PropulsionMode::Impulsive { .. }));
    assert!(matches!(fleet[2].role, VehicleRole::Picker));
    // Two days of docking, 5 m/s of docking delta-v.
    assert!((fleet[0].craft.docking_time_s - 172_800.0).abs() < 1e-9);
    assert!((fleet[0].craft.docking_delta_v_km_s - 0.005).abs() < 1e-12);
    assert_eq!(fleet[0].refuels(), 2);
}

#[test]
fn settings_fill_defaults() {
    let parsed = load_settings(sample("settings.toml")).expect("settings");
    assert_eq!(parsed.weights.len(), 4);
    assert_eq!(parsed.seed, Some(20240611));
    assert_eq!(parsed.optimizer.population_size, Some(80));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("minimal.yaml");
    fs::write(&path, "weights: [1.0, 0.0, 0.0, 0.0]\nyear_limit: 2.0\n").expect("write");
    let minimal = load_settings(&path).expect("yaml settings");
    assert_eq!(minimal.conservatism, 1.0);
    assert_eq!(minimal.monte_carlo_samples, 10);
    assert_eq!(minimal.time_step_s, 600.0);
    assert_eq!(minimal.raan_tolerance_deg, 0.5);
    assert!(!minimal.require_all_routes);
    assert_eq!(minimal.optimizer.max_generations, None);

    let converted: MissionSettings = settings::from_config(&parsed).expect("convert");
    assert_eq!(converted.seed, 20240611);
    assert_eq!(converted.weights.time, 0.25);
}

#[test]
fn wrong_weight_count_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.toml");
    fs::write(&path, "weights = [1.0, 0.5]\nyear_limit = 1.0\n").expect("write");
    let parsed = load_settings(&path).expect("parse");
    assert!(settings::from_config(&parsed).is_err());
}

#[test]
fn unknown_role_fails_conversion() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tug.toml");
    fs::write(
        &path,
        r#"
name = "Tug"
wet_mass_kg = 500.0
propellant_mass_fraction = 0.3
thrust_newtons = 100.0
isp_seconds = 300.0
a_km = 7000.0
inc_deg = 98.0
raan_deg = 0.0

[role]
type = "tug"
"#,
    )
    .expect("write");

    let configs = load_fleet(&path).expect("single toml");
    assert!(matches!(configs[0].role, VehicleRoleConfig::Unsupported));
    assert!(matches!(
        fleet_from_configs(&configs),
        Err(VehicleError::UnsupportedRole(name)) if name == "Tug"
    ));
    assert!(matches!(fleet_from_configs(&[]), Err(VehicleError::EmptyCatalog)));
}

#[test]
fn malformed_yaml_reports_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("targets.yaml");
    fs::write(&path, "- id: broken\n  a_km: not-a-number\n").expect("write");
    assert!(matches!(
        load_targets(&path),
        Err(adr_planner::config::ConfigError::Parse(_))
    ));
}
