use std::fs;
use std::path::{Path, PathBuf};

use adr_planner::pipeline::{self, InputPaths};

fn configs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs")
}

fn quick_settings(dir: &Path) -> PathBuf {
    let path = dir.join("settings.toml");
    fs::write(
        &path,
        r#"
weights = [1.0, 0.25, 0.15, 0.1]
year_limit = 5.0
monte_carlo_samples = 3
time_step_s = 86400.0
seed = 7

[optimizer]
population_size = 12
min_generations = 2
max_generations = 4
"#,
    )
    .expect("write settings");
    path
}

#[test]
fn plan_exports_all_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = InputPaths {
        targets: configs().join("targets.yaml"),
        fleet: configs().join("fleet"),
        settings: quick_settings(dir.path()),
    };
    let planner = pipeline::load_planner(&paths, None).expect("planner");
    assert_eq!(planner.settings().seed, 7);
    assert_eq!(planner.optimizer_config().population_size, 12);

    let plan = planner.plan().expect("plan");
    let out = dir.path().join("run");
    let files = pipeline::export_plan(&planner, &plan, &out).expect("export");

    let mut events = csv::Reader::from_path(&files.events).expect("events csv");
    let headers = events.headers().expect("header").clone();
    assert_eq!(&headers[0], "agent");
    assert_eq!(&headers[3], "event");
    assert_eq!(headers.len(), 15);
    let rows: Vec<csv::StringRecord> = events.records().map(|r| r.expect("row")).collect();
    assert!(!rows.is_empty());
    assert!(rows.iter().any(|r| &r[3] == "deployed"));
    for row in &rows {
        let time: f64 = row[2].parse().expect("time column");
        assert!(time >= 0.0);
    }

    let mut matrix = csv::Reader::from_path(&files.matrix).expect("matrix csv");
    assert_eq!(matrix.headers().expect("header").len(), 7);
    let diagonal: Vec<f64> = matrix
        .records()
        .enumerate()
        .map(|(i, r)| r.expect("row")[i + 1].parse().expect("value"))
        .collect();
    assert_eq!(diagonal.len(), 6);
    assert!(diagonal.iter().all(|v| v.abs() < 1e-6));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files.summary).expect("summary"))
            .expect("summary json");
    assert!(summary["generated_utc"].is_string());
    assert_eq!(summary["fitness"].as_f64(), Some(plan.best.fitness));
    assert_eq!(summary["vehicles"].as_array().map(Vec::len), Some(3));
    assert_eq!(summary["settings"]["seed"].as_u64(), Some(7));

    assert!(files.profiles.exists());
}

#[test]
fn seed_override_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = InputPaths {
        targets: configs().join("targets.yaml"),
        fleet: configs().join("fleet"),
        settings: quick_settings(dir.path()),
    };
    let planner = pipeline::load_planner(&paths, Some(99)).expect("planner");
    assert_eq!(planner.settings().seed, 99);
    assert_eq!(planner.optimizer_config().seed, Some(99));
}

#[test]
fn missing_inputs_surface_config_errors() {
    let paths = InputPaths {
        targets: PathBuf::from("does/not/exist.yaml"),
        fleet: configs().join("fleet"),
        settings: configs().join("settings.toml"),
    };
    assert!(matches!(
        pipeline::load_planner(&paths, None),
        Err(pipeline::PipelineError::Config(_))
    ));
}

#[test]
fn default_output_dir_is_timestamped() {
    let dir = pipeline::default_output_dir(Path::new("artifacts"));
    let name = dir.file_name().and_then(|n| n.to_str()).expect("name");
    assert!(name.starts_with("plan-") && name.ends_with('Z'));
    assert_eq!(name.len(), "plan-20240101T000000Z".len());
}
