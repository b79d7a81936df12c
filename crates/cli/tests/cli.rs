use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn configs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

#[test]
fn plan_mission_writes_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.toml");
    fs::write(
        &settings,
        "weights = [1.0, 0.25, 0.15, 0.1]\nyear_limit = 5.0\nmonte_carlo_samples = 2\n\
         time_step_s = 86400.0\nseed = 3\n\n[optimizer]\npopulation_size = 10\n\
         min_generations = 2\nmax_generations = 3\n",
    )
    .expect("write settings");
    let output = dir.path().join("out");

    Command::cargo_bin("plan_mission")
        .expect("binary")
        .arg("--targets")
        .arg(configs().join("targets.yaml"))
        .arg("--fleet")
        .arg(configs().join("fleet"))
        .arg("--settings")
        .arg(&settings)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Mission Plan ==="))
        .stdout(predicate::str::contains("Seed           : 3"))
        .stdout(predicate::str::contains("Picker-1"));

    for file in ["events.csv", "raan_profiles.csv", "delta_v_matrix.csv", "summary.json"] {
        assert!(output.join(file).exists(), "missing {file}");
    }
}

#[test]
fn plan_mission_reports_missing_inputs() {
    Command::cargo_bin("plan_mission")
        .expect("binary")
        .args(["--targets", "no/such/targets.yaml"])
        .arg("--fleet")
        .arg(configs().join("fleet"))
        .arg("--settings")
        .arg(configs().join("settings.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read configuration"));
}

#[test]
fn dv_matrix_prints_csv() {
    Command::cargo_bin("dv_matrix")
        .expect("binary")
        .arg("--targets")
        .arg(configs().join("targets.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("from\\to,1993-016B,2002-009A"))
        .stdout(predicate::str::contains("\n2011-061B,"));
}
