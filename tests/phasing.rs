use adr_planner::orbits::{NodeState, OrbitError, phasing_wait_s, raan_rate_deg_s};

const DAY_S: f64 = 86_400.0;

fn node(raan_deg: f64, rate_deg_s: f64) -> NodeState {
    NodeState {
        raan_deg,
        rate_deg_s,
    }
}

#[test]
fn sun_synchronous_orbit_precesses_one_degree_per_day() {
    let rate = raan_rate_deg_s(7_078.0, 98.19).expect("physical orbit") * DAY_S;
    assert!((rate - 0.9856).abs() < 0.01, "rate = {} deg/day", rate);

    let prograde = raan_rate_deg_s(6_978.0, 65.0).expect("ok") * DAY_S;
    assert!((prograde + 3.074).abs() < 0.01, "rate = {} deg/day", prograde);
    assert!(raan_rate_deg_s(7_000.0, 90.0).expect("ok").abs() < 1e-15);
    assert_eq!(
        raan_rate_deg_s(0.0, 45.0),
        Err(OrbitError::NonPositiveSemiMajorAxis(0.0))
    );
}

#[test]
fn aligned_planes_need_no_wait() {
    let origin = node(10.0, -3.0e-5);
    let target = node(10.3, -3.0e-5);
    assert_eq!(phasing_wait_s(origin, target, 1.0e5, 0.5), Ok(0.0));
}

#[test]
fn equal_precession_with_open_gap_is_degenerate() {
    let origin = node(0.0, -3.0e-5);
    let target = node(10.0, -3.0e-5);
    match phasing_wait_s(origin, target, 1_000.0, 0.5) {
        Err(OrbitError::DegeneratePrecession { gap_deg, .. }) => {
            assert!((gap_deg - 10.0).abs() < 1e-9)
        }
        other => panic!("expected degenerate precession, got {other:?}"),
    }
}

#[test]
fn gaining_origin_behind_target_closes_gap_directly() {
    let wait = phasing_wait_s(node(0.0, -3.0e-5), node(10.0, -4.0e-5), 0.0, 0.5).expect("ok");
    assert!((wait - 1.0e6).abs() < 1e-3, "wait = {}", wait);
}

#[test]
fn gaining_origin_ahead_of_target_laps() {
    let wait = phasing_wait_s(node(10.0, -3.0e-5), node(0.0, -4.0e-5), 0.0, 0.5).expect("ok");
    assert!((wait - 3.5e7).abs() < 1e-2, "wait = {}", wait);
}

#[test]
fn losing_origin_laps_when_behind_and_not_when_ahead() {
    let behind = phasing_wait_s(node(0.0, -4.0e-5), node(10.0, -3.0e-5), 0.0, 0.5).expect("ok");
    assert!((behind - 3.5e7).abs() < 1e-2, "wait = {}", behind);

    let ahead = phasing_wait_s(node(10.0, -4.0e-5), node(0.0, -3.0e-5), 0.0, 0.5).expect("ok");
    assert!((ahead - 1.0e6).abs() < 1e-3, "wait = {}", ahead);
}

#[test]
fn drift_during_transfer_shortens_wait() {
    // Half the relative rate acts over the transfer: 0.5 * 1e-5 * 2e5 = 1 degree.
    let wait = phasing_wait_s(node(0.0, -3.0e-5), node(10.0, -4.0e-5), 2.0e5, 0.5).expect("ok");
    assert!((wait - 9.0e5).abs() < 1e-3, "wait = {}", wait);
}

#[test]
fn gap_is_wrapped_to_shortest_arc() {
    // 350 degrees ahead is 10 degrees behind.
    let wait = phasing_wait_s(node(0.0, -3.0e-5), node(-350.0, -4.0e-5), 0.0, 0.5).expect("ok");
    assert!((wait - 1.0e6).abs() < 1e-3, "wait = {}", wait);
}
