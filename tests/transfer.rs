use adr_planner::impulsive::{hohmann, hohmann_plane_change};
use adr_planner::lowthrust::{edelbaum_delta_v, spiral_time_of_flight_s};
use adr_planner::primitives::constants::MU_EARTH_KM3_S2;
use adr_planner::primitives::elements::{ElementUncertainty, OrbitalElements};
use adr_planner::propulsion::{PropulsionMode, Spacecraft, propellant_mass_kg};
use adr_planner::transfer::{Target, TransferError, delta_v_matrix, transfer_cost};

const LEO_KM: f64 = 6_678.0;
const GEO_KM: f64 = 42_164.0;

#[test]
fn hohmann_leo_to_geo_reasonable_numbers() {
    let h = hohmann(LEO_KM, GEO_KM, MU_EARTH_KM3_S2).expect("physical radii");
    assert!((h.dv_total_km_s - 3.893).abs() < 0.01, "dv_total = {}", h.dv_total_km_s);
    let hours = h.tof_seconds / 3_600.0;
    assert!((hours - 5.275).abs() < 0.01, "tof_hours = {}", hours);
    assert!(h.dv1_km_s > 0.0 && h.dv2_km_s > 0.0);

    let back = hohmann(GEO_KM, LEO_KM, MU_EARTH_KM3_S2).expect("physical radii");
    assert!((back.dv_total_km_s - h.dv_total_km_s).abs() < 1e-9);
    assert!(back.dv1_km_s < 0.0);
}

#[test]
fn plane_change_rides_on_the_slow_burn() {
    let coplanar = hohmann_plane_change(LEO_KM, GEO_KM, 0.0, MU_EARTH_KM3_S2).expect("ok");
    let plain = hohmann(LEO_KM, GEO_KM, MU_EARTH_KM3_S2).expect("ok");
    assert!((coplanar.dv_total_km_s - plain.dv_total_km_s).abs() < 1e-9);

    let up = hohmann_plane_change(LEO_KM, GEO_KM, 28.5, MU_EARTH_KM3_S2).expect("ok");
    let down = hohmann_plane_change(GEO_KM, LEO_KM, -28.5, MU_EARTH_KM3_S2).expect("ok");
    assert!((up.dv_total_km_s - 4.256).abs() < 0.01, "dv_total = {}", up.dv_total_km_s);
    assert!((up.dv_total_km_s - down.dv_total_km_s).abs() < 1e-9);
    // The departure burn from LEO is unchanged by the plane change.
    assert!((up.dv1_km_s - plain.dv1_km_s).abs() < 1e-12);
}

#[test]
fn edelbaum_matches_circular_speed_difference_when_coplanar() {
    let dv = edelbaum_delta_v(LEO_KM, GEO_KM, 0.0, MU_EARTH_KM3_S2).expect("ok");
    let expected = (MU_EARTH_KM3_S2 / LEO_KM).sqrt() - (MU_EARTH_KM3_S2 / GEO_KM).sqrt();
    assert!((dv - expected).abs() < 1e-12);

    let inclined = edelbaum_delta_v(LEO_KM, GEO_KM, 28.5, MU_EARTH_KM3_S2).expect("ok");
    assert!((inclined - 5.951).abs() < 0.01, "dv = {}", inclined);
    assert!(edelbaum_delta_v(-1.0, GEO_KM, 0.0, MU_EARTH_KM3_S2).is_err());
}

#[test]
fn propellant_equation_limits() {
    assert_eq!(propellant_mass_kg(1_000.0, 0.0, 300.0), 0.0);
    assert!(propellant_mass_kg(1_000.0, 3.0, 1.0e12) < 1e-6);

    let used = propellant_mass_kg(1_000.0, 3.893, 300.0);
    assert!((used - 733.6).abs() < 0.5, "propellant = {}", used);
    assert!(propellant_mass_kg(1_000.0, 100.0, 300.0) < 1_000.0);
}

#[test]
fn propulsion_mode_follows_specific_impulse() {
    assert!(!PropulsionMode::from_engine(400.0, 500.0).is_low_thrust());
    assert!(PropulsionMode::from_engine(0.2, 500.5).is_low_thrust());

    let craft = Spacecraft {
        name: "tug".into(),
        wet_mass_kg: 800.0,
        propellant_mass_fraction: 0.25,
        propulsion: PropulsionMode::from_engine(0.2, 1_600.0),
        initial_orbit: OrbitalElements::new(7_000.0, 98.0, 0.0),
        docking_time_s: 0.0,
        docking_delta_v_km_s: 0.0,
    };
    assert_eq!(craft.propellant_mass_kg(), 200.0);
    assert_eq!(craft.dry_mass_kg(), 600.0);
}

#[test]
fn transfer_cost_dispatches_on_propulsion_mode() {
    let from = OrbitalElements::new(7_000.0, 97.8, 10.0);
    let to = OrbitalElements::new(7_200.0, 98.3, 10.0);
    let mass = 1_000.0;

    let chemical = PropulsionMode::from_engine(400.0, 320.0);
    let impulsive = transfer_cost(&from, &to, &chemical, mass).expect("impulsive cost");
    let burns = hohmann_plane_change(7_000.0, 7_200.0, 0.5, MU_EARTH_KM3_S2).expect("ok");
    assert!((impulsive.delta_v_km_s - burns.dv_total_km_s).abs() < 1e-12);
    assert!((impulsive.time_of_flight_s - burns.tof_seconds).abs() < 1e-9);
    assert!(
        (impulsive.propellant_kg - propellant_mass_kg(mass, burns.dv_total_km_s, 320.0)).abs()
            < 1e-9
    );

    let electric = PropulsionMode::from_engine(0.5, 1_800.0);
    let spiral = transfer_cost(&from, &to, &electric, mass).expect("spiral cost");
    let dv = edelbaum_delta_v(7_000.0, 7_200.0, 0.5, MU_EARTH_KM3_S2).expect("ok");
    let propellant = propellant_mass_kg(mass, dv, 1_800.0);
    assert!((spiral.delta_v_km_s - dv).abs() < 1e-12);
    assert!((spiral.propellant_kg - propellant).abs() < 1e-9);
    let tof = dv * 1_000.0 / 0.5 * (mass - 0.5 * propellant);
    assert!((spiral.time_of_flight_s - tof).abs() < 1e-6);
    assert_eq!(
        spiral_time_of_flight_s(dv, 0.5, mass, propellant).expect("ok"),
        spiral.time_of_flight_s
    );
}

#[test]
fn identical_orbits_cost_nothing() {
    let orbit = OrbitalElements::new(7_100.0, 98.0, 42.0);
    for propulsion in [
        PropulsionMode::from_engine(400.0, 320.0),
        PropulsionMode::from_engine(0.3, 1_500.0),
    ] {
        let cost = transfer_cost(&orbit, &orbit, &propulsion, 500.0).expect("cost");
        assert!(cost.delta_v_km_s.abs() < 1e-9, "dv = {}", cost.delta_v_km_s);
        assert!(cost.propellant_kg.abs() < 1e-6);
        assert!(cost.time_of_flight_s.abs() < 1e-3, "tof = {}", cost.time_of_flight_s);
    }

    let same = hohmann(7_100.0, 7_100.0, MU_EARTH_KM3_S2).expect("physical radii");
    assert_eq!(same.tof_seconds, 0.0);
    let plane_only = hohmann_plane_change(7_100.0, 7_100.0, 1.0, MU_EARTH_KM3_S2).expect("ok");
    assert!(plane_only.tof_seconds > 0.0);
}

#[test]
fn non_physical_orbits_are_typed_errors() {
    let bad = OrbitalElements::new(-10.0, 98.0, 0.0);
    let good = OrbitalElements::new(7_000.0, 98.0, 0.0);
    let chemical = PropulsionMode::from_engine(400.0, 320.0);
    assert!(matches!(
        transfer_cost(&bad, &good, &chemical, 100.0),
        Err(TransferError::Impulsive(_))
    ));
    let electric = PropulsionMode::from_engine(0.3, 1_500.0);
    assert!(matches!(
        transfer_cost(&good, &bad, &electric, 100.0),
        Err(TransferError::LowThrust(_))
    ));
}

fn target(id: &str, a_km: f64, inc_deg: f64) -> Target {
    Target {
        id: id.into(),
        name: None,
        elements: OrbitalElements::new(a_km, inc_deg, 0.0),
        sigma: ElementUncertainty::ZERO,
        mass_kg: 100.0,
        risk_score: 1.0,
        owner: "A".into(),
    }
}

#[test]
fn delta_v_matrix_has_zero_diagonal_and_is_symmetric() {
    let targets = vec![
        target("a", 7_000.0, 98.0),
        target("b", 7_150.0, 98.5),
        target("c", 7_300.0, 97.2),
    ];
    let matrix = delta_v_matrix(&targets).expect("matrix");
    assert_eq!(matrix.len(), 3);
    for i in 0..3 {
        assert_eq!(matrix[i][i], 0.0);
        for j in 0..3 {
            assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-12);
        }
    }
    let expected = edelbaum_delta_v(7_000.0, 7_150.0, 0.5, MU_EARTH_KM3_S2).expect("ok");
    assert!((matrix[0][1] - expected).abs() < 1e-12);
}
