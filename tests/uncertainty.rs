use adr_planner::primitives::elements::{ElementUncertainty, OrbitalElements};
use adr_planner::propulsion::PropulsionMode;
use adr_planner::transfer::{SamplerSettings, UncertainOrbit, transfer_cost};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn sampler(conservatism: f64, sample_count: usize) -> SamplerSettings {
    SamplerSettings {
        conservatism,
        sample_count,
        raan_tolerance_deg: 0.5,
    }
}

fn origin() -> UncertainOrbit {
    UncertainOrbit::exact(OrbitalElements::new(7_000.0, 98.0, 0.0))
}

fn uncertain_target() -> UncertainOrbit {
    UncertainOrbit {
        mean: OrbitalElements::new(7_400.0, 98.0, 20.0),
        sigma: ElementUncertainty {
            a_km: 10.0,
            inc_deg: 0.0,
            raan_deg: 1.0,
        },
    }
}

#[test]
fn zero_uncertainty_is_deterministic() {
    let chemical = PropulsionMode::from_engine(400.0, 320.0);
    let from = origin();
    let to = UncertainOrbit::exact(OrbitalElements::new(7_400.0, 98.0, 0.2));
    let nominal = transfer_cost(&from.mean, &to.mean, &chemical, 1_000.0).expect("cost");

    let mut rng = StdRng::seed_from_u64(1);
    let reference = sampler(1.0, 1)
        .estimate_leg(&from, &to, &chemical, 1_000.0, &mut rng)
        .expect("leg");
    assert_eq!(reference.transfer(), nominal);
    assert_eq!(reference.wait_s, 0.0);

    for (k, samples) in [(0.0, 5), (2.0, 50), (3.5, 200)] {
        let leg = sampler(k, samples)
            .estimate_leg(&from, &to, &chemical, 1_000.0, &mut rng)
            .expect("leg");
        assert_eq!(leg, reference);
    }
}

#[test]
fn zero_conservatism_ignores_uncertainty() {
    let electric = PropulsionMode::from_engine(0.5, 1_800.0);
    let to = uncertain_target();
    let mut rng = StdRng::seed_from_u64(2);
    let leg = sampler(0.0, 64)
        .estimate_transfer(&origin(), &to, &electric, 900.0, &mut rng)
        .expect("transfer");
    let nominal = transfer_cost(&origin().mean, &to.mean, &electric, 900.0).expect("cost");
    assert_eq!(leg, nominal);
}

#[test]
fn same_seed_reproduces_estimate() {
    let chemical = PropulsionMode::from_engine(400.0, 320.0);
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        sampler(1.0, 32)
            .estimate_leg(&origin(), &uncertain_target(), &chemical, 1_000.0, &mut rng)
            .expect("leg")
    };
    assert_eq!(run(99), run(99));
    assert_ne!(run(99), run(100));
}

#[test]
fn estimates_grow_with_conservatism() {
    let chemical = PropulsionMode::from_engine(400.0, 320.0);
    let estimates: Vec<_> = [0.0, 1.0, 2.0, 3.0]
        .iter()
        .map(|&k| {
            let mut rng = StdRng::seed_from_u64(42);
            sampler(k, 64)
                .estimate_leg(&origin(), &uncertain_target(), &chemical, 1_000.0, &mut rng)
                .expect("leg")
        })
        .collect();

    for pair in estimates.windows(2) {
        let (lower, higher) = (&pair[0], &pair[1]);
        assert!(higher.delta_v_km_s > lower.delta_v_km_s, "{lower:?} vs {higher:?}");
        assert!(higher.propellant_kg > lower.propellant_kg, "{lower:?} vs {higher:?}");
        assert!(higher.time_of_flight_s > lower.time_of_flight_s, "{lower:?} vs {higher:?}");
        assert!(higher.wait_s > lower.wait_s, "{lower:?} vs {higher:?}");
    }
}
