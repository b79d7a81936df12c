use adr_planner::routing::{RoutePlan, RoutingError, decode, encode};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[test]
fn decode_rotates_to_first_separator() {
    // Two vehicles, three targets: genes 0 and 1 separate, 2..5 are targets 0..3.
    let plan = decode(&[3, 1, 4, 0, 2], 2).expect("valid genome");
    assert_eq!(plan.routes(), &[vec![0, 1], vec![2]]);
}

#[test]
fn decode_allows_empty_routes() {
    let plan = decode(&[0, 1, 2, 3, 4], 2).expect("valid genome");
    assert_eq!(plan.route(0), &[] as &[usize]);
    assert_eq!(plan.route(1), &[0, 1, 2]);
    assert!(plan.has_empty_route());
    assert_eq!(plan.assigned_targets(), 3);
}

#[test]
fn every_target_lands_in_exactly_one_route() {
    let mut rng = StdRng::seed_from_u64(7);
    let (vehicles, targets) = (3, 9);
    for _ in 0..200 {
        let mut genome: Vec<usize> = (0..vehicles + targets).collect();
        genome.shuffle(&mut rng);
        let plan = decode(&genome, vehicles).expect("permutation decodes");
        assert_eq!(plan.num_vehicles(), vehicles);

        let mut seen: Vec<usize> = plan.routes().iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..targets).collect::<Vec<_>>());
    }
}

#[test]
fn encode_then_decode_preserves_plan() {
    let mut rng = StdRng::seed_from_u64(11);
    let (vehicles, targets) = (4, 7);
    for _ in 0..100 {
        let mut genome: Vec<usize> = (0..vehicles + targets).collect();
        genome.shuffle(&mut rng);
        let plan = decode(&genome, vehicles).expect("decode");
        let canonical = encode(&plan, vehicles, targets).expect("encode");
        assert_eq!(decode(&canonical, vehicles).expect("decode canonical"), plan);
    }
}

#[test]
fn encode_orders_separators_and_appends_missing_targets() {
    let plan = RoutePlan::new(vec![vec![1], vec![0, 2]]);
    assert_eq!(encode(&plan, 2, 3).expect("encode"), vec![0, 3, 1, 2, 4]);

    let partial = RoutePlan::new(vec![vec![], vec![0]]);
    let genome = encode(&partial, 2, 3).expect("encode");
    assert_eq!(genome, vec![0, 1, 2, 3, 4]);
    assert_eq!(decode(&genome, 2).expect("decode").route(1), &[0, 1, 2]);
}

#[test]
fn malformed_genomes_are_rejected() {
    assert_eq!(decode(&[0, 1, 1, 3, 4], 2), Err(RoutingError::Duplicate(1)));
    assert_eq!(
        decode(&[0, 1, 2, 3, 9], 2),
        Err(RoutingError::OutOfRange { value: 9, len: 5 })
    );
    assert_eq!(decode(&[0, 1], 0), Err(RoutingError::NoVehicles));
    assert_eq!(
        decode(&[0], 2),
        Err(RoutingError::TooShort {
            len: 1,
            num_vehicles: 2
        })
    );
    assert_eq!(
        encode(&RoutePlan::new(vec![vec![0]]), 2, 1),
        Err(RoutingError::RouteCount {
            expected: 2,
            actual: 1
        })
    );
}
