//! Genome <-> route plan conversion.
//!
//! A genome is a permutation of `0..num_vehicles + num_targets`. Values below
//! `num_vehicles` are route separators; each separator opens the route of the vehicle with
//! the same index and every following value (shifted down by `num_vehicles`) is a target
//! index visited by that vehicle, until the next separator. The genome is cyclic: decoding
//! starts at separator `0`.

use serde::Serialize;
use thiserror::Error;

/// Errors raised for genomes that are not valid route encodings.
#[derive(Debug, Error, PartialEq)]
pub enum RoutingError {
    #[error("at least one vehicle is required to decode a genome")]
    NoVehicles,
    #[error("genome of length {len} cannot hold {num_vehicles} route separators")]
    TooShort { len: usize, num_vehicles: usize },
    #[error("gene {value} is out of range for a genome of length {len}")]
    OutOfRange { value: usize, len: usize },
    #[error("gene {0} appears more than once")]
    Duplicate(usize),
    #[error("route plan has {actual} routes, expected {expected}")]
    RouteCount { expected: usize, actual: usize },
}

/// Ordered target indices assigned to each vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    routes: Vec<Vec<usize>>,
}

impl RoutePlan {
    pub fn new(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Route of vehicle `vehicle`, empty when the index is out of range.
    pub fn route(&self, vehicle: usize) -> &[usize] {
        self.routes.get(vehicle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_vehicles(&self) -> usize {
        self.routes.len()
    }

    /// Total number of targets assigned across all vehicles.
    pub fn assigned_targets(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    pub fn has_empty_route(&self) -> bool {
        self.routes.iter().any(Vec::is_empty)
    }

    pub fn into_routes(self) -> Vec<Vec<usize>> {
        self.routes
    }
}

fn check_permutation(genome: &[usize]) -> Result<(), RoutingError> {
    let mut seen = vec![false; genome.len()];
    for &gene in genome {
        let slot = seen.get_mut(gene).ok_or(RoutingError::OutOfRange {
            value: gene,
            len: genome.len(),
        })?;
        if *slot {
            return Err(RoutingError::Duplicate(gene));
        }
        *slot = true;
    }
    Ok(())
}

/// Split a permutation genome into one ordered target list per vehicle.
pub fn decode(genome: &[usize], num_vehicles: usize) -> Result<RoutePlan, RoutingError> {
    if num_vehicles == 0 {
        return Err(RoutingError::NoVehicles);
    }
    if genome.len() < num_vehicles {
        return Err(RoutingError::TooShort {
            len: genome.len(),
            num_vehicles,
        });
    }
    check_permutation(genome)?;

    // A permutation of 0..len with len >= 1 always contains 0.
    let start = genome.iter().position(|&gene| gene == 0).unwrap_or(0);
    let mut routes = vec![Vec::new(); num_vehicles];
    let mut current = 0;
    for &gene in genome[start..].iter().chain(&genome[..start]) {
        if gene < num_vehicles {
            current = gene;
        } else {
            routes[current].push(gene - num_vehicles);
        }
    }
    Ok(RoutePlan::new(routes))
}

/// Canonical genome for a route plan: separators in ascending order, each followed by its
/// vehicle's targets. Targets missing from the plan are appended to the last route.
pub fn encode(
    plan: &RoutePlan,
    num_vehicles: usize,
    num_targets: usize,
) -> Result<Vec<usize>, RoutingError> {
    if num_vehicles == 0 {
        return Err(RoutingError::NoVehicles);
    }
    if plan.num_vehicles() != num_vehicles {
        return Err(RoutingError::RouteCount {
            expected: num_vehicles,
            actual: plan.num_vehicles(),
        });
    }

    let mut assigned = vec![false; num_targets];
    let mut genome = Vec::with_capacity(num_vehicles + num_targets);
    for (vehicle, route) in plan.routes().iter().enumerate() {
        genome.push(vehicle);
        for &target in route {
            let slot = assigned.get_mut(target).ok_or(RoutingError::OutOfRange {
                value: target + num_vehicles,
                len: num_vehicles + num_targets,
            })?;
            if *slot {
                return Err(RoutingError::Duplicate(target + num_vehicles));
            }
            *slot = true;
            genome.push(target + num_vehicles);
        }
    }
    genome.extend(
        assigned
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(target, _)| target + num_vehicles),
    );
    Ok(genome)
}
