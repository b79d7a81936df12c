//! Walks every vehicle through its decoded route and scores the outcome.
//!
//! Per target: cost the transfer from the vehicle's current orbit (with phasing), check the
//! propellant margin and refuel or skip when short, fly, dock, then hand the target to the
//! role-specific disposal logic.

use std::collections::{BTreeMap, BTreeSet};

use adr_core::elements::{ElementUncertainty, OrbitalElements};
use adr_core::time::years_to_seconds;
use adr_core::units::{altitude_to_sma_km, sma_to_altitude_km};
use adr_genetic::Objective;
use adr_propulsion::{DeorbitModule, PropulsionMode, Vehicle, VehicleRole, propellant_mass_kg};
use adr_routing::{RoutePlan, RoutingError, decode};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use super::MissionSettings;
use super::fitness::{FITNESS_FLOOR, FitnessScales, fitness};
use super::log::{AgentLog, EventKind, MissionEvent, TerminationReason};
use super::state::VehicleState;
use crate::catalog::Target;
use crate::cost::{TransferCost, TransferError, transfer_cost};
use crate::uncertainty::{LegEstimate, SamplerSettings, UncertainOrbit};

/// Candidate disposal altitudes (km); the lowest reachable one is used.
pub const DISPOSAL_ALTITUDES_KM: [f64; 8] = [200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0];

/// Safety factor applied to a mothership's transfer propellant (docking is added on top).
pub const MOTHERSHIP_PROPELLANT_MARGIN: f64 = 3.0;

/// Aggregate outcome of one simulated mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionResult {
    pub risk_remediated: f64,
    /// Sum of the mission durations of every used vehicle.
    pub total_tof_s: f64,
    /// Longest mission duration of any vehicle.
    pub max_tof_s: f64,
    /// Wet mass (including modules) of every used vehicle.
    pub fleet_mass_used_kg: f64,
    pub refuel_mass_used_kg: f64,
    pub total_delta_v_km_s: f64,
    pub vehicle_used: Vec<bool>,
    /// Distinct owners whose objects each vehicle remediated.
    pub vehicle_owners: Vec<usize>,
    /// Targets credited as remediated, in order of crediting.
    pub serviced_targets: Vec<usize>,
    pub skipped_targets: usize,
    pub degenerate_legs: usize,
    /// Event logs keyed by vehicle or module name.
    pub logs: BTreeMap<String, AgentLog>,
}

/// What a leg ended with.
enum Leg {
    Serviced,
    Skipped,
    Stop(TerminationReason),
}

#[derive(Default)]
struct RouteOutcome<'t> {
    used: bool,
    duration_s: f64,
    risk: f64,
    owners: BTreeSet<&'t str>,
    serviced: Vec<usize>,
    refuel_mass_kg: f64,
    delta_v_km_s: f64,
    skipped: usize,
    degenerate: usize,
    module_logs: Vec<(String, AgentLog)>,
}

impl<'t> RouteOutcome<'t> {
    fn credit(&mut self, index: usize, target: &'t Target) {
        self.risk += target.risk_score;
        self.owners.insert(target.owner.as_str());
        self.serviced.push(index);
    }
}

/// Read-only simulation context shared by every evaluation of a run.
pub struct MissionSimulator<'a> {
    targets: &'a [Target],
    fleet: &'a [Vehicle],
    settings: &'a MissionSettings,
    sampler: SamplerSettings,
    scales: FitnessScales,
}

impl<'a> MissionSimulator<'a> {
    pub fn new(targets: &'a [Target], fleet: &'a [Vehicle], settings: &'a MissionSettings) -> Self {
        let owners: BTreeSet<&str> = targets.iter().map(|t| t.owner.as_str()).collect();
        Self {
            targets,
            fleet,
            settings,
            sampler: SamplerSettings {
                conservatism: settings.conservatism,
                sample_count: settings.monte_carlo_samples,
                raan_tolerance_deg: settings.raan_tolerance_deg,
            },
            scales: FitnessScales {
                max_risk: targets.iter().map(|t| t.risk_score).sum(),
                year_limit_s: years_to_seconds(settings.year_limit),
                max_fleet_mass_kg: fleet.iter().map(Vehicle::total_wet_mass_kg).sum(),
                total_owners: owners.len(),
            },
        }
    }

    pub fn num_vehicles(&self) -> usize {
        self.fleet.len()
    }

    pub fn genome_len(&self) -> usize {
        self.fleet.len() + self.targets.len()
    }

    pub fn scales(&self) -> &FitnessScales {
        &self.scales
    }

    /// Random source for one evaluation, a pure function of the run seed and the genome.
    pub fn evaluation_rng(&self, genome: &[usize]) -> StdRng {
        // FNV-1a over the genes
        let mut hash = 0xcbf2_9ce4_8422_2325_u64 ^ self.settings.seed;
        for &gene in genome {
            hash ^= gene as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        StdRng::seed_from_u64(hash)
    }

    /// Decode, simulate, and score a genome. Event logs are kept; RAAN profiles only when
    /// `record_profile` is set.
    pub fn evaluate_genome(
        &self,
        genome: &[usize],
        record_profile: bool,
    ) -> Result<(RoutePlan, MissionResult, f64), RoutingError> {
        let plan = decode(genome, self.num_vehicles())?;
        let mut rng = self.evaluation_rng(genome);
        let result = self.simulate(&plan, &mut rng, record_profile);
        let score = self.fitness(&plan, &result);
        Ok((plan, result, score))
    }

    pub fn fitness(&self, plan: &RoutePlan, result: &MissionResult) -> f64 {
        fitness(
            &self.settings.weights,
            &self.scales,
            self.settings.require_all_routes,
            plan,
            result,
        )
    }

    /// Simulate every vehicle's route. Infallible: per-leg failures skip targets and
    /// resource shortfalls end routes.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        plan: &RoutePlan,
        rng: &mut R,
        record_profile: bool,
    ) -> MissionResult {
        let mut result = MissionResult {
            risk_remediated: 0.0,
            total_tof_s: 0.0,
            max_tof_s: 0.0,
            fleet_mass_used_kg: 0.0,
            refuel_mass_used_kg: 0.0,
            total_delta_v_km_s: 0.0,
            vehicle_used: Vec::with_capacity(self.fleet.len()),
            vehicle_owners: Vec::with_capacity(self.fleet.len()),
            serviced_targets: Vec::new(),
            skipped_targets: 0,
            degenerate_legs: 0,
            logs: BTreeMap::new(),
        };

        for (index, vehicle) in self.fleet.iter().enumerate() {
            let (log, outcome) = self.fly_route(vehicle, plan.route(index), rng, record_profile);
            if outcome.used {
                result.total_tof_s += outcome.duration_s;
                result.max_tof_s = result.max_tof_s.max(outcome.duration_s);
                result.fleet_mass_used_kg += vehicle.total_wet_mass_kg();
            }
            result.risk_remediated += outcome.risk;
            result.refuel_mass_used_kg += outcome.refuel_mass_kg;
            result.total_delta_v_km_s += outcome.delta_v_km_s;
            result.skipped_targets += outcome.skipped;
            result.degenerate_legs += outcome.degenerate;
            result.vehicle_used.push(outcome.used);
            result.vehicle_owners.push(outcome.owners.len());
            result.serviced_targets.extend(outcome.serviced);
            result.logs.insert(vehicle.name().to_string(), log);
            result.logs.extend(outcome.module_logs);
        }
        result
    }

    fn fly_route<R: Rng + ?Sized>(
        &self,
        vehicle: &'a Vehicle,
        route: &[usize],
        rng: &mut R,
        record_profile: bool,
    ) -> (AgentLog, RouteOutcome<'a>) {
        let mut outcome = RouteOutcome::default();
        let mut log = AgentLog::default();
        let mut state = match VehicleState::deploy(vehicle) {
            Ok(state) => state,
            Err(err) => {
                warn!(vehicle = vehicle.name(), %err, "vehicle cannot be deployed");
                outcome.skipped += route.len();
                log.termination = Some(TerminationReason::RouteComplete);
                return (log, outcome);
            }
        };
        log.push(state.event(EventKind::Deployed));

        let mut reason = TerminationReason::RouteComplete;
        for &index in route {
            if state.at_target == Some(index) {
                continue;
            }
            let Some(target) = self.targets.get(index) else {
                outcome.skipped += 1;
                continue;
            };
            if matches!(vehicle.role, VehicleRole::Mothership { .. })
                && state.remaining_modules().is_empty()
            {
                reason = TerminationReason::ModulesExhausted;
                break;
            }

            let leg = match self.fly_leg(&mut state, index, target, rng, &mut log, &mut outcome) {
                Ok(leg) => leg,
                Err(err) => {
                    warn!(vehicle = vehicle.name(), target = %target.id, %err, "leg failed");
                    outcome.skipped += 1;
                    Leg::Skipped
                }
            };
            match leg {
                Leg::Serviced | Leg::Skipped => {}
                Leg::Stop(stop) => {
                    reason = stop;
                    break;
                }
            }
        }

        log.push(state.event(EventKind::Terminate));
        outcome.duration_s = outcome
            .module_logs
            .iter()
            .map(|(_, module_log)| module_log.end_time_s())
            .fold(state.elapsed_s, f64::max);
        log.termination = Some(reason);
        if record_profile {
            log.raan_profile = state.raan_profile(outcome.duration_s, self.settings.time_step_s);
        }
        debug!(
            vehicle = vehicle.name(),
            ?reason,
            risk = outcome.risk,
            duration_s = outcome.duration_s,
            "route finished"
        );
        (log, outcome)
    }

    /// Propellant the vehicle must hold before departing with a stack of `stack_mass_kg`.
    fn required_propellant(
        &self,
        vehicle: &Vehicle,
        target: &Target,
        leg: &LegEstimate,
        estimate_mass_kg: f64,
        stack_mass_kg: f64,
    ) -> f64 {
        let transfer = leg.propellant_kg * stack_mass_kg / estimate_mass_kg;
        let craft = &vehicle.craft;
        let isp = craft.propulsion.isp_seconds();
        let after_transfer = stack_mass_kg - transfer;
        let docking = propellant_mass_kg(after_transfer, craft.docking_delta_v_km_s, isp);
        match &vehicle.role {
            VehicleRole::Mothership { .. } => MOTHERSHIP_PROPELLANT_MARGIN * transfer + docking,
            VehicleRole::Picker => transfer + docking,
            VehicleRole::Shuttle {
                max_drop_altitude_km,
                ..
            } => {
                let captured = after_transfer - docking + target.mass_kg;
                let reserve = drop_reserve(
                    &craft.propulsion,
                    &target.elements,
                    *max_drop_altitude_km,
                    captured,
                );
                transfer + docking + reserve
            }
        }
    }

    /// Clamp the clock at the mission horizon, reporting whether it was reached.
    fn past_horizon(&self, state: &mut VehicleState<'_>) -> bool {
        if state.elapsed_s > self.scales.year_limit_s {
            state.elapsed_s = self.scales.year_limit_s;
            return true;
        }
        false
    }

    /// Unwrap a leg estimate, or record the target as skipped.
    fn leg_or_skip(
        &self,
        estimate: Result<LegEstimate, TransferError>,
        state: &VehicleState<'_>,
        index: usize,
        target: &Target,
        log: &mut AgentLog,
        outcome: &mut RouteOutcome<'_>,
    ) -> Option<LegEstimate> {
        match estimate {
            Ok(leg) => Some(leg),
            Err(err) => {
                if err.is_degenerate_phasing() {
                    outcome.degenerate += 1;
                }
                debug!(vehicle = state.vehicle.name(), target = %target.id, %err, "leg skipped");
                outcome.skipped += 1;
                log.push(skip_event(state, index));
                None
            }
        }
    }

    fn fly_leg<R: Rng + ?Sized>(
        &self,
        state: &mut VehicleState<'a>,
        index: usize,
        target: &'a Target,
        rng: &mut R,
        log: &mut AgentLog,
        outcome: &mut RouteOutcome<'a>,
    ) -> Result<Leg, TransferError> {
        let vehicle = state.vehicle;
        let propulsion = vehicle.craft.propulsion;
        // A vehicle still sharing a target's orbit only knows it as well as the target.
        let origin = UncertainOrbit {
            mean: state.orbit_now(),
            sigma: state
                .at_target
                .and_then(|i| self.targets.get(i))
                .map_or(ElementUncertainty::ZERO, |occupied| occupied.sigma),
        };
        let destination = target.orbit_at(state.elapsed_s)?;
        let estimate = |mass_kg: f64, rng: &mut R| {
            self.sampler
                .estimate_leg(&origin, &destination, &propulsion, mass_kg, rng)
        };

        let first = estimate(state.mass_kg(), rng);
        let Some(mut leg) = self.leg_or_skip(first, state, index, target, log, outcome) else {
            return Ok(Leg::Skipped);
        };

        let stack = state.mass_kg();
        let required_now = self.required_propellant(vehicle, target, &leg, stack, stack);
        if required_now > state.propellant_kg {
            let required_full =
                self.required_propellant(vehicle, target, &leg, stack, state.full_tank_mass_kg());
            if required_full > state.nominal_propellant_kg() {
                debug!(vehicle = vehicle.name(), target = %target.id, required_full, "unreachable");
                outcome.skipped += 1;
                log.push(skip_event(state, index));
                return Ok(Leg::Skipped);
            }
            if state.refuels_remaining == 0 {
                return Ok(Leg::Stop(TerminationReason::PropellantExhausted));
            }
            outcome.refuel_mass_kg += state.nominal_propellant_kg() - state.propellant_kg;
            state.propellant_kg = state.nominal_propellant_kg();
            state.refuels_remaining -= 1;
            log.push(state.event(EventKind::Refuel));

            // Propellant, flight time, and phasing all change with the heavier stack.
            let again = estimate(state.mass_kg(), rng);
            let Some(refuelled) = self.leg_or_skip(again, state, index, target, log, outcome) else {
                return Ok(Leg::Skipped);
            };
            leg = refuelled;
            let stack = state.mass_kg();
            if self.required_propellant(vehicle, target, &leg, stack, stack) > state.propellant_kg {
                debug!(vehicle = vehicle.name(), target = %target.id, "short after refuel");
                outcome.skipped += 1;
                log.push(skip_event(state, index));
                return Ok(Leg::Skipped);
            }
        }

        // Transfer, including the phasing loiter before it.
        state.elapsed_s += leg.wait_s + leg.time_of_flight_s;
        state.propellant_kg -= leg.propellant_kg;
        outcome.delta_v_km_s += leg.delta_v_km_s;
        outcome.used = true;
        if self.past_horizon(state) {
            return Ok(Leg::Stop(TerminationReason::TimeLimit));
        }

        let arrival = target.orbit_at(state.elapsed_s)?.mean;
        state.settle_in(arrival)?;
        state.at_target = Some(index);
        let mut arrive = state.event(EventKind::Arrive);
        arrive.target = Some(index);
        arrive.delta_v_km_s = leg.delta_v_km_s;
        arrive.wait_s = leg.wait_s;
        log.push(arrive);

        let craft = &vehicle.craft;
        let docking_propellant = propellant_mass_kg(
            state.mass_kg(),
            craft.docking_delta_v_km_s,
            propulsion.isp_seconds(),
        );
        state.propellant_kg -= docking_propellant;
        state.elapsed_s += craft.docking_time_s;
        outcome.delta_v_km_s += craft.docking_delta_v_km_s;
        if self.past_horizon(state) {
            return Ok(Leg::Stop(TerminationReason::TimeLimit));
        }
        let mut capture = state.event(EventKind::Capture);
        capture.target = Some(index);
        capture.captured = Some(index);
        capture.delta_v_km_s = craft.docking_delta_v_km_s;

        match &vehicle.role {
            VehicleRole::Picker => {
                outcome.credit(index, target);
                capture.score = target.risk_score;
                log.push(capture);
                Ok(Leg::Stop(TerminationReason::Attached))
            }
            VehicleRole::Shuttle {
                max_drop_altitude_km,
                ..
            } => {
                log.push(capture);
                self.shuttle_drop(state, index, target, *max_drop_altitude_km, rng, log, outcome)
            }
            VehicleRole::Mothership {
                max_drop_altitude_km,
                ..
            } => {
                log.push(capture);
                self.dispatch_module(state, index, target, *max_drop_altitude_km, rng, log, outcome)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn shuttle_drop<R: Rng + ?Sized>(
        &self,
        state: &mut VehicleState<'a>,
        index: usize,
        target: &'a Target,
        max_drop_altitude_km: f64,
        rng: &mut R,
        log: &mut AgentLog,
        outcome: &mut RouteOutcome<'a>,
    ) -> Result<Leg, TransferError> {
        let here = state.orbit_now();
        let stack = state.mass_kg() + target.mass_kg;
        let propulsion = state.vehicle.craft.propulsion;
        let disposal = self.disposal(
            &propulsion,
            UncertainOrbit {
                mean: here,
                sigma: target.sigma,
            },
            stack,
            state.propellant_kg,
            max_drop_altitude_km,
            rng,
        );

        let Some((orbit, cost)) = disposal else {
            outcome.skipped += 1;
            log.push(skip_event(state, index));
            return Ok(Leg::Stop(TerminationReason::DisposalUnreachable));
        };

        state.propellant_kg -= cost.propellant_kg;
        state.elapsed_s += cost.time_of_flight_s;
        outcome.delta_v_km_s += cost.delta_v_km_s;
        if self.past_horizon(state) {
            return Ok(Leg::Stop(TerminationReason::TimeLimit));
        }
        // The node keeps drifting with the capture orbit until the drop ends.
        let drifted = orbit.with_raan(state.orbit_now().raan_deg);
        state.settle_in(drifted)?;
        state.at_target = None;
        outcome.credit(index, target);

        let mut release = state.event(EventKind::Release);
        release.target = Some(index);
        release.released = Some(index);
        release.score = target.risk_score;
        release.delta_v_km_s = cost.delta_v_km_s;
        log.push(release);
        Ok(Leg::Serviced)
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch_module<R: Rng + ?Sized>(
        &self,
        state: &mut VehicleState<'a>,
        index: usize,
        target: &'a Target,
        max_drop_altitude_km: f64,
        rng: &mut R,
        log: &mut AgentLog,
        outcome: &mut RouteOutcome<'a>,
    ) -> Result<Leg, TransferError> {
        let Some(module) = state.remaining_modules().first() else {
            return Ok(Leg::Stop(TerminationReason::ModulesExhausted));
        };
        let here = state.orbit_now();
        let disposal = self.disposal(
            &module.propulsion,
            UncertainOrbit {
                mean: here,
                sigma: target.sigma,
            },
            module.wet_mass_kg + target.mass_kg,
            module.propellant_mass_kg(),
            max_drop_altitude_km,
            rng,
        );

        let mut release = state.event(EventKind::Release);
        release.target = Some(index);
        release.released = Some(index);
        let done = disposal.and_then(|(orbit, cost)| {
            let end_s = state.elapsed_s + cost.time_of_flight_s;
            (end_s <= self.scales.year_limit_s).then_some((orbit, cost, end_s))
        });
        let Some((orbit, cost, end_s)) = done else {
            debug!(module = %module.name, target = %target.id, "module cannot dispose of target");
            outcome.skipped += 1;
            log.push(skip_event(state, index));
            return Ok(Leg::Skipped);
        };

        state.next_module += 1;
        outcome.credit(index, target);
        outcome.delta_v_km_s += cost.delta_v_km_s;
        log.push(release);
        let handover = module_log(module, index, here, orbit, state.elapsed_s, end_s, target, &cost);
        outcome.module_logs.push((module.name.clone(), handover));
        Ok(Leg::Serviced)
    }

    /// Lowest candidate disposal orbit the stack can reach with `available_kg` propellant.
    ///
    /// Targets already at or below the highest permitted disposal altitude are released in
    /// place.
    fn disposal<R: Rng + ?Sized>(
        &self,
        propulsion: &PropulsionMode,
        from: UncertainOrbit,
        stack_mass_kg: f64,
        available_kg: f64,
        max_drop_altitude_km: f64,
        rng: &mut R,
    ) -> Option<(OrbitalElements, TransferCost)> {
        let altitude = sma_to_altitude_km(from.mean.a_km);
        if altitude <= max_drop_altitude_km {
            return Some((from.mean, TransferCost::default()));
        }
        DISPOSAL_ALTITUDES_KM
            .iter()
            .filter(|&&candidate| candidate <= max_drop_altitude_km && candidate < altitude)
            .find_map(|&candidate| {
                let orbit = OrbitalElements {
                    a_km: altitude_to_sma_km(candidate),
                    ..from.mean
                };
                let cost = self
                    .sampler
                    .estimate_transfer(&from, &UncertainOrbit::exact(orbit), propulsion, stack_mass_kg, rng)
                    .ok()?;
                (cost.propellant_kg <= available_kg).then_some((orbit, cost))
            })
    }
}

impl Objective for MissionSimulator<'_> {
    fn evaluate(&self, genome: &[usize]) -> f64 {
        match self.evaluate_genome(genome, false) {
            Ok((_, _, score)) => score,
            Err(err) => {
                warn!(%err, "genome could not be decoded");
                FITNESS_FLOOR
            }
        }
    }
}

/// Propellant to drop a stack of `mass_kg` from `orbit` to `max_drop_altitude_km` using mean
/// elements. Infinite when the drop cannot be costed.
fn drop_reserve(
    propulsion: &PropulsionMode,
    orbit: &OrbitalElements,
    max_drop_altitude_km: f64,
    mass_kg: f64,
) -> f64 {
    if sma_to_altitude_km(orbit.a_km) <= max_drop_altitude_km {
        return 0.0;
    }
    let disposal = OrbitalElements {
        a_km: altitude_to_sma_km(max_drop_altitude_km),
        ..*orbit
    };
    transfer_cost(orbit, &disposal, propulsion, mass_kg)
        .map(|cost| cost.propellant_kg)
        .unwrap_or(f64::INFINITY)
}

fn skip_event(state: &VehicleState<'_>, index: usize) -> MissionEvent {
    let mut event = state.event(EventKind::Skip);
    event.target = Some(index);
    event
}

#[allow(clippy::too_many_arguments)]
fn module_log(
    module: &DeorbitModule,
    index: usize,
    capture_orbit: OrbitalElements,
    disposal_orbit: OrbitalElements,
    start_s: f64,
    end_s: f64,
    target: &Target,
    cost: &TransferCost,
) -> AgentLog {
    let stamp = |time_s: f64, kind: EventKind, orbit: OrbitalElements, propellant_kg: f64| MissionEvent {
        time_s,
        kind,
        target: Some(index),
        captured: None,
        released: None,
        score: 0.0,
        propellant_kg,
        delta_v_km_s: 0.0,
        wait_s: 0.0,
        refuels_remaining: 0,
        orbit,
    };
    let full = module.propellant_mass_kg();
    let mut deployed = stamp(start_s, EventKind::Deployed, capture_orbit, full);
    deployed.captured = Some(index);
    let mut release = stamp(
        end_s,
        EventKind::Release,
        disposal_orbit,
        full - cost.propellant_kg,
    );
    release.released = Some(index);
    release.score = target.risk_score;
    release.delta_v_km_s = cost.delta_v_km_s;
    AgentLog {
        events: vec![deployed, release],
        termination: Some(TerminationReason::Expended),
        raan_profile: Vec::new(),
    }
}
