//! Running state of one vehicle during a single evaluation.
//!
//! Built fresh from the read-only fleet template for every evaluation, so concurrent
//! evaluations never share mutable data.

use adr_core::elements::OrbitalElements;
use adr_orbits::raan_rate_deg_s;
use adr_propulsion::{DeorbitModule, Vehicle, VehicleRole};

use crate::cost::TransferError;
use crate::mission::log::{EventKind, MissionEvent, RaanSample};

/// Orbit occupied from `start_s` onwards, with its node valid at `start_s`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start_s: f64,
    orbit: OrbitalElements,
    rate_deg_s: f64,
}

impl Segment {
    fn new(start_s: f64, orbit: OrbitalElements) -> Result<Self, TransferError> {
        Ok(Self {
            start_s,
            orbit,
            rate_deg_s: raan_rate_deg_s(orbit.a_km, orbit.inc_deg)?,
        })
    }

    fn raan_at(&self, time_s: f64) -> f64 {
        self.orbit.raan_deg + self.rate_deg_s * (time_s - self.start_s)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct VehicleState<'a> {
    pub vehicle: &'a Vehicle,
    pub propellant_kg: f64,
    pub refuels_remaining: u32,
    pub elapsed_s: f64,
    pub next_module: usize,
    /// Target whose orbit the vehicle currently shares.
    pub at_target: Option<usize>,
    segments: Vec<Segment>,
}

impl<'a> VehicleState<'a> {
    pub fn deploy(vehicle: &'a Vehicle) -> Result<Self, TransferError> {
        Ok(Self {
            vehicle,
            propellant_kg: vehicle.craft.propellant_mass_kg(),
            refuels_remaining: vehicle.refuels(),
            elapsed_s: 0.0,
            next_module: 0,
            at_target: None,
            segments: vec![Segment::new(0.0, vehicle.craft.initial_orbit)?],
        })
    }

    pub fn modules(&self) -> &'a [DeorbitModule] {
        match &self.vehicle.role {
            VehicleRole::Mothership { modules, .. } => modules,
            _ => &[],
        }
    }

    pub fn remaining_modules(&self) -> &'a [DeorbitModule] {
        let modules = self.modules();
        &modules[self.next_module.min(modules.len())..]
    }

    fn carried_mass_kg(&self) -> f64 {
        self.remaining_modules()
            .iter()
            .map(|module| module.wet_mass_kg)
            .sum()
    }

    /// Current stack mass: dry, remaining propellant, and any carried modules.
    pub fn mass_kg(&self) -> f64 {
        self.vehicle.craft.dry_mass_kg() + self.propellant_kg + self.carried_mass_kg()
    }

    /// Stack mass if the tank were full right now.
    pub fn full_tank_mass_kg(&self) -> f64 {
        self.vehicle.craft.wet_mass_kg + self.carried_mass_kg()
    }

    pub fn nominal_propellant_kg(&self) -> f64 {
        self.vehicle.craft.propellant_mass_kg()
    }

    /// Orbit at the current mission time, node drifted since the last manoeuvre.
    pub fn orbit_now(&self) -> OrbitalElements {
        self.orbit_at(self.elapsed_s)
    }

    fn orbit_at(&self, time_s: f64) -> OrbitalElements {
        let segment = self
            .segments
            .iter()
            .rev()
            .find(|segment| segment.start_s <= time_s)
            .or(self.segments.first());
        match segment {
            Some(segment) => segment.orbit.with_raan(segment.raan_at(time_s)),
            None => self.vehicle.craft.initial_orbit,
        }
    }

    /// Switch to a new orbit at the current mission time.
    pub fn settle_in(&mut self, orbit: OrbitalElements) -> Result<(), TransferError> {
        self.segments.push(Segment::new(self.elapsed_s, orbit)?);
        Ok(())
    }

    /// Node angle sampled every `step_s` from deployment to `end_s`.
    pub fn raan_profile(&self, end_s: f64, step_s: f64) -> Vec<RaanSample> {
        if !(step_s > 0.0) || !end_s.is_finite() {
            return Vec::new();
        }
        let steps = (end_s / step_s).floor() as usize;
        let mut profile: Vec<RaanSample> = (0..=steps)
            .map(|k| {
                let time_s = k as f64 * step_s;
                RaanSample {
                    time_s,
                    raan_deg: self.orbit_at(time_s).raan_deg,
                }
            })
            .collect();
        if profile.last().map(|s| s.time_s < end_s).unwrap_or(true) {
            profile.push(RaanSample {
                time_s: end_s,
                raan_deg: self.orbit_at(end_s).raan_deg,
            });
        }
        profile
    }

    /// Event stamped with the current time, propellant, refuels, and orbit.
    pub fn event(&self, kind: EventKind) -> MissionEvent {
        MissionEvent {
            time_s: self.elapsed_s,
            kind,
            target: None,
            captured: None,
            released: None,
            score: 0.0,
            propellant_kg: self.propellant_kg,
            delta_v_km_s: 0.0,
            wait_s: 0.0,
            refuels_remaining: self.refuels_remaining,
            orbit: self.orbit_now(),
        }
    }
}
