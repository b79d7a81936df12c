//! Event log recorded for every servicing agent (vehicle or deorbit module).

use adr_core::elements::OrbitalElements;
use serde::Serialize;

/// What happened at a logged instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Deployed,
    Refuel,
    Arrive,
    Capture,
    Release,
    Skip,
    Terminate,
}

/// Why an agent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    RouteComplete,
    PropellantExhausted,
    TimeLimit,
    ModulesExhausted,
    /// A picker stays attached to its first capture.
    Attached,
    DisposalUnreachable,
    /// A deorbit module is spent once it releases its target.
    Expended,
}

/// One row of an agent's event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionEvent {
    pub time_s: f64,
    pub kind: EventKind,
    /// Target the event concerns, if any.
    pub target: Option<usize>,
    pub captured: Option<usize>,
    pub released: Option<usize>,
    /// Risk credited by this event.
    pub score: f64,
    pub propellant_kg: f64,
    /// Delta-v spent by the manoeuvre ending at this event.
    pub delta_v_km_s: f64,
    /// Phasing wait flown before the manoeuvre ending at this event.
    pub wait_s: f64,
    pub refuels_remaining: u32,
    pub orbit: OrbitalElements,
}

/// Node angle sample for plotting plane drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaanSample {
    pub time_s: f64,
    pub raan_deg: f64,
}

/// Full history of one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentLog {
    pub events: Vec<MissionEvent>,
    pub termination: Option<TerminationReason>,
    pub raan_profile: Vec<RaanSample>,
}

impl AgentLog {
    pub fn push(&mut self, event: MissionEvent) {
        self.events.push(event);
    }

    /// Time of the last logged event.
    pub fn end_time_s(&self) -> f64 {
        self.events.last().map(|event| event.time_s).unwrap_or(0.0)
    }

    pub fn total_delta_v_km_s(&self) -> f64 {
        self.events.iter().map(|event| event.delta_v_km_s).sum()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }
}
