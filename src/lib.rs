//! Multi-vehicle active debris removal planner.
//!
//! The library re-exports the workspace crates and adds the [`pipeline`] that ties
//! configuration loading, planning, and artifact export together, so that front-ends (the
//! CLI, tests, notebooks via bindings) share one code path.

pub mod pipeline;

pub use adr_config as config;
pub use adr_core as primitives;
pub use adr_export as export;
pub use adr_genetic as genetic;
pub use adr_impulsive as impulsive;
pub use adr_lowthrust as lowthrust;
pub use adr_orbits as orbits;
pub use adr_propulsion as propulsion;
pub use adr_routing as routing;
pub use adr_transfer as transfer;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
