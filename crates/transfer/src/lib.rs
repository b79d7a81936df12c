//! Transfer façade crate consolidating cost estimation and mission planning and exposing
//! supporting crates.

pub mod catalog;
pub mod cost;
pub mod mission;
pub mod uncertainty;

pub use adr_genetic as genetic;
pub use adr_impulsive as impulsive;
pub use adr_lowthrust as lowthrust;
pub use adr_orbits as orbits;
pub use adr_propulsion as propulsion;
pub use adr_routing as routing;
pub use facade::*;

mod facade;
