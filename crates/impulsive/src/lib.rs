//! Impulsive transfer utilities: classical two-burn transfer approximations.

pub mod transfers;

pub use transfers::{HohmannResult, ImpulsiveError, hohmann, hohmann_plane_change};
