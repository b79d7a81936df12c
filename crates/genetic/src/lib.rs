//! Generic evolutionary search over fixed-length permutation genomes.

pub mod config;
pub mod operators;
pub mod optimizer;

pub use config::{GaConfig, GaOverrides, GeneticError};
pub use optimizer::{EvolutionResult, GenerationStats, GeneticOptimizer, Individual, Objective};
