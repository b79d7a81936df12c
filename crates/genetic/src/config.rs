//! Optimizer parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised for invalid optimizer parameters.
#[derive(Debug, Error, PartialEq)]
pub enum GeneticError {
    #[error("genome length must be at least 2, got {0}")]
    GenomeTooShort(usize),
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("tournament size must be positive")]
    ZeroTournament,
    #[error("probability '{name}' must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("generation bounds are inconsistent (min {min}, max {max})")]
    GenerationBounds { min: usize, max: usize },
}

/// Parameters of a single evolutionary run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    pub population_size: usize,
    /// Generations always run before convergence is checked.
    pub min_generations: usize,
    /// Hard cap on generations.
    pub max_generations: usize,
    pub tournament_size: usize,
    pub cross_prob: f64,
    pub ind_mutate_prob: f64,
    pub bit_mutate_prob: f64,
    /// Window of average-fitness history used for convergence detection.
    pub convergence_window: usize,
    /// Percent change of average fitness under which the run is considered converged.
    pub convergence_threshold_pct: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            min_generations: 100,
            max_generations: 500,
            tournament_size: 3,
            cross_prob: 0.5,
            ind_mutate_prob: 0.2,
            bit_mutate_prob: 0.2,
            convergence_window: 5,
            convergence_threshold_pct: 1.0,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Defaults scaled to a problem with `num_targets` targets: larger instances get a
    /// cubically larger population and quadratically more generations.
    pub fn scaled_for(num_targets: usize) -> Self {
        let t = num_targets;
        let min_generations = 100 + t * t;
        Self {
            population_size: 100 + t * t * t,
            min_generations,
            max_generations: 5 * min_generations,
            ..Self::default()
        }
    }

    /// Apply any explicitly configured values on top of these.
    pub fn with_overrides(mut self, overrides: &GaOverrides) -> Self {
        if let Some(v) = overrides.population_size {
            self.population_size = v;
        }
        if let Some(v) = overrides.min_generations {
            self.min_generations = v;
            if overrides.max_generations.is_none() {
                self.max_generations = self.max_generations.max(v);
            }
        }
        if let Some(v) = overrides.max_generations {
            self.max_generations = v;
        }
        if let Some(v) = overrides.tournament_size {
            self.tournament_size = v;
        }
        if let Some(v) = overrides.cross_prob {
            self.cross_prob = v;
        }
        if let Some(v) = overrides.ind_mutate_prob {
            self.ind_mutate_prob = v;
        }
        if let Some(v) = overrides.bit_mutate_prob {
            self.bit_mutate_prob = v;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }

    pub fn validate(&self, genome_len: usize) -> Result<(), GeneticError> {
        if genome_len < 2 {
            return Err(GeneticError::GenomeTooShort(genome_len));
        }
        if self.population_size < 2 {
            return Err(GeneticError::PopulationTooSmall(self.population_size));
        }
        if self.tournament_size == 0 {
            return Err(GeneticError::ZeroTournament);
        }
        for (name, value) in [
            ("cross_prob", self.cross_prob),
            ("ind_mutate_prob", self.ind_mutate_prob),
            ("bit_mutate_prob", self.bit_mutate_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GeneticError::InvalidProbability { name, value });
            }
        }
        if self.max_generations < self.min_generations || self.convergence_window < 2 {
            return Err(GeneticError::GenerationBounds {
                min: self.min_generations,
                max: self.max_generations,
            });
        }
        Ok(())
    }
}

/// Partial optimizer settings, typically read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaOverrides {
    #[serde(default)]
    pub population_size: Option<usize>,
    #[serde(default)]
    pub min_generations: Option<usize>,
    #[serde(default)]
    pub max_generations: Option<usize>,
    #[serde(default)]
    pub tournament_size: Option<usize>,
    #[serde(default)]
    pub cross_prob: Option<f64>,
    #[serde(default)]
    pub ind_mutate_prob: Option<f64>,
    #[serde(default)]
    pub bit_mutate_prob: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
}
