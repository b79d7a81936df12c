//! Generational loop: selection, variation, parallel evaluation, and a size-1 hall of fame.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::{debug, info};

use crate::config::{GaConfig, GeneticError};
use crate::operators::{ordered_crossover, random_permutation, shuffle_indexes, tournament};

/// Scalar objective maximised by the optimizer. Evaluations run concurrently, so the
/// objective must not depend on shared mutable state.
pub trait Objective: Sync {
    fn evaluate(&self, genome: &[usize]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[usize]) -> f64 + Sync,
{
    fn evaluate(&self, genome: &[usize]) -> f64 {
        self(genome)
    }
}

/// Genome with its cached fitness; `None` once a variation operator has touched it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    pub genome: Vec<usize>,
    pub fitness: Option<f64>,
}

impl Individual {
    pub fn new(genome: Vec<usize>) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Cached fitness, or negative infinity when not yet evaluated.
    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

/// Population statistics recorded once per generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub avg: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub best_ever: f64,
    pub evaluations: usize,
}

/// Outcome of an evolutionary run.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionResult {
    pub best: Individual,
    pub history: Vec<GenerationStats>,
    pub converged: bool,
}

impl EvolutionResult {
    pub fn best_fitness(&self) -> f64 {
        self.best.score()
    }
}

/// Stateless optimizer bound to a configuration, a genome length, and an objective.
pub struct GeneticOptimizer<'a, O: Objective> {
    config: GaConfig,
    genome_len: usize,
    objective: &'a O,
}

impl<'a, O: Objective> GeneticOptimizer<'a, O> {
    pub fn new(config: GaConfig, genome_len: usize, objective: &'a O) -> Result<Self, GeneticError> {
        config.validate(genome_len)?;
        Ok(Self {
            config,
            genome_len,
            objective,
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Run until convergence or the generation cap.
    pub fn run(&self) -> EvolutionResult {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cfg = &self.config;

        let mut population: Vec<Individual> = (0..cfg.population_size)
            .map(|_| Individual::new(random_permutation(self.genome_len, &mut rng)))
            .collect();
        let evaluations = self.evaluate_invalid(&mut population);

        let mut hall_of_fame = fittest(&population);
        let mut history = vec![record(0, &population, &hall_of_fame, evaluations)];
        let mut converged = false;

        for generation in 1..=cfg.max_generations {
            let mut offspring =
                tournament(&population, population.len(), cfg.tournament_size, &mut rng);

            for pair in offspring.chunks_exact_mut(2) {
                if rng.gen_bool(cfg.cross_prob) {
                    let (a, b) = ordered_crossover(&pair[0].genome, &pair[1].genome, &mut rng);
                    pair[0] = Individual::new(a);
                    pair[1] = Individual::new(b);
                }
            }
            for individual in offspring.iter_mut() {
                if rng.gen_bool(cfg.ind_mutate_prob)
                    && shuffle_indexes(&mut individual.genome, cfg.bit_mutate_prob, &mut rng)
                {
                    individual.fitness = None;
                }
            }

            let evaluations = self.evaluate_invalid(&mut offspring);
            population = offspring;

            let leader = fittest(&population);
            if leader.score() > hall_of_fame.score() {
                hall_of_fame = leader;
            }
            let stats = record(generation, &population, &hall_of_fame, evaluations);
            debug!(
                generation,
                avg = stats.avg,
                max = stats.max,
                best_ever = stats.best_ever,
                evaluations,
                "generation complete"
            );
            history.push(stats);

            if generation >= cfg.min_generations && self.has_converged(&history) {
                converged = true;
                break;
            }
        }

        info!(
            generations = history.len() - 1,
            best = hall_of_fame.score(),
            converged,
            "evolution finished"
        );
        EvolutionResult {
            best: hall_of_fame,
            history,
            converged,
        }
    }

    /// Evaluate every individual without a cached fitness, in parallel.
    fn evaluate_invalid(&self, population: &mut [Individual]) -> usize {
        let objective = self.objective;
        population
            .par_iter_mut()
            .filter(|individual| individual.fitness.is_none())
            .map(|individual| {
                individual.fitness = Some(objective.evaluate(&individual.genome));
            })
            .count()
    }

    /// Percent change between the latest average fitness and the mean of the preceding
    /// window, compared against the threshold.
    fn has_converged(&self, history: &[GenerationStats]) -> bool {
        let window = self.config.convergence_window;
        if history.len() < window {
            return false;
        }
        let recent = &history[history.len() - window..];
        let latest = recent[window - 1].avg;
        let previous = recent[..window - 1].iter().map(|s| s.avg).mean();
        let change = (previous - latest).abs();
        if latest == 0.0 {
            return change == 0.0;
        }
        change * 100.0 / latest.abs() < self.config.convergence_threshold_pct
    }
}

fn fittest(population: &[Individual]) -> Individual {
    population
        .iter()
        .max_by(|a, b| a.score().total_cmp(&b.score()))
        .cloned()
        .unwrap_or_else(|| Individual::new(Vec::new()))
}

fn record(
    generation: usize,
    population: &[Individual],
    hall_of_fame: &Individual,
    evaluations: usize,
) -> GenerationStats {
    let scores: Vec<f64> = population.iter().map(Individual::score).collect();
    GenerationStats {
        generation,
        avg: scores.iter().mean(),
        std: scores.iter().population_std_dev(),
        min: Statistics::min(scores.iter()),
        max: Statistics::max(scores.iter()),
        best_ever: hall_of_fame.score(),
        evaluations,
    }
}
