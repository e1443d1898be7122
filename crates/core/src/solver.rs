//! Solver traits and configuration.

use crate::result::SolveResult;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Corner-point heuristic over a single container, items in
    /// descending-volume order (fast, deterministic).
    #[default]
    CornerPoint,
    /// Genetic search over packing orders, opening containers on demand.
    GeneticAlgorithm,
}

/// Common configuration for solvers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Packing strategy.
    pub strategy: Strategy,

    // GA-specific parameters
    /// Population size for GA.
    pub population_size: usize,

    /// Number of generations for GA.
    pub max_generations: u32,

    /// Number of best individuals kept as parents each generation.
    pub parent_count: usize,

    /// Probability that a child is mutated (0.0 - 1.0).
    pub mutation_rate: f64,

    /// Fitness penalty per unplaced item, in bins.
    pub unplaced_penalty: f64,

    /// RNG seed for reproducible GA runs (None = thread RNG).
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            population_size: 50,
            max_generations: 100,
            parent_count: 10,
            mutation_rate: 0.1,
            unplaced_penalty: 0.1,
            seed: None,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the packing strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the number of parents kept each generation.
    pub fn with_parent_count(mut self, count: usize) -> Self {
        self.parent_count = count;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-item penalty for unplaced items.
    pub fn with_unplaced_penalty(mut self, penalty: f64) -> Self {
        self.unplaced_penalty = penalty;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::ConfigError(
                "Population size must be at least 2".into(),
            ));
        }

        if self.parent_count == 0 || self.parent_count > self.population_size {
            return Err(Error::ConfigError(format!(
                "Parent count must be between 1 and the population size ({})",
                self.population_size
            )));
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::ConfigError(
                "Mutation rate must be within 0.0 - 1.0".into(),
            ));
        }

        if !(self.unplaced_penalty >= 0.0) {
            return Err(Error::ConfigError(
                "Unplaced penalty cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

/// Trait for packing solvers.
pub trait Solver {
    /// The item type this solver handles.
    type Item;
    /// The container type this solver handles.
    type Container;

    /// Solves the packing problem.
    fn solve(&self, items: &[Self::Item], container: &Self::Container) -> Result<SolveResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.strategy, Strategy::CornerPoint);
        assert_eq!(config.population_size, 50);
        assert_eq!(config.max_generations, 100);
        assert_eq!(config.parent_count, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().with_population_size(1).validate().is_err());
        assert!(Config::default()
            .with_population_size(5)
            .with_parent_count(6)
            .validate()
            .is_err());
        assert!(Config::default().with_parent_count(0).validate().is_err());
        assert!(Config::default()
            .with_unplaced_penalty(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_mutation_rate_clamped() {
        let config = Config::default().with_mutation_rate(1.5);
        assert_eq!(config.mutation_rate, 1.0);
    }
}
