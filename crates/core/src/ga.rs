//! Genetic Algorithm framework for optimization.
//!
//! The evolutionary loop is truncation-selection based: every generation the
//! population is evaluated, sorted best-first, the best `parent_count`
//! individuals survive unchanged, and the rest of the population is refilled
//! with children of two parents drawn uniformly at random from the survivors.
//!
//! Fitness follows the "higher is better" convention throughout.

use crate::solver::Config;
use rand::prelude::*;
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the genetic algorithm.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Population size.
    pub population_size: usize,
    /// Number of generations to run.
    pub max_generations: u32,
    /// Number of best individuals kept as parents each generation.
    pub parent_count: usize,
    /// Probability that a child is mutated (0.0 - 1.0).
    pub mutation_rate: f64,
    /// RNG seed (None = thread RNG).
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            parent_count: 10,
            mutation_rate: 0.1,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, gen: u32) -> Self {
        self.max_generations = gen;
        self
    }

    /// Sets the number of parents kept each generation.
    pub fn with_parent_count(mut self, count: usize) -> Self {
        self.parent_count = count.max(1);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl From<&Config> for GaConfig {
    fn from(config: &Config) -> Self {
        Self {
            population_size: config.population_size,
            max_generations: config.max_generations,
            parent_count: config.parent_count,
            mutation_rate: config.mutation_rate,
            seed: config.seed,
        }
    }
}

/// Trait for individuals in the genetic algorithm.
///
/// Crossover and mutation are defined on the individual itself.
pub trait Individual: Clone + Send + Sync {
    /// The fitness type (usually f64).
    type Fitness: PartialOrd + Copy + Send + Into<f64>;

    /// Returns the fitness of this individual.
    fn fitness(&self) -> Self::Fitness;

    /// Performs crossover with another individual.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;

    /// Mutates this individual in place.
    fn mutate<R: Rng>(&mut self, rng: &mut R);
}

/// Trait for problem-specific GA operations.
pub trait GaProblem: Send + Sync {
    /// The individual type for this problem.
    type Individual: Individual;

    /// Evaluates the fitness of an individual.
    fn evaluate(&self, individual: &mut Self::Individual);

    /// Evaluates multiple individuals in parallel.
    fn evaluate_parallel(&self, individuals: &mut [Self::Individual]) {
        individuals.par_iter_mut().for_each(|ind| {
            self.evaluate(ind);
        });
    }

    /// Creates an initial population of exactly `size` individuals.
    fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Individual>;

    /// Called after each generation has been evaluated and sorted.
    fn on_generation(
        &self,
        _generation: u32,
        _best: &Self::Individual,
        _population: &[Self::Individual],
    ) {
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Best individual of the final generation.
    pub best: I,
    /// Generations run.
    pub generations: u32,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Best fitness per generation, plus the final evaluation.
    pub history: Vec<f64>,
}

/// Genetic algorithm runner.
pub struct GaRunner<P: GaProblem> {
    config: GaConfig,
    problem: P,
}

impl<P: GaProblem> GaRunner<P> {
    /// Creates a new GA runner.
    pub fn new(config: GaConfig, problem: P) -> Self {
        Self { config, problem }
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Consumes the runner and returns the problem.
    pub fn into_problem(self) -> P {
        self.problem
    }

    /// Runs the genetic algorithm, seeding the RNG from the configuration
    /// when a seed is set.
    pub fn run(&self) -> GaResult<P::Individual> {
        match self.config.seed {
            Some(seed) => self.run_with_rng(&mut StdRng::seed_from_u64(seed)),
            None => self.run_with_rng(&mut thread_rng()),
        }
    }

    /// Runs the genetic algorithm with a specific RNG.
    ///
    /// After the last reproduction step the final population is evaluated
    /// and sorted once more, and its head is returned.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> GaResult<P::Individual> {
        let start = Instant::now();
        let size = self.config.population_size.max(2);
        let parent_count = self.config.parent_count.clamp(1, size);
        let mut history = Vec::with_capacity(self.config.max_generations as usize + 1);

        let mut population = self.problem.initialize_population(size, rng);

        for generation in 0..self.config.max_generations {
            self.problem.evaluate_parallel(&mut population);
            sort_best_first(&mut population);

            history.push(population[0].fitness().into());
            self.problem
                .on_generation(generation, &population[0], &population);

            let parents = &population[..parent_count.min(population.len())];
            let mut next = parents.to_vec();

            while next.len() < size {
                let (parent1, parent2) = pick_two(parents, rng);
                let mut child = parent1.crossover(parent2, rng);

                if rng.gen::<f64>() < self.config.mutation_rate {
                    child.mutate(rng);
                }

                next.push(child);
            }

            population = next;
        }

        self.problem.evaluate_parallel(&mut population);
        sort_best_first(&mut population);
        history.push(population[0].fitness().into());

        GaResult {
            best: population[0].clone(),
            generations: self.config.max_generations,
            elapsed: start.elapsed(),
            history,
        }
    }
}

/// Sorts by fitness, best (highest) first. Stable, so ties keep their order.
fn sort_best_first<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        b.fitness()
            .partial_cmp(&a.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Draws two distinct parents uniformly at random (the same one twice only
/// when a single parent exists).
fn pick_two<'a, I, R: Rng>(parents: &'a [I], rng: &mut R) -> (&'a I, &'a I) {
    let n = parents.len();
    let i = rng.gen_range(0..n);
    if n < 2 {
        return (&parents[i], &parents[i]);
    }

    let mut j = rng.gen_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (&parents[i], &parents[j])
}

/// Single-point order crossover.
///
/// The child takes `first[..cut]` and then every remaining gene in the order
/// it appears in `second`, so two permutations always produce a permutation.
pub fn one_point_order_crossover(first: &[usize], second: &[usize], cut: usize) -> Vec<usize> {
    let n = first.len();
    let cut = cut.min(n);
    let mut used = vec![false; n];
    let mut child = Vec::with_capacity(n);

    for &gene in &first[..cut] {
        if let Some(flag) = used.get_mut(gene) {
            *flag = true;
        }
        child.push(gene);
    }

    for &gene in second {
        if let Some(flag) = used.get_mut(gene) {
            if !*flag {
                *flag = true;
                child.push(gene);
            }
        }
    }

    child
}

/// Chromosome representation for permutation-based problems.
#[derive(Debug, Clone)]
pub struct PermutationChromosome {
    /// The permutation (indices).
    pub genes: Vec<usize>,
    /// Cached fitness value.
    fitness: f64,
}

impl PermutationChromosome {
    /// Creates the identity permutation of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            genes: (0..size).collect(),
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Creates a random permutation of the given size.
    pub fn random<R: Rng>(size: usize, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = (0..size).collect();
        genes.shuffle(rng);

        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Sets the fitness value.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Returns the number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns true if the genes form a permutation of `0..len`.
    pub fn is_valid_permutation(&self) -> bool {
        let mut seen = vec![false; self.genes.len()];
        self.genes.iter().all(|&gene| match seen.get_mut(gene) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        })
    }

    /// Swaps two distinct random positions.
    pub fn swap_mutate<R: Rng>(&mut self, rng: &mut R) {
        let n = self.genes.len();
        if n < 2 {
            return;
        }

        let i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        self.genes.swap(i, j);
        self.fitness = f64::NEG_INFINITY;
    }
}

impl Individual for PermutationChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        if self.genes.len() < 2 {
            return Self {
                genes: self.genes.clone(),
                fitness: f64::NEG_INFINITY,
            };
        }

        let cut = rng.gen_range(0..self.genes.len());
        Self {
            genes: one_point_order_crossover(&self.genes, &other.genes, cut),
            fitness: f64::NEG_INFINITY,
        }
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        self.swap_mutate(rng);
    }
}
