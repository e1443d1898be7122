//! Genetic Algorithm based multi-bin 3D packing optimization.
//!
//! A chromosome is a permutation of item indices. Decoding packs the items in
//! that order: each item goes into the first open bin that accepts it under
//! the corner-point rule, and a fresh bin is opened only when every open bin
//! rejects it. Fitness counts the bins used plus a soft penalty per item that
//! could not be placed at all.

use crate::boundary::Container3D;
use crate::corner_point::CornerPointBin;
use crate::geometry::{Item3D, RotationCache};
use crate::packing_utils::{bin_fitness, exceeds_weight, utilization};
use rand::prelude::*;
use u_packing_core::ga::{
    GaConfig, GaProblem, GaResult, GaRunner, Individual, PermutationChromosome,
};
use u_packing_core::solver::Config;
use u_packing_core::{Placement, Result, SolveResult};

/// Decoded multi-bin layout of one packing order.
#[derive(Debug, Clone, Default)]
pub struct BinLayout {
    /// Placements, with `bin_index` set.
    pub placements: Vec<Placement>,
    /// Items that fit no bin in any rotation, in visiting order.
    pub unplaced: Vec<usize>,
    /// Number of bins opened.
    pub bins_used: usize,
    /// Total placed volume.
    pub placed_volume: u64,
}

/// Problem definition for GA-based multi-bin packing.
pub struct PackingProblem {
    /// Items to pack.
    items: Vec<Item3D>,
    /// Bin template.
    container: Container3D,
    /// Rotations memoized per normalized dimension triple.
    rotations: RotationCache,
    /// Fitness penalty per unplaced item.
    unplaced_penalty: f64,
}

impl PackingProblem {
    /// Creates a new packing problem, memoizing rotations for every item.
    pub fn new(items: Vec<Item3D>, container: Container3D, unplaced_penalty: f64) -> Self {
        let rotations = RotationCache::for_items(*container.dimensions(), &items);
        Self {
            items,
            container,
            rotations,
            unplaced_penalty,
        }
    }

    /// Returns the number of items.
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Returns the items.
    pub fn items(&self) -> &[Item3D] {
        &self.items
    }

    /// Returns the bin template.
    pub fn container(&self) -> &Container3D {
        &self.container
    }

    /// Returns the rotation memo.
    pub fn rotation_cache(&self) -> &RotationCache {
        &self.rotations
    }

    /// Decodes a packing order into a multi-bin layout.
    ///
    /// Indices outside the item range are skipped.
    pub fn decode(&self, order: &[usize]) -> BinLayout {
        let mut bins: Vec<CornerPointBin> = Vec::new();
        let mut layout = BinLayout::default();

        for &index in order {
            let Some(item) = self.items.get(index) else {
                continue;
            };

            let rotations = self.rotations.get(item.dimensions());
            if rotations.is_empty() || exceeds_weight(item, &self.container) {
                layout.unplaced.push(index);
                continue;
            }

            let mut placed = bins
                .iter_mut()
                .enumerate()
                .find_map(|(bin_index, bin)| {
                    bin.try_place(item, index, &rotations)
                        .map(|p| p.with_bin(bin_index))
                });

            if placed.is_none() {
                let mut bin = CornerPointBin::new(&self.container);
                placed = bin
                    .try_place(item, index, &rotations)
                    .map(|p| p.with_bin(bins.len()));
                if placed.is_some() {
                    bins.push(bin);
                }
            }

            match placed {
                Some(placement) => {
                    layout.placed_volume += placement.volume();
                    layout.placements.push(placement);
                }
                None => layout.unplaced.push(index),
            }
        }

        layout.bins_used = bins.len();
        layout
    }

    /// Returns the fitness of a decoded layout.
    pub fn fitness_of(&self, layout: &BinLayout) -> f64 {
        bin_fitness(layout.bins_used, layout.unplaced.len(), self.unplaced_penalty)
    }
}

impl GaProblem for PackingProblem {
    type Individual = PermutationChromosome;

    fn evaluate(&self, individual: &mut Self::Individual) {
        let layout = self.decode(&individual.genes);
        individual.set_fitness(self.fitness_of(&layout));
    }

    fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Individual> {
        (0..size)
            .map(|_| PermutationChromosome::random(self.num_items(), rng))
            .collect()
    }

    fn on_generation(
        &self,
        generation: u32,
        best: &Self::Individual,
        _population: &[Self::Individual],
    ) {
        log::debug!(
            "GA 3D Packing Gen {}: fitness={:.4}, items={}",
            generation,
            best.fitness(),
            best.len()
        );
    }
}

/// Searches packing orders that minimize the number of bins used.
///
/// The optimizer owns its rotation memo for its whole lifetime. After each
/// call to [`optimize`](Self::optimize) the accessors describe the layout of
/// the returned permutation.
pub struct GeneticOptimizer {
    runner: GaRunner<PackingProblem>,
    best: Option<GaResult<PermutationChromosome>>,
    layout: BinLayout,
}

impl GeneticOptimizer {
    /// Creates an optimizer for `items` packed into copies of `container`.
    pub fn new(container: Container3D, items: Vec<Item3D>, config: &Config) -> Result<Self> {
        config.validate()?;
        container.validate()?;
        for item in &items {
            item.validate()?;
        }

        let problem = PackingProblem::new(items, container, config.unplaced_penalty);
        Ok(Self {
            runner: GaRunner::new(GaConfig::from(config), problem),
            best: None,
            layout: BinLayout::default(),
        })
    }

    /// Runs the search and returns the best permutation found.
    pub fn optimize(&mut self) -> Vec<usize> {
        let result = self.runner.run();
        self.finish(result)
    }

    /// Runs the search with a specific RNG.
    pub fn optimize_with_rng<R: Rng>(&mut self, rng: &mut R) -> Vec<usize> {
        let result = self.runner.run_with_rng(rng);
        self.finish(result)
    }

    fn finish(&mut self, result: GaResult<PermutationChromosome>) -> Vec<usize> {
        self.layout = self.runner.problem().decode(&result.best.genes);
        let order = result.best.genes.clone();

        log::debug!(
            "GA 3D Packing finished: bins={}, unplaced={}, fitness={:.4}",
            self.layout.bins_used,
            self.layout.unplaced.len(),
            result.best.fitness()
        );

        self.best = Some(result);
        order
    }

    /// Returns the placements of the last optimized permutation.
    pub fn placements(&self) -> &[Placement] {
        &self.layout.placements
    }

    /// Returns the items the last optimized permutation could not place.
    pub fn unplaced_items(&self) -> &[usize] {
        &self.layout.unplaced
    }

    /// Returns the bins used by the last optimized permutation.
    pub fn bins_used(&self) -> usize {
        self.layout.bins_used
    }

    /// Returns the full result of the last run, if any.
    pub fn last_run(&self) -> Option<&GaResult<PermutationChromosome>> {
        self.best.as_ref()
    }

    /// Returns the number of distinct dimension triples memoized.
    pub fn memoized_rotations(&self) -> usize {
        self.runner.problem().rotation_cache().len()
    }

    /// Converts the last run into a [`SolveResult`].
    pub fn to_solve_result(&self) -> SolveResult {
        let container_volume = self.runner.problem().container().volume();
        let mut result = SolveResult::new().with_strategy("GeneticAlgorithm");

        result.placements = self.layout.placements.clone();
        result.unplaceable = self.layout.unplaced.clone();
        result.bins_used = self.layout.bins_used;
        result.utilization = utilization(
            self.layout.placed_volume,
            self.layout.bins_used,
            container_volume,
        );

        if let Some(run) = &self.best {
            result.computation_time_ms = run.elapsed.as_millis() as u64;
            result.generations = Some(run.generations);
            result.best_fitness = Some(run.best.fitness());
            result.fitness_history = Some(run.history.clone());
            result.best_order = Some(run.best.genes.clone());
        }

        result
    }
}

/// Runs GA-based multi-bin packing optimization.
pub fn run_ga_packing(
    items: &[Item3D],
    container: &Container3D,
    config: &Config,
) -> Result<SolveResult> {
    let mut optimizer = GeneticOptimizer::new(container.clone(), items.to_vec(), config)?;
    optimizer.optimize();
    Ok(optimizer.to_solve_result())
}
