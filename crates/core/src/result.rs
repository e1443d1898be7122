//! Solve result representation.

use crate::placement::Placement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a packing solve over one container type.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult {
    /// Placements for all successfully placed items.
    pub placements: Vec<Placement>,

    /// Indices of items that fit an empty container but lost the contention
    /// for space (or weight) against items placed earlier.
    pub unplaced: Vec<usize>,

    /// Indices of items that cannot fit an empty container in any rotation,
    /// or that are heavier than its weight limit on their own.
    pub unplaceable: Vec<usize>,

    /// Number of containers (bins) used.
    pub bins_used: usize,

    /// Placed volume divided by the total volume of the bins used (0.0 - 1.0).
    pub utilization: f64,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Number of generations (for GA-based solvers).
    pub generations: Option<u32>,

    /// Best fitness value achieved (for GA-based solvers).
    pub best_fitness: Option<f64>,

    /// Best fitness per generation (for analysis).
    pub fitness_history: Option<Vec<f64>>,

    /// Best packing order found (for GA-based solvers).
    pub best_order: Option<Vec<usize>>,

    /// Strategy used for solving.
    pub strategy: Option<String>,
}

impl SolveResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every item was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty() && self.unplaceable.is_empty()
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the number of items left out for any reason.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len() + self.unplaceable.len()
    }

    /// Returns placements that belong to a given bin.
    pub fn placements_in_bin(&self, bin: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.bin_index == bin)
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}
