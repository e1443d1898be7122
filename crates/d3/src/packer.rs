//! 3D bin packing solver.

use crate::boundary::Container3D;
use crate::corner_point::pack;
use crate::ga_packing::run_ga_packing;
use crate::geometry::Item3D;
use crate::packing_utils::utilization;
use u_packing_core::solver::{Config, Solver, Strategy};
use u_packing_core::{Result, SolveResult};

use std::time::Instant;

/// 3D bin packing solver.
#[derive(Debug, Clone, Default)]
pub struct Packer3D {
    config: Config,
}

impl Packer3D {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Corner-point packing into a single container.
    fn corner_point(&self, items: &[Item3D], container: &Container3D) -> SolveResult {
        let start = Instant::now();
        let outcome = pack(container, items);

        let mut result = SolveResult::new().with_strategy("CornerPoint");
        result.bins_used = usize::from(!outcome.placements.is_empty());
        result.utilization = utilization(outcome.placed_volume, 1, container.volume());
        result.placements = outcome.placements;
        result.unplaced = outcome.unplaced;
        result.unplaceable = outcome.unplaceable;
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        result
    }

    /// Genetic Algorithm based packing optimization.
    ///
    /// Searches packing orders over as many copies of the container as
    /// needed; every placeable item ends up in some bin.
    fn genetic_algorithm(&self, items: &[Item3D], container: &Container3D) -> Result<SolveResult> {
        run_ga_packing(items, container, &self.config)
    }
}

impl Solver for Packer3D {
    type Item = Item3D;
    type Container = Container3D;

    fn solve(&self, items: &[Self::Item], container: &Self::Container) -> Result<SolveResult> {
        container.validate()?;
        for item in items {
            item.validate()?;
        }
        self.config.validate()?;

        match self.config.strategy {
            Strategy::CornerPoint => Ok(self.corner_point(items, container)),
            Strategy::GeneticAlgorithm => self.genetic_algorithm(items, container),
        }
    }
}
