//! Shared utilities for the 3D packing solvers.
//!
//! # Extracted Components
//!
//! - [`bin_fitness`]: Fitness formula used by the genetic optimizer
//! - [`utilization`]: Placed volume over the volume of the bins used
//! - [`volume_descending_order`]: Deterministic largest-first item order
//! - [`exceeds_weight`]: Single-item weight check against a container

use crate::boundary::Container3D;
use crate::geometry::Item3D;
use std::cmp::Reverse;

/// Tolerance for accumulated floating-point weight sums.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Computes multi-bin packing fitness, higher is better.
///
/// `fitness = -(bins_used + penalty * unplaced_count)`
///
/// Each bin costs one point; each unplaced item costs `penalty` points.
pub fn bin_fitness(bins_used: usize, unplaced_count: usize, penalty: f64) -> f64 {
    -(bins_used as f64 + penalty * unplaced_count as f64)
}

/// Returns placed volume divided by the combined volume of `bins_used` bins.
pub fn utilization(placed_volume: u64, bins_used: usize, container_volume: u64) -> f64 {
    let capacity = container_volume as f64 * bins_used as f64;
    if capacity > 0.0 {
        placed_volume as f64 / capacity
    } else {
        0.0
    }
}

/// Returns item indices ordered by volume, largest first. Stable for ties.
pub fn volume_descending_order(items: &[Item3D]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| Reverse(items[i].volume()));
    order
}

/// Returns true if the item alone is heavier than the container allows.
pub fn exceeds_weight(item: &Item3D, container: &Container3D) -> bool {
    item.weight() > container.max_weight() + WEIGHT_EPSILON
}
