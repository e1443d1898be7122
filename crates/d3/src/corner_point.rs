//! Corner-point heuristic for 3D bin packing.
//!
//! Each bin keeps a frontier of anchor points, starting with the origin. An
//! item goes at the lowest anchor (by z, then y, then x) where one of its
//! rotations fits inside the bin without overlapping anything already placed.
//! The consumed anchor is dropped and the seven other corners of the placed
//! box become new anchors when they lie strictly inside the bin.
//!
//! Anchors are never pruned when they end up inside or on top of a later box;
//! the overlap test rejects them instead.

use crate::boundary::Container3D;
use crate::geometry::{fits_within, Item3D};
use crate::packing_utils::{exceeds_weight, volume_descending_order, WEIGHT_EPSILON};
use nalgebra::Vector3;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use u_packing_core::placement::overlaps;
use u_packing_core::Placement;

/// Offsets (in units of the placed extents) of the seven corners that are
/// added as anchors after a placement.
const CORNER_OFFSETS: [(u64, u64, u64); 7] = [
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 1, 0),
    (1, 0, 1),
    (0, 1, 1),
    (1, 1, 1),
];

/// Anchor wrapper ordered by (z, y, x).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderedAnchor(Vector3<u64>);

impl OrderedAnchor {
    fn key(&self) -> (u64, u64, u64) {
        (self.0.z, self.0.y, self.0.x)
    }
}

impl PartialOrd for OrderedAnchor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedAnchor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// A single bin being filled with the corner-point rule.
#[derive(Debug, Clone)]
pub struct CornerPointBin {
    container: Vector3<u64>,
    max_weight: f64,
    anchors: BTreeSet<OrderedAnchor>,
    placed: Vec<Placement>,
    weight: f64,
}

impl CornerPointBin {
    /// Creates an empty bin with a single anchor at the origin.
    pub fn new(container: &Container3D) -> Self {
        let mut anchors = BTreeSet::new();
        anchors.insert(OrderedAnchor(Vector3::zeros()));

        Self {
            container: *container.dimensions(),
            max_weight: container.max_weight(),
            anchors,
            placed: Vec::new(),
            weight: 0.0,
        }
    }

    /// Returns the anchors in the order they are tried.
    pub fn anchors(&self) -> impl Iterator<Item = Vector3<u64>> + '_ {
        self.anchors.iter().map(|a| a.0)
    }

    /// Returns the placements made so far.
    pub fn placements(&self) -> &[Placement] {
        &self.placed
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns true if nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Returns the total placed weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the total placed volume.
    pub fn placed_volume(&self) -> u64 {
        self.placed.iter().map(Placement::volume).sum()
    }

    /// Returns true if a box of `dims` at `position` stays inside the bin and
    /// clear of every placed box.
    pub fn is_free(&self, position: &Vector3<u64>, dims: &Vector3<u64>) -> bool {
        let reach = position + dims;
        if !fits_within(&reach, &self.container) {
            return false;
        }
        !self
            .placed
            .iter()
            .any(|p| overlaps(position, dims, &p.position, &p.dimensions))
    }

    /// Tries to place `item` using the given rotations.
    ///
    /// Anchors are the outer loop and rotations the inner one, so the lowest
    /// anchor that admits any rotation wins. Returns the placement (in bin 0)
    /// on success; the bin is left untouched on failure.
    pub fn try_place(
        &mut self,
        item: &Item3D,
        item_index: usize,
        rotations: &[Vector3<u64>],
    ) -> Option<Placement> {
        if self.weight + item.weight() > self.max_weight + WEIGHT_EPSILON {
            return None;
        }

        let (anchor, dims) = self.anchors.iter().find_map(|anchor| {
            rotations
                .iter()
                .find(|dims| self.is_free(&anchor.0, dims))
                .map(|dims| (*anchor, *dims))
        })?;

        self.anchors.remove(&anchor);
        let placement = Placement::new(item.id(), item_index, anchor.0, dims);
        self.add_corners(&placement);
        self.weight += item.weight();
        self.placed.push(placement.clone());

        Some(placement)
    }

    fn add_corners(&mut self, placed: &Placement) {
        for &(dx, dy, dz) in &CORNER_OFFSETS {
            let corner = placed.position
                + Vector3::new(
                    dx * placed.dimensions.x,
                    dy * placed.dimensions.y,
                    dz * placed.dimensions.z,
                );
            if (0..3).all(|axis| corner[axis] < self.container[axis]) {
                self.anchors.insert(OrderedAnchor(corner));
            }
        }
    }
}

/// Result of packing one container.
#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    /// Placements in the order they were made.
    pub placements: Vec<Placement>,

    /// Indices of items that fit the empty container but found no room.
    pub unplaced: Vec<usize>,

    /// Indices of items that fit no rotation of the empty container, or
    /// exceed its weight limit on their own.
    pub unplaceable: Vec<usize>,

    /// Total placed volume.
    pub placed_volume: u64,
}

impl PackOutcome {
    /// Returns every unplaced index, for either reason, in ascending order.
    pub fn all_unplaced(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self
            .unplaced
            .iter()
            .chain(self.unplaceable.iter())
            .copied()
            .collect();
        all.sort_unstable();
        all
    }
}

/// Packs `items` into a single container, largest volume first.
///
/// Ties in volume keep the input order.
pub fn pack(container: &Container3D, items: &[Item3D]) -> PackOutcome {
    let mut bin = CornerPointBin::new(container);
    let mut outcome = PackOutcome::default();

    for index in volume_descending_order(items) {
        let item = &items[index];
        let rotations: Vec<Vector3<u64>> = item
            .rotations()
            .into_iter()
            .filter(|r| container.fits(r))
            .collect();

        if rotations.is_empty() || exceeds_weight(item, container) {
            log::debug!("item '{}' cannot fit an empty container", item.id());
            outcome.unplaceable.push(index);
            continue;
        }

        match bin.try_place(item, index, &rotations) {
            Some(placement) => outcome.placements.push(placement),
            None => outcome.unplaced.push(index),
        }
    }

    outcome.placed_volume = bin.placed_volume();
    log::debug!(
        "corner-point packing placed {}/{} items ({} anchors left)",
        outcome.placements.len(),
        items.len(),
        bin.anchors.len()
    );

    outcome
}
