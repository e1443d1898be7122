//! Placement record for items positioned inside a container.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The placement of one item inside one container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// ID of the placed item.
    pub item_id: String,

    /// Index of the item in the input slice.
    pub item_index: usize,

    /// Index of the container (bin) the item is placed in.
    pub bin_index: usize,

    /// Minimum corner (x, y, z).
    pub position: Vector3<u64>,

    /// Extents after the chosen rotation was applied.
    pub dimensions: Vector3<u64>,
}

impl Placement {
    /// Creates a new placement in bin 0.
    pub fn new(
        item_id: impl Into<String>,
        item_index: usize,
        position: Vector3<u64>,
        dimensions: Vector3<u64>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_index,
            bin_index: 0,
            position,
            dimensions,
        }
    }

    /// Sets the bin index.
    pub fn with_bin(mut self, index: usize) -> Self {
        self.bin_index = index;
        self
    }

    /// Returns the maximum corner.
    pub fn max_corner(&self) -> Vector3<u64> {
        self.position + self.dimensions
    }

    /// Returns the occupied volume.
    pub fn volume(&self) -> u64 {
        self.dimensions
            .x
            .saturating_mul(self.dimensions.y)
            .saturating_mul(self.dimensions.z)
    }

    /// Returns true if the two placements share interior volume.
    ///
    /// Boxes that only touch on a face are disjoint: two boxes are disjoint
    /// iff they are separated along at least one axis.
    pub fn overlaps(&self, other: &Placement) -> bool {
        overlaps(
            &self.position,
            &self.dimensions,
            &other.position,
            &other.dimensions,
        )
    }

    /// Returns true if the placement lies within `[0, L) x [0, W) x [0, H)`.
    pub fn within(&self, container: &Vector3<u64>) -> bool {
        (0..3).all(|axis| self.position[axis] + self.dimensions[axis] <= container[axis])
    }
}

/// Axis-aligned box overlap test on (min corner, extents) pairs.
pub fn overlaps(
    pos_a: &Vector3<u64>,
    dims_a: &Vector3<u64>,
    pos_b: &Vector3<u64>,
    dims_b: &Vector3<u64>,
) -> bool {
    (0..3).all(|axis| {
        pos_a[axis] < pos_b[axis] + dims_b[axis] && pos_b[axis] < pos_a[axis] + dims_a[axis]
    })
}
