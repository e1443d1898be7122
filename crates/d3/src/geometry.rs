//! 3D item types and rotation enumeration.

use nalgebra::Vector3;
use std::collections::HashMap;
use u_packing_core::{Error, Product, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis permutations (x_axis, y_axis, z_axis), in the order rotations are tried.
pub const ORIENTATIONS: [(usize, usize, usize); 6] = [
    (0, 1, 2), // Original
    (0, 2, 1), // Rotated 90° around X
    (1, 0, 2), // Rotated 90° around Z
    (1, 2, 0), // Rotated 90° around X then Z
    (2, 0, 1), // Rotated 90° around Y
    (2, 1, 0), // Rotated 90° around Y then X
];

/// A 3D box item that can be packed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item3D {
    /// Identifier (not required to be unique).
    id: String,

    /// Dimensions (length, width, height).
    dimensions: Vector3<u64>,

    /// Weight counted against the container limit.
    weight: f64,
}

impl Item3D {
    /// Creates a new weightless item.
    pub fn new(id: impl Into<String>, length: u64, width: u64, height: u64) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(length, width, height),
            weight: 0.0,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the dimensions.
    pub fn dimensions(&self) -> &Vector3<u64> {
        &self.dimensions
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the volume.
    pub fn volume(&self) -> u64 {
        self.dimensions
            .x
            .saturating_mul(self.dimensions.y)
            .saturating_mul(self.dimensions.z)
    }

    /// Returns the distinct rotations of this item.
    pub fn rotations(&self) -> Vec<Vector3<u64>> {
        distinct_rotations(&self.dimensions)
    }

    /// Validates the item.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.iter().any(|&d| d == 0) {
            return Err(Error::InvalidProduct(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if !(self.weight >= 0.0) || !self.weight.is_finite() {
            return Err(Error::InvalidProduct(format!(
                "Weight for '{}' cannot be negative",
                self.id
            )));
        }

        Ok(())
    }
}

impl From<&Product> for Item3D {
    fn from(product: &Product) -> Self {
        Item3D::new(
            product.name(),
            product.length(),
            product.width(),
            product.height(),
        )
        .with_weight(product.weight())
    }
}

/// Returns every distinct axis permutation of `dims` (at most 6), in
/// [`ORIENTATIONS`] order.
pub fn distinct_rotations(dims: &Vector3<u64>) -> Vec<Vector3<u64>> {
    let mut rotations: Vec<Vector3<u64>> = Vec::with_capacity(ORIENTATIONS.len());
    for &(x, y, z) in &ORIENTATIONS {
        let rotated = Vector3::new(dims[x], dims[y], dims[z]);
        if !rotations.contains(&rotated) {
            rotations.push(rotated);
        }
    }
    rotations
}

/// Returns true if `dims` fits inside `container` without rotation.
pub fn fits_within(dims: &Vector3<u64>, container: &Vector3<u64>) -> bool {
    (0..3).all(|axis| dims[axis] <= container[axis])
}

/// Sorted dimension triple, identical for every rotation of the same box.
pub fn normalized_key(dims: &Vector3<u64>) -> [u64; 3] {
    let mut key = [dims.x, dims.y, dims.z];
    key.sort_unstable();
    key
}

/// Memoized rotations that fit a fixed container, keyed by the normalized
/// dimension triple.
///
/// Lookups hand the rotations back in the order [`Item3D::rotations`] yields
/// them for the queried orientation, so a memoized search tries them exactly
/// like an unmemoized one. Owned by the packer instance that uses it; entries
/// never change once inserted.
#[derive(Debug, Clone)]
pub struct RotationCache {
    container: Vector3<u64>,
    entries: HashMap<[u64; 3], Vec<Vector3<u64>>>,
}

impl RotationCache {
    /// Creates an empty cache for a container.
    pub fn new(container: Vector3<u64>) -> Self {
        Self {
            container,
            entries: HashMap::new(),
        }
    }

    /// Creates a cache pre-filled for every item.
    pub fn for_items(container: Vector3<u64>, items: &[Item3D]) -> Self {
        let mut cache = Self::new(container);
        for item in items {
            cache.insert(item.dimensions());
        }
        cache
    }

    /// Computes and stores the fitting rotations for `dims`, returning them.
    pub fn insert(&mut self, dims: &Vector3<u64>) -> &[Vector3<u64>] {
        let key = normalized_key(dims);
        let container = self.container;
        self.entries.entry(key).or_insert_with(|| {
            let sorted = Vector3::new(key[0], key[1], key[2]);
            distinct_rotations(&sorted)
                .into_iter()
                .filter(|r| fits_within(r, &container))
                .collect()
        })
    }

    /// Returns the memoized rotations for `dims`, starting from `dims`
    /// itself, or nothing if the triple was never inserted.
    pub fn get(&self, dims: &Vector3<u64>) -> Vec<Vector3<u64>> {
        match self.entries.get(&normalized_key(dims)) {
            Some(fitting) => distinct_rotations(dims)
                .into_iter()
                .filter(|r| fitting.contains(r))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the number of distinct triples memoized.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_volume() {
        let item = Item3D::new("B1", 10, 20, 30).with_weight(1.5);
        assert_eq!(item.volume(), 6000);
        assert_eq!(item.weight(), 1.5);
    }

    #[test]
    fn test_distinct_rotations() {
        assert_eq!(Item3D::new("A", 1, 2, 3).rotations().len(), 6);
        assert_eq!(Item3D::new("B", 2, 2, 3).rotations().len(), 3);
        assert_eq!(Item3D::new("C", 4, 4, 4).rotations(), vec![Vector3::new(4, 4, 4)]);
    }

    #[test]
    fn test_first_rotation_is_original() {
        let rotations = Item3D::new("A", 5, 1, 3).rotations();
        assert_eq!(rotations[0], Vector3::new(5, 1, 3));
    }

    #[test]
    fn test_validation() {
        assert!(Item3D::new("ok", 1, 1, 1).validate().is_ok());
        assert!(Item3D::new("flat", 1, 0, 1).validate().is_err());
        assert!(Item3D::new("neg", 1, 1, 1)
            .with_weight(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_product() {
        let product = Product::new("Laptop", "Electronics", 30, 20, 2, 2.5);
        let item = Item3D::from(&product);

        assert_eq!(item.id(), "Laptop");
        assert_eq!(item.dimensions(), &Vector3::new(30, 20, 2));
        assert_eq!(item.weight(), 2.5);
    }

    #[test]
    fn test_rotation_cache_memoizes_by_normalized_triple() {
        let container = Vector3::new(10, 5, 5);
        let items = vec![
            Item3D::new("A", 8, 2, 3),
            Item3D::new("B", 3, 8, 2),
            Item3D::new("C", 2, 2, 2),
        ];
        let cache = RotationCache::for_items(container, &items);

        assert_eq!(cache.len(), 2);

        // Only rotations with the 8 along x fit a 10x5x5 container.
        let rotations = cache.get(&Vector3::new(3, 8, 2));
        assert_eq!(rotations.len(), 2);
        assert!(rotations.iter().all(|r| r.x == 8));

        let mut other = cache.get(&Vector3::new(8, 2, 3));
        other.reverse();
        assert_eq!(rotations, other);
    }

    #[test]
    fn test_rotation_cache_keeps_item_orientation_order() {
        let container = Vector3::new(10, 10, 10);
        let item = Item3D::new("A", 3, 8, 2);
        let cache = RotationCache::for_items(container, std::slice::from_ref(&item));

        let expected: Vec<Vector3<u64>> = item
            .rotations()
            .into_iter()
            .filter(|r| fits_within(r, &container))
            .collect();
        let memoized = cache.get(item.dimensions());

        assert_eq!(memoized[0], Vector3::new(3, 8, 2));
        assert_eq!(memoized, expected);
    }

    #[test]
    fn test_huge_item_volume_saturates() {
        let item = Item3D::new("slab", u64::MAX, 2, 2);
        assert_eq!(item.volume(), u64::MAX);
    }

    #[test]
    fn test_rotation_cache_oversized_and_missing() {
        let mut cache = RotationCache::new(Vector3::new(10, 10, 10));
        assert!(cache.insert(&Vector3::new(11, 1, 1)).is_empty());
        assert!(cache.get(&Vector3::new(1, 1, 1)).is_empty());
    }
}
