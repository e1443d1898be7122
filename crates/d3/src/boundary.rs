//! 3D container types.

use crate::geometry::fits_within;
use nalgebra::Vector3;
use u_packing_core::{BoxTemplate, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangular container (bin) with a weight limit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container3D {
    /// Dimensions (length, width, height).
    dimensions: Vector3<u64>,

    /// Maximum total weight allowed.
    max_weight: f64,
}

impl Container3D {
    /// Creates a new container with no effective weight limit.
    pub fn new(length: u64, width: u64, height: u64) -> Self {
        Self {
            dimensions: Vector3::new(length, width, height),
            max_weight: f64::MAX,
        }
    }

    /// Sets the maximum allowed weight.
    pub fn with_max_weight(mut self, weight: f64) -> Self {
        self.max_weight = weight;
        self
    }

    /// Returns the dimensions (length, width, height).
    pub fn dimensions(&self) -> &Vector3<u64> {
        &self.dimensions
    }

    /// Returns the length.
    pub fn length(&self) -> u64 {
        self.dimensions.x
    }

    /// Returns the width.
    pub fn width(&self) -> u64 {
        self.dimensions.y
    }

    /// Returns the height.
    pub fn height(&self) -> u64 {
        self.dimensions.z
    }

    /// Returns the maximum weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Returns the volume.
    pub fn volume(&self) -> u64 {
        self.dimensions
            .x
            .saturating_mul(self.dimensions.y)
            .saturating_mul(self.dimensions.z)
    }

    /// Returns true if `dims` fits the empty container without rotation.
    pub fn fits(&self, dims: &Vector3<u64>) -> bool {
        fits_within(dims, &self.dimensions)
    }

    /// Validates the container.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.iter().any(|&d| d == 0) {
            return Err(Error::InvalidContainer(
                "All dimensions must be positive".into(),
            ));
        }

        if !(self.max_weight > 0.0) {
            return Err(Error::InvalidContainer(
                "Maximum weight must be positive".into(),
            ));
        }

        Ok(())
    }
}

impl From<&BoxTemplate> for Container3D {
    fn from(template: &BoxTemplate) -> Self {
        Container3D::new(template.length(), template.width(), template.height())
            .with_max_weight(template.max_weight())
    }
}
