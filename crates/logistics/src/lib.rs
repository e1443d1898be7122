//! # U-Packing Logistics
//!
//! Compatibility-aware assignment of products to shipping boxes.
//!
//! ## Pipeline
//!
//! 1. [`resolve_compatibility`] rewrites each product's incompatibility set
//!    from the category table.
//! 2. [`coarse_assign`] opens box instances first-fit-decreasing by weight,
//!    honoring volume, weight, fragility and compatibility.
//! 3. [`plan_shipment`] runs the 3D packer on every box.
//!
//! For a quick advisory count without geometry, [`estimate_shipment`] splits
//! categories into compatible subsets with [`partition_categories`] and
//! sizes bins with [`BoxEstimator`].
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization of results

pub mod assign;
pub mod box_instance;
pub mod compatibility;
pub mod estimate;
pub mod partition;
pub mod shipment;

// Re-exports
pub use assign::{coarse_assign, finalize_boxes, AssignResult};
pub use box_instance::BoxInstance;
pub use compatibility::resolve_compatibility;
pub use estimate::{
    estimate_boxes, BoxEstimate, BoxEstimator, EstimatedBin, EstimatorConfig, SubsetEstimate,
};
pub use partition::{
    categorize, group_by_category, partition_categories, Categorized, CategoryCounts, Partition,
};
pub use shipment::{
    estimate_shipment, plan_shipment, ClassEstimate, PackedBox, ShipmentEstimate, ShipmentPlan,
};
pub use u_packing_core::{BoxTemplate, Category, IncompatibilityTable, Product, TemplateSet};
