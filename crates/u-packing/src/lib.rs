//! # U-Packing
//!
//! Logistics packing engine.
//!
//! This crate provides:
//! - **Box assignment**: compatibility- and fragility-aware grouping of
//!   products into shipping boxes
//! - **Box estimation**: advisory box counts per compatible category subset
//! - **3D packing**: corner-point placement and genetic packing-order search
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_packing::logistics::{plan_shipment, IncompatibilityTable, Product};
//! use u_packing::{BoxTemplate, Config, TemplateSet};
//!
//! let templates = TemplateSet::new(vec![
//!     BoxTemplate::new("Large Box", 50, 50, 50, 10.0, 1),
//!     BoxTemplate::new("Small Box", 20, 20, 20, 2.0, 2),
//! ])?;
//! let table = IncompatibilityTable::new().with_rule("Food", ["Detergent"]);
//! let products = vec![Product::new("Cheese", "Food", 20, 15, 3, 0.5)];
//!
//! let plan = plan_shipment(&products, &templates, &table, &Config::default())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `d3` (default): 3D bin packing algorithms
//! - `logistics` (default): box assignment and estimation
//! - `serde`: Serialization support

/// Core types and abstractions.
pub use u_packing_core as core;

/// 3D bin packing algorithms.
#[cfg(feature = "d3")]
pub use u_packing_d3 as d3;

/// Box assignment, partitioning and estimation.
#[cfg(feature = "logistics")]
pub use u_packing_logistics as logistics;

// Re-export commonly used types at root level
pub use u_packing_core::{
    BoxTemplate, Config, Error, Placement, Product, Result, SolveResult, Solver, Strategy,
    TemplateSet,
};
