//! # U-Packing Core
//!
//! Core types and abstractions for the u-packing logistics engine.
//!
//! This crate provides the foundational types shared between the 3D packing
//! and the logistics planning crates.
//!
//! ## Core Components
//!
//! - **Catalog types**: [`Product`], [`BoxTemplate`], [`TemplateSet`],
//!   [`IncompatibilityTable`]
//! - **Placement record**: [`Placement`]
//! - **Solver trait**: Common interface for packing algorithms
//! - **GA framework**: Genetic algorithm infrastructure for packing-order search
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod catalog;
pub mod error;
pub mod ga;
pub mod placement;
pub mod result;
pub mod solver;

// Re-exports
pub use catalog::{BoxTemplate, Category, IncompatibilityTable, Product, TemplateSet};
pub use error::{Error, Result};
pub use ga::{GaConfig, GaProblem, GaResult, GaRunner, Individual, PermutationChromosome};
pub use placement::Placement;
pub use result::SolveResult;
pub use solver::{Config, Solver, Strategy};
