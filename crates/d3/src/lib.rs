//! # U-Packing 3D
//!
//! 3D bin packing algorithms for the u-packing logistics engine.
//!
//! This crate provides integer box packing with a corner-point placement
//! rule and a genetic search over packing orders that opens bins on demand.

pub mod boundary;
pub mod corner_point;
pub mod ga_packing;
pub mod geometry;
pub mod packer;
pub mod packing_utils;

// Re-exports
pub use boundary::Container3D;
pub use corner_point::{pack, CornerPointBin, PackOutcome};
pub use ga_packing::{run_ga_packing, BinLayout, GeneticOptimizer, PackingProblem};
pub use geometry::{distinct_rotations, Item3D, RotationCache};
pub use packer::Packer3D;
pub use u_packing_core::{Config, Error, Placement, Result, SolveResult, Strategy};
