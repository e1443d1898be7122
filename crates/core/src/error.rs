//! Error types for u-packing.

use thiserror::Error;

/// Result type alias for u-packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when inputs are rejected at a component boundary.
///
/// Packing itself never fails: items that cannot be placed are reported
/// in the `unplaced` collections of the respective results.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid product provided.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Invalid box template provided.
    #[error("Invalid box template: {0}")]
    InvalidTemplate(String),

    /// Invalid container (box limits) provided.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// A catalog that must not be empty was empty.
    #[error("Empty catalog: {0}")]
    EmptyCatalog(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
