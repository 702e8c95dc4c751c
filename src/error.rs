//! Crate-scoped error handling for opaque-buckets.
//!
//! This module provides a unified error type for public APIs while keeping
//! the precise error of each layer available for matching.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type exposed to users of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Errors from the bucket layer (width validation, bucket ranges)
    #[error("Bucket error: {0}")]
    Bucket(#[from] crate::buckets::BucketError),

    /// Errors from identifier allocation
    #[error("Allocation error: {0}")]
    Allocation(#[from] crate::index::AllocationError),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
