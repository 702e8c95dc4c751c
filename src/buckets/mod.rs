//! Bucket-number arithmetic.
//!
//! This module maps the full signed 64-bit domain onto contiguous,
//! equal-width buckets. The mapping is order preserving: a larger value never
//! lands in a smaller bucket number.

use thiserror::Error;

/// Errors specific to the bucket layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    /// Invalid bucket width configuration
    #[error("Invalid bucket width {0}: must be at least {}", layout::MIN_BUCKET_WIDTH)]
    InvalidBucketWidth(u64),

    /// Bucket number past the last bucket of the layout
    #[error("Bucket {bucket} is out of range: last bucket is {last}")]
    BucketOutOfRange { bucket: u64, last: u64 },
}

pub mod layout;

// Re-export main types for public API
pub use layout::{unsigned_magnitude, BucketLayout, BucketRange, MIN_BUCKET_WIDTH};
