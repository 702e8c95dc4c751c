//! Bucket layout over the signed 64-bit domain.
//!
//! The signed domain is shifted onto an unsigned line of 2^64 positions so
//! that `i64::MIN` sits at position 0 and `i64::MAX` at `u64::MAX`:
//!
//! ```text
//! value:     i64::MIN ... -1   0 ... i64::MAX
//! position:  0 ... 2^63-1    2^63 ... 2^64-1
//! ```
//!
//! A bucket number is `position / width`. Every bucket spans exactly `width`
//! values except the last one, which is short when `width` does not divide
//! 2^64.

use crate::buckets::BucketError;

/// Smallest accepted bucket width.
pub const MIN_BUCKET_WIDTH: u64 = 3;

/// Unsigned magnitude of `i64::MIN`, which is also the position of value 0.
const BOTTOM: u64 = 1 << 63;

/// Returns `|value|` as an unsigned integer.
///
/// `i64::MIN` has no positive counterpart in `i64`, so it is special-cased
/// instead of being negated.
pub fn unsigned_magnitude(value: i64) -> u64 {
    if value == i64::MIN {
        BOTTOM
    } else if value < 0 {
        (-value) as u64
    } else {
        value as u64
    }
}

/// Position of `value` on the shifted unsigned line.
fn position(value: i64) -> u64 {
    if value >= 0 {
        BOTTOM + value as u64
    } else {
        BOTTOM - unsigned_magnitude(value)
    }
}

/// Inverse of [`position`].
fn value_at(position: u64) -> i64 {
    if position >= BOTTOM {
        (position - BOTTOM) as i64
    } else {
        let magnitude = BOTTOM - position;
        if magnitude == BOTTOM {
            i64::MIN
        } else {
            -(magnitude as i64)
        }
    }
}

/// Fixed-width bucket layout.
///
/// BucketLayout holds the bucket width and can be reused to compute the
/// bucket number of any signed value, or the value range of any bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketLayout {
    width: u64,
}

impl BucketLayout {
    /// Create a new BucketLayout with the specified bucket width.
    ///
    /// # Arguments
    /// * `width` - Number of consecutive values per bucket (must be >= 3)
    ///
    /// # Returns
    /// Configured layout or error if width is invalid
    pub fn new(width: u64) -> Result<Self, BucketError> {
        if width < MIN_BUCKET_WIDTH {
            return Err(BucketError::InvalidBucketWidth(width));
        }
        Ok(Self { width })
    }

    /// Get the configured bucket width.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Compute the bucket number of `value`.
    ///
    /// Monotonic: `a <= b` implies `bucket_number(a) <= bucket_number(b)`.
    pub fn bucket_number(&self, value: i64) -> u64 {
        position(value) / self.width
    }

    /// Highest bucket number, the one containing `i64::MAX`.
    pub fn last_bucket(&self) -> u64 {
        u64::MAX / self.width
    }

    /// Recover the inclusive value range covered by `bucket`.
    pub fn bucket_range(&self, bucket: u64) -> Result<BucketRange, BucketError> {
        let last = self.last_bucket();
        if bucket > last {
            return Err(BucketError::BucketOutOfRange { bucket, last });
        }

        // bucket <= u64::MAX / width, so the product cannot overflow
        let start = bucket * self.width;
        let end = start.saturating_add(self.width - 1);

        Ok(BucketRange {
            bucket,
            min: value_at(start),
            max: value_at(end),
            is_first: bucket == 0,
            is_last: bucket == last,
        })
    }
}

/// Inclusive range of signed values mapped to one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRange {
    pub bucket: u64,
    pub min: i64,
    pub max: i64,
    /// Bucket starting at `i64::MIN`.
    pub is_first: bool,
    /// Bucket ending at `i64::MAX`; may be narrower than the width.
    pub is_last: bool,
}

impl BucketRange {
    /// Whether `value` falls inside this bucket.
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Number of values covered by the bucket.
    pub fn len(&self) -> u64 {
        position(self.max) - position(self.min) + 1
    }

    /// Always false: a bucket covers at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }
}
