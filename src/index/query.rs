//! Range queries over allocated buckets.
//!
//! Each query resolves its endpoints to bucket numbers, locates them in the
//! ordered index and maps the positions in between back to identifiers. A
//! query endpoint's own bucket is always excluded, whatever the endpoint's
//! position inside that bucket.

use super::{BucketId, BucketIndex};
use crate::ordered::OrderedBuckets;
use rand::RngCore;

/// First position strictly after `bucket`.
fn start_after(ordered: &OrderedBuckets, bucket: u64) -> usize {
    let bounds = ordered.binary_search(bucket);
    if bounds.is_exact() {
        bounds.ceil + 1
    } else {
        bounds.ceil
    }
}

/// Exclusive end of the positions strictly before `bucket`.
///
/// An exact match ends just before its own position and a miss ends just
/// after the floor; both land on `ceil`.
fn end_before(ordered: &OrderedBuckets, bucket: u64) -> usize {
    ordered.binary_search(bucket).ceil
}

impl<R: RngCore> BucketIndex<R> {
    /// Identifiers of every allocated bucket above the bucket of `value`,
    /// ascending by bucket.
    pub fn greater_than(&self, value: i64) -> Vec<BucketId> {
        let bucket = self.bucket_number(value);
        let state = self.state.read();

        let start = start_after(&state.ordered, bucket);
        if start >= state.ordered.len() {
            return Vec::new();
        }
        state.identifiers_in(start..state.ordered.len())
    }

    /// Identifiers of every allocated bucket below the bucket of `value`,
    /// ascending by bucket.
    pub fn less_than(&self, value: i64) -> Vec<BucketId> {
        let bucket = self.bucket_number(value);
        let state = self.state.read();

        let end = end_before(&state.ordered, bucket);
        state.identifiers_in(0..end)
    }

    /// Identifiers of every allocated bucket strictly between the buckets of
    /// `value1` and `value2`, ascending by bucket. Endpoint order does not
    /// matter.
    pub fn between(&self, value1: i64, value2: i64) -> Vec<BucketId> {
        let (low, high) = if value1 > value2 {
            (value2, value1)
        } else {
            (value1, value2)
        };
        let low_bucket = self.bucket_number(low);
        let high_bucket = self.bucket_number(high);
        let state = self.state.read();

        let start = start_after(&state.ordered, low_bucket);
        let end = end_before(&state.ordered, high_bucket);
        if start >= end {
            return Vec::new();
        }
        state.identifiers_in(start..end)
    }
}
