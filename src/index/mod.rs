//! Bucket allocator and query engine.
//!
//! [`BucketIndex`] assigns every requested bucket an opaque random
//! identifier and answers range queries over those identifiers. Order is
//! kept by an internal [`OrderedBuckets`] index, never by the identifier
//! values themselves.
//!
//! The identifier table, the ordered index and the set of issued identifiers
//! live in one state guarded by a single lock. Allocation takes the write
//! lock and updates all three before releasing it, so readers never see a
//! bucket in one structure and missing from another.

use crate::buckets::{BucketLayout, BucketRange};
use crate::ordered::OrderedBuckets;
use crate::{Error, Result};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

pub mod allocator;
mod query;

pub use allocator::{AllocationError, DEFAULT_MAX_GENERATION_ATTEMPTS};
use allocator::IdentifierAllocator;

/// Opaque identifier standing in for a bucket number.
///
/// The numeric value is uniformly random and says nothing about the bucket's
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketId(u64);

impl BucketId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Configuration for a [`BucketIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    layout: BucketLayout,
    max_generation_attempts: u32,
}

impl IndexConfig {
    /// Creates a configuration with the given bucket width.
    ///
    /// # Arguments
    /// * `bucket_width` - Values per bucket (must be >= 3)
    ///
    /// # Returns
    /// Validated configuration or error
    pub fn new(bucket_width: u64) -> Result<Self> {
        Ok(Self {
            layout: BucketLayout::new(bucket_width)?,
            max_generation_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Overrides how many candidates are drawn before allocation fails.
    pub fn with_max_generation_attempts(mut self, attempts: u32) -> Result<Self> {
        if attempts == 0 {
            return Err(Error::InvalidInput(
                "max_generation_attempts must be at least 1".to_string(),
            ));
        }
        self.max_generation_attempts = attempts;
        Ok(self)
    }

    pub fn layout(&self) -> BucketLayout {
        self.layout
    }

    pub fn max_generation_attempts(&self) -> u32 {
        self.max_generation_attempts
    }
}

/// Everything mutated by allocation, published as one unit.
struct IndexState<R> {
    identifiers: HashMap<u64, BucketId>,
    ordered: OrderedBuckets,
    allocator: IdentifierAllocator<R>,
}

impl<R> IndexState<R> {
    /// Identifiers of the ordered positions `range`, ascending by bucket.
    fn identifiers_in(&self, range: std::ops::Range<usize>) -> Vec<BucketId> {
        self.ordered
            .slice(range)
            .iter()
            // every ordered bucket has a table entry
            .map(|bucket| self.identifiers[bucket])
            .collect()
    }
}

/// Order-preserving bucketing index with opaque identifiers.
///
/// The index is an explicit value: construct it once and share it by
/// reference or `Arc`. It is `Sync` whenever the random source is
/// `Send + Sync`.
pub struct BucketIndex<R = StdRng> {
    layout: BucketLayout,
    state: RwLock<IndexState<R>>,
}

impl BucketIndex<StdRng> {
    /// Creates an index with the given bucket width and an OS-seeded
    /// cryptographically strong generator.
    pub fn new(bucket_width: u64) -> Result<Self> {
        Ok(Self::with_config(IndexConfig::new(bucket_width)?))
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: RngCore> BucketIndex<R> {
    /// Creates an index drawing identifiers from `rng`.
    pub fn with_rng(config: IndexConfig, rng: R) -> Self {
        Self {
            layout: config.layout,
            state: RwLock::new(IndexState {
                identifiers: HashMap::new(),
                ordered: OrderedBuckets::new(),
                allocator: IdentifierAllocator::new(rng, config.max_generation_attempts),
            }),
        }
    }

    pub fn width(&self) -> u64 {
        self.layout.width()
    }

    pub fn layout(&self) -> BucketLayout {
        self.layout
    }

    /// Bucket number of `value`.
    pub fn bucket_number(&self, value: i64) -> u64 {
        self.layout.bucket_number(value)
    }

    /// Inclusive value range of the bucket containing `value`.
    pub fn bucket_range(&self, value: i64) -> Result<BucketRange> {
        Ok(self.layout.bucket_range(self.bucket_number(value))?)
    }

    /// Identifier of the bucket containing `value`, if one was allocated.
    pub fn lookup(&self, value: i64) -> Option<BucketId> {
        let bucket = self.bucket_number(value);
        self.state.read().identifiers.get(&bucket).copied()
    }

    /// Returns the identifier of the bucket containing `value`, allocating
    /// one on first request.
    ///
    /// Concurrent first requests for one bucket all receive the same
    /// identifier.
    pub fn get_or_create(&self, value: i64) -> Result<BucketId> {
        Ok(self.identifier_for_bucket(self.bucket_number(value))?)
    }

    fn identifier_for_bucket(&self, bucket: u64) -> std::result::Result<BucketId, AllocationError> {
        let existing = self.state.read().identifiers.get(&bucket).copied();
        if let Some(identifier) = existing {
            return Ok(identifier);
        }

        let mut guard = self.state.write();
        let state = &mut *guard;

        // another writer may have won the race between the two locks
        if let Some(identifier) = state.identifiers.get(&bucket) {
            return Ok(*identifier);
        }

        // nothing below can fail once a candidate is drawn
        let identifier = BucketId(state.allocator.generate()?);
        state.allocator.register(identifier.0);
        state.identifiers.insert(bucket, identifier);
        state.ordered.insert(bucket);

        debug!(
            bucket,
            buckets = state.ordered.len(),
            "allocated bucket identifier"
        );
        Ok(identifier)
    }

    /// Number of buckets holding an identifier.
    pub fn len(&self) -> usize {
        self.state.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the allocated bucket numbers, ascending.
    pub fn buckets(&self) -> Vec<u64> {
        self.state.read().ordered.iter().collect()
    }

    /// Number of identifiers ever issued. Always equal to [`len`](Self::len).
    pub fn issued(&self) -> u64 {
        self.state.read().allocator.issued()
    }
}

impl<R> fmt::Debug for BucketIndex<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketIndex")
            .field("width", &self.layout.width())
            .field("buckets", &self.state.read().ordered.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::BucketError;

    fn seeded(width: u64) -> BucketIndex {
        let config = IndexConfig::new(width).unwrap();
        BucketIndex::with_rng(config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_rejects_narrow_width() {
        match BucketIndex::new(2) {
            Err(Error::Bucket(BucketError::InvalidBucketWidth(2))) => {}
            other => panic!("expected invalid width error, got {:?}", other),
        }
        assert!(BucketIndex::new(3).is_ok());
    }

    #[test]
    fn test_config_attempts() {
        let config = IndexConfig::new(10).unwrap();
        assert_eq!(
            config.max_generation_attempts(),
            DEFAULT_MAX_GENERATION_ATTEMPTS
        );

        let config = config.with_max_generation_attempts(5).unwrap();
        assert_eq!(config.max_generation_attempts(), 5);

        assert!(matches!(
            config.with_max_generation_attempts(0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let index = seeded(10);

        let first = index.get_or_create(1234).unwrap();
        let again = index.get_or_create(1234).unwrap();
        assert_eq!(first, again);

        // same bucket, different value
        let range = index.bucket_range(1234).unwrap();
        assert_eq!(index.get_or_create(range.min).unwrap(), first);
        assert_eq!(index.get_or_create(range.max).unwrap(), first);

        assert_eq!(index.len(), 1);
        assert_eq!(index.issued(), 1);
    }

    #[test]
    fn test_lookup_does_not_allocate() {
        let index = seeded(10);

        assert_eq!(index.lookup(5), None);
        assert!(index.is_empty());

        let identifier = index.get_or_create(5).unwrap();
        assert_eq!(index.lookup(5), Some(identifier));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_structures_grow_together() {
        let index = seeded(3);

        for value in [-900, 300, -3, 0, 42, i64::MIN, i64::MAX, 300, 0] {
            index.get_or_create(value).unwrap();
        }

        let buckets = index.buckets();
        assert_eq!(buckets.len(), 7);
        assert_eq!(index.len(), 7);
        assert_eq!(index.issued(), 7);
        assert!(buckets.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(buckets[0], 0);
        assert_eq!(buckets[6], index.layout().last_bucket());
    }

    #[test]
    fn test_identifier_display() {
        let identifier = BucketId(0xab);
        assert_eq!(identifier.to_string(), "00000000000000ab");
        assert_eq!(identifier.as_u64(), 0xab);
    }
}
