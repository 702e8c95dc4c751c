//! Ordered bucket-number index.
//!
//! A sorted, duplicate-free registry of the bucket numbers that own an
//! identifier. It only grows. Thread safety is provided by the owner: the
//! [`BucketIndex`](crate::index::BucketIndex) keeps it behind the same lock as
//! the identifier table so both are always published together.

/// Result of [`OrderedBuckets::binary_search`].
///
/// When the searched number is present at position `p`, `floor == Some(p)`
/// and `ceil == p`. Otherwise `floor` is the position of the greatest entry
/// below the number (`None` if there is none) and `ceil` is the position of
/// the smallest entry above it (`len()` if there is none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    pub floor: Option<usize>,
    pub ceil: usize,
}

impl SearchBounds {
    /// Whether the searched number was found.
    pub fn is_exact(&self) -> bool {
        self.floor == Some(self.ceil)
    }
}

/// Sorted, duplicate-free bucket numbers.
#[derive(Debug, Clone, Default)]
pub struct OrderedBuckets {
    entries: Vec<u64>,
}

impl OrderedBuckets {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `bucket` at its sorted position.
    ///
    /// Returns false and leaves the index unchanged when `bucket` is already
    /// present.
    pub fn insert(&mut self, bucket: u64) -> bool {
        match self.entries.binary_search(&bucket) {
            Ok(_) => false,
            Err(pos) => {
                self.entries.insert(pos, bucket);
                true
            }
        }
    }

    /// Number of bucket numbers in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bucket number at sorted position `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`; callers only pass positions derived from
    /// [`binary_search`](Self::binary_search) on the same snapshot.
    pub fn at(&self, index: usize) -> u64 {
        match self.entries.get(index) {
            Some(bucket) => *bucket,
            None => panic!(
                "ordered bucket index out of bounds: position {} with {} entries",
                index,
                self.entries.len()
            ),
        }
    }

    /// Bucket number at sorted position `index`, if any.
    pub fn get(&self, index: usize) -> Option<u64> {
        self.entries.get(index).copied()
    }

    pub fn contains(&self, bucket: u64) -> bool {
        self.entries.binary_search(&bucket).is_ok()
    }

    /// Locates `bucket`, returning the floor and ceiling positions around it.
    pub fn binary_search(&self, bucket: u64) -> SearchBounds {
        match self.entries.binary_search(&bucket) {
            Ok(pos) => SearchBounds {
                floor: Some(pos),
                ceil: pos,
            },
            Err(pos) => SearchBounds {
                floor: pos.checked_sub(1),
                ceil: pos,
            },
        }
    }

    /// Bucket numbers at positions `range`, ascending.
    pub fn slice(&self, range: std::ops::Range<usize>) -> &[u64] {
        &self.entries[range]
    }

    /// Iterates bucket numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(buckets: &[u64]) -> OrderedBuckets {
        let mut index = OrderedBuckets::new();
        for bucket in buckets {
            index.insert(*bucket);
        }
        index
    }

    #[test]
    fn test_insert_keeps_order() {
        let index = index_of(&[50, 10, 40, 20, 30]);

        assert_eq!(index.len(), 5);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![10, 20, 30, 40, 50]);
        assert_eq!(index.at(0), 10);
        assert_eq!(index.at(4), 50);
        assert_eq!(index.get(5), None);
    }

    #[test]
    fn test_insert_duplicate_is_noop() {
        let mut index = index_of(&[10, 20]);

        assert!(!index.insert(10));
        assert_eq!(index.len(), 2);
        assert!(index.insert(15));
        assert!(index.contains(15));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_binary_search_exact() {
        let index = index_of(&[10, 20, 30]);

        let bounds = index.binary_search(20);
        assert!(bounds.is_exact());
        assert_eq!(bounds, SearchBounds { floor: Some(1), ceil: 1 });
    }

    #[test]
    fn test_binary_search_between() {
        let index = index_of(&[10, 20, 30]);

        let bounds = index.binary_search(25);
        assert!(!bounds.is_exact());
        assert_eq!(bounds, SearchBounds { floor: Some(1), ceil: 2 });
    }

    #[test]
    fn test_binary_search_outside() {
        let index = index_of(&[10, 20, 30]);

        assert_eq!(index.binary_search(5), SearchBounds { floor: None, ceil: 0 });
        assert_eq!(
            index.binary_search(35),
            SearchBounds { floor: Some(2), ceil: 3 }
        );

        let empty = OrderedBuckets::new();
        assert!(empty.is_empty());
        assert_eq!(empty.binary_search(1), SearchBounds { floor: None, ceil: 0 });
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_at_out_of_bounds_panics() {
        let index = index_of(&[10]);
        index.at(1);
    }
}
