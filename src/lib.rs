pub mod buckets;
pub mod error;
pub mod index;
pub mod ordered;

// Re-export common types for convenience
pub use buckets::{BucketLayout, BucketRange};
pub use error::{Error, Result};
pub use index::{BucketId, BucketIndex, IndexConfig};
