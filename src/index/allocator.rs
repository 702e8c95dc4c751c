//! Collision-free identifier generation.

use rand::RngCore;
use roaring::RoaringTreemap;
use thiserror::Error;
use tracing::{trace, warn};

/// Default bound on draws before generation gives up.
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 10_000;

/// Errors from identifier allocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Every candidate drawn collided with an issued identifier
    #[error("Identifier generation exhausted after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Draws identifiers from a random source and remembers every one issued.
pub(crate) struct IdentifierAllocator<R> {
    rng: R,
    issued: RoaringTreemap,
    max_attempts: u32,
}

impl<R: RngCore> IdentifierAllocator<R> {
    pub(crate) fn new(rng: R, max_attempts: u32) -> Self {
        Self {
            rng,
            issued: RoaringTreemap::new(),
            max_attempts,
        }
    }

    /// Draws a candidate that has never been issued.
    ///
    /// The candidate is not registered; call [`register`](Self::register)
    /// once it has been committed.
    pub(crate) fn generate(&mut self) -> Result<u64, AllocationError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.rng.next_u64();
            if !self.issued.contains(candidate) {
                return Ok(candidate);
            }
            trace!(attempt, "identifier collision, drawing again");
        }

        warn!(
            attempts = self.max_attempts,
            issued = self.issued.len(),
            "identifier generation exhausted"
        );
        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    pub(crate) fn register(&mut self, identifier: u64) -> bool {
        self.issued.insert(identifier)
    }

    pub(crate) fn issued(&self) -> u64 {
        self.issued.len()
    }
}
