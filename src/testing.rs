//! Shared testing fixtures for the resolver's extension points.
//!
//! These types exist so tests (ours and downstream crates') can exercise
//! subtype registration and construction failure without each inventing
//! throwaway implementations.

use crate::random::{RandomError, SeededRandom};
use crate::resolver::{ConstructionError, FromSeed, InvocationCache};

/// A domain extension that composes a [`SeededRandom`] rather than
/// reimplementing the generator, per the extension model: the core generator
/// is the draw capability, variants layer derived operations on top.
#[derive(Debug, Clone)]
pub struct PercentileRandom {
    draws: SeededRandom,
}

impl PercentileRandom {
    /// Draw a percentile in `[0, 100)`.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the bound is fixed and positive. The
    /// signature propagates [`RandomError`] to stay honest about the
    /// underlying draw.
    pub fn percentile(&mut self) -> Result<i32, RandomError> {
        self.draws.next_int_bounded(100)
    }

    /// The seed the composed generator was constructed with.
    #[must_use]
    pub fn initial_seed(&self) -> i64 {
        self.draws.initial_seed()
    }
}

impl FromSeed for PercentileRandom {
    fn from_seed(seed: i64) -> Result<Self, ConstructionError> {
        Ok(Self {
            draws: SeededRandom::new(seed),
        })
    }
}

/// A [`FromSeed`] implementor whose constructor always fails.
///
/// Used to test that the resolver surfaces construction failures with the
/// attempted type and seed.
#[derive(Debug)]
pub struct FailingRandom;

impl FromSeed for FailingRandom {
    fn from_seed(seed: i64) -> Result<Self, ConstructionError> {
        Err(ConstructionError::msg(format!(
            "refusing to construct with seed {seed}"
        )))
    }
}

/// A fresh invocation cache, as a host framework would create per invocation.
#[must_use]
pub fn fresh_cache() -> InvocationCache {
    InvocationCache::new()
}
