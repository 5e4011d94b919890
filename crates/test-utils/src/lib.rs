//! Shared test utilities for the sdm-layers workspace.
//!
//! This crate provides common testing infrastructure:
//! - Presence/region/habitat/bias band generators
//! - Geometry fixtures
//! - A seeded RNG so sampling tests are reproducible
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A deterministically seeded RNG for reproducible sampling tests.
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5d_1a_7e)
}
