//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers (floats, uuids, options)
//!
//! # Usage
//!
//! ```rust
//! use test_utils::{assertions::assert_close, TestDataBuilder};
//!
//! let builder = TestDataBuilder::from_test_name("my_test");
//! let id = builder.uuid(1);
//! let name = builder.name("ingredient", "main");
//! assert_close(0.1 + 0.2, 0.3, 1e-9, "sum");
//! ```

use uuid::Uuid;

pub mod assertions;

/// Builder for test data with deterministic randomization
///
/// Ensures tests are reproducible by deriving all generated values from a
/// seed (typically the test name).
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with an explicit seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test
    /// data.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a deterministic UUID distinguished by `index`
    pub fn uuid(&self, index: u64) -> Uuid {
        let seed = self.seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let bytes = seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique, readable name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create");
    /// let name = builder.name("formula", "main");
    /// assert!(name.starts_with("formula-main-"));
    /// ```
    pub fn name(&self, kind: &str, variant: &str) -> String {
        format!("{}-{}-{:08x}", kind, variant, self.seed as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = TestDataBuilder::from_test_name("stable");
        let b = TestDataBuilder::from_test_name("stable");
        assert_eq!(a.uuid(0), b.uuid(0));
        assert_eq!(a.name("x", "y"), b.name("x", "y"));
    }

    #[test]
    fn test_distinct_indexes_distinct_uuids() {
        let builder = TestDataBuilder::from_test_name("distinct");
        assert_ne!(builder.uuid(0), builder.uuid(1));
    }
}
