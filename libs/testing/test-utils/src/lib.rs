//! Shared test utilities for the accounts crates
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic account data derived from the test name
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//! use migration::Migrator;
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new::<Migrator>().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let username = builder.username("owner");
//!     let email = builder.email("owner");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// A password that satisfies the account complexity rules
pub const VALID_PASSWORD: &str = "Sup3rSecret";

/// Builder for test data with deterministic values.
///
/// Tests running against one shared database stay isolated as long as each
/// test derives its usernames and emails from its own name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Username matching `[a-zA-Z0-9_]{3,50}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).username("alice");
    /// assert_eq!(name, "alice_7");
    /// ```
    pub fn username(&self, label: &str) -> String {
        let seed = (self.seed % 1_000_000_000).to_string();
        let max_label = 50 - seed.len() - 1;
        let label: String = label.chars().take(max_label).collect();
        format!("{}_{}", label, seed)
    }

    pub fn email(&self, label: &str) -> String {
        format!("{}@example.com", self.username(label))
    }
}
