//! Newtype IDs for type-safe entity references.
//!
//! Product IDs are opaque strings. Seed products in the canonical JSON use
//! readable IDs (`pagnotta-classica`), products created from the admin use
//! generated ones (`prod_1735689600000_k3j9x0a2b`). Both are valid.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const ID_PREFIX: &str = "prod";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unique, immutable identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier from a timestamp and a random base36 suffix.
    ///
    /// Collisions are unlikely but not impossible; callers that need a hard
    /// guarantee check against the IDs they already hold.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..BASE36.len());
                BASE36.get(idx).map_or('0', |&b| char::from(b))
            })
            .collect();
        Self(format!("{ID_PREFIX}_{}_{suffix}", now.timestamp_millis()))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
