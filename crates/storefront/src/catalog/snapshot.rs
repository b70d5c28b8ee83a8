//! Versioned catalog snapshot kept in local storage.
//!
//! The snapshot is `{ "version", "products", "lastUpdated" }`. A snapshot is
//! only trusted when its version equals the version the store expects and
//! `products` is a list; anything else falls back to the canonical JSON.
//!
//! Older snapshots can be upgraded by registering [`SnapshotMigration`]s,
//! applied in a chain before the version check (v1 -> v2 -> v3).

use chrono::{DateTime, Utc};
use fratelli_core::Product;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Local storage key for the catalog snapshot.
pub const STORAGE_KEY: &str = "i3fratelli_products";

/// Snapshot version written by this build.
pub const STORAGE_VERSION: &str = "1.0";

/// Migrations shipped with this build.
pub const MIGRATIONS: &[SnapshotMigration] = &[];

/// A pure upgrade of a raw snapshot from one version to the next.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotMigration {
    pub from_version: &'static str,
    pub to_version: &'static str,
    /// Receives the whole snapshot object; the version field is rewritten
    /// afterwards.
    pub transform: fn(Value) -> Value,
}

/// Snapshot decoding failures (the cache is unreadable, not just stale).
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cached catalog is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("cached catalog has invalid products: {0}")]
    Products(#[source] serde_json::Error),
}

/// Result of reading a cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Compatible snapshot; its products become the working set.
    Adopted {
        products: Vec<Product>,
        last_updated: Option<DateTime<Utc>>,
    },
    /// Readable but not usable; the canonical list wins.
    Incompatible { reason: String },
}

/// Stored form of the catalog, borrowed from the live list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot<'a> {
    pub version: &'a str,
    pub products: &'a [Product],
    pub last_updated: Option<DateTime<Utc>>,
}

/// Serialize a snapshot for storage.
///
/// # Errors
///
/// Returns an error if a product cannot be serialized.
pub fn encode(
    version: &str,
    products: &[Product],
    last_updated: Option<DateTime<Utc>>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&CatalogSnapshot {
        version,
        products,
        last_updated,
    })
}

/// Decode a stored snapshot, applying migrations first.
///
/// # Errors
///
/// Returns an error if the text is not JSON, or if the version matches but
/// the products do not deserialize.
pub fn decode(
    raw: &str,
    expected_version: &str,
    migrations: &[SnapshotMigration],
) -> Result<Decoded, SnapshotError> {
    let value: Value = serde_json::from_str(raw).map_err(SnapshotError::Json)?;
    let mut value = migrate(value, migrations);

    let version = value.get("version").and_then(Value::as_str);
    if version != Some(expected_version) {
        return Ok(Decoded::Incompatible {
            reason: format!(
                "version {}, expected {expected_version}",
                version.unwrap_or("<missing>")
            ),
        });
    }

    let last_updated = value
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc));

    let products = match value.get_mut("products") {
        Some(products) if products.is_array() => products.take(),
        _ => {
            return Ok(Decoded::Incompatible {
                reason: "products is not a list".to_string(),
            });
        }
    };

    let products: Vec<Product> =
        serde_json::from_value(products).map_err(SnapshotError::Products)?;

    Ok(Decoded::Adopted {
        products,
        last_updated,
    })
}

/// Apply matching migrations until none matches.
fn migrate(mut value: Value, migrations: &[SnapshotMigration]) -> Value {
    // Each migration may run at most once, which also breaks cycles.
    for _ in 0..migrations.len() {
        let Some(current) = value.get("version").and_then(Value::as_str) else {
            break;
        };
        let Some(step) = migrations.iter().find(|m| m.from_version == current) else {
            break;
        };

        tracing::info!(
            from = step.from_version,
            to = step.to_version,
            "Migrating cached catalog"
        );
        value = (step.transform)(value);
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "version".to_string(),
                Value::String(step.to_version.to_string()),
            );
        }
    }
    value
}
