//! Product catalog.
//!
//! - [`reducer`] - pure state transitions
//! - [`snapshot`] - versioned local-storage snapshot and migrations
//! - [`store`] - the [`CatalogStore`] handle with CRUD and queries

pub mod reducer;
pub mod snapshot;
pub mod store;

pub use reducer::{CatalogAction, CatalogState, reduce};
pub use snapshot::{
    CatalogSnapshot, Decoded, MIGRATIONS, STORAGE_KEY, STORAGE_VERSION, SnapshotError,
    SnapshotMigration,
};
pub use store::{CatalogError, CatalogStore, CategoryCount, LOAD_ERROR};
