//! Core types for Il Pane dei Fratelli.
//!
//! This module provides type-safe wrappers for the catalog and the editable
//! site content.

pub mod category;
pub mod content;
pub mod id;
pub mod product;
pub mod slug;
pub mod status;

pub use category::{CategoryInfo, ProductCategory};
pub use content::*;
pub use id::ProductId;
pub use product::{CatalogStats, NewProduct, Product};
pub use slug::slugify;
pub use status::LoadState;
