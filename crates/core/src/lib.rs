//! Il Pane dei Fratelli Core - Shared types library.
//!
//! This crate provides common types used across all Fratelli components:
//! - `storefront` - Content and catalog stores plus the public/admin HTTP surface
//! - `cli` - Command-line tools for inspecting and resetting the local catalog cache
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, slugs, content document shapes and load states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
