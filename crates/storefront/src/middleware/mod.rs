//! HTTP middleware for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Admin gate (admin routes only, see [`require_admin`])

pub mod admin;

pub use admin::{ADMIN_PASSWORD_HEADER, require_admin};
