//! Il Pane dei Fratelli storefront library.
//!
//! Content stores, the product catalog, and the HTTP surface that serves
//! them. The binary in `main.rs` only wires configuration, logging, and
//! the listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod source;
pub mod state;
pub mod storage;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the storefront router.
///
/// Canonical documents are served as static files under `/content` so that
/// the HTTP content source can fetch them from this same server.
pub fn app(state: AppState) -> Router {
    let content_dir = state.config().content_dir.clone();

    routes::routes(&state)
        .nest_service("/content", ServeDir::new(content_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
