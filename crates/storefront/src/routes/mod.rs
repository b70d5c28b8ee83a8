//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Every store has settled
//! GET  /content/{file}                  - Canonical JSON (static files)
//!
//! # Content
//! GET  /api/content/{name}              - Current in-memory document
//!
//! # Products
//! GET  /api/products                    - Available products
//! GET  /api/products/featured           - Featured and available
//! GET  /api/products/category/{category} - Available products in a category
//! GET  /api/products/{slug}             - Product detail
//! GET  /api/categories                  - Categories with product counts
//!
//! # Admin (X-Admin-Password, only when a password is configured)
//! PUT    /api/admin/content/{name}          - Replace a document
//! PATCH  /api/admin/content/{name}          - Edit one field
//! POST   /api/admin/content/{name}/publish  - Remote save
//! GET    /api/admin/products                - Full catalog state
//! POST   /api/admin/products                - Create product
//! PUT    /api/admin/products/{id}           - Update product
//! DELETE /api/admin/products/{id}           - Delete product
//! POST   /api/admin/products/reset          - Back to canonical products
//! GET    /api/admin/stats                   - Dashboard numbers
//! ```

pub mod admin;
pub mod content;
pub mod health;
pub mod products;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::require_admin;
use crate::state::AppState;

/// Create the public product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/category/{category}", get(products::by_category))
        .route("/{slug}", get(products::show))
}

/// Create the admin routes router, gated by the admin password.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/content/{name}",
            put(admin::replace_content).patch(admin::edit_content),
        )
        .route("/content/{name}/publish", post(admin::publish_content))
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route("/products/reset", post(admin::reset_products))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/stats", get(admin::stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

/// Create all routes for the storefront.
///
/// Admin routes are only mounted when an admin password is configured.
pub fn routes(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/content/{name}", get(content::show))
        .nest("/api/products", product_routes())
        .route("/api/categories", get(products::categories));

    if state.config().admin_enabled() {
        router.nest("/api/admin", admin_routes(state))
    } else {
        tracing::info!("No admin password configured, admin API disabled");
        router
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    //! Router fixtures for handler tests.

    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::config::StorefrontConfig;
    use crate::source::ContentSource;
    use crate::state::AppState;
    use crate::storage::MemoryStorage;

    pub const ADMIN_PASSWORD: &str = "forno-2024-rosmarino";

    pub fn content_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/content"))
    }

    pub fn config(admin: bool) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            content_dir: content_dir(),
            content_url: None,
            storage_dir: PathBuf::from(".local-storage"),
            admin_password: admin.then(|| SecretString::from(ADMIN_PASSWORD)),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// State over the bundled content, not yet loaded.
    pub fn state(admin: bool) -> AppState {
        AppState::new(
            config(admin),
            &ContentSource::directory(content_dir()),
            Arc::new(MemoryStorage::new()),
        )
    }

    /// State over the bundled content, fully loaded.
    pub async fn loaded_state(admin: bool) -> AppState {
        let state = state(admin);
        state.start_loading().await.unwrap();
        state
    }

    pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
        crate::app(state.clone()).oneshot(request).await.unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub fn admin(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-admin-password", ADMIN_PASSWORD);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}
