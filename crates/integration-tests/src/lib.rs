//! Integration test fixtures for Il Pane dei Fratelli.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fratelli-integration-tests
//! ```
//!
//! Everything runs in-process: servers bind to `127.0.0.1:0` and storage
//! lives in temporary directories, so no external services are needed.
//!
//! # Test Categories
//!
//! - `content_http` - Content stores loading over HTTP
//! - `catalog_persistence` - Catalog cache round trips and fallbacks
//! - `storefront_api` - The full router over a real socket

#![allow(clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use fratelli_core::ContentKind;
use fratelli_storefront::config::StorefrontConfig;
use fratelli_storefront::source::ContentSource;
use fratelli_storefront::state::AppState;
use fratelli_storefront::storage::{LocalStorage, MemoryStorage};
use secrecy::SecretString;
use serde_json::Value;
use tokio::task::JoinHandle;
use url::Url;

/// Admin password used by test servers.
pub const ADMIN_PASSWORD: &str = "forno-2024-rosmarino";

/// The canonical documents shipped with the storefront.
#[must_use]
pub fn bundled_content_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/content"))
}

/// Raw canonical JSON for one bundled document.
#[must_use]
pub fn bundled_document(kind: ContentKind) -> String {
    std::fs::read_to_string(bundled_content_dir().join(kind.file_name()))
        .expect("Failed to read bundled document")
}

/// A content directory holding copies of only the given bundled documents.
#[must_use]
pub fn partial_content_dir(kinds: &[ContentKind]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for kind in kinds {
        std::fs::write(dir.path().join(kind.file_name()), bundled_document(*kind))
            .expect("Failed to copy document");
    }
    dir
}

/// Canonical `products.json` cut down to its first three products, the
/// second of them unavailable.
#[must_use]
pub fn three_product_catalog() -> String {
    let mut doc: Value = serde_json::from_str(&bundled_document(ContentKind::Products))
        .expect("Bundled products.json is invalid");
    let products = doc
        .get_mut("products")
        .and_then(Value::as_array_mut)
        .expect("products is not a list");
    products.truncate(3);
    if let Some(second) = products.get_mut(1) {
        second["available"] = Value::Bool(false);
    }
    doc.to_string()
}

/// Storefront configuration for tests.
#[must_use]
pub fn test_config(content_dir: &Path, admin: bool) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid IP"),
        port: 0,
        content_dir: content_dir.to_path_buf(),
        content_url: None,
        storage_dir: PathBuf::from(".local-storage"),
        admin_password: admin.then(|| SecretString::from(ADMIN_PASSWORD)),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A server on an ephemeral port, shut down on drop.
pub struct TestServer {
    pub base_url: Url,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve any router.
    pub async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("No local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).expect("valid URL"),
            handle,
        }
    }

    /// Serve the storefront over `state`.
    pub async fn storefront(state: AppState) -> Self {
        Self::spawn(fratelli_storefront::app(state)).await
    }

    /// Serve only `/content/*` from a directory. The stores behind it are
    /// never loaded.
    pub async fn content(dir: &Path) -> Self {
        let state = AppState::new(
            test_config(dir, false),
            &ContentSource::memory([]),
            Arc::new(MemoryStorage::new()),
        );
        Self::storefront(state).await
    }

    /// Absolute URL for a path below the server root.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.base_url
            .join(path.trim_start_matches('/'))
            .expect("valid path")
            .to_string()
    }

    /// Source fetching canonical documents from this server.
    #[must_use]
    pub fn source(&self) -> ContentSource {
        ContentSource::http(self.base_url.clone())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Shared in-memory storage.
#[must_use]
pub fn memory_storage() -> Arc<dyn LocalStorage> {
    Arc::new(MemoryStorage::new())
}
