//! Application state shared across handlers.

use std::sync::Arc;

use fratelli_core::{
    B2bContent, ContactContent, ContentKind, LoadState, PromosContent, ReviewsContent, SiteContent,
};
use tracing::info;

use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::content::ContentStore;
use crate::editor::DocumentEditor;
use crate::source::ContentSource;
use crate::storage::{FileStorage, LocalStorage, StorageError};

/// Error building the application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid content URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("local storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// The per-page content stores.
#[derive(Debug, Clone)]
pub struct ContentStores {
    pub site: ContentStore<SiteContent>,
    pub b2b: ContentStore<B2bContent>,
    pub contact: ContentStore<ContactContent>,
    pub reviews: ContentStore<ReviewsContent>,
    pub promos: ContentStore<PromosContent>,
}

impl ContentStores {
    /// One unloaded store per document, all sharing a source and storage.
    #[must_use]
    pub fn new(source: &ContentSource, storage: &Arc<dyn LocalStorage>) -> Self {
        Self {
            site: ContentStore::new(source.clone(), Arc::clone(storage)),
            b2b: ContentStore::new(source.clone(), Arc::clone(storage)),
            contact: ContentStore::new(source.clone(), Arc::clone(storage)),
            reviews: ContentStore::new(source.clone(), Arc::clone(storage)),
            promos: ContentStore::new(source.clone(), Arc::clone(storage)),
        }
    }

    /// Load every store concurrently. Each settles independently.
    pub async fn load_all(&self) {
        tokio::join!(
            self.site.load(),
            self.b2b.load(),
            self.contact.load(),
            self.reviews.load(),
            self.promos.load(),
        );
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the content stores, and the catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    contents: ContentStores,
    catalog: CatalogStore,
}

impl AppState {
    /// Create state over an explicit source and storage.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        source: &ContentSource,
        storage: Arc<dyn LocalStorage>,
    ) -> Self {
        let contents = ContentStores::new(source, &storage);
        let products = ContentStore::new(source.clone(), Arc::clone(&storage));
        let catalog = CatalogStore::new(products, storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                contents,
                catalog,
            }),
        }
    }

    /// Create state from configuration: HTTP source, file-backed storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the content URL is invalid or the storage
    /// directory cannot be created.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let source = ContentSource::http(config.content_base_url()?);
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::open(&config.storage_dir)?);
        Ok(Self::new(config, &source, storage))
    }

    /// Start loading every store in the background.
    pub fn start_loading(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            tokio::join!(state.contents().load_all(), state.catalog().load());
            info!(ready = state.is_ready(), "Content stores settled");
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn contents(&self) -> &ContentStores {
        &self.inner.contents
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// The store holding a given document.
    #[must_use]
    pub fn document(&self, kind: ContentKind) -> &dyn DocumentEditor {
        let contents = &self.inner.contents;
        match kind {
            ContentKind::Site => &contents.site,
            ContentKind::B2b => &contents.b2b,
            ContentKind::Contact => &contents.contact,
            ContentKind::Products => self.inner.catalog.content(),
            ContentKind::Reviews => &contents.reviews,
            ContentKind::Promos => &contents.promos,
        }
    }

    /// Load state of every document, in `ContentKind::ALL` order.
    #[must_use]
    pub fn statuses(&self) -> Vec<(ContentKind, LoadState)> {
        ContentKind::ALL
            .iter()
            .map(|&kind| (kind, self.document(kind).status()))
            .collect()
    }

    /// Whether every store and the catalog have settled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.statuses().iter().all(|(_, status)| status.is_settled())
            && !self.inner.catalog.is_loading()
    }
}
