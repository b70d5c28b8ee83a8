//! The product catalog: CRUD and lookups over a locally cached list.
//!
//! The catalog sits on top of the `products` content store. Once that
//! document has loaded, a compatible snapshot in local storage wins over the
//! canonical list so admin edits survive restarts. Every change to a
//! non-empty, settled list is written back to the snapshot.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use chrono::{DateTime, TimeDelta, Utc};
use fratelli_core::{
    CatalogStats, CategoryInfo, LoadState, NewProduct, Product, ProductCategory, ProductId,
    ProductsContent, slugify,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use super::reducer::{CatalogAction, CatalogState, reduce};
use super::snapshot::{self, Decoded, MIGRATIONS, STORAGE_KEY, STORAGE_VERSION, SnapshotMigration};
use crate::content::ContentStore;
use crate::storage::{CacheWrite, LocalStorage};

/// Message recorded when the product list cannot be loaded.
pub const LOAD_ERROR: &str = "Errore nel caricamento dei prodotti";

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not loaded")]
    NotLoaded,
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("catalog lock poisoned")]
    LockPoisoned,
}

/// A category with the number of available products in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[serde(flatten)]
    pub info: CategoryInfo,
    pub product_count: usize,
}

/// Product catalog handle.
///
/// Cheaply cloneable; clones share the same list.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    content: ContentStore<ProductsContent>,
    storage: Arc<dyn LocalStorage>,
    state: RwLock<CatalogState>,
    version: String,
    migrations: &'static [SnapshotMigration],
    loaded: OnceCell<()>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("version", &self.inner.version)
            .field("is_loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl CatalogStore {
    /// Create a catalog over the `products` content store, using the
    /// snapshot version and migrations of this build.
    #[must_use]
    pub fn new(content: ContentStore<ProductsContent>, storage: Arc<dyn LocalStorage>) -> Self {
        Self::with_version(content, storage, STORAGE_VERSION, MIGRATIONS)
    }

    /// Create a catalog that expects a specific snapshot version.
    #[must_use]
    pub fn with_version(
        content: ContentStore<ProductsContent>,
        storage: Arc<dyn LocalStorage>,
        version: impl Into<String>,
        migrations: &'static [SnapshotMigration],
    ) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                content,
                storage,
                state: RwLock::new(CatalogState::default()),
                version: version.into(),
                migrations,
                loaded: OnceCell::new(),
            }),
        }
    }

    /// The underlying `products` content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore<ProductsContent> {
        &self.inner.content
    }

    /// Snapshot version this catalog trusts.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Load the working set. Runs once; later calls return immediately.
    pub async fn load(&self) {
        self.inner.loaded.get_or_init(|| self.initialize()).await;
    }

    #[instrument(skip(self), fields(version = %self.inner.version))]
    async fn initialize(&self) {
        let content = &self.inner.content;
        content.load().await;

        let canonical = match (content.status(), content.data()) {
            (LoadState::Ready, Some(document)) => document.products,
            (status, _) => {
                error!(
                    %status,
                    error = content.error().as_deref().unwrap_or("unknown"),
                    "Cannot load catalog without canonical products"
                );
                if let Err(e) = self.dispatch(CatalogAction::SetError(Some(LOAD_ERROR.to_string()))) {
                    error!(error = %e, "Failed to record catalog error");
                }
                return;
            }
        };

        let (products, cache_error) = match self.read_snapshot() {
            Ok(Some(products)) => {
                info!(count = products.len(), "Adopted cached catalog");
                (products, None)
            }
            Ok(None) => {
                info!(count = canonical.len(), "Using canonical catalog");
                (canonical, None)
            }
            Err(message) => {
                warn!(error = %message, "Cached catalog unreadable, using canonical list");
                (canonical, Some(LOAD_ERROR.to_string()))
            }
        };

        let actions = cache_error
            .map(|message| CatalogAction::SetError(Some(message)))
            .into_iter()
            .chain([CatalogAction::SetProducts(products)]);
        if let Err(e) = self.dispatch_all(actions) {
            error!(error = %e, "Failed to initialise catalog");
        }
    }

    /// `Ok(Some)` when the snapshot is adopted, `Ok(None)` when there is no
    /// usable snapshot, `Err` when the snapshot could not be read at all.
    fn read_snapshot(&self) -> Result<Option<Vec<Product>>, String> {
        let raw = match self.inner.storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };

        match snapshot::decode(&raw, &self.inner.version, self.inner.migrations) {
            Ok(Decoded::Adopted { products, .. }) => Ok(Some(products)),
            Ok(Decoded::Incompatible { reason }) => {
                debug!(%reason, "Ignoring cached catalog");
                Ok(None)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a product with a fresh id and a slug derived from its name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotLoaded` while the catalog is loading.
    pub fn add_product(&self, fields: NewProduct) -> Result<Product, CatalogError> {
        let (product, _) = self.mutate(|state| {
            let now = Utc::now();
            let mut id = ProductId::generate(now);
            while state.products.iter().any(|p| p.id == id) {
                id = ProductId::generate(now);
            }
            let product = fields.into_product(id, now);
            Ok((CatalogAction::AddProduct(product.clone()), product))
        })?;

        info!(id = %product.id, slug = %product.slug, "Added product");
        Ok(product)
    }

    /// Replace a product, recomputing its slug and bumping `updated_at`.
    ///
    /// The stored `created_at` is kept whatever the caller sends.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for an unknown id and
    /// `CatalogError::NotLoaded` while the catalog is loading.
    pub fn update_product(&self, product: Product) -> Result<Product, CatalogError> {
        let (product, _) = self.mutate(|state| {
            let existing = state
                .products
                .iter()
                .find(|p| p.id == product.id)
                .ok_or_else(|| CatalogError::ProductNotFound(product.id.clone()))?;

            let mut next = product;
            next.slug = slugify(&next.name);
            next.created_at = existing.created_at;
            next.updated_at = later_than(existing.updated_at, Utc::now());
            Ok((CatalogAction::UpdateProduct(next.clone()), next))
        })?;

        info!(id = %product.id, "Updated product");
        Ok(product)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for an unknown id and
    /// `CatalogError::NotLoaded` while the catalog is loading.
    pub fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.mutate(|state| {
            if !state.products.iter().any(|p| &p.id == id) {
                return Err(CatalogError::ProductNotFound(id.clone()));
            }
            Ok((CatalogAction::DeleteProduct(id.clone()), ()))
        })?;
        info!(%id, "Deleted product");
        Ok(())
    }

    /// Discard every edit and go back to the canonical product list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotLoaded` if the canonical list never loaded.
    pub fn reset_to_initial(&self) -> Result<CacheWrite, CatalogError> {
        let canonical = self
            .inner
            .content
            .data()
            .map(|document| document.products)
            .ok_or(CatalogError::NotLoaded)?;

        let ((), outcome) = self.mutate(|_| Ok((CatalogAction::SetProducts(canonical), ())))?;
        info!("Catalog reset to canonical products");
        Ok(outcome)
    }

    /// Plan an action against the settled list and commit it under one lock.
    ///
    /// A catalog whose canonical list failed to load never accepts edits, so
    /// a cache from an earlier session is not overwritten.
    fn mutate<R>(
        &self,
        plan: impl FnOnce(&CatalogState) -> Result<(CatalogAction, R), CatalogError>,
    ) -> Result<(R, CacheWrite), CatalogError> {
        let mut state = self.write()?;
        if state.is_loading || self.inner.content.status() != LoadState::Ready {
            return Err(CatalogError::NotLoaded);
        }
        let (action, result) = plan(&state)?;
        Ok((result, self.commit(&mut state, action)))
    }

    fn dispatch(&self, action: CatalogAction) -> Result<CacheWrite, CatalogError> {
        let mut state = self.write()?;
        Ok(self.commit(&mut state, action))
    }

    /// Apply several actions under one lock so readers never see the steps
    /// in between.
    fn dispatch_all(
        &self,
        actions: impl IntoIterator<Item = CatalogAction>,
    ) -> Result<CacheWrite, CatalogError> {
        let mut state = self.write()?;
        let now = Utc::now();
        for action in actions {
            *state = reduce(std::mem::take(&mut *state), action, now);
        }
        Ok(self.persist(&state))
    }

    fn commit(&self, state: &mut CatalogState, action: CatalogAction) -> CacheWrite {
        *state = reduce(std::mem::take(state), action, Utc::now());
        self.persist(state)
    }

    fn persist(&self, state: &CatalogState) -> CacheWrite {
        if state.is_loading || state.products.is_empty() {
            return CacheWrite::Skipped;
        }

        let written = snapshot::encode(&self.inner.version, &state.products, state.last_updated)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.inner
                    .storage
                    .set_item(STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });

        match written {
            Ok(()) => {
                debug!(count = state.products.len(), "Cached catalog");
                CacheWrite::Stored(state.last_updated.unwrap_or_else(Utc::now))
            }
            Err(e) => {
                warn!(error = %e, "Failed to cache catalog");
                CacheWrite::Failed
            }
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, CatalogError> {
        self.inner
            .state
            .write()
            .map_err(|_| CatalogError::LockPoisoned)
    }

    fn read<R>(&self, view: impl FnOnce(&CatalogState) -> R) -> Result<R, CatalogError> {
        self.inner
            .state
            .read()
            .map(|state| view(&state))
            .map_err(|_| CatalogError::LockPoisoned)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Copy of the full catalog state.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LockPoisoned` if a writer panicked.
    pub fn state(&self) -> Result<CatalogState, CatalogError> {
        self.read(Clone::clone)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read(|state| state.is_loading).unwrap_or(false)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error.clone()).ok().flatten()
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.read(|state| state.last_updated).ok().flatten()
    }

    /// Every product, in list order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.filtered(|_| true)
    }

    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.find(|p| &p.id == id)
    }

    /// First product with this slug. Slugs are not forced to be unique.
    #[must_use]
    pub fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.find(|p| p.slug == slug)
    }

    /// Available products in a category.
    #[must_use]
    pub fn products_by_category(&self, category: ProductCategory) -> Vec<Product> {
        self.filtered(|p| p.category == category && p.available)
    }

    /// Featured products that are also available.
    #[must_use]
    pub fn featured_products(&self) -> Vec<Product> {
        self.filtered(|p| p.featured && p.available)
    }

    #[must_use]
    pub fn available_products(&self) -> Vec<Product> {
        self.filtered(|p| p.available)
    }

    /// Dashboard numbers for the admin.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        self.read(|state| CatalogStats {
            total_products: state.products.len(),
            featured_products: state.products.iter().filter(|p| p.featured).count(),
            categories_count: state
                .products
                .iter()
                .map(|p| p.category)
                .collect::<BTreeSet<_>>()
                .len(),
            last_updated: state.last_updated,
        })
        .unwrap_or(CatalogStats {
            total_products: 0,
            featured_products: 0,
            categories_count: 0,
            last_updated: None,
        })
    }

    /// Every category in display order with its available product count.
    #[must_use]
    pub fn categories_with_counts(&self) -> Vec<CategoryCount> {
        let available = self.available_products();
        ProductCategory::ALL
            .iter()
            .map(|&category| CategoryCount {
                info: category.info(),
                product_count: available.iter().filter(|p| p.category == category).count(),
            })
            .collect()
    }

    fn find(&self, predicate: impl Fn(&Product) -> bool) -> Option<Product> {
        self.read(|state| state.products.iter().find(|p| predicate(p)).cloned())
            .ok()
            .flatten()
    }

    fn filtered(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.read(|state| {
            state
                .products
                .iter()
                .filter(|p| predicate(p))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }
}

/// `now`, or the smallest step after `previous` if the clock has not moved.
fn later_than(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::ContentSource;
    use crate::storage::MemoryStorage;
    use fratelli_core::ContentKind;
    use serde_json::json;

    fn product_json(id: &str, name: &str, category: &str, available: bool, featured: bool) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "slug": slugify(name),
            "category": category,
            "description": format!("{name}, descrizione"),
            "shortDescription": name,
            "price": null,
            "unit": "kg",
            "image": format!("/images/{id}.jpg"),
            "available": available,
            "featured": featured,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        })
    }

    fn canonical() -> String {
        json!({
            "categories": [],
            "products": [
                product_json("pagnotta", "Pagnotta Classica", "pani-classici", true, true),
                product_json("segale", "Pane di Segale", "pani-speciali", false, true),
                product_json("focaccia", "Focaccia Genovese", "formati-ristorazione", true, false),
            ]
        })
        .to_string()
    }

    fn catalog_with(storage: Arc<dyn LocalStorage>, products_json: &str) -> CatalogStore {
        let source = ContentSource::memory([(ContentKind::Products, products_json.to_string())]);
        CatalogStore::new(ContentStore::new(source, Arc::clone(&storage)), storage)
    }

    async fn loaded(storage: Arc<dyn LocalStorage>) -> CatalogStore {
        let catalog = catalog_with(storage, &canonical());
        catalog.load().await;
        catalog
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_loading_until_load() {
        let catalog = catalog_with(Arc::new(MemoryStorage::new()), &canonical());
        assert!(catalog.is_loading());
        assert!(matches!(
            catalog.add_product(NewProduct::new("X", ProductCategory::SuRichiesta, "pz")),
            Err(CatalogError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_fresh_load_uses_canonical_and_caches_it() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = loaded(storage.clone()).await;

        assert!(!catalog.is_loading());
        assert!(catalog.error().is_none());
        assert_eq!(ids(&catalog.products()), ["pagnotta", "segale", "focaccia"]);
        assert_eq!(ids(&catalog.available_products()), ["pagnotta", "focaccia"]);
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_featured_subset_of_available() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        let available = catalog.available_products();
        let featured = catalog.featured_products();

        assert_eq!(ids(&featured), ["pagnotta"]);
        assert!(featured.iter().all(|p| available.contains(p)));
    }

    #[tokio::test]
    async fn test_category_filter_excludes_unavailable() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        assert!(catalog.products_by_category(ProductCategory::PaniSpeciali).is_empty());
        assert_eq!(
            ids(&catalog.products_by_category(ProductCategory::FormatiRistorazione)),
            ["focaccia"]
        );
    }

    #[tokio::test]
    async fn test_add_then_find_by_slug() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        let created = catalog
            .add_product(NewProduct::new("Pane Test", ProductCategory::PaniClassici, "kg"))
            .unwrap();

        assert_eq!(created.slug, "pane-test");
        assert_eq!(created.created_at, created.updated_at);
        assert!(created.id.as_str().starts_with("prod_"));
        assert_eq!(catalog.product_by_slug("pane-test"), Some(created.clone()));
        assert_eq!(catalog.products().last(), Some(&created));
    }

    #[tokio::test]
    async fn test_update_recomputes_slug_and_keeps_created_at() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        let before = catalog.product_by_id(&ProductId::new("pagnotta")).unwrap();

        let mut edited = before.clone();
        edited.name = "Pagnotta Rustica".to_string();
        edited.created_at = Utc::now();
        let after = catalog.update_product(edited).unwrap();

        assert_eq!(after.slug, "pagnotta-rustica");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(catalog.product_by_slug("pagnotta-rustica"), Some(after));
        assert!(catalog.product_by_slug("pagnotta-classica").is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_reported_and_changes_nothing() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        let before = catalog.state().unwrap();

        let mut ghost = catalog.products().remove(0);
        ghost.id = ProductId::new("ghost");
        assert!(matches!(
            catalog.update_product(ghost),
            Err(CatalogError::ProductNotFound(_))
        ));
        assert!(matches!(
            catalog.delete_product(&ProductId::new("ghost")),
            Err(CatalogError::ProductNotFound(_))
        ));
        assert_eq!(catalog.state().unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_then_lookup() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        let id = ProductId::new("segale");
        catalog.delete_product(&id).unwrap();
        assert!(catalog.product_by_id(&id).is_none());
        assert_eq!(catalog.products().len(), 2);
    }

    #[tokio::test]
    async fn test_cache_wins_on_reload() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let first = loaded(Arc::clone(&storage)).await;
        first.delete_product(&ProductId::new("pagnotta")).unwrap();
        let expected = first.products();

        let second = loaded(storage).await;
        assert_eq!(second.products(), expected);
    }

    #[tokio::test]
    async fn test_version_mismatch_uses_canonical() {
        let storage = Arc::new(MemoryStorage::new());
        let old = snapshot::encode("0.9", &[], None).unwrap();
        storage.set_item(STORAGE_KEY, &old).unwrap();

        let catalog = loaded(storage).await;
        assert_eq!(catalog.products().len(), 3);
        assert!(catalog.error().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_with_error() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(STORAGE_KEY, "{not json").unwrap();

        let catalog = loaded(storage).await;
        assert_eq!(catalog.products().len(), 3);
        assert_eq!(catalog.error().as_deref(), Some(LOAD_ERROR));
        assert!(!catalog.is_loading());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_settled_catalog_is_never_empty_after_corrupt_cache() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        let catalog = catalog_with(storage, &canonical());

        let observer = {
            let catalog = catalog.clone();
            std::thread::spawn(move || {
                loop {
                    let (loading, count) = catalog
                        .read(|state| (state.is_loading, state.products.len()))
                        .unwrap();
                    if !loading {
                        return count;
                    }
                    std::thread::yield_now();
                }
            })
        };

        catalog.load().await;

        assert_eq!(observer.join().unwrap(), 3);
        assert_eq!(catalog.error().as_deref(), Some(LOAD_ERROR));
    }

    #[tokio::test]
    async fn test_failed_content_sets_error() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let catalog = CatalogStore::new(
            ContentStore::new(ContentSource::memory([]), Arc::clone(&storage)),
            storage,
        );
        catalog.load().await;

        assert!(!catalog.is_loading());
        assert_eq!(catalog.error().as_deref(), Some(LOAD_ERROR));
        assert!(catalog.products().is_empty());
        assert!(matches!(catalog.reset_to_initial(), Err(CatalogError::NotLoaded)));
        assert!(matches!(
            catalog.add_product(NewProduct::new("Grissini", ProductCategory::SuRichiesta, "conf")),
            Err(CatalogError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_reset_restores_canonical() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = loaded(storage.clone()).await;
        catalog.delete_product(&ProductId::new("focaccia")).unwrap();
        catalog
            .add_product(NewProduct::new("Grissini", ProductCategory::SuRichiesta, "conf"))
            .unwrap();

        let outcome = catalog.reset_to_initial().unwrap();
        assert!(outcome.is_stored());
        assert_eq!(ids(&catalog.products()), ["pagnotta", "segale", "focaccia"]);
    }

    #[tokio::test]
    async fn test_empty_list_is_not_cached() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = catalog_with(storage.clone(), r#"{"products": []}"#);
        catalog.load().await;

        assert!(!catalog.is_loading());
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_write_failure_keeps_memory() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::with_quota(4096));
        let catalog = catalog_with(storage, &canonical());
        catalog.load().await;

        let mut big = NewProduct::new("Pane Enorme", ProductCategory::PaniSpeciali, "kg");
        big.description = "x".repeat(8192);
        let created = catalog.add_product(big).unwrap();
        assert_eq!(catalog.product_by_id(&created.id), Some(created));
    }

    #[tokio::test]
    async fn test_stats_and_category_counts() {
        let catalog = loaded(Arc::new(MemoryStorage::new())).await;
        let stats = catalog.stats();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.featured_products, 2);
        assert_eq!(stats.categories_count, 3);
        assert!(stats.last_updated.is_some());

        let counts: Vec<(ProductCategory, usize)> = catalog
            .categories_with_counts()
            .into_iter()
            .map(|c| (c.info.id, c.product_count))
            .collect();
        assert_eq!(
            counts,
            [
                (ProductCategory::PaniClassici, 1),
                (ProductCategory::PaniSpeciali, 0),
                (ProductCategory::FormatiRistorazione, 1),
                (ProductCategory::SuRichiesta, 0),
            ]
        );
    }

    #[test]
    fn test_later_than() {
        let t = Utc::now();
        assert!(later_than(t, t) > t);
        let next = t + TimeDelta::seconds(1);
        assert_eq!(later_than(t, next), next);
    }
}
