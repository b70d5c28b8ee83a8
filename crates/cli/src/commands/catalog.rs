//! Catalog cache commands.
//!
//! These work on the same file-backed local storage the storefront uses,
//! with canonical documents read straight from the content directory.
//!
//! # Usage
//!
//! ```bash
//! # Products the storefront would show
//! fratelli catalog list
//!
//! # Including unavailable ones
//! fratelli catalog list --all
//!
//! # Is the cached snapshot usable?
//! fratelli catalog inspect
//!
//! # Throw away local product edits
//! fratelli catalog reset
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fratelli_core::Product;
use fratelli_storefront::catalog::snapshot::decode;
use fratelli_storefront::catalog::{
    CatalogStore, Decoded, MIGRATIONS, STORAGE_KEY, STORAGE_VERSION,
};
use fratelli_storefront::content::ContentStore;
use fratelli_storefront::source::ContentSource;
use fratelli_storefront::storage::{CacheWrite, FileStorage, LocalStorage};
use thiserror::Error;
use tracing::info;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error("storage error: {0}")]
    Storage(#[from] fratelli_storefront::storage::StorageError),
    #[error("catalog error: {0}")]
    Catalog(#[from] fratelli_storefront::catalog::CatalogError),
    #[error("could not load the catalog: {0}")]
    Load(String),
}

/// Where the catalog lives on disk.
#[derive(Debug, Clone)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub storage_dir: PathBuf,
}

/// What `inspect` found in local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// No snapshot is cached.
    Absent,
    /// A snapshot the storefront would adopt.
    Adoptable { products: usize },
    /// A readable snapshot the storefront would ignore.
    Ignored { reason: String },
    /// Text that does not decode at all.
    Corrupt { error: String },
}

impl std::fmt::Display for Inspection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "no cached catalog"),
            Self::Adoptable { products } => write!(
                f,
                "cached catalog v{STORAGE_VERSION} with {products} products, would be adopted"
            ),
            Self::Ignored { reason } => {
                write!(f, "cached catalog ignored ({reason}), canonical list wins")
            }
            Self::Corrupt { error } => write!(f, "cached catalog is corrupt: {error}"),
        }
    }
}

fn open_storage(dir: &Path) -> Result<Arc<dyn LocalStorage>, CatalogCommandError> {
    Ok(Arc::new(FileStorage::open(dir)?))
}

/// Build and load a catalog over the given paths.
async fn load_catalog(paths: &Paths) -> Result<CatalogStore, CatalogCommandError> {
    let storage = open_storage(&paths.storage_dir)?;
    let source = ContentSource::directory(&paths.content_dir);
    let content = ContentStore::new(source, Arc::clone(&storage));
    let catalog = CatalogStore::new(content, storage);
    catalog.load().await;

    if let Some(error) = catalog.content().error() {
        return Err(CatalogCommandError::Load(error));
    }
    Ok(catalog)
}

/// Products the storefront would show, or every product with `all`.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened or the
/// canonical products cannot be read.
pub async fn list(paths: &Paths, all: bool) -> Result<Vec<Product>, CatalogCommandError> {
    let catalog = load_catalog(paths).await?;
    Ok(if all {
        catalog.products()
    } else {
        catalog.available_products()
    })
}

/// Report on the cached snapshot without changing anything.
///
/// # Errors
///
/// Returns an error if the storage cannot be read.
pub fn inspect(paths: &Paths) -> Result<Inspection, CatalogCommandError> {
    let storage = open_storage(&paths.storage_dir)?;
    let Some(raw) = storage.get_item(STORAGE_KEY)? else {
        return Ok(Inspection::Absent);
    };

    Ok(match decode(&raw, STORAGE_VERSION, MIGRATIONS) {
        Ok(Decoded::Adopted { products, .. }) => Inspection::Adoptable {
            products: products.len(),
        },
        Ok(Decoded::Incompatible { reason }) => Inspection::Ignored { reason },
        Err(err) => Inspection::Corrupt {
            error: err.to_string(),
        },
    })
}

/// Replace the cached catalog with the canonical products.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or reset.
pub async fn reset(paths: &Paths) -> Result<CacheWrite, CatalogCommandError> {
    let catalog = load_catalog(paths).await?;
    let outcome = catalog.reset_to_initial()?;
    info!(?outcome, products = catalog.products().len(), "Catalog reset");
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fratelli_core::{NewProduct, ProductCategory};

    fn paths(storage: &tempfile::TempDir) -> Paths {
        Paths {
            content_dir: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../storefront/content"
            )),
            storage_dir: storage.path().to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_list_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let products = list(&paths(&dir), true).await.unwrap();
        assert_eq!(products.len(), 9);
    }

    #[tokio::test]
    async fn test_list_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths {
            content_dir: dir.path().join("nope"),
            storage_dir: dir.path().to_path_buf(),
        };
        assert!(matches!(
            list(&paths, false).await,
            Err(CatalogCommandError::Load(_))
        ));
    }

    #[test]
    fn test_inspect_absent_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(&dir);
        assert_eq!(inspect(&paths).unwrap(), Inspection::Absent);

        std::fs::write(dir.path().join(STORAGE_KEY), "{not json").unwrap();
        assert!(matches!(inspect(&paths).unwrap(), Inspection::Corrupt { .. }));

        std::fs::write(
            dir.path().join(STORAGE_KEY),
            r#"{"version":"0.9","products":[]}"#,
        )
        .unwrap();
        assert!(matches!(inspect(&paths).unwrap(), Inspection::Ignored { .. }));
    }

    #[tokio::test]
    async fn test_reset_discards_local_edits() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(&dir);

        let catalog = load_catalog(&paths).await.unwrap();
        catalog
            .add_product(NewProduct::new(
                "Pane alle Noci",
                ProductCategory::PaniSpeciali,
                "pezzo",
            ))
            .unwrap();
        assert_eq!(
            inspect(&paths).unwrap(),
            Inspection::Adoptable { products: 10 }
        );

        let outcome = reset(&paths).await.unwrap();
        assert!(outcome.is_stored());
        assert_eq!(inspect(&paths).unwrap(), Inspection::Adoptable { products: 9 });
        assert_eq!(list(&paths, true).await.unwrap().len(), 9);
    }
}
