//! Pure state transitions for the product list.

use chrono::{DateTime, Utc};
use fratelli_core::{Product, ProductId};
use serde::Serialize;

/// Catalog state as seen by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            is_loading: true,
            error: None,
            last_updated: None,
        }
    }
}

/// Commands accepted by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    /// Replace the whole list and finish loading.
    SetProducts(Vec<Product>),
    AddProduct(Product),
    /// Replace the product with the same id. Unknown ids change nothing.
    UpdateProduct(Product),
    /// Remove the product with this id. Unknown ids change nothing.
    DeleteProduct(ProductId),
    SetLoading(bool),
    /// Record (or clear) an error and finish loading.
    SetError(Option<String>),
}

/// Apply one action, stamping list changes with `now`.
#[must_use]
pub fn reduce(mut state: CatalogState, action: CatalogAction, now: DateTime<Utc>) -> CatalogState {
    match action {
        CatalogAction::SetProducts(products) => {
            state.products = products;
            state.is_loading = false;
            state.last_updated = Some(now);
        }
        CatalogAction::AddProduct(product) => {
            state.products.push(product);
            state.last_updated = Some(now);
        }
        CatalogAction::UpdateProduct(product) => {
            if let Some(slot) = state.products.iter_mut().find(|p| p.id == product.id) {
                *slot = product;
                state.last_updated = Some(now);
            }
        }
        CatalogAction::DeleteProduct(id) => {
            let before = state.products.len();
            state.products.retain(|p| p.id != id);
            if state.products.len() != before {
                state.last_updated = Some(now);
            }
        }
        CatalogAction::SetLoading(is_loading) => {
            state.is_loading = is_loading;
        }
        CatalogAction::SetError(error) => {
            state.error = error;
            state.is_loading = false;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use fratelli_core::{NewProduct, ProductCategory};

    fn product(id: &str, name: &str) -> Product {
        NewProduct::new(name, ProductCategory::PaniClassici, "pz")
            .into_product(ProductId::new(id), DateTime::<Utc>::UNIX_EPOCH)
    }

    fn loaded(products: Vec<Product>) -> CatalogState {
        reduce(
            CatalogState::default(),
            CatalogAction::SetProducts(products),
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = CatalogState::default();
        assert!(state.is_loading);
        assert!(state.products.is_empty());
        assert!(state.last_updated.is_none());
    }

    #[test]
    fn test_set_products_finishes_loading() {
        let now = Utc::now();
        let state = reduce(
            CatalogState::default(),
            CatalogAction::SetProducts(vec![product("a", "A")]),
            now,
        );
        assert!(!state.is_loading);
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.last_updated, Some(now));
    }

    #[test]
    fn test_add_appends() {
        let state = loaded(vec![product("a", "A")]);
        let state = reduce(state, CatalogAction::AddProduct(product("b", "B")), Utc::now());
        let ids: Vec<&str> = state.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let state = loaded(vec![product("a", "A"), product("b", "B"), product("c", "C")]);
        let mut renamed = product("b", "B2");
        renamed.featured = true;

        let state = reduce(state, CatalogAction::UpdateProduct(renamed.clone()), Utc::now());
        assert_eq!(state.products.get(1), Some(&renamed));
        assert_eq!(state.products.len(), 3);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let before = loaded(vec![product("a", "A")]);
        let after = reduce(
            before.clone(),
            CatalogAction::UpdateProduct(product("zzz", "Z")),
            Utc::now(),
        );
        assert_eq!(after, before);
    }

    #[test]
    fn test_delete() {
        let state = loaded(vec![product("a", "A"), product("b", "B")]);
        let state = reduce(state, CatalogAction::DeleteProduct(ProductId::new("a")), Utc::now());
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products.first().map(|p| p.id.as_str()), Some("b"));

        let unchanged = reduce(
            state.clone(),
            CatalogAction::DeleteProduct(ProductId::new("a")),
            Utc::now(),
        );
        assert_eq!(unchanged, state);
    }

    #[test]
    fn test_set_error_keeps_products() {
        let state = loaded(vec![product("a", "A")]);
        let state = reduce(
            state,
            CatalogAction::SetError(Some("boom".to_string())),
            Utc::now(),
        );
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.is_loading);
        assert_eq!(state.products.len(), 1);
    }

    #[test]
    fn test_set_loading_does_not_touch_products() {
        let state = loaded(vec![product("a", "A")]);
        let stamp = state.last_updated;
        let state = reduce(state, CatalogAction::SetLoading(true), Utc::now());
        assert!(state.is_loading);
        assert_eq!(state.last_updated, stamp);
    }
}
