//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use fratelli_core::{Product, ProductCategory};

use crate::catalog::{CatalogStore, CategoryCount};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// The catalog, once its first load has settled.
fn settled(state: &AppState) -> Result<&CatalogStore> {
    let catalog = state.catalog();
    if catalog.is_loading() {
        return Err(AppError::Unavailable("catalog is loading".to_string()));
    }
    Ok(catalog)
}

/// Available products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(settled(&state)?.available_products()))
}

/// Featured products that are also available.
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(settled(&state)?.featured_products()))
}

/// Available products in one category.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let category: ProductCategory = category
        .parse()
        .map_err(|_| AppError::NotFound(format!("category {category}")))?;
    Ok(Json(settled(&state)?.products_by_category(category)))
}

/// Product detail by slug.
///
/// Unavailable products are still shown so that old links keep working.
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Product>> {
    settled(&state)?
        .product_by_slug(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))
}

/// Every category with its available product count.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryCount>>> {
    Ok(Json(settled(&state)?.categories_with_counts()))
}
