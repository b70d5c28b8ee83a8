//! Admin API handlers.
//!
//! Every route here sits behind [`crate::middleware::require_admin`].
//! Content documents are edited through their stores; products go through
//! the catalog so that ids, slugs and timestamps stay consistent.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use fratelli_core::{CatalogStats, ContentKind, NewProduct, Product, ProductId};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::catalog::CatalogState;
use crate::editor::{DocumentEditor, FieldEdit};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::content::parse_kind;
use crate::state::AppState;
use crate::storage::CacheWrite;

/// Outcome of a content write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Whether the local cache holds the change.
    pub cached: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

impl SaveResponse {
    fn new(outcome: CacheWrite, store: &dyn DocumentEditor) -> Self {
        Self {
            cached: outcome.is_stored(),
            last_saved: store.last_saved(),
        }
    }
}

/// Store for a document that may be edited through the content routes.
fn editable<'a>(state: &'a AppState, name: &str) -> Result<&'a dyn DocumentEditor> {
    let kind = parse_kind(name)?;
    if kind == ContentKind::Products {
        return Err(AppError::BadRequest(
            "products are edited through /api/admin/products".to_string(),
        ));
    }
    Ok(state.document(kind))
}

/// Replace a whole content document.
pub async fn replace_content(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(document): Json<Value>,
) -> Result<Json<SaveResponse>> {
    let store = editable(&state, &name)?;
    let outcome = store.replace_document(document)?;
    info!(kind = %store.kind(), ?outcome, "Content document replaced");
    Ok(Json(SaveResponse::new(outcome, store)))
}

/// Change one field of a content document.
pub async fn edit_content(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(edit): Json<FieldEdit>,
) -> Result<Json<SaveResponse>> {
    let store = editable(&state, &name)?;
    let outcome = store.edit_field(&edit)?;
    info!(kind = %store.kind(), path = %edit.path, ?outcome, "Content field edited");
    Ok(Json(SaveResponse::new(outcome, store)))
}

/// Save a content document remotely.
pub async fn publish_content(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SaveResponse>> {
    let store = editable(&state, &name)?;
    let saved = store.save_remote()?;
    add_breadcrumb("admin", "Content published", Some(&[("kind", store.kind().name())]));
    Ok(Json(SaveResponse {
        cached: true,
        last_saved: Some(saved),
    }))
}

/// The full catalog state, unavailable products included.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<CatalogState>> {
    Ok(Json(state.catalog().state()?))
}

/// Add a product. The id and slug are derived from its name.
pub async fn create_product(
    State(state): State<AppState>,
    Json(fields): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().add_product(fields)?;
    info!(id = %product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(product): Json<Product>,
) -> Result<Json<Product>> {
    if product.id.as_str() != id {
        return Err(AppError::BadRequest(format!(
            "body id {} does not match {id}",
            product.id
        )));
    }
    let product = state.catalog().update_product(product)?;
    info!(id = %product.id, "Product updated");
    Ok(Json(product))
}

/// Remove a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);
    state.catalog().delete_product(&id)?;
    info!(%id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Drop every local product change and go back to the canonical list.
pub async fn reset_products(State(state): State<AppState>) -> Result<Json<CatalogState>> {
    let catalog = state.catalog();
    let outcome = catalog.reset_to_initial()?;
    info!(?outcome, "Catalog reset to canonical products");
    Ok(Json(catalog.state()?))
}

/// Dashboard numbers.
pub async fn stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog().stats())
}
