//! Content document handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use fratelli_core::{ContentKind, LoadState};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Parse a document name from the path.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown names.
pub fn parse_kind(name: &str) -> Result<ContentKind> {
    name.parse()
        .map_err(|_| AppError::NotFound(format!("content document {name}")))
}

/// Current in-memory copy of a content document.
///
/// 503 while the document is loading, 500 once its load has failed.
pub async fn show(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<Value>> {
    let kind = parse_kind(&name)?;
    let store = state.document(kind);

    match store.status() {
        LoadState::Uninitialized | LoadState::Loading => {
            Err(AppError::Unavailable(format!("{kind} is loading")))
        }
        LoadState::Failed => Err(AppError::Internal(format!(
            "{kind} failed to load: {}",
            store.error().unwrap_or_default()
        ))),
        LoadState::Ready => store
            .document_json()?
            .map(Json)
            .ok_or_else(|| AppError::Internal(format!("{kind} is ready but empty"))),
    }
}
