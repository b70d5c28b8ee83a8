//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::content::{SaveError, StoreError};
use crate::editor::EditError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Remote save failed.
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Field edit was rejected.
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong admin password.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Data is still loading.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::NotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Serialize { .. } | StoreError::LockPoisoned => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Save(err) => match err {
                SaveError::NotLoaded(_) => StatusCode::SERVICE_UNAVAILABLE,
                SaveError::Remote(_) => StatusCode::BAD_GATEWAY,
                SaveError::Storage(_) | SaveError::LockPoisoned => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Catalog(err) => match err {
                CatalogError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                CatalogError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Edit(err) => match err {
                EditError::PathNotFound(_) => StatusCode::NOT_FOUND,
                EditError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                EditError::Store(StoreError::NotReady { .. }) => StatusCode::SERVICE_UNAVAILABLE,
                EditError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            StatusCode::BAD_GATEWAY => "Remote save failed, please retry".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for admin actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
