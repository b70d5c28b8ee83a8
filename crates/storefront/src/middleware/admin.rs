//! Shared-password gate for the admin API.
//!
//! There are no admin accounts: anyone who knows the configured password can
//! edit content. The password travels in the `X-Admin-Password` header.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::password_matches;
use crate::error::{AppError, add_breadcrumb};
use crate::state::AppState;

/// The HTTP header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Reject requests that do not carry the configured admin password.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for a missing or wrong password, and
/// `AppError::NotFound` if no password is configured.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config().admin_password.as_ref() else {
        return Err(AppError::NotFound("admin API is disabled".to_string()));
    };

    let supplied = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing admin password".to_string()))?;

    if !password_matches(expected, supplied) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        return Err(AppError::Unauthorized("wrong admin password".to_string()));
    }

    add_breadcrumb(
        "admin",
        "Admin request",
        Some(&[
            ("method", request.method().as_str()),
            ("path", request.uri().path()),
        ]),
    );

    Ok(next.run(request).await)
}
