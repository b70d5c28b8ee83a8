//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use fratelli_core::LoadState;
use serde::Serialize;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the stores.
pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentStatus {
    name: &'static str,
    status: LoadState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Readiness {
    ready: bool,
    documents: Vec<DocumentStatus>,
    catalog_loading: bool,
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until every store has settled. A store
/// that failed to load counts as settled.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.is_ready();
    let body = Readiness {
        ready,
        documents: state
            .statuses()
            .into_iter()
            .map(|(kind, status)| DocumentStatus {
                name: kind.name(),
                status,
            })
            .collect(),
        catalog_loading: state.catalog().is_loading(),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::routes::testing::{body_json, get, loaded_state, send, state};

    #[tokio::test]
    async fn test_health() {
        let response = send(&state(false), get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_before_load() {
        let response = send(&state(false), get("/health/ready")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["ready"], false);
        assert_eq!(body["documents"][0]["status"], "uninitialized");
    }

    #[tokio::test]
    async fn test_ready_after_load() {
        let response = send(&loaded_state(false).await, get("/health/ready")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["catalogLoading"], false);
    }
}
