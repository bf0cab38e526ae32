//! Dashboard access gate
//!
//! A single shared passphrase, compared against the `X-Admin-Key`
//! request header, unlocks the data routes. This is a navigation gate
//! for organizers, explicitly not a security boundary: an empty
//! configured passphrase disables the check entirely.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Header carrying the passphrase
pub const GATE_HEADER: &str = "x-admin-key";

/// Gate middleware applied to the data routes.
///
/// Returns 401 with a JSON error body when the passphrase is missing or
/// wrong; passes through untouched when the gate is disabled.
pub async fn gate_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.config.admin_passphrase.is_empty() {
        // Gate disabled
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(GATE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided != state.config.admin_passphrase {
        warn!("Rejected dashboard request with missing or wrong passphrase");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "wrong_passphrase" })),
        )
            .into_response();
    }

    next.run(request).await
}
