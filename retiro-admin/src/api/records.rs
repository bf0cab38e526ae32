//! Dashboard data handlers
//!
//! Every handler fetches a fresh snapshot from the tabular store and
//! computes its response from that snapshot alone. A failed bulk read is
//! reported as a 502 error body for the client's persistent banner; there
//! is no automatic retry — the organizer re-triggers the fetch manually.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::export::{export_filename, to_csv};
use crate::report::{compute_summary, filter, SummaryStats};
use crate::AppState;
use retiro_common::model::RegistrationRecord;

/// Bulk-read failure, surfaced as a persistent error state
#[derive(Debug)]
pub struct SyncError(retiro_common::Error);

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        error!("Sheet sync failed: {}", self.0);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "sheet_sync_failed", "detail": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Query parameters for the records listing
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    /// Free-text search over names, document, and phone
    #[serde(default)]
    pub search: String,
}

/// Records listing response
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub total: usize,
    pub matching: usize,
    pub records: Vec<RegistrationRecord>,
}

/// GET /api/records?search=
pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>, SyncError> {
    let records = state.sheet.fetch_all().await.map_err(SyncError)?;
    let matching: Vec<RegistrationRecord> = filter(&records, &query.search)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(RecordsResponse {
        total: records.len(),
        matching: matching.len(),
        records: matching,
    }))
}

/// GET /api/summary
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryStats>, SyncError> {
    let records = state.sheet.fetch_all().await.map_err(SyncError)?;
    Ok(Json(compute_summary(&records, &state.config.days)))
}

/// GET /api/export.csv
///
/// Full snapshot as a downloadable CSV named with the current date.
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, SyncError> {
    let records = state.sheet.fetch_all().await.map_err(SyncError)?;
    let csv = to_csv(&records);
    let filename = export_filename(chrono::Utc::now().date_naive());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
