//! retiro-admin library - Organizer dashboard service
//!
//! Read-only view over the tabular store: summary counts, free-text
//! filtering, and CSV export. Gated by a shared passphrase that is a
//! navigation convenience, not a security boundary.

use axum::Router;
use retiro_common::sheet::SheetClient;
use retiro_common::EventConfig;
use std::sync::Arc;

pub mod api;
pub mod export;
pub mod report;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EventConfig>,
    /// Tabular store client (bulk read only in this service)
    pub sheet: SheetClient,
}

impl AppState {
    /// Create new application state
    pub fn new(config: EventConfig) -> Self {
        let sheet = SheetClient::new(&config.sheet_url);
        Self {
            config: Arc::new(config),
            sheet,
        }
    }
}

/// Build application router
///
/// Data routes sit behind the passphrase gate; the health endpoint is
/// open.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::get;

    let gated = Router::new()
        .route("/api/records", get(api::get_records))
        .route("/api/summary", get(api::get_summary))
        .route("/api/export.csv", get(api::export_csv))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::gate_middleware,
        ));

    Router::new()
        .merge(gated)
        .merge(api::health_routes())
        .with_state(state)
}
