//! retiro-reg library - Registration service
//!
//! Exposes the form state machine, submission pipeline, and HTTP API for
//! integration testing.

pub mod api;
pub mod countdown;
pub mod form;
pub mod pipeline;
pub mod services;

use axum::Router;
use countdown::RedirectCountdown;
use form::RegistrationForm;
use pipeline::{SubmissionOutcome, SubmissionPipeline};
use retiro_common::EventConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One attendee's in-progress registration session
#[derive(Debug)]
pub struct Session {
    pub form: RegistrationForm,
    /// Pipeline result, present once the submission succeeded
    pub outcome: Option<SubmissionOutcome>,
    /// Auto-redirect timer, alive only while the success view shows
    pub countdown: Option<RedirectCountdown>,
}

impl Session {
    fn new(config: &EventConfig) -> Self {
        Self {
            form: RegistrationForm::new(config.days.clone(), config.require_transportation),
            outcome: None,
            countdown: None,
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EventConfig>,
    pub pipeline: Arc<SubmissionPipeline>,
    /// Active registration sessions, keyed by session id
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: EventConfig) -> Self {
        let pipeline = SubmissionPipeline::new(&config);
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/registration", post(api::create_session))
        .route("/api/registration/:id", get(api::get_session))
        .route("/api/registration/:id/participation", post(api::select_participation))
        .route("/api/registration/:id/hosting-status", post(api::select_hosting_status))
        .route("/api/registration/:id/day", post(api::toggle_day))
        .route("/api/registration/:id/advance", post(api::advance))
        .route("/api/registration/:id/back", post(api::go_back))
        .route("/api/registration/:id/field", post(api::update_field))
        .route("/api/registration/:id/submit", post(api::submit))
        .merge(api::health_routes())
        .with_state(state)
}
