//! Registration session handlers
//!
//! Each attendee drives one `RegistrationForm` through the session
//! endpoints. Validation errors come back as 422 with the error kind;
//! a submission already in flight is a 409; pipeline failure is a 502
//! and leaves the session on its data for a retry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::countdown::RedirectCountdown;
use crate::form::{DayToggle, FormField, FormStep, RegistrationDraft, ValidationError};
use crate::pipeline::SubmissionOutcome;
use crate::{AppState, Session};

/// API error responses
#[derive(Debug)]
pub enum ApiError {
    /// Step-boundary validation failed; recoverable, nothing advances
    Validation(ValidationError),
    /// Unknown session id
    SessionNotFound,
    /// A submission for this session is already running
    SubmissionInFlight,
    /// The pipeline rejected the submission (strict store policy)
    SubmissionFailed(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": e.to_string() }),
            ),
            ApiError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "session_not_found" }),
            ),
            ApiError::SubmissionInFlight => (
                StatusCode::CONFLICT,
                json!({ "error": "submission_in_flight" }),
            ),
            ApiError::SubmissionFailed(detail) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "submission_failed", "detail": detail }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Session state as shown to the client
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: FormStep,
    pub draft: RegistrationDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SubmissionOutcome>,
}

fn view(id: Uuid, session: &Session) -> SessionView {
    SessionView {
        session_id: id,
        step: session.form.step(),
        draft: session.form.draft().clone(),
        outcome: session.outcome.clone(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ParticipationBody {
    pub participation: retiro_common::ParticipationType,
}

#[derive(Debug, Deserialize)]
pub struct HostingStatusBody {
    pub status: retiro_common::HostingStatus,
}

#[derive(Debug, Deserialize)]
pub struct DayBody {
    pub day: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldBody {
    pub field: FormField,
    pub value: String,
}

/// POST /api/registration
///
/// Open a new registration session at the participation step.
pub async fn create_session(State(state): State<AppState>) -> Json<SessionView> {
    let id = Uuid::new_v4();
    let session = Session::new(&state.config);
    let response = view(id, &session);
    state.sessions.write().await.insert(id, session);
    info!("Opened registration session {}", id);
    Json(response)
}

/// GET /api/registration/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(Json(view(id, session)))
}

/// Run a mutation against one session. Any explicit user action tears
/// down a pending success-view countdown first.
async fn with_session<T>(
    state: &AppState,
    id: Uuid,
    op: impl FnOnce(&mut Session) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    if let Some(countdown) = session.countdown.take() {
        countdown.cancel();
    }
    op(session)
}

/// POST /api/registration/:id/participation
pub async fn select_participation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ParticipationBody>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.form.select_participation_type(body.participation);
        Ok(Json(view(id, session)))
    })
    .await
}

/// POST /api/registration/:id/hosting-status
pub async fn select_hosting_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<HostingStatusBody>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.form.select_hosting_status(body.status);
        Ok(Json(view(id, session)))
    })
    .await
}

/// POST /api/registration/:id/day
///
/// Flip one day flag. The response carries the advisory hosting
/// suggestion so the client can surface the cross-sell prompt.
pub async fn toggle_day(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DayBody>,
) -> Result<Json<DayToggle>, ApiError> {
    with_session(&state, id, |session| {
        Ok(Json(session.form.toggle_day(&body.day)))
    })
    .await
}

/// POST /api/registration/:id/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.form.advance_from_step1()?;
        Ok(Json(view(id, session)))
    })
    .await
}

/// POST /api/registration/:id/back
pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.form.go_back_to_step1()?;
        Ok(Json(view(id, session)))
    })
    .await
}

/// POST /api/registration/:id/field
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<FieldBody>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, id, |session| {
        session.form.update_field(body.field, &body.value);
        Ok(Json(view(id, session)))
    })
    .await
}

/// POST /api/registration/:id/submit
///
/// Freeze the record and run the submission pipeline. The session lock is
/// released while the pipeline runs; the frozen record is what the
/// pipeline sees, untouched by any concurrent session activity.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    // Freeze under the lock
    let record = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
        if let Some(countdown) = session.countdown.take() {
            countdown.cancel();
        }
        if session.form.step() == FormStep::Submitting {
            return Err(ApiError::SubmissionInFlight);
        }
        session.form.submit()?
    };

    let result = state.pipeline.submit(&record).await;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    match result {
        Ok(outcome) => {
            session.form.mark_succeeded();
            session.outcome = Some(outcome.clone());
            session.countdown = Some(start_redirect(&state, id, outcome.redirect_countdown_secs));
            info!("Registration submitted for session {}", id);
            Ok(Json(outcome))
        }
        Err(e) => {
            session.form.mark_failed();
            error!("Submission pipeline failed for session {}: {}", id, e);
            Err(ApiError::SubmissionFailed(e.to_string()))
        }
    }
}

/// Start the success-view countdown: when it fires, the session is
/// discarded entirely, mirroring the auto-redirect back to the
/// registration page. A finished session the user never revisits must
/// not stay in the map for the life of the process; the client opens a
/// new session for the next registration.
fn start_redirect(state: &AppState, id: Uuid, secs: u64) -> RedirectCountdown {
    let sessions = state.sessions.clone();
    RedirectCountdown::start(secs, move || {
        tokio::spawn(async move {
            if sessions.write().await.remove(&id).is_some() {
                info!("Session {} expired after the success countdown", id);
            }
        });
    })
}
