//! Handlers for the `/time-recorder` resource (toggle, status).

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use kintai_core::credentials::Credentials;
use kintai_core::parser::AttendanceState;
use kintai_core::session::{PortalSession, StampDirection};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response body for successful toggle and status requests.
///
/// Stamp times not yet present on the portal page serialize as empty
/// strings, matching the portal's own "not stamped" presentation.
#[derive(Debug, Serialize)]
pub struct StampStatus {
    pub message: &'static str,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "leaveTime")]
    pub leave_time: String,
}

impl StampStatus {
    fn from_session(session: &PortalSession) -> Self {
        Self {
            message: "OK",
            start_time: session.start_time().unwrap_or_default().to_string(),
            leave_time: session.leave_time().unwrap_or_default().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /time-recorder/toggle
///
/// Clock in when off, clock out when on. A day that is already clocked out
/// is rejected; an anomalous portal state is surfaced, never guessed
/// around.
pub async fn toggle(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<StampStatus>> {
    let Json(credentials) = body.map_err(|_| AppError::BadRequest)?;

    let mut session = logged_in_session(&state, &credentials).await?;

    let direction = match session.state() {
        AttendanceState::Off => StampDirection::ToOn,
        AttendanceState::On => StampDirection::ToOff,
        AttendanceState::End => return Err(AppError::AlreadyClockedOut),
        AttendanceState::Unknown => return Err(AppError::AnomalousState),
    };

    session
        .record_stamp(direction)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(StampStatus::from_session(&session)))
}

/// POST /time-recorder/status
///
/// Log in, report the current stamp times, change nothing.
pub async fn status(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<StampStatus>> {
    let Json(credentials) = body.map_err(|_| AppError::BadRequest)?;

    let session = logged_in_session(&state, &credentials).await?;

    Ok(Json(StampStatus::from_session(&session)))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Build a freshly logged-in session for one request.
///
/// Every request performs its own login with its own cookie store; nothing
/// is pooled or reused, so one user's portal cookies can never serve
/// another's request.
async fn logged_in_session(
    state: &AppState,
    credentials: &Credentials,
) -> AppResult<PortalSession> {
    let mut session = PortalSession::new(
        state.config.portal_base_url.clone(),
        Duration::from_secs(state.config.portal_timeout_secs),
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    session
        .login(credentials)
        .await
        .map_err(AppError::LoginFailed)?;

    Ok(session)
}
