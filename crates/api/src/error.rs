use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use kintai_core::error::PortalError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent `{"message": ...}`
/// JSON error bodies. The portal answers 200 OK on failed logins, so
/// authentication and transport failures both surface here as
/// [`AppError::LoginFailed`] / [`AppError::Internal`] with the underlying
/// message embedded -- that message is the caller's only distinguishing
/// signal.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed inbound JSON body.
    #[error("invalid request body")]
    BadRequest,

    /// Login against the portal failed (bad credentials or transport).
    #[error("Login error: {0}")]
    LoginFailed(#[source] PortalError),

    /// Toggle requested on a day that is already clocked out.
    #[error("本日は退勤済みです")]
    AlreadyClockedOut,

    /// The portal page showed a departure time without an arrival time.
    /// Surfaced, never coerced to a neighbouring state.
    #[error("unknown state: departure time found without arrival time")]
    AnomalousState,

    /// Session construction or stamping failure.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest | AppError::AlreadyClockedOut => StatusCode::BAD_REQUEST,
            AppError::LoginFailed(_) | AppError::AnomalousState | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match &self {
            AppError::AnomalousState => {
                tracing::warn!(error = %self, "anomalous attendance state");
            }
            AppError::LoginFailed(source) => {
                tracing::error!(error = %source, "login failed");
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
            }
            AppError::BadRequest | AppError::AlreadyClockedOut => {}
        }

        let body = json!({ "message": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
