//! Route definitions for the `/time-recorder` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::time_recorder;
use crate::state::AppState;

/// Routes mounted at `/time-recorder`.
///
/// ```text
/// POST /toggle  -> clock in / clock out
/// POST /status  -> report current stamp times (no mutation)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(time_recorder::toggle))
        .route("/status", post(time_recorder::status))
}
