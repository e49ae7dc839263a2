pub mod health;
pub mod time_recorder;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum::Router;
use serde_json::json;

use crate::state::AppState;

/// Build the full route tree.
///
/// ```text
/// GET  /health                  service health
///
/// POST /time-recorder/toggle    clock in / clock out
/// POST /time-recorder/status    report current stamp times
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/time-recorder", time_recorder::router())
        .fallback(not_found)
}

/// Fallback for unknown routes, keeping the JSON message shape.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Endpoint not found" })),
    )
}
