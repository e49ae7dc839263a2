//! Shared helpers for API integration tests.
//!
//! Builds the application router with the same middleware stack production
//! uses, and serves a recording mock portal so tests can assert exactly
//! which forms (if any) reached the remote.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, Method, Request, Response, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::post;
use axum::{Form, Router};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use kintai_api::config::ServerConfig;
use kintai_api::routes;
use kintai_api::state::AppState;

pub const CSRF_KEY: &str = "__sectag_4f2a91";
pub const CSRF_VALUE: &str = "8c31be";

// ---------------------------------------------------------------------------
// Application under test
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointed at the given mock portal.
pub fn test_config(portal_base_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        portal_base_url: portal_base_url.to_string(),
        portal_timeout_secs: 5,
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same stack (request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(portal_base_url: &str) -> Router {
    let state = AppState {
        config: Arc::new(test_config(portal_base_url)),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::app_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// POST a JSON value to the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, &body.to_string()).await
}

/// POST a raw (possibly malformed) body with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET a path from the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Credentials JSON matching the inbound contract.
pub fn credentials_json() -> serde_json::Value {
    serde_json::json!({
        "companycd": "acme",
        "username": "yamada",
        "password": "hunter2",
    })
}

// ---------------------------------------------------------------------------
// Mock portal
// ---------------------------------------------------------------------------

/// One request the mock portal saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub form: HashMap<String, String>,
    pub cookie: Option<String>,
}

/// Canned portal behaviour plus a log of every request received.
#[derive(Clone)]
pub struct MockPortal {
    login_body: String,
    stamp_body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockPortal {
    pub fn new(login_body: String, stamp_body: String) -> Self {
        Self {
            login_body,
            stamp_body,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose `module` field selected the stamping operation.
    pub fn stamp_requests(&self) -> Vec<RecordedRequest> {
        self.recorded()
            .into_iter()
            .filter(|r| r.form.get("module").map(String::as_str) == Some("timerecorder"))
            .collect()
    }
}

/// Authenticated portal page with optional stamp times and CSRF field.
pub fn authenticated_page(csrf: bool, start: Option<&str>, leave: Option<&str>) -> String {
    let mut body = String::from(
        "<html><body>\n<div class=\"user_name\">山田 太郎</div>\n\
         <form action=\"./\" method=\"post\">\n",
    );
    if csrf {
        body.push_str(&format!(
            "<input type=\"hidden\" name=\"{CSRF_KEY}\" value=\"{CSRF_VALUE}\">\n"
        ));
    }
    if let Some(t) = start {
        body.push_str(&format!("<td>出社<br />({t})</td>\n"));
    }
    if let Some(t) = leave {
        body.push_str(&format!("<td>退社<br />({t})</td>\n"));
    }
    body.push_str("</form></body></html>");
    body
}

/// Login-failure page: still 200 OK, just no authenticated marker.
pub fn unauthorized_page() -> String {
    "<html><body><form name=\"login\">Company code or login name is wrong.</form></body></html>"
        .to_string()
}

async fn handle(
    State(portal): State<MockPortal>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let cookie = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let module = form.get("module").cloned().unwrap_or_default();

    portal
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { form, cookie });

    match module.as_str() {
        "login" => (
            [(SET_COOKIE, "kintai_mock=abc123; Path=/")],
            Html(portal.login_body.clone()),
        )
            .into_response(),
        "timerecorder" => Html(portal.stamp_body.clone()).into_response(),
        _ => Html("<html><body>unknown module</body></html>".to_string()).into_response(),
    }
}

/// Serve the mock portal on an ephemeral port; returns its base URL.
pub async fn spawn_portal(portal: MockPortal) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", post(handle)).with_state(portal);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}
