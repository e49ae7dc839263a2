use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Carries only immutable configuration. Every portal session, cookie store,
/// and parsed result is request-local, so nothing here is mutated after
/// startup and no locking is needed.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (portal base URL, timeouts).
    pub config: Arc<ServerConfig>,
}
