pub mod error;
pub mod invoke;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::host::RuntimeHost;

/// Shared state handed to every request handler: the single runtime host
/// this process serves.
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<RuntimeHost>,
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    Router::new()
        .route("/invoke", post(invoke::invoke))
        .route("/healthz", get(invoke::healthz))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}
