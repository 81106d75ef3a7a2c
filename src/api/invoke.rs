use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::handler::Args;
use crate::host::{InvocationRequest, LifecycleState};

use super::error::ApiError;
use super::AppState;

/// Header carrying the opaque caller identity, for observability only.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

#[derive(Debug, Deserialize)]
pub struct InvokeBody {
    pub args: Args,
}

/// POST /invoke - dispatch one invocation to the hosted handler
///
/// Body: `{"args": {...}}`. Success: 200 `{"response": <payload>}`.
/// 503 while the handler is still loading or after a failed load, 500 on
/// handler failure, 504 on timeout, 400 on a malformed body with nothing
/// dispatched to the host.
pub async fn invoke(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<InvokeBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let caller = headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    // Fresh immutable request per call; nothing is shared across requests.
    let request = InvocationRequest {
        args: body.args,
        caller,
    };

    let payload = state.host.invoke(&request).await?;
    Ok(Json(json!({ "response": payload })))
}

/// GET /healthz - readiness of the single hosted handler
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.host.state() {
        LifecycleState::Ready => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}
