//! Route handlers for the chat surface.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Caller-supplied conversational identity. Required: there is no
    /// implicit shared session.
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Reserved for UI affordances rendered by the presentation layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub api_url: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /send`: run one dialogue turn.
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest("session_id is required".to_string()));
    }

    let reply = state
        .engine
        .handle_message(request.session_id.trim(), &request.message)
        .await;
    info!(session_id = request.session_id.trim(), action = reply.action(), "turn handled");

    Ok(Json(ChatResponse {
        reply: reply.text.clone(),
        action: reply.action(),
        data: reply.data,
        html: None,
    }))
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /status`: probe whether the booking API answers at all.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let api_url = state.config.api.base_url();
    let reachable = state
        .probe
        .get(&api_url)
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .is_ok();

    Json(StatusResponse {
        status: if reachable { "connected" } else { "disconnected" },
        api_url,
    })
}
