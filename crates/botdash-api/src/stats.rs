use axum::{Json, extract::State, response::IntoResponse};
use tracing::info;

use botdash_store::models::NewLog;
use botdash_types::api::{HealthResponse, MessageResponse, StatusResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::{self, Payload};

const NOT_CONNECTED: &str = "Bot is not connected";
const NO_STATS: &str = "Bot statistics not available";

/// GET /api/stats
///
/// Unavailable until the chat client has completed its first handshake.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if !state.chat.has_initialized() {
        return Err(ApiError::ServiceUnavailable(NOT_CONNECTED.into()));
    }
    let stat = state
        .store
        .get_bot_stats()?
        .ok_or_else(|| ApiError::ServiceUnavailable(NO_STATS.into()))?;
    Ok(Json(stat))
}

/// PUT /api/stats
pub async fn replace_stats(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> ApiResult<impl IntoResponse> {
    let new = validation::bot_stat(&payload)?;
    Ok(Json(state.store.replace_bot_stats(new)?))
}

/// GET /api/status
///
/// Guild count and latency come live from the chat client; everything else
/// from the statistics record.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if !state.chat.is_ready() {
        return Err(ApiError::ServiceUnavailable(NOT_CONNECTED.into()));
    }
    let stat = state
        .store
        .get_bot_stats()?
        .ok_or_else(|| ApiError::ServiceUnavailable(NO_STATS.into()))?;

    Ok(Json(StatusResponse {
        status: "online".to_string(),
        uptime: stat.uptime,
        servers: state.chat.guild_count(),
        commands: stat.commands,
        memory_usage: stat.memory_usage,
        api_latency: state.chat.latency_ms(),
        started_at: stat.started_at,
        updated_at: stat.updated_at,
    }))
}

/// POST /api/restart
pub async fn restart(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if !state.chat.is_ready() {
        return Err(ApiError::ServiceUnavailable(NOT_CONNECTED.into()));
    }
    state.chat.request_restart()?;
    state.store.create_log(NewLog::new(
        "Restart",
        "Dashboard",
        "Dashboard user",
        "Bot restart requested from dashboard",
    ))?;
    info!("Bot restart requested");

    Ok(Json(MessageResponse {
        message: "Bot restart initiated".to_string(),
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if !state.is_healthy() {
        return Err(ApiError::ServiceUnavailable(
            "Service is unhealthy after an unhandled fault".into(),
        ));
    }
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
