use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::validation::{self, Payload};

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    /// Kept as text: a value that is not a non-negative integer is ignored
    /// rather than rejected.
    pub limit: Option<String>,
}

impl LogQuery {
    fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

/// GET /api/logs?limit=N
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.list_logs(query.limit())?))
}

/// POST /api/logs
pub async fn create_log(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> ApiResult<impl IntoResponse> {
    let new = validation::new_log(&payload)?;
    let log = state.store.create_log(new)?;
    Ok((StatusCode::CREATED, Json(log)))
}
