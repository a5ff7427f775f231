use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use botdash_store::models::UniqueWrite;
use botdash_types::api::FieldError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::{self, Payload};

const INVALID_ID: &str = "Invalid command ID";
const NOT_FOUND: &str = "Command not found";

fn name_taken(name: &str) -> ApiError {
    ApiError::schema(
        "Invalid command data",
        vec![FieldError::new(
            "name",
            format!("A command named '{}' already exists", name),
        )],
    )
}

/// GET /api/commands
pub async fn list_commands(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.list_commands()?))
}

/// GET /api/commands/{id}
pub async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = validation::parse_id(&id, INVALID_ID)?;
    let command = state
        .store
        .get_command(id)?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    Ok(Json(command))
}

/// POST /api/commands
pub async fn create_command(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> ApiResult<impl IntoResponse> {
    let new = validation::new_command(&payload)?;
    let name = new.name.clone();

    let command = state
        .store
        .create_command_unique(new)?
        .ok_or_else(|| name_taken(&name))?;
    info!("Command '{}' created with id {}", command.name, command.id);
    Ok((StatusCode::CREATED, Json(command)))
}

/// PATCH /api/commands/{id}
pub async fn update_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload,
) -> ApiResult<impl IntoResponse> {
    let id = validation::parse_id(&id, INVALID_ID)?;
    let patch = validation::command_patch(&payload)?;
    let name = patch.name.clone();

    match state.store.update_command_unique(id, patch)? {
        UniqueWrite::Written(command) => {
            info!("Command {} updated", command.id);
            Ok(Json(command))
        }
        UniqueWrite::NameTaken => Err(name_taken(name.as_deref().unwrap_or_default())),
        UniqueWrite::Missing => Err(ApiError::NotFound(NOT_FOUND.into())),
    }
}

/// DELETE /api/commands/{id}
pub async fn delete_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = validation::parse_id(&id, INVALID_ID)?;
    if !state.store.delete_command(id)? {
        return Err(ApiError::NotFound(NOT_FOUND.into()));
    }
    info!("Command {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
