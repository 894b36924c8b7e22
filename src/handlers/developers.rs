//! Developer handlers: create, list, retrieve, update, delete, info, projects.

use crate::error::AppError;
use crate::extractors::{EntityId, JsonObject};
use crate::response::{created, ok};
use crate::schema::{DEVELOPERS, DEVELOPER_INFOS};
use crate::service::{DeveloperService, RequestValidator};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

fn developer_missing() -> AppError {
    AppError::NotFound("Developer does not exist!".into())
}

pub async fn create_developer(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let payload = RequestValidator::validate(&DEVELOPERS, &body)?;
    let developer = DeveloperService::create(&state.pool, &payload).await?;
    tracing::info!(developer_id = developer.id, "developer created");
    Ok(created(developer))
}

pub async fn list_developers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(DeveloperService::list(&state.pool).await?))
}

pub async fn retrieve_developer(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let detail = DeveloperService::retrieve(&state.pool, id)
        .await?
        .ok_or_else(developer_missing)?;
    Ok(ok(detail))
}

pub async fn update_developer(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonObject(body): JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let payload = RequestValidator::validate_partial(&DEVELOPERS, &body)?;
    let developer = DeveloperService::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(developer_missing)?;
    Ok(ok(developer))
}

pub async fn delete_developer(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    if !DeveloperService::delete(&state.pool, id).await? {
        return Err(developer_missing());
    }
    tracing::info!(developer_id = id, "developer deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_developer_info(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonObject(body): JsonObject,
) -> Result<impl IntoResponse, AppError> {
    if DeveloperService::info_exists(&state.pool, id).await? {
        return Err(AppError::Conflict("Developer infos already exists.".into()));
    }
    let payload = RequestValidator::validate(&DEVELOPER_INFOS, &body)?;
    let info = DeveloperService::create_info(&state.pool, id, payload).await?;
    tracing::info!(developer_id = id, "developer info created");
    Ok(ok(info))
}

pub async fn list_developer_projects(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(DeveloperService::projects(&state.pool, id).await?))
}
