//! Project handlers, including linking technologies.

use crate::error::AppError;
use crate::extractors::{EntityId, JsonObject};
use crate::response::{created, ok};
use crate::schema::PROJECTS;
use crate::service::{DeveloperService, ProjectService, RequestValidator};
use crate::sql::PgBindValue;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::collections::HashMap;

fn project_missing() -> AppError {
    AppError::NotFound("Project does not exist!".into())
}

pub async fn create_project(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let payload = RequestValidator::validate(&PROJECTS, &body)?;
    if let Some(PgBindValue::I64(developer_id)) = payload.get("developerId") {
        if !DeveloperService::exists(&state.pool, *developer_id).await? {
            return Err(AppError::NotFound("Developer does not exist!".into()));
        }
    }
    let project = ProjectService::create(&state.pool, &payload).await?;
    tracing::info!(project_id = project.id, developer_id = project.developer_id, "project created");
    Ok(created(project))
}

pub async fn list_projects(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(ProjectService::list(&state.pool).await?))
}

pub async fn retrieve_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let rows = ProjectService::retrieve(&state.pool, id).await?;
    if rows.is_empty() {
        return Err(project_missing());
    }
    Ok(ok(rows))
}

pub async fn update_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonObject(body): JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let payload = RequestValidator::validate_partial(&PROJECTS, &body)?;
    let project = ProjectService::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(project_missing)?;
    Ok(ok(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    if !ProjectService::delete(&state.pool, id).await? {
        return Err(project_missing());
    }
    tracing::info!(project_id = id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_technology(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonObject(body): JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let name = match body.get("name") {
        None | Some(Value::Null) => {
            return Err(AppError::MissingFields("Missing technology name".into()));
        }
        Some(value) => value.as_str().unwrap_or_default(),
    };
    let technology = ProjectService::technology_by_name(&state.pool, name)
        .await?
        .ok_or_else(|| AppError::UnsupportedTechnology("Technology not supported!".into()))?;
    if ProjectService::is_linked(&state.pool, id, technology.id).await? {
        return Err(AppError::Conflict("Technology already exists in this project!".into()));
    }
    let linked = ProjectService::link_technology(&state.pool, id, &technology).await?;
    tracing::info!(project_id = id, technology = %technology.name, "technology linked");
    Ok(created(linked))
}

pub async fn remove_technology(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    Path(params): Path<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let name = params
        .get("name")
        .ok_or_else(|| AppError::BadRequest("missing technology name in path".into()))?;
    let technology = ProjectService::technology_by_name(&state.pool, name)
        .await?
        .ok_or_else(|| AppError::UnsupportedTechnology("Technology not found!".into()))?;
    if !ProjectService::unlink_technology(&state.pool, id, technology.id).await? {
        return Err(AppError::BadRequest(format!(
            "Technology {} not found in this project!",
            technology.name
        )));
    }
    tracing::info!(project_id = id, technology = %technology.name, "technology unlinked");
    Ok(StatusCode::NO_CONTENT)
}
