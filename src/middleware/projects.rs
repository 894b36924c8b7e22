use super::{body_field, buffer_body, rebuild};
use crate::error::AppError;
use crate::extractors::EntityId;
use crate::service::{DeveloperService, ProjectService};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// 404 unless the project in the `:id` segment exists.
pub async fn ensure_project_exists(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !ProjectService::exists(&state.pool, id).await? {
        return Err(AppError::NotFound("Project does not exist!".into()));
    }
    Ok(next.run(request).await)
}

/// 404 when the body names a `developerId` that does not exist. A missing or
/// non-integer `developerId` is left for the handler's validation.
pub async fn ensure_body_developer_exists(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, bytes) = buffer_body(request).await?;
    if let Some(developer_id) = body_field(&bytes, "developerId").and_then(|v| v.as_i64()) {
        if !DeveloperService::exists(&state.pool, developer_id).await? {
            return Err(AppError::NotFound("Developer does not exist!".into()));
        }
    }
    Ok(next.run(rebuild(parts, bytes)).await)
}
