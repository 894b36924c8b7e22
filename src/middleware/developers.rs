use super::{body_field, buffer_body, rebuild};
use crate::error::AppError;
use crate::extractors::EntityId;
use crate::service::DeveloperService;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// 404 unless the developer in the `:id` segment exists.
pub async fn ensure_developer_exists(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !DeveloperService::exists(&state.pool, id).await? {
        return Err(AppError::NotFound("Developer does not exist!".into()));
    }
    Ok(next.run(request).await)
}

/// 409 when the body's `email` already belongs to a developer. Bodies without an email pass.
pub async fn ensure_email_available(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, bytes) = buffer_body(request).await?;
    if let Some(email) = body_field(&bytes, "email").as_ref().and_then(|v| v.as_str()) {
        if DeveloperService::email_taken(&state.pool, email).await? {
            return Err(AppError::Conflict("Email already exists!".into()));
        }
    }
    Ok(next.run(rebuild(parts, bytes)).await)
}
