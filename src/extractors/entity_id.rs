//! Extract the numeric `:id` path segment.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;

/// Route parameter that carries the row id.
pub const ID_PARAM: &str = "id";

/// Integer id taken from the `:id` route segment. Rejects with 400 when it is not an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let raw = params
            .get(ID_PARAM)
            .ok_or_else(|| AppError::BadRequest("missing id in path".into()))?;
        raw.trim()
            .parse::<i64>()
            .map(EntityId)
            .map_err(|_| AppError::BadRequest(format!("invalid id: {}", raw)))
    }
}
