//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::schema::SUPPORTED_TECHNOLOGIES;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    /// Body lacks keys the operation needs; reported under `error` rather than `message`.
    #[error("{0}")]
    MissingFields(String),
    /// Technology name outside the seeded set; the body lists the accepted names.
    #[error("{0}")]
    UnsupportedTechnology(String),
    /// Framework-level rejection (body limit, content type, malformed JSON) with its own status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
}

/// PostgreSQL SQLSTATE codes the API reports as client errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::MissingFields(_)
            | AppError::UnsupportedTechnology(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Db(e) => match e {
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                sqlx::Error::Database(db) => match db.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => StatusCode::CONFLICT,
                    Some(FOREIGN_KEY_VIOLATION) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                },
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        let message = match self {
            AppError::Db(sqlx::Error::RowNotFound) => "Resource does not exist!".to_string(),
            AppError::Db(sqlx::Error::Database(db)) => match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => "Resource already exists!".to_string(),
                Some(FOREIGN_KEY_VIOLATION) => "Referenced resource does not exist!".to_string(),
                _ => "Internal server error".to_string(),
            },
            AppError::Db(_) | AppError::Config(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        match self {
            AppError::MissingFields(_) => ErrorBody {
                message: None,
                error: Some(message),
                options: None,
            },
            AppError::UnsupportedTechnology(_) => ErrorBody {
                message: Some(message),
                error: None,
                options: Some(SUPPORTED_TECHNOLOGIES.to_vec()),
            },
            _ => ErrorBody {
                message: Some(message),
                error: None,
                options: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
