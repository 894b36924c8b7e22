//! Route-level pre-checks run before the handler: each issues one `COUNT(*)` lookup and
//! either rejects the request or hands it on unchanged.

mod developers;
mod projects;

pub use developers::{ensure_developer_exists, ensure_email_available};
pub use projects::{ensure_body_developer_exists, ensure_project_exists};

use crate::error::AppError;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{request::Parts, StatusCode},
};
use http_body_util::LengthLimitError;
use serde_json::Value;
use std::error::Error as StdError;

/// Read the whole body so a check can inspect it; the caller rebuilds the request from the parts.
/// Size is already capped by the body limit layer, whose overflow surfaces here as 413.
pub(crate) async fn buffer_body(request: Request) -> Result<(Parts, Bytes), AppError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.map_err(|e| {
        if exceeds_limit(&e) {
            AppError::Rejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "Failed to buffer the request body: length limit exceeded".into(),
            }
        } else {
            AppError::BadRequest("request body could not be read".into())
        }
    })?;
    Ok((parts, bytes))
}

/// Whether a `LengthLimitError` appears anywhere in the error's source chain.
fn exceeds_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

pub(crate) fn rebuild(parts: Parts, bytes: Bytes) -> Request {
    Request::from_parts(parts, Body::from(bytes))
}

/// Top-level `key` of a JSON object body; `None` when the body is not JSON or lacks the key.
pub(crate) fn body_field(bytes: &Bytes, key: &str) -> Option<Value> {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|mut v| v.get_mut(key).map(Value::take))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_field_reads_top_level_keys() {
        let bytes = Bytes::from_static(br#"{"email":"a@b.co","developerId":3}"#);
        assert_eq!(body_field(&bytes, "email"), Some(Value::from("a@b.co")));
        assert_eq!(body_field(&bytes, "developerId"), Some(Value::from(3)));
        assert_eq!(body_field(&bytes, "name"), None);
    }

    #[tokio::test]
    async fn overflowing_the_limit_is_413() {
        let limited = http_body_util::Limited::new(Body::from(vec![b'x'; 64]), 16);
        let request = axum::http::Request::new(Body::new(limited));
        let err = buffer_body(request).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn body_survives_buffering() {
        let request = axum::http::Request::new(Body::from(r#"{"email":"a@b.co"}"#));
        let (parts, bytes) = buffer_body(request).await.unwrap();
        let rebuilt = rebuild(parts, bytes.clone());
        let again = to_bytes(rebuilt.into_body(), usize::MAX).await.unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn body_field_ignores_non_json() {
        assert_eq!(body_field(&Bytes::from_static(b"email=a@b.co"), "email"), None);
        assert_eq!(body_field(&Bytes::new(), "email"), None);
    }
}
