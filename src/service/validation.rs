//! Request validation against table descriptors.

use crate::error::AppError;
use crate::models::OperatingSystem;
use crate::schema::{Column, Format, Table};
use crate::sql::PgBindValue;
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

fn email_regex() -> Result<&'static Regex, AppError> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = EMAIL.get() {
        return Ok(re);
    }
    let re = Regex::new(EMAIL_PATTERN)
        .map_err(|e| AppError::Validation(format!("invalid email pattern: {}", e)))?;
    Ok(EMAIL.get_or_init(|| re))
}

/// Validated request fields, in descriptor order, ready to bind.
#[derive(Debug, Default)]
pub struct Payload {
    fields: Vec<(&'static Column, PgBindValue)>,
}

impl Payload {
    pub fn fields(&self) -> &[(&'static Column, PgBindValue)] {
        &self.fields
    }

    pub fn push(&mut self, column: &'static Column, value: PgBindValue) {
        self.fields.push((column, value));
    }

    pub fn get(&self, key: &str) -> Option<&PgBindValue> {
        self.fields.iter().find(|(c, _)| c.key == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. Keys the table does not map are dropped; every missing
    /// required key is reported in one error.
    pub fn validate(table: &'static Table, body: &Map<String, Value>) -> Result<Payload, AppError> {
        let missing: Vec<&str> = table
            .columns
            .iter()
            .filter(|c| c.required && body.get(c.key).map_or(true, Value::is_null))
            .map(|c| c.key)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(format!(
                "Missing required keys: {}",
                missing.join(",")
            )));
        }
        let mut payload = Payload::default();
        for c in table.columns {
            if let Some(v) = body.get(c.key) {
                payload.push(c, bind_field(c, v)?);
            }
        }
        Ok(payload)
    }

    /// Validate the table's updatable keys that are present (for PATCH). Other keys are
    /// dropped; a body with no updatable key is rejected.
    pub fn validate_partial(table: &'static Table, body: &Map<String, Value>) -> Result<Payload, AppError> {
        let mut payload = Payload::default();
        for c in table.updatable_columns() {
            if let Some(v) = body.get(c.key) {
                payload.push(c, bind_field(c, v)?);
            }
        }
        if payload.is_empty() {
            return Err(AppError::MissingFields(format!(
                "Updatable fields are: {}",
                table.updatable.join(",")
            )));
        }
        Ok(payload)
    }
}

fn bind_field(c: &Column, v: &Value) -> Result<PgBindValue, AppError> {
    if v.is_null() {
        return if c.nullable {
            Ok(PgBindValue::Null)
        } else {
            Err(AppError::Validation(format!("{} cannot be null", c.key)))
        };
    }
    match c.format {
        Format::Integer => v
            .as_i64()
            .map(PgBindValue::I64)
            .ok_or_else(|| AppError::Validation(format!("{} must be an integer", c.key))),
        Format::OperatingSystem => {
            let os: OperatingSystem = v
                .as_str()
                .ok_or_else(|| AppError::BadRequest(format!("Preferred OS are {}", OperatingSystem::options())))?
                .parse()
                .map_err(AppError::BadRequest)?;
            Ok(os.as_str().into())
        }
        Format::Date => {
            let s = expect_str(c, v)?;
            parse_date(s)
                .map(|d| d.format("%Y-%m-%d").to_string().into())
                .ok_or_else(|| AppError::Validation(format!("{} must be a date (YYYY-MM-DD)", c.key)))
        }
        Format::Text | Format::Email => {
            let s = expect_str(c, v)?;
            if s.trim().is_empty() {
                return Err(AppError::Validation(format!("{} cannot be empty", c.key)));
            }
            if let Some(max) = c.max_length {
                if s.chars().count() > max {
                    return Err(AppError::Validation(format!(
                        "{} must be at most {} characters",
                        c.key, max
                    )));
                }
            }
            if c.format == Format::Email {
                if !email_regex()?.is_match(s) {
                    return Err(AppError::Validation(format!("{} must be a valid email", c.key)));
                }
            }
            Ok(s.into())
        }
    }
}

fn expect_str<'v>(c: &Column, v: &'v Value) -> Result<&'v str, AppError> {
    v.as_str()
        .ok_or_else(|| AppError::Validation(format!("{} must be a string", c.key)))
}

/// Accepts a plain date or an RFC 3339 timestamp (its calendar date is kept).
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DEVELOPERS, DEVELOPER_INFOS, PROJECTS};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn message(e: AppError) -> String {
        e.to_string()
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        let body = obj(json!({ "name": "Ada", "email": "ada@mail.com", "id": 99, "admin": true }));
        let p = RequestValidator::validate(&DEVELOPERS, &body).unwrap();
        let keys: Vec<_> = p.fields().iter().map(|(c, _)| c.key).collect();
        assert_eq!(keys, vec!["name", "email"]);
    }

    #[test]
    fn every_missing_key_is_reported_in_order() {
        let body = obj(json!({ "name": "api", "repository": "r", "endDate": null }));
        let err = RequestValidator::validate(&PROJECTS, &body).unwrap_err();
        assert_eq!(
            message(err),
            "Missing required keys: description,estimatedTime,startDate,developerId"
        );
    }

    #[test]
    fn null_required_key_counts_as_missing() {
        let body = obj(json!({ "name": null, "email": "a@b.co" }));
        let err = RequestValidator::validate(&DEVELOPERS, &body).unwrap_err();
        assert!(matches!(err, AppError::MissingFields(_)));
        assert_eq!(message(err), "Missing required keys: name");
    }

    #[test]
    fn project_payload_binds_typed_values() {
        let body = obj(json!({
            "name": "api",
            "description": "rest api",
            "estimatedTime": "2 weeks",
            "repository": "https://example.com/api",
            "startDate": "2023-01-02T10:00:00.000Z",
            "developerId": 4
        }));
        let p = RequestValidator::validate(&PROJECTS, &body).unwrap();
        assert_eq!(p.get("startDate"), Some(&PgBindValue::from("2023-01-02")));
        assert_eq!(p.get("developerId"), Some(&PgBindValue::I64(4)));
        assert!(p.get("endDate").is_none());
    }

    #[test]
    fn optional_date_accepts_null() {
        let body = obj(json!({ "endDate": null }));
        let p = RequestValidator::validate_partial(&PROJECTS, &body).unwrap();
        assert_eq!(p.get("endDate"), Some(&PgBindValue::Null));
    }

    #[test]
    fn bad_values_are_rejected() {
        let cases = [
            (json!({ "name": "x".repeat(51) }), "name must be at most 50 characters"),
            (json!({ "email": "not-an-email" }), "email must be a valid email"),
            (json!({ "name": 12 }), "name must be a string"),
            (json!({ "name": "  " }), "name cannot be empty"),
            (json!({ "email": null }), "email cannot be null"),
        ];
        for (body, expected) in cases {
            let err = RequestValidator::validate_partial(&DEVELOPERS, &obj(body)).unwrap_err();
            assert_eq!(message(err), expected);
        }
    }

    #[test]
    fn invalid_dates_and_ids() {
        let err = RequestValidator::validate_partial(&PROJECTS, &obj(json!({ "startDate": "31/12/2020" }))).unwrap_err();
        assert_eq!(message(err), "startDate must be a date (YYYY-MM-DD)");
        let body = obj(json!({
            "name": "api",
            "description": "rest api",
            "estimatedTime": "2 weeks",
            "repository": "https://example.com/api",
            "startDate": "2023-01-02",
            "developerId": "4"
        }));
        let err = RequestValidator::validate(&PROJECTS, &body).unwrap_err();
        assert_eq!(message(err), "developerId must be an integer");
    }

    #[test]
    fn project_patch_ignores_owner() {
        let err = RequestValidator::validate_partial(&PROJECTS, &obj(json!({ "developerId": 4 }))).unwrap_err();
        assert!(matches!(err, AppError::MissingFields(_)));
        assert_eq!(
            message(err),
            "Updatable fields are: name,description,repository,startDate,endDate,estimatedTime"
        );
        let p = RequestValidator::validate_partial(&PROJECTS, &obj(json!({ "developerId": 4, "name": "cli" }))).unwrap();
        let keys: Vec<_> = p.fields().iter().map(|(c, _)| c.key).collect();
        assert_eq!(keys, vec!["name"]);
    }

    #[test]
    fn email_pattern_is_reused() {
        let first = email_regex().unwrap() as *const Regex;
        let second = email_regex().unwrap() as *const Regex;
        assert_eq!(first, second);
        assert!(email_regex().unwrap().is_match("ada@mail.com"));
    }

    #[test]
    fn unknown_os_lists_the_choices() {
        let body = obj(json!({ "developerSince": "2019-03-01", "preferredOS": "BeOS" }));
        let err = RequestValidator::validate(&DEVELOPER_INFOS, &body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(message(err), "Preferred OS are Windows,Linux,MacOS");
    }

    #[test]
    fn patch_without_updatable_keys() {
        let err = RequestValidator::validate_partial(&DEVELOPERS, &obj(json!({ "id": 3 }))).unwrap_err();
        assert_eq!(message(err), "Updatable fields are: name,email");
    }
}
