//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep identifiers, dates and enum-like values as strings so
//! failures can name the offending field in `details`. Extractor failures
//! (malformed JSON, query strings, paths) are routed through the configs at
//! the bottom of this module so they share the same error payload.

use std::str::FromStr;

use actix_web::{HttpRequest, web};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;

use crate::domain::{Error, parse_event_date, parse_event_hour};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTimestamp,
    InvalidHour,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidHour => "invalid_hour",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse a typed entity identifier such as [`crate::domain::HorseId`].
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
{
    value
        .trim()
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Parse an optional identifier; blank strings count as absent.
pub(crate) fn parse_optional_id<T>(value: Option<&str>, field: FieldName) -> Result<Option<T>, Error>
where
    T: FromStr,
{
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_id(raw, field))
        .transpose()
}

pub(crate) fn invalid_date_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a date such as 2025-06-09"))
        .with_value(ErrorCode::InvalidDate, value)
}

/// Parse a calendar date in any of the accepted event date forms.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    parse_event_date(value).ok_or_else(|| invalid_date_error(field, value))
}

pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(raw, field))
        .transpose()
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Parse an optional `HH:MM` hour of day.
pub(crate) fn parse_optional_hour(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveTime>, Error> {
    let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    parse_event_hour(raw).map(Some).ok_or_else(|| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must use the HH:MM form"))
            .with_value(ErrorCode::InvalidHour, raw)
    })
}

/// Parse a closed vocabulary value (stall status, expense type, ...).
pub(crate) fn parse_choice<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidValue, value)
    })
}

pub(crate) fn parse_optional_choice<T>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_choice(raw, field))
        .transpose()
}

/// Body extractor config mapping malformed JSON to `400 invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid JSON body: {err}"))
            .with_details(json!({ "code": "invalid_json" }))
            .into()
    })
}

/// Query extractor config mapping malformed query strings to `400`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid query string: {err}"))
            .with_details(json!({ "code": "invalid_query" }))
            .into()
    })
}

/// Path extractor config mapping undecodable path segments to `400`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid path: {err}"))
            .with_details(json!({ "code": "invalid_path" }))
            .into()
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{HorseId, StallStatus};

    const FIELD: FieldName = FieldName::new("horseId");

    #[rstest]
    fn parse_id_reports_field_and_value() {
        let err = parse_id::<HorseId>("nope", FIELD).expect_err("invalid uuid");
        let details = err.details().expect("details");
        assert_eq!(details["field"], "horseId");
        assert_eq!(details["value"], "nope");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("  "))]
    fn blank_optional_ids_are_absent(#[case] raw: Option<&str>) {
        let parsed = parse_optional_id::<HorseId>(raw, FIELD).expect("absent");
        assert!(parsed.is_none());
    }

    #[rstest]
    #[case("2025-06-09")]
    #[case("Mon Jun 09 2025")]
    #[case("2025-06-09T10:00:00Z")]
    fn client_date_forms_are_accepted(#[case] raw: &str) {
        let date = parse_date(raw, FieldName::new("date")).expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 9).expect("date"));
    }

    #[rstest]
    fn malformed_hour_is_rejected() {
        let err = parse_optional_hour(Some("9am"), FieldName::new("hour")).expect_err("bad hour");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_hour"))
        );
    }

    #[rstest]
    fn unknown_choice_names_the_value() {
        let err = parse_choice::<StallStatus>("broken", FieldName::new("status"))
            .expect_err("unknown status");
        assert_eq!(err.message(), "unknown stall status: broken");
        assert_eq!(err.details().expect("details")["value"], "broken");
    }

    #[rstest]
    fn missing_field_uses_stable_code() {
        let err = require::<String>(None, FieldName::new("title")).expect_err("missing");
        assert_eq!(err.details().expect("details")["code"], "missing_field");
    }
}
