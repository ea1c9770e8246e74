//! Maps loosely-typed JSON into the typed models.
//!
//! # Design
//! The service is inconsistent about field types (`first_seen` arrives as a
//! string, `current_page` as a number), so each field is extracted by an
//! explicit rule instead of a serde derive. A field that is merely absent
//! always falls back to its default; a field that is present but cannot be
//! coerced is a parse failure.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::types::{DomainRecord, ErrorMessage, Response};

type Object = Map<String, Value>;

/// Parse a raw API body into a `Response`.
///
/// Fails with `UnparsableApiResponse` when the body is not JSON or has no
/// `result` root element. Error bodies (`code`/`messages`) are not decoded
/// here; use `parse_error_message` for those.
pub fn parse_response(raw: &str) -> Result<Response, ClientError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| ClientError::UnparsableApiResponse {
            message: "Could not parse API response".to_string(),
            source: Some(e),
        })?;

    match parsed.as_object() {
        Some(object) if object.contains_key("result") => response_from_object(object),
        _ => {
            tracing::warn!("API response has no result element");
            Err(ClientError::unparsable(
                "Could not find the correct root element.",
            ))
        }
    }
}

/// Parse a raw API body shaped like `{"code": 403, "messages": "..."}`.
pub fn parse_error_message(raw: &str) -> Result<ErrorMessage, ClientError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| ClientError::UnparsableApiResponse {
            message: "Could not parse API error message".to_string(),
            source: Some(e),
        })?;
    ErrorMessage::try_from(&parsed)
}

impl TryFrom<&Value> for Response {
    type Error = ClientError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Response::default()),
            Value::Object(object) => response_from_object(object),
            _ => Err(ClientError::unparsable("page is not a JSON object")),
        }
    }
}

impl TryFrom<&Value> for DomainRecord {
    type Error = ClientError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(DomainRecord::default()),
            Value::Object(object) => Ok(DomainRecord::new(
                string_value(object, "name"),
                timestamp_value(object, "first_seen")?,
                timestamp_value(object, "last_visit")?,
            )),
            _ => Err(ClientError::unparsable("result entry is not a JSON object")),
        }
    }
}

impl TryFrom<&Value> for ErrorMessage {
    type Error = ClientError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(ErrorMessage::default()),
            Value::Object(object) => Ok(ErrorMessage::new(
                int_value(object, "code")?,
                string_value(object, "messages"),
            )),
            _ => Err(ClientError::unparsable("error message is not a JSON object")),
        }
    }
}

fn response_from_object(object: &Object) -> Result<Response, ClientError> {
    let size = int_value(object, "size")?;
    let current_page = match object.get("current_page") {
        None | Some(Value::Null) => "0".to_string(),
        Some(_) => string_value(object, "current_page"),
    };
    let result = list_of_objects(object, "result")?;
    Ok(Response::new(size, current_page, result))
}

/// Absent or null yields `""`; non-string values keep their JSON text.
pub(crate) fn string_value(object: &Object, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Absent or null yields 0; numeric strings are parsed, floats truncated.
pub(crate) fn int_value(object: &Object, key: &str) -> Result<i64, ClientError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => coerce_int(value)
            .ok_or_else(|| ClientError::unparsable(format!("field `{key}` is not an integer"))),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .map(f64::trunc)
                .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Epoch seconds in local time; absent or null stays `None`.
pub(crate) fn timestamp_value(
    object: &Object,
    key: &str,
) -> Result<Option<DateTime<Local>>, ClientError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => {
            let seconds = int_value(object, key)?;
            DateTime::from_timestamp(seconds, 0)
                .map(|utc| Some(utc.with_timezone(&Local)))
                .ok_or_else(|| {
                    ClientError::unparsable(format!("field `{key}` is out of range: {seconds}"))
                })
        }
    }
}

/// Absent or non-array yields an empty list.
fn list_of_objects(object: &Object, key: &str) -> Result<Vec<DomainRecord>, ClientError> {
    match object.get(key) {
        Some(Value::Array(items)) => items.iter().map(DomainRecord::try_from).collect(),
        _ => Ok(Vec::new()),
    }
}
