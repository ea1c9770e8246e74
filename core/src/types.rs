//! Domain types for the Reverse MX API.
//!
//! # Design
//! The models are built by the mapper in `mapper.rs`, not by
//! `#[derive(Deserialize)]`: the service sends loosely-typed fields (epoch
//! seconds as strings, page tokens as numbers) and every field has its own
//! default rule. Serialization goes the other way and reproduces the wire
//! shape, so a serialized `Response` maps back to the same page.

use std::fmt;
use std::net::Ipv4Addr;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::ClientError;

/// A page reporting at least this many records may have a successor.
pub const PAGE_SIZE_THRESHOLD: i64 = 300;

/// Canonical casing of the JSON output format.
pub const JSON_FORMAT: &str = "JSON";

/// Canonical casing of the XML output format.
pub const XML_FORMAT: &str = "XML";

/// MX server to look up: a host name or an IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mx {
    Name(String),
    Ipv4(Ipv4Addr),
}

impl From<&str> for Mx {
    fn from(value: &str) -> Self {
        Mx::Name(value.to_string())
    }
}

impl From<String> for Mx {
    fn from(value: String) -> Self {
        Mx::Name(value)
    }
}

impl From<&String> for Mx {
    fn from(value: &String) -> Self {
        Mx::Name(value.clone())
    }
}

impl From<Ipv4Addr> for Mx {
    fn from(value: Ipv4Addr) -> Self {
        Mx::Ipv4(value)
    }
}

impl From<&Mx> for Mx {
    fn from(value: &Mx) -> Self {
        value.clone()
    }
}

/// Accepts MX values coming from untyped sources such as JSON config.
impl TryFrom<&Value> for Mx {
    type Error = ClientError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Err(ClientError::parameter("MX could not be a null value")),
            Value::String(s) => Ok(Mx::Name(s.clone())),
            _ => Err(ClientError::parameter("MX should be a string or an IPv4 address")),
        }
    }
}

impl fmt::Display for Mx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mx::Name(name) => f.write_str(name),
            Mx::Ipv4(addr) => write!(f, "{addr}"),
        }
    }
}

/// Response body format requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => JSON_FORMAT,
            OutputFormat::Xml => XML_FORMAT,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of `Client::raw_data` and `Client::data`.
///
/// `output_format` is an alias of `response_format`; when both are set,
/// `response_format` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub search_from: Option<String>,
    pub response_format: Option<String>,
    pub output_format: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Domain name used as the offset of the returned page.
    pub fn search_from(mut self, cursor: impl Into<String>) -> Self {
        self.search_from = Some(cursor.into());
        self
    }

    pub fn response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = Some(format.into());
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// The format the caller asked for, honoring alias precedence.
    pub fn requested_format(&self) -> Option<&str> {
        self.response_format
            .as_deref()
            .or(self.output_format.as_deref())
    }
}

/// One domain whose mail is routed through the queried MX server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
    name: String,
    #[serde(serialize_with = "serialize_epoch")]
    first_seen: Option<DateTime<Local>>,
    #[serde(serialize_with = "serialize_epoch")]
    last_visit: Option<DateTime<Local>>,
}

impl DomainRecord {
    pub fn new(
        name: impl Into<String>,
        first_seen: Option<DateTime<Local>>,
        last_visit: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            name: name.into(),
            first_seen,
            last_visit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_seen(&self) -> Option<DateTime<Local>> {
        self.first_seen
    }

    pub fn last_visit(&self) -> Option<DateTime<Local>> {
        self.last_visit
    }
}

/// One page of a reverse MX lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    size: i64,
    current_page: String,
    result: Vec<DomainRecord>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            size: 0,
            current_page: "0".to_string(),
            result: Vec::new(),
        }
    }
}

impl Response {
    pub fn new(size: i64, current_page: impl Into<String>, result: Vec<DomainRecord>) -> Self {
        Self {
            size,
            current_page: current_page.into(),
            result,
        }
    }

    /// Record count as reported by the server.
    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    pub fn result(&self) -> &[DomainRecord] {
        &self.result
    }

    pub fn into_result(self) -> Vec<DomainRecord> {
        self.result
    }

    /// Whether the server may hold another page after this one.
    pub fn has_next(&self) -> bool {
        self.size >= PAGE_SIZE_THRESHOLD
    }
}

/// Error body returned by the service, e.g. `{"code":403,"messages":"..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    code: i64,
    #[serde(rename = "messages")]
    message: String,
}

impl ErrorMessage {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn serialize_epoch<S>(value: &Option<DateTime<Local>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&dt.timestamp().to_string()),
        None => serializer.serialize_none(),
    }
}
