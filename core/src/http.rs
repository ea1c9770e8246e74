//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The client describes each lookup as a plain `HttpRequest` and consumes a
//! plain `HttpResponse`. Executing the request is the job of a
//! `RequestExecutor` (see `executor.rs`), which keeps the client logic
//! deterministic and lets tests script the server side.
//!
//! The service only takes GET requests with query parameters, so there is no
//! method or body field.

use std::time::Duration;

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Value of the first query parameter named `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
