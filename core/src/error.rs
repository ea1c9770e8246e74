//! Error types for the Reverse MX client.
//!
//! # Design
//! Every failure the client can report is a variant of `ClientError`, so a
//! caller can match on the kind it cares about and fall through to a catch-all
//! for the rest. Argument problems (`Parameter`, `EmptyApiKey`) are detected
//! before any request is sent. Non-2xx statuses are split into the three
//! groups the service documents, each keeping the raw status and body.

use thiserror::Error;

use crate::types::ErrorMessage;

/// Failure reported by a `RequestExecutor` when no HTTP response was obtained.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `Client` operations and the response mapper.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A caller-supplied argument is structurally invalid.
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// The API key was never set.
    #[error("API key is empty")]
    EmptyApiKey,

    /// The body was not JSON, or lacked the `result` root element.
    #[error("unparsable API response: {message}")]
    UnparsableApiResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The server returned 401, 402 or 403.
    #[error("authentication failed (HTTP {status}): {body}")]
    ApiAuth { status: u16, body: String },

    /// The server returned 400 or 422.
    #[error("bad request (HTTP {status}): {body}")]
    BadRequest { status: u16, body: String },

    /// The server returned any other status >= 300.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The body parsed, but the server reported a logical error.
    #[error("API error {}: {}", .0.code(), .0.message())]
    Response(ErrorMessage),

    /// The transport could not complete the request.
    #[error("connection failed: {0}")]
    Connection(#[source] TransportError),
}

impl ClientError {
    pub(crate) fn parameter(message: impl Into<String>) -> Self {
        ClientError::Parameter(message.into())
    }

    pub(crate) fn unparsable(message: impl Into<String>) -> Self {
        ClientError::UnparsableApiResponse {
            message: message.into(),
            source: None,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ApiAuth { status, .. }
            | ClientError::BadRequest { status, .. }
            | ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn status_is_exposed_for_http_kinds() {
        let err = ClientError::ApiAuth {
            status: 403,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(ClientError::EmptyApiKey.status(), None);
    }

    #[test]
    fn unparsable_keeps_json_error_as_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClientError::UnparsableApiResponse {
            message: "Could not parse API response".to_string(),
            source: Some(json_err),
        };
        assert!(err.source().is_some());
        assert!(ClientError::unparsable("no root").source().is_none());
    }

    #[test]
    fn connection_wraps_transport_error_unmodified() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::Connection(Box::new(io));
        let source = err.source().unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn response_error_displays_code_and_message() {
        let msg = ErrorMessage::new(403, "Access restricted");
        let err = ClientError::Response(msg);
        assert_eq!(err.to_string(), "API error 403: Access restricted");
    }
}
