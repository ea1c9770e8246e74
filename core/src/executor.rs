//! The seam between the client and the network.
//!
//! # Design
//! `Client` never opens a socket itself. It hands an `HttpRequest` to a
//! `RequestExecutor` and gets back the status and body of whatever the server
//! answered. Status classification stays in the client, so an executor only
//! reports a `TransportError` when no HTTP response exists at all.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs the HTTP round-trip for a prepared request.
pub trait RequestExecutor {
    /// Execute `request` and return the response for any HTTP status.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for &E {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for Box<E> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking executor backed by `ureq`.
///
/// One agent is kept for the executor's lifetime so consecutive pages reuse
/// pooled connections. The timeout is applied per request from
/// `HttpRequest::timeout`. ureq's automatic status-code-as-error behavior is
/// disabled so 4xx/5xx responses come back as data and the client classifies
/// them.
#[cfg(feature = "ureq-executor")]
#[derive(Clone)]
pub struct UreqExecutor {
    agent: ureq::Agent,
}

#[cfg(feature = "ureq-executor")]
impl UreqExecutor {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

#[cfg(feature = "ureq-executor")]
impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ureq-executor")]
impl std::fmt::Debug for UreqExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqExecutor").finish_non_exhaustive()
    }
}

#[cfg(feature = "ureq-executor")]
impl RequestExecutor for UreqExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .agent
            .get(&request.url)
            .config()
            .timeout_global(Some(request.timeout))
            .build();
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        let mut response = builder.call()?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpResponse { status, body })
    }
}
