//! Reverse MX lookups: request building, status handling and pagination.
//!
//! # Design
//! `Client` owns its configuration and a `RequestExecutor`. Each lookup is
//! split into `build_request` (validation and payload, no I/O) and
//! `parse_raw_response` (status classification, no I/O); `raw_data` and
//! `data` run the executor between the two. A caller with its own transport
//! can use the two halves directly.
//!
//! Pagination is cursor based: the next page starts after the last domain of
//! the current one. Whether another page exists is inferred from the size the
//! server reports, see `Response::has_next`.

use std::iter::FusedIterator;
use std::time::Duration;

use crate::config::{ApiKey, ClientConfig, DEFAULT_BASE_URL};
use crate::error::ClientError;
use crate::executor::RequestExecutor;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapper::parse_response;
use crate::types::{Mx, OutputFormat, RequestOptions, Response, JSON_FORMAT};
use crate::validate::{validate_mx, validate_output_format, validate_search_from};

#[cfg(feature = "ureq-executor")]
use crate::executor::UreqExecutor;

/// Cursor sent when no `search_from` is given.
const FIRST_PAGE_CURSOR: &str = "0";

/// Blocking client for the Reverse MX API.
///
/// Not meant to be shared between threads while being reconfigured; the
/// setters take `&mut self`.
#[derive(Debug, Clone)]
pub struct Client<E> {
    config: ClientConfig,
    executor: E,
}

#[cfg(feature = "ureq-executor")]
impl Client<UreqExecutor> {
    /// Client for the hosted service using the default `ureq` transport.
    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        Self::with_executor(api_key, UreqExecutor::new())
    }

    /// Client configured from `REVERSE_MX_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::from_config(ClientConfig::from_env()?, UreqExecutor::new()))
    }
}

impl<E: RequestExecutor> Client<E> {
    /// The empty key is accepted here and rejected when a request is made.
    pub fn with_executor(api_key: &str, executor: E) -> Result<Self, ClientError> {
        Ok(Self::from_config(ClientConfig::new(api_key)?, executor))
    }

    pub fn from_config(mut config: ClientConfig, executor: E) -> Self {
        config.base_url = normalize_base_url(&config.base_url);
        Self { config, executor }
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.config.api_key
    }

    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), ClientError> {
        self.config.api_key = ApiKey::new(api_key)?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// `None` restores the hosted service endpoint.
    pub fn set_base_url(&mut self, base_url: Option<&str>) {
        self.config.base_url = normalize_base_url(base_url.unwrap_or(DEFAULT_BASE_URL));
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Validate the arguments and describe the lookup as an `HttpRequest`.
    pub fn build_request(
        &self,
        mx: impl Into<Mx>,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ClientError> {
        if self.config.api_key.is_empty() {
            return Err(ClientError::EmptyApiKey);
        }

        let mx = validate_mx(&mx.into())?;
        let format = match options.requested_format() {
            Some(format) => validate_output_format(format)?,
            None => OutputFormat::Json,
        };
        let search_from = match options.search_from.as_deref() {
            Some(cursor) => validate_search_from(cursor)?,
            None => FIRST_PAGE_CURSOR.to_string(),
        };

        tracing::debug!(
            api_key = ?self.config.api_key,
            %mx,
            from = %search_from,
            %format,
            "building reverse MX request"
        );

        Ok(HttpRequest {
            url: self.config.base_url.clone(),
            query: vec![
                ("apiKey".to_string(), self.config.api_key.expose().to_string()),
                ("mx".to_string(), mx),
                ("from".to_string(), search_from),
                ("outputFormat".to_string(), format.as_str().to_string()),
            ],
            timeout: self.config.timeout,
        })
    }

    /// Return the body of a 2xx response, or classify the failure status.
    pub fn parse_raw_response(&self, response: HttpResponse) -> Result<String, ClientError> {
        check_status(response)
    }

    /// Raw response body in the requested format (JSON unless told otherwise).
    pub fn raw_data(
        &self,
        mx: impl Into<Mx>,
        options: &RequestOptions,
    ) -> Result<String, ClientError> {
        let request = self.build_request(mx, options)?;
        let response = self
            .executor
            .execute(&request)
            .map_err(ClientError::Connection)?;
        self.parse_raw_response(response)
    }

    /// One parsed page. Any format in `options` is overridden with JSON.
    pub fn data(&self, mx: impl Into<Mx>, options: &RequestOptions) -> Result<Response, ClientError> {
        let options = RequestOptions {
            response_format: Some(JSON_FORMAT.to_string()),
            output_format: None,
            ..options.clone()
        };
        let raw = self.raw_data(mx, &options)?;
        parse_response(&raw)
    }

    /// The page after `current`, or `current` itself when it has no records.
    pub fn next_page(
        &self,
        mx: impl Into<Mx>,
        current: &Response,
    ) -> Result<Response, ClientError> {
        match current.result().last() {
            Some(last) => {
                tracing::debug!(cursor = %last.name(), "advancing to next page");
                self.data(mx, &RequestOptions::new().search_from(last.name()))
            }
            None => Ok(current.clone()),
        }
    }

    /// Lazily walk every page, starting from the first one.
    pub fn iterate_pages(&self, mx: impl Into<Mx>) -> Pages<'_, E> {
        Pages {
            client: self,
            mx: mx.into(),
            last: None,
            done: false,
        }
    }
}

/// Pull-driven page sequence returned by `Client::iterate_pages`.
///
/// A request is made only when `next` is called. The sequence ends after a
/// page that does not report `has_next`, or after the first error. It follows
/// the reported size only: a full-size page without records is yielded again
/// by `next_page` without a request, and a server that keeps reporting full
/// pages makes the sequence unbounded, so callers may want `.take(n)`.
#[derive(Debug)]
pub struct Pages<'a, E> {
    client: &'a Client<E>,
    mx: Mx,
    last: Option<Response>,
    done: bool,
}

impl<E: RequestExecutor> Iterator for Pages<'_, E> {
    type Item = Result<Response, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let fetched = match &self.last {
            None => self.client.data(&self.mx, &RequestOptions::default()),
            Some(page) if page.has_next() => self.client.next_page(&self.mx, page),
            Some(_) => {
                self.done = true;
                return None;
            }
        };

        match fetched {
            Ok(page) => {
                self.last = Some(page.clone());
                Some(Ok(page))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<E: RequestExecutor> FusedIterator for Pages<'_, E> {}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Map non-success status codes to the appropriate `ClientError` variant.
fn check_status(response: HttpResponse) -> Result<String, ClientError> {
    if response.is_success() {
        return Ok(response.body);
    }

    tracing::warn!(status = response.status, "reverse MX API returned an error status");
    let HttpResponse { status, body } = response;
    Err(match status {
        401 | 402 | 403 => ClientError::ApiAuth { status, body },
        400 | 422 => ClientError::BadRequest { status, body },
        _ => ClientError::Http { status, body },
    })
}
