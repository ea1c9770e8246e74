//! Synchronous client for the Reverse MX lookup service.
//!
//! # Overview
//! Given an MX server (host name or IPv4 address), the service lists the
//! domains whose mail is routed through it, one page of up to 300 records at
//! a time. This crate validates the lookup arguments, builds the request,
//! classifies error statuses, maps the loosely-typed JSON body into typed
//! models and walks the pages.
//!
//! # Design
//! - `Client` owns a `ClientConfig` and a `RequestExecutor`; the network
//!   round-trip happens only inside the executor.
//! - `build_request` / `parse_raw_response` expose the two I/O-free halves of
//!   a lookup for callers that bring their own transport.
//! - Every field of the response models has an explicit default rule in
//!   `mapper.rs`; absent fields never fail a parse.
//! - With the default `ureq-executor` feature, `Client::new` talks to the
//!   hosted service over blocking HTTP.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod mapper;
pub mod types;
pub mod validate;

pub use client::{Client, Pages};
pub use config::{ApiKey, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, TransportError};
pub use executor::RequestExecutor;
#[cfg(feature = "ureq-executor")]
pub use executor::UreqExecutor;
pub use http::{HttpRequest, HttpResponse};
pub use mapper::{parse_error_message, parse_response};
pub use types::{
    DomainRecord, ErrorMessage, Mx, OutputFormat, RequestOptions, Response, JSON_FORMAT,
    PAGE_SIZE_THRESHOLD, XML_FORMAT,
};
