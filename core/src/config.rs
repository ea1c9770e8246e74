//! Client configuration.
//!
//! Holds the API key, endpoint and timeout a `Client` is built from. The key
//! lives in `ApiKey`, which never prints its value through `Debug` or
//! `Display`, so a configuration can be logged safely.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ClientError;
use crate::validate::validate_api_key;

pub const DEFAULT_BASE_URL: &str = "https://reverse-mx.whoisxmlapi.com/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "REVERSE_MX_API_KEY";
pub const ENV_BASE_URL: &str = "REVERSE_MX_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "REVERSE_MX_TIMEOUT_SECS";

/// An API key that never exposes its value in logs or debug output.
///
/// An empty key means "not set yet"; any other value has passed
/// `validate_api_key`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey {
    inner: String,
}

impl ApiKey {
    /// Validate and wrap `key`. The empty string is accepted as unset.
    pub fn new(key: &str) -> Result<Self, ClientError> {
        if key.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            inner: validate_api_key(key)?,
        })
    }

    /// The actual key, for the request payload only.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "ApiKey(<unset>)")
        } else {
            write!(f, "ApiKey([REDACTED])")
        }
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED API KEY]")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            ..Self::default()
        })
    }

    /// Load the configuration from `REVERSE_MX_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_API_KEY) {
            config.api_key = ApiKey::new(key.trim())?;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: f64 = secs.trim().parse().map_err(|_| {
                ClientError::parameter(format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })?;
            config.timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
                ClientError::parameter(format!("{ENV_TIMEOUT_SECS} must be a non-negative number"))
            })?;
        }

        Ok(config)
    }
}
