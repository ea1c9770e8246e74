//! Argument checks run before any request is built.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ClientError;
use crate::types::{Mx, OutputFormat};

static API_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^at_[a-z0-9]{29}$").unwrap());

static DOMAIN_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9_][-_a-z0-9]{0,62}\.){1,32}[0-9a-z][-0-9a-z]{1,62}$").unwrap()
});

/// Returns the key unchanged if it has the `at_` + 29 alphanumerics shape.
pub fn validate_api_key(api_key: &str) -> Result<String, ClientError> {
    if API_KEY_REGEX.is_match(api_key) {
        Ok(api_key.to_string())
    } else {
        Err(ClientError::parameter("Invalid API key format."))
    }
}

/// Returns the wire form of an MX server: a domain name or a dotted IPv4.
pub fn validate_mx(mx: &Mx) -> Result<String, ClientError> {
    match mx {
        Mx::Ipv4(addr) => Ok(addr.to_string()),
        Mx::Name(name) => {
            if DOMAIN_NAME_REGEX.is_match(name) || name.parse::<Ipv4Addr>().is_ok() {
                Ok(name.clone())
            } else {
                Err(ClientError::parameter("Invalid MX name parameter"))
            }
        }
    }
}

pub fn validate_search_from(cursor: &str) -> Result<String, ClientError> {
    if cursor.is_empty() {
        return Err(ClientError::parameter("Invalid search_from parameter"));
    }
    Ok(cursor.to_string())
}

/// Case-insensitive match against the supported formats.
pub fn validate_output_format(format: &str) -> Result<OutputFormat, ClientError> {
    match format.to_ascii_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "xml" => Ok(OutputFormat::Xml),
        _ => Err(ClientError::parameter(
            "Output format should be either JSON or XML.",
        )),
    }
}
