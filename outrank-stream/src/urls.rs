//! URL helpers used as grouping keys by the aggregation pipeline.

use url::Url;

use crate::error::{Result, StreamError};

/// Extract the full lowercased host of an url, e.g. "forum.example.com".
pub fn domain(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw).map_err(|_| StreamError::InvalidUrl(raw.to_string()))?;
    parsed
        .host_str()
        .map(|host| host.to_ascii_lowercase())
        .ok_or_else(|| StreamError::InvalidUrl(raw.to_string()))
}

/// Collapse a host to its registrable (second level) domain using the Public
/// Suffix List, so "forum.example.com" and "example.com" share one key.
/// Hosts the PSL knows nothing about (IP addresses, localhost) are kept as is.
pub fn second_level_domain(raw: &str) -> Result<String> {
    let host = domain(raw)?;
    match psl::domain_str(&host) {
        Some(registrable) => Ok(registrable.to_string()),
        None => Ok(host),
    }
}
