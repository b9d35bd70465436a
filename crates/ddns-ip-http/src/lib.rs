// # HTTP IP Source
//
// This crate provides HTTP-based public IPv6 discovery for the AAAA
// synchronizer.
//
// ## Architecture
//
// Fetches the current address from an external "what is my IP" service
// (default `https://v6.ipinfo.io/ip`) that answers with a plain-text IPv6
// literal. One request per run; no polling, no caching.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

/// Default HTTP timeout for discovery requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP-based public IPv6 source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering with a plain-text IPv6 literal
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::config("IPv6 check URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { url, client })
    }
}

/// Parse a discovery response body into an IPv6 address
///
/// Surrounding whitespace is ignored. An empty body, an IPv4 literal and
/// anything that is not an address are all rejected.
pub fn parse_ipv6_body(body: &str) -> Result<Ipv6Addr> {
    let text = body.trim();

    if text.is_empty() {
        return Err(Error::discovery("empty response body"));
    }

    match text.parse::<IpAddr>() {
        Ok(IpAddr::V6(ip)) => Ok(ip),
        Ok(IpAddr::V4(ip)) => Err(Error::discovery(format!(
            "expected an IPv6 address, got IPv4 {ip}"
        ))),
        Err(_) => Err(Error::discovery(format!(
            "response is not an IPv6 address: {:?}",
            truncate(text, 64)
        ))),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv6Addr> {
        tracing::debug!("Requesting public IPv6 address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::discovery(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::discovery(format!(
                "{} answered with HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::discovery(format!("Failed to read response: {e}")))?;

        parse_ipv6_body(&body)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
