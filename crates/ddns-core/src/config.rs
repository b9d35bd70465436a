//! Configuration types for the AAAA synchronizer
//!
//! The configuration is a flat JSON document, loaded once at startup and never
//! mutated afterwards:
//!
//! ```json
//! {
//!   "HOSTNAME": "server.example.com",
//!   "APIKEY": "<cloudflare api token>",
//!   "CLOUDFLARE_ZONE_ID": "<zone id>",
//!   "IPv6CheckURL": "https://v6.ipinfo.io/ip"
//! }
//! ```
//!
//! `IPv6CheckURL` is optional. Unknown keys are ignored.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Address discovery endpoint used when `IPv6CheckURL` is not configured
pub const DEFAULT_IPV6_CHECK_URL: &str = "https://v6.ipinfo.io/ip";

/// Configuration file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "secrets.json";

/// Main synchronizer configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// DNS name whose AAAA record is managed
    #[serde(rename = "HOSTNAME")]
    pub hostname: String,

    /// Cloudflare API token (bearer credential)
    /// ⚠️ NEVER log this value
    #[serde(rename = "APIKEY")]
    pub api_token: String,

    /// Zone identifier scoping all record operations
    #[serde(rename = "CLOUDFLARE_ZONE_ID")]
    pub zone_id: String,

    /// Override for the public address discovery endpoint
    #[serde(
        rename = "IPv6CheckURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv6_check_url: Option<String>,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("hostname", &self.hostname)
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("ipv6_check_url", &self.ipv6_check_url)
            .finish()
    }
}

impl SyncConfig {
    /// Create a configuration from its mandatory fields
    pub fn new(
        hostname: impl Into<String>,
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            ipv6_check_url: None,
        }
    }

    /// Override the address discovery endpoint
    pub fn with_ipv6_check_url(mut self, url: impl Into<String>) -> Self {
        self.ipv6_check_url = Some(url.into());
        self
    }

    /// Load configuration from a JSON file
    ///
    /// A missing file, unreadable file, malformed JSON or missing mandatory
    /// key all produce [`Error::Config`] naming the path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json_str(&contents)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from an in-memory JSON document
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| Error::config(format!("invalid configuration: {e}")))
    }

    /// The address discovery endpoint, falling back to [`DEFAULT_IPV6_CHECK_URL`]
    pub fn ip_check_url(&self) -> &str {
        self.ipv6_check_url
            .as_deref()
            .unwrap_or(DEFAULT_IPV6_CHECK_URL)
    }

    /// Validate the configuration
    ///
    /// Checks presence of every mandatory field, the shape of the hostname,
    /// obvious placeholder tokens and the discovery URL scheme.
    pub fn validate(&self) -> Result<()> {
        validate_hostname(&self.hostname)?;

        if self.api_token.trim().is_empty() {
            return Err(Error::config("APIKEY cannot be empty"));
        }

        let token_lower = self.api_token.to_lowercase();
        if ["your_token", "replace_me", "changeme"]
            .iter()
            .any(|placeholder| token_lower.contains(placeholder))
        {
            return Err(Error::config(
                "APIKEY appears to be a placeholder. \
                Use an actual API token with Zone:DNS:Edit permission.",
            ));
        }

        if self.zone_id.trim().is_empty() {
            return Err(Error::config("CLOUDFLARE_ZONE_ID cannot be empty"));
        }

        if let Some(ref url) = self.ipv6_check_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(Error::config(format!(
                    "IPv6CheckURL must use HTTP or HTTPS scheme. Got: {url}"
                )));
            }

            if url.starts_with("http://") {
                tracing::warn!(
                    "IPv6CheckURL uses HTTP (not HTTPS); the discovered address can be tampered with in transit"
                );
            }
        }

        Ok(())
    }
}

/// Validate that a string is a plausible DNS hostname (RFC 1035 shape)
fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        return Err(Error::config("HOSTNAME cannot be empty"));
    }

    if hostname.len() > 253 {
        return Err(Error::config(format!(
            "HOSTNAME too long: {} chars (max 253)",
            hostname.len()
        )));
    }

    // Records are matched by exact name, and the registry reports names in
    // lowercase
    if hostname.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::config(format!(
            "HOSTNAME must be lowercase: '{hostname}'"
        )));
    }

    for (index, label) in hostname.split('.').enumerate() {
        if index == 0 && label == "*" && hostname.len() > 1 {
            continue;
        }

        if label.is_empty() {
            return Err(Error::config(format!(
                "HOSTNAME has empty label: '{hostname}'"
            )));
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "HOSTNAME label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::config(format!(
                "HOSTNAME label contains invalid characters: '{label}'"
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "HOSTNAME label cannot start or end with hyphen: '{label}'"
            )));
        }
    }

    Ok(())
}
