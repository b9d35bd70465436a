// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare record registry client for the AAAA
// synchronizer.
//
// ## Implementation Status
//
// - ✅ Paginated listing of every record in a zone (100 per page)
// - ✅ Create (POST), update (PATCH) and delete (DELETE) of AAAA records
// - ✅ HTTP timeout configured (30 seconds) on every call
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - ✅ `success: false` envelopes treated as failures regardless of status
// - ❌ NO retry logic (a failed call fails the run)
// - ❌ NO caching between calls
//
// ## Security Requirements
//
// - API token NEVER appears in logs or error messages
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=N&per_page=100`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

pub mod types;

use async_trait::async_trait;
use ddns_core::traits::{AAAA_RECORD_TYPE, DnsProvider, DnsRecord};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::net::Ipv6Addr;
use std::time::Duration;

use types::{CloudflareResponse, RecordRequest};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size used when listing zone records
pub const RECORDS_PER_PAGE: u32 = 100;

/// Cloudflare DNS provider
///
/// Stateless: every method builds its request from the token, the base URL
/// and its arguments, and issues it once.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (no trailing slash)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider against the public Cloudflare API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the token is empty or the HTTP client cannot be
    /// built.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a provider against an API-compatible endpoint
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_client(DEFAULT_HTTP_TIMEOUT)?,
        })
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/zones/{}/dns_records/{}", self.base_url, zone_id, record_id)
    }

    /// Send a request and unwrap the Cloudflare envelope
    ///
    /// Transport failures, non-2xx statuses, unparseable bodies and
    /// `success: false` all become [`Error::Registry`] tagged with
    /// `operation`.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<CloudflareResponse<T>> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::registry(operation, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        tracing::debug!("Cloudflare {} response status: {}", operation, status);

        let body = response
            .text()
            .await
            .map_err(|e| Error::registry(operation, format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            // Cloudflare usually explains itself in the envelope; fall back
            // to the raw body
            let detail = serde_json::from_str::<CloudflareResponse<serde_json::Value>>(&body)
                .map(|envelope| envelope.error_summary())
                .unwrap_or(body);
            return Err(status_error(operation, status, &detail));
        }

        let envelope: CloudflareResponse<T> = serde_json::from_str(&body).map_err(|e| {
            Error::registry(operation, format!("Failed to parse response: {e}"))
        })?;

        if !envelope.success {
            return Err(Error::registry(
                operation,
                format!("Cloudflare reported failure: {}", envelope.error_summary()),
            ));
        }

        Ok(envelope)
    }

    /// Send a request whose envelope must carry a single `result` object
    async fn send_for_record(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<DnsRecord> {
        self.send::<DnsRecord>(operation, request)
            .await?
            .result
            .ok_or_else(|| {
                Error::registry(operation, "Invalid response format: result is missing")
            })
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))
}

/// Map a non-2xx HTTP status to a registry error
fn status_error(operation: &'static str, status: StatusCode, detail: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {status} - {detail}"
        ),
        404 => format!("Zone or record not found. Status: {status} - {detail}"),
        409 => format!(
            "Conflict: Record is being updated by another process. Status: {status} - {detail}"
        ),
        429 => format!("Rate limit exceeded. Please retry later. Status: {status}"),
        500..=599 => format!("Cloudflare server error (transient): {status} - {detail}"),
        _ => format!("Request failed: {status} - {detail}"),
    };
    Error::registry(operation, message)
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List every record in the zone, following pagination
    ///
    /// # API Call (repeated per page)
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=N&per_page=100
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(zone_id);
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = self
                .client
                .get(&url)
                .query(&[("page", page), ("per_page", RECORDS_PER_PAGE)]);

            let envelope: CloudflareResponse<Vec<DnsRecord>> = self.send("list", request).await?;
            let batch = envelope.result.ok_or_else(|| {
                Error::registry("list", "Invalid response format: result is missing")
            })?;
            let fetched = batch.len();
            records.extend(batch);

            let more = envelope
                .result_info
                .is_some_and(|info| info.has_more(page, RECORDS_PER_PAGE));

            // An empty page must be the last one
            if more && fetched == 0 {
                return Err(Error::registry(
                    "list",
                    format!("Page {page} is empty but more pages were reported"),
                ));
            }

            tracing::debug!(
                "Fetched page {} of zone {} ({} record(s), more: {})",
                page,
                zone_id,
                fetched,
                more
            );

            if !more {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// Create a new AAAA record
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// { "type": "AAAA", "name": "host.example.com", "content": "2001:db8::1" }
    /// ```
    async fn create_record(&self, zone_id: &str, name: &str, content: Ipv6Addr) -> Result<DnsRecord> {
        let body = RecordRequest {
            record_type: AAAA_RECORD_TYPE,
            name,
            content: content.to_string(),
        };
        let request = self.client.post(self.records_url(zone_id)).json(&body);

        let record = self.send_for_record("create", request).await?;
        tracing::debug!("Created AAAA record {} for {} -> {}", record.id, name, content);
        Ok(record)
    }

    /// Replace the content of an AAAA record
    ///
    /// # API Call
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// { "type": "AAAA", "name": "host.example.com", "content": "2001:db8::2" }
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: Ipv6Addr,
    ) -> Result<DnsRecord> {
        let body = RecordRequest {
            record_type: AAAA_RECORD_TYPE,
            name,
            content: content.to_string(),
        };
        let request = self
            .client
            .patch(self.record_url(zone_id, record_id))
            .json(&body);

        let record = self.send_for_record("update", request).await?;
        tracing::debug!("Updated AAAA record {} for {} -> {}", record_id, name, content);
        Ok(record)
    }

    /// Delete a record by id
    ///
    /// Cloudflare answers with `{"result": {"id": ...}}` only, so fields other
    /// than `id` are usually empty in the returned record.
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /zones/:zone_id/dns_records/:record_id
    /// ```
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord> {
        let request = self.client.delete(self.record_url(zone_id, record_id));

        let record = self.send_for_record("delete", request).await?;
        tracing::debug!("Deleted record {}", record_id);
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
