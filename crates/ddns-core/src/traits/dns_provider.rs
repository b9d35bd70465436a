// # DNS Provider Trait
//
// Defines the record registry interface: list, create, update and delete of
// DNS records within one zone.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     for record in provider.list_records("zone-id").await? {
//         println!("{} {} {}", record.name, record.record_type, record.content);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;

/// Record type managed by the synchronizer
pub const AAAA_RECORD_TYPE: &str = "AAAA";

/// One DNS record as reported by the registry
///
/// Records are never mutated locally; every change is round-tripped through
/// the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier (opaque)
    pub id: String,
    /// Record type (e.g. "AAAA")
    #[serde(rename = "type", default)]
    pub record_type: String,
    /// Fully qualified record name
    #[serde(default)]
    pub name: String,
    /// Record content; an IPv6 literal for AAAA records
    #[serde(default)]
    pub content: String,
    /// Time-to-live, if the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Provider proxy flag, if the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl DnsRecord {
    /// Create an AAAA record value (mostly useful for tests and fakes)
    pub fn aaaa(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_type: AAAA_RECORD_TYPE.to_string(),
            name: name.into(),
            content: content.into(),
            ttl: None,
            proxied: None,
        }
    }

    /// Whether this record is an AAAA record for exactly `hostname`
    ///
    /// Both comparisons are exact string equality.
    pub fn is_aaaa_for(&self, hostname: &str) -> bool {
        self.name == hostname && self.record_type == AAAA_RECORD_TYPE
    }

    /// Whether the record content denotes `address`
    ///
    /// Content that parses as IPv6 is compared by value, so `2001:0db8::1`
    /// and `2001:db8::1` are equal. Anything else is compared textually
    /// against the canonical form of `address`.
    pub fn points_at(&self, address: Ipv6Addr) -> bool {
        match self.content.trim().parse::<Ipv6Addr>() {
            Ok(current) => current == address,
            Err(_) => self.content == address.to_string(),
        }
    }
}

/// Trait for DNS provider implementations (the record registry)
///
/// # Trust Level: Untrusted
///
/// Providers execute exactly one logical API operation per call:
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Follow pagination inside `list_records`
/// - ✅ Parse provider-specific responses
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (a failed call fails the run)
/// - ❌ Decide whether a mutation is needed (owned by `Reconciler`)
/// - ❌ Cache records between calls
/// - ❌ Deduplicate records
///
/// An application-level failure reported inside a nominally successful
/// transport response must be returned as [`crate::Error::Registry`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in the zone
    ///
    /// Pagination is followed transparently; the returned sequence is the
    /// concatenation of all pages in provider order.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a new AAAA record
    ///
    /// # Returns
    ///
    /// The created record as reported by the provider
    async fn create_record(
        &self,
        zone_id: &str,
        name: &str,
        content: Ipv6Addr,
    ) -> Result<DnsRecord, crate::Error>;

    /// Replace the content of an existing AAAA record
    ///
    /// Fails if `record_id` is unknown to the provider.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: Ipv6Addr,
    ) -> Result<DnsRecord, crate::Error>;

    /// Delete a record by id
    ///
    /// # Returns
    ///
    /// The deleted record's prior representation, as far as the provider
    /// reports it
    async fn delete_record(&self, zone_id: &str, record_id: &str)
    -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
