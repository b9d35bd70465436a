//! Core traits for the synchronizer
//!
//! This module defines the abstract interfaces the reconciler works against.
//!
//! - [`IpSource`]: Discover the current public IPv6 address
//! - [`DnsProvider`]: List, create, update and delete DNS records

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{AAAA_RECORD_TYPE, DnsProvider, DnsRecord};
