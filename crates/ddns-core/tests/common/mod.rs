//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides an in-memory registry that records every call it
//! receives, and address sources with fixed behaviour.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsRecord, IpSource};
use std::net::Ipv6Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const HOST: &str = "server.example.com";
pub const ZONE: &str = "zone-123";

/// A registry call as observed by [`RecordingProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { zone_id: String },
    Create { name: String, content: Ipv6Addr },
    Update { record_id: String, name: String, content: Ipv6Addr },
    Delete { record_id: String },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::List { .. })
    }
}

/// An in-memory registry that tracks calls
pub struct RecordingProvider {
    /// Zone contents, in list order
    records: Mutex<Vec<DnsRecord>>,
    /// Every call received, in order
    calls: Mutex<Vec<Call>>,
    /// Operation name ("list", "create", "update", "delete") that fails
    fail_on: Option<&'static str>,
    /// Counter for generated record ids
    next_id: AtomicUsize,
}

impl RecordingProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            next_id: AtomicUsize::new(1),
        }
    }

    /// Make every call of `operation` fail with a registry error
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    fn record_call(&self, operation: &'static str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(operation) {
            return Err(Error::registry(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.record_call(
            "list",
            Call::List {
                zone_id: zone_id.to_string(),
            },
        )?;
        Ok(self.records())
    }

    async fn create_record(&self, _zone_id: &str, name: &str, content: Ipv6Addr) -> Result<DnsRecord> {
        self.record_call(
            "create",
            Call::Create {
                name: name.to_string(),
                content,
            },
        )?;

        let id = format!("created-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = DnsRecord::aaaa(id, name, content.to_string());
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        _zone_id: &str,
        record_id: &str,
        name: &str,
        content: Ipv6Addr,
    ) -> Result<DnsRecord> {
        self.record_call(
            "update",
            Call::Update {
                record_id: record_id.to_string(),
                name: name.to_string(),
                content,
            },
        )?;

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::registry("update", format!("unknown record {record_id}")))?;
        record.content = content.to_string();
        Ok(record.clone())
    }

    async fn delete_record(&self, _zone_id: &str, record_id: &str) -> Result<DnsRecord> {
        self.record_call(
            "delete",
            Call::Delete {
                record_id: record_id.to_string(),
            },
        )?;

        let mut records = self.records.lock().unwrap();
        let position = records
            .iter()
            .position(|r| r.id == record_id)
            .ok_or_else(|| Error::registry("delete", format!("unknown record {record_id}")))?;
        Ok(records.remove(position))
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// An IP source that always returns the same address
pub struct FixedIpSource {
    ip: Ipv6Addr,
    call_count: AtomicUsize,
}

impl FixedIpSource {
    pub fn new(ip: Ipv6Addr) -> Self {
        Self {
            ip,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv6Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An IP source whose discovery always fails
pub struct FailingIpSource;

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<Ipv6Addr> {
        Err(Error::discovery("connection timed out"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

pub fn ip(s: &str) -> Ipv6Addr {
    s.parse().expect("valid IPv6 literal in test")
}

/// Helper to create a minimal SyncConfig for testing
pub fn minimal_config() -> ddns_core::SyncConfig {
    ddns_core::SyncConfig::new(HOST, "test-token-0123456789", ZONE)
}
