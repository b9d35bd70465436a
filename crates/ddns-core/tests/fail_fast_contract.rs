//! Contract Test: Fail-Fast Discovery
//!
//! Verifies that the registry is only contacted once a desired address is
//! known, and that a full pass wires discovery into reconciliation.
//!
//! If this test fails, a run could mutate DNS without a valid address.

mod common;

use common::*;
use ddns_core::traits::DnsRecord;
use ddns_core::{Error, RecordOutcome, sync_once};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn discovery_failure_makes_no_registry_calls() {
    let provider = RecordingProvider::new(vec![DnsRecord::aaaa("a", HOST, "2001:db8::1")]);
    let config = minimal_config();

    let err = assert_err!(sync_once(&FailingIpSource, &provider, &config).await);

    assert!(matches!(err, Error::Discovery(_)));
    assert!(
        provider.calls().is_empty(),
        "Expected no registry calls, got {:?}",
        provider.calls()
    );
}

#[tokio::test]
async fn discovered_address_drives_the_pass() {
    let source = FixedIpSource::new(ip("2001:db8::42"));
    let provider = RecordingProvider::new(vec![DnsRecord::aaaa("a", HOST, "2001:db8::1")]);
    let config = minimal_config();

    let report = assert_ok!(sync_once(&source, &provider, &config).await);

    assert_eq!(source.call_count(), 1);
    assert_eq!(
        report.outcome,
        RecordOutcome::Updated {
            record_id: "a".to_string(),
            previous: "2001:db8::1".to_string(),
            new_ip: ip("2001:db8::42"),
        }
    );
    assert_eq!(
        provider.calls().first(),
        Some(&Call::List {
            zone_id: ZONE.to_string()
        })
    );
}
