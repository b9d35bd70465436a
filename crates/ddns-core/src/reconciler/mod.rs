//! Record reconciliation
//!
//! The Reconciler converges the AAAA record set of one hostname to a single
//! record holding the desired address.
//!
//! ## Flow
//!
//! ```text
//!   DnsProvider::list_records(zone)
//!              │
//!              ▼
//!   filter: name == hostname && type == "AAAA"
//!              │
//!      ┌───────┴─────────┐
//!      │ empty           │ [first, rest..]
//!      ▼                 ▼
//!   create        first.content == desired ?
//!                    │ no          │ yes
//!                    ▼             ▼
//!                 update(first)   no-op
//!                        │
//!                        ▼
//!              delete every record in rest
//! ```
//!
//! The survivor is always whichever matching record the provider listed
//! first. Nothing is retried: the first failing call ends the pass, and
//! duplicates not yet deleted stay until the next run.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsRecord};
use std::net::Ipv6Addr;
use tracing::{debug, info};

/// The create/update/no-op decision for the surviving record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// No matching record exists; create one
    Create,
    /// The first matching record holds stale content; replace it
    Update {
        /// Record to update
        record_id: String,
        /// Content currently stored
        previous: String,
    },
    /// The first matching record already holds the desired address
    Keep {
        /// Record that is kept as-is
        record_id: String,
    },
}

/// Everything a reconciliation pass will do, computed without side effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Decision for the surviving record
    pub action: PlannedAction,
    /// Surplus matching records, in list order
    pub deletions: Vec<DnsRecord>,
}

/// What happened to the surviving record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new record was created
    Created {
        record_id: String,
        new_ip: Ipv6Addr,
    },
    /// An existing record's content was replaced
    Updated {
        record_id: String,
        previous: String,
        new_ip: Ipv6Addr,
    },
    /// The record already held the desired address (no-op)
    Unchanged {
        record_id: String,
        current_ip: Ipv6Addr,
    },
}

/// Result of a completed reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Outcome for the surviving record
    pub outcome: RecordOutcome,
    /// Ids of duplicate records that were deleted, in deletion order
    pub removed: Vec<String>,
}

impl ReconcileReport {
    /// Number of mutating registry calls the pass issued
    pub fn mutation_count(&self) -> usize {
        let primary = match self.outcome {
            RecordOutcome::Created { .. } | RecordOutcome::Updated { .. } => 1,
            RecordOutcome::Unchanged { .. } => 0,
        };
        primary + self.removed.len()
    }

    /// Id of the record that now holds the desired address
    pub fn record_id(&self) -> &str {
        match &self.outcome {
            RecordOutcome::Created { record_id, .. }
            | RecordOutcome::Updated { record_id, .. }
            | RecordOutcome::Unchanged { record_id, .. } => record_id,
        }
    }
}

/// Converges one hostname's AAAA records in one zone
pub struct Reconciler<'a> {
    provider: &'a dyn DnsProvider,
    zone_id: String,
    hostname: String,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for `hostname` in `zone_id`
    pub fn new(
        provider: &'a dyn DnsProvider,
        zone_id: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            zone_id: zone_id.into(),
            hostname: hostname.into(),
        }
    }

    /// Create a reconciler for the zone and hostname named in `config`
    pub fn from_config(provider: &'a dyn DnsProvider, config: &SyncConfig) -> Self {
        Self::new(provider, config.zone_id.clone(), config.hostname.clone())
    }

    /// Decide what to do with `records` (the full zone listing)
    ///
    /// Pure: issues no registry calls.
    pub fn plan(&self, records: Vec<DnsRecord>, desired: Ipv6Addr) -> ReconcilePlan {
        let mut candidates: Vec<DnsRecord> = records
            .into_iter()
            .filter(|record| record.is_aaaa_for(&self.hostname))
            .collect();

        if candidates.is_empty() {
            return ReconcilePlan {
                action: PlannedAction::Create,
                deletions: Vec::new(),
            };
        }

        let deletions = candidates.split_off(1);
        let first = candidates.remove(0);

        let action = if first.points_at(desired) {
            PlannedAction::Keep {
                record_id: first.id,
            }
        } else {
            PlannedAction::Update {
                record_id: first.id,
                previous: first.content,
            }
        };

        ReconcilePlan { action, deletions }
    }

    /// Run one reconciliation pass against the registry
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: The registry converged
    /// - `Err(Error)`: The first failing registry call; later steps were not
    ///   attempted
    pub async fn reconcile(&self, desired: Ipv6Addr) -> Result<ReconcileReport> {
        let records = self.provider.list_records(&self.zone_id).await?;
        debug!(
            "Fetched {} record(s) from {} zone {}",
            records.len(),
            self.provider.provider_name(),
            self.zone_id
        );

        let plan = self.plan(records, desired);

        let outcome = match plan.action {
            PlannedAction::Create => {
                info!(
                    "No AAAA record for {} at {}; creating with {}",
                    self.hostname,
                    self.provider.provider_name(),
                    desired
                );
                let created = self
                    .provider
                    .create_record(&self.zone_id, &self.hostname, desired)
                    .await?;
                RecordOutcome::Created {
                    record_id: created.id,
                    new_ip: desired,
                }
            }
            PlannedAction::Update {
                record_id,
                previous,
            } => {
                info!(
                    "AAAA record for {} holds {}; updating to {}",
                    self.hostname, previous, desired
                );
                self.provider
                    .update_record(&self.zone_id, &record_id, &self.hostname, desired)
                    .await?;
                RecordOutcome::Updated {
                    record_id,
                    previous,
                    new_ip: desired,
                }
            }
            PlannedAction::Keep { record_id } => {
                info!(
                    "AAAA record for {} already points at {}; nothing to update",
                    self.hostname, desired
                );
                RecordOutcome::Unchanged {
                    record_id,
                    current_ip: desired,
                }
            }
        };

        if !plan.deletions.is_empty() {
            info!(
                "Found {} surplus AAAA record(s) for {}; removing",
                plan.deletions.len(),
                self.hostname
            );
        }

        let mut removed = Vec::with_capacity(plan.deletions.len());
        for record in plan.deletions {
            info!(
                "Removing record {} with address {}",
                record.id, record.content
            );
            self.provider
                .delete_record(&self.zone_id, &record.id)
                .await?;
            removed.push(record.id);
        }

        Ok(ReconcileReport { outcome, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;

    /// Provider that must never be called; plan() is pure
    struct UnreachableProvider;

    #[async_trait]
    impl DnsProvider for UnreachableProvider {
        async fn list_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
            Err(Error::registry("list", "unexpected call"))
        }

        async fn create_record(
            &self,
            _zone_id: &str,
            _name: &str,
            _content: Ipv6Addr,
        ) -> Result<DnsRecord> {
            Err(Error::registry("create", "unexpected call"))
        }

        async fn update_record(
            &self,
            _zone_id: &str,
            _record_id: &str,
            _name: &str,
            _content: Ipv6Addr,
        ) -> Result<DnsRecord> {
            Err(Error::registry("update", "unexpected call"))
        }

        async fn delete_record(&self, _zone_id: &str, _record_id: &str) -> Result<DnsRecord> {
            Err(Error::registry("delete", "unexpected call"))
        }

        fn provider_name(&self) -> &'static str {
            "unreachable"
        }
    }

    const HOST: &str = "server.example.com";

    fn desired() -> Ipv6Addr {
        "2001:db8::2".parse().unwrap()
    }

    #[test]
    fn plan_creates_when_absent() {
        let provider = UnreachableProvider;
        let reconciler = Reconciler::new(&provider, "zone", HOST);
        let plan = reconciler.plan(
            vec![DnsRecord::aaaa("x", "other.example.com", "2001:db8::2")],
            desired(),
        );

        assert_eq!(plan.action, PlannedAction::Create);
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn plan_keeps_matching_first_record() {
        let provider = UnreachableProvider;
        let reconciler = Reconciler::new(&provider, "zone", HOST);
        let plan = reconciler.plan(vec![DnsRecord::aaaa("a", HOST, "2001:db8::2")], desired());

        assert_eq!(
            plan.action,
            PlannedAction::Keep {
                record_id: "a".to_string()
            }
        );
    }

    #[test]
    fn plan_survivor_is_first_in_list_order() {
        let provider = UnreachableProvider;
        let reconciler = Reconciler::new(&provider, "zone", HOST);
        let plan = reconciler.plan(
            vec![
                DnsRecord::aaaa("a", HOST, "2001:db8::1"),
                DnsRecord::aaaa("b", HOST, "2001:db8::2"),
                DnsRecord::aaaa("c", HOST, "2001:db8::3"),
            ],
            desired(),
        );

        // "b" already holds the desired address but "a" still survives
        assert_eq!(
            plan.action,
            PlannedAction::Update {
                record_id: "a".to_string(),
                previous: "2001:db8::1".to_string(),
            }
        );
        let deleted: Vec<&str> = plan.deletions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(deleted, vec!["b", "c"]);
    }

    #[test]
    fn report_counts_mutations() {
        let report = ReconcileReport {
            outcome: RecordOutcome::Unchanged {
                record_id: "a".to_string(),
                current_ip: desired(),
            },
            removed: vec!["b".to_string()],
        };
        assert_eq!(report.mutation_count(), 1);
        assert_eq!(report.record_id(), "a");
    }
}
