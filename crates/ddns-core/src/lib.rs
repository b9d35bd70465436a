// # ddns-core
//
// Core library for the one-shot AAAA record synchronizer.
//
// ## Architecture Overview
//
// A run discovers the caller's public IPv6 address and converges exactly one
// AAAA record for a hostname on it:
// - **IpSource**: Trait for discovering the current public address
// - **DnsProvider**: Trait for listing and mutating records via a provider API
// - **Reconciler**: Decides create / update / no-op and removes duplicates
// - **sync_once**: Discovery followed by one reconciliation pass
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic is separate from HTTP plumbing
// 2. **Single Pass**: Nothing loops, retries or persists state; a scheduler re-runs us
// 3. **Explicit Inputs**: Config is immutable; the desired address is a separate parameter
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod reconciler;
pub mod sync;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{AAAA_RECORD_TYPE, DnsProvider, DnsRecord, IpSource};
pub use reconciler::{PlannedAction, ReconcilePlan, ReconcileReport, Reconciler, RecordOutcome};
pub use sync::sync_once;
pub use config::{DEFAULT_CONFIG_PATH, DEFAULT_IPV6_CHECK_URL, SyncConfig};
pub use error::{Error, Result};
