//! One-shot synchronization pass
//!
//! Discovery always happens first. Without a valid desired address the
//! registry is never contacted.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::reconciler::{ReconcileReport, Reconciler};
use crate::traits::{DnsProvider, IpSource};
use tracing::info;

/// Discover the public address and converge the hostname's AAAA record on it
///
/// # Returns
///
/// - `Ok(ReconcileReport)`: The registry converged
/// - `Err(Error::Discovery)`: No address; no registry call was made
/// - `Err(Error::Registry)`: A registry call failed; the pass stopped there
pub async fn sync_once(
    source: &dyn IpSource,
    provider: &dyn DnsProvider,
    config: &SyncConfig,
) -> Result<ReconcileReport> {
    let desired = source.current().await?;
    info!(
        "Public IPv6 address from {}: {}",
        source.source_name(),
        desired
    );

    let report = Reconciler::from_config(provider, config)
        .reconcile(desired)
        .await?;

    info!(
        "{} converged on {} ({} mutating call(s))",
        config.hostname,
        desired,
        report.mutation_count()
    );

    Ok(report)
}
