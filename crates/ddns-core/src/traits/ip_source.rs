// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IPv6
// address.
//
// ## Implementations
//
// - HTTP-based: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("public address: {current_ip}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv6Addr;

/// Trait for public address discovery
///
/// A source is asked exactly once per run. The address it returns is the
/// desired state for that run and is never persisted.
///
/// # Failure
///
/// Any failure (transport, timeout, empty or non-IPv6 body) must be reported
/// as [`crate::Error::Discovery`]. The run aborts before the registry is
/// contacted.
///
/// Implementations must not retry; a scheduler re-invoking the whole run is
/// the retry policy.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Discover the current public IPv6 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv6Addr)`: The current public address
    /// - `Err(Error)`: If unable to determine it
    async fn current(&self) -> Result<Ipv6Addr, crate::Error>;

    /// Name of the source (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
