//! Resolver client: the bridge to the external DNS lookup mechanism.
//!
//! The [`Resolve`] trait is the seam between the scan engine and the actual
//! network. Production code uses [`DnsClient`], a thin wrapper around
//! `hickory-resolver`; tests inject stub implementations to control latency,
//! answers, and failures.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, warn};

use crate::error::ScanError;

/// A name-to-addresses lookup.
///
/// Contract: a clean negative answer (the name simply does not exist) is
/// `Ok` with an empty list; `Err` is reserved for transport and protocol
/// faults. No retries happen at this layer; retry policy, if any, belongs
/// to the underlying mechanism.
pub trait Resolve: Clone + Send + Sync + 'static {
    /// Resolve a fully-qualified name to its addresses.
    fn resolve(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, ScanError>> + Send;
}

/// DNS resolver client backed by `hickory-resolver`.
///
/// Queries a single fixed endpoint: a configured nameserver, or the
/// Cloudflare public resolver by default. Cheap to clone: clones share
/// the underlying resolver handle.
#[derive(Clone)]
pub struct DnsClient {
    resolver: TokioAsyncResolver,
}

impl DnsClient {
    /// Create a client with the default endpoint and a 5 second lookup
    /// timeout.
    pub fn new() -> Self {
        Self::with_config(None, Duration::from_secs(5))
    }

    /// Create a client with a custom endpoint and lookup timeout.
    ///
    /// When `nameserver` is `None`, the Cloudflare public resolver preset
    /// is used (UDP and TCP on port 53).
    pub fn with_config(nameserver: Option<IpAddr>, timeout: Duration) -> Self {
        let config = match nameserver {
            Some(ip) => ResolverConfig::from_parts(
                None,
                vec![],
                NameServerConfigGroup::from_ips_clear(&[ip], 53, true),
            ),
            None => ResolverConfig::cloudflare(),
        };

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl Default for DnsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for DnsClient {
    async fn resolve(&self, query: &str) -> Result<Vec<IpAddr>, ScanError> {
        match self.resolver.lookup_ip(query).await {
            Ok(lookup) => {
                let addresses: Vec<IpAddr> = lookup.iter().collect();
                debug!(query, count = addresses.len(), "lookup completed");
                Ok(addresses)
            }
            Err(e) => match e.kind() {
                // The name does not exist: a valid answer, not a fault.
                ResolveErrorKind::NoRecordsFound { .. } => {
                    debug!(query, "no records");
                    Ok(Vec::new())
                }
                _ => {
                    warn!(query, error = %e, "lookup failed");
                    Err(ScanError::lookup(query, e.to_string()))
                }
            },
        }
    }
}
