//! Scan orchestration.
//!
//! This module provides the primary [`SubdomainScanner`] struct that owns
//! the target domain and configuration, derives the query set from the
//! candidate list, drives the task pool, and hands outcomes to a reporter.

use futures::stream::{Stream, StreamExt};
use tracing::info;

use crate::error::ScanError;
use crate::pool::TaskPool;
use crate::report::Reporter;
use crate::resolver::{DnsClient, Resolve};
use crate::types::{ResolutionOutcome, ScanConfig, ScanSummary};

/// Orchestrates a subdomain scan from candidates to reported outcomes.
///
/// # Example
///
/// ```rust,no_run
/// use subscout_lib::{ScanConfig, SubdomainScanner};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ScanConfig::new("example.com").with_concurrency(16);
///     let scanner = SubdomainScanner::with_config(config);
///
///     let candidates = vec!["www".to_string(), "mail".to_string()];
///     for outcome in scanner.scan(&candidates).await? {
///         println!("{}: {:?}", outcome.query, outcome.addresses());
///     }
///     Ok(())
/// }
/// ```
pub struct SubdomainScanner<R: Resolve = DnsClient> {
    /// Configuration for this scan
    config: ScanConfig,
    /// Resolver client the workers call into
    resolver: R,
}

impl SubdomainScanner<DnsClient> {
    /// Create a scanner with default configuration.
    ///
    /// Note that the default configuration carries no target domain, so a
    /// scan will fail validation until one is set; prefer
    /// [`SubdomainScanner::with_config`].
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Create a scanner for the given configuration, resolving through
    /// the configured DNS endpoint.
    pub fn with_config(config: ScanConfig) -> Self {
        let resolver = DnsClient::with_config(config.nameserver, config.timeout);
        Self { config, resolver }
    }
}

impl Default for SubdomainScanner<DnsClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resolve> SubdomainScanner<R> {
    /// Create a scanner with a custom resolver client.
    ///
    /// This is the seam used by tests to inject stub resolvers with
    /// scripted answers and instrumented concurrency counters.
    pub fn with_resolver(config: ScanConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    /// The configuration this scanner was built with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Derive the full query names, one per candidate in input order.
    ///
    /// Duplicate candidates are kept: each produces its own query and is
    /// resolved independently.
    pub fn queries(&self, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .map(|candidate| format!("{}.{}", candidate, self.config.domain))
            .collect()
    }

    /// Start the scan and return the outcome stream.
    ///
    /// Validates the configuration first and fails fast, before any worker
    /// is spawned, when it is invalid. The stream yields exactly one
    /// outcome per candidate, in completion order. Dropping the stream
    /// abandons pending queries; in-flight lookups finish naturally and
    /// their results are discarded.
    pub fn scan_stream(
        &self,
        candidates: &[String],
    ) -> Result<impl Stream<Item = ResolutionOutcome> + Send, ScanError> {
        self.config.validate()?;
        let pool = TaskPool::new(self.config.concurrency)?;
        let queries = self.queries(candidates);
        info!(
            domain = %self.config.domain,
            candidates = candidates.len(),
            concurrency = self.config.concurrency,
            "starting scan"
        );
        Ok(pool.run(self.resolver.clone(), queries))
    }

    /// Run the scan to completion and collect every outcome.
    pub async fn scan(&self, candidates: &[String]) -> Result<Vec<ResolutionOutcome>, ScanError> {
        let stream = self.scan_stream(candidates)?;
        Ok(stream.collect().await)
    }

    /// Run the scan, piping each outcome into the reporter as it completes.
    ///
    /// Returns once every outcome has been reported and the sink flushed.
    pub async fn execute(
        &self,
        candidates: &[String],
        reporter: &mut Reporter,
    ) -> Result<ScanSummary, ScanError> {
        let mut stream = std::pin::pin!(self.scan_stream(candidates)?);
        while let Some(outcome) = stream.next().await {
            reporter.report(&outcome)?;
        }
        reporter.finish()?;

        let summary = reporter.summary();
        info!(
            matched = summary.matched,
            unresolved = summary.unresolved,
            failed = summary.failed,
            "scan complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct NullResolver;

    impl Resolve for NullResolver {
        async fn resolve(&self, _query: &str) -> Result<Vec<std::net::IpAddr>, ScanError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_query_derivation_preserves_order_and_duplicates() {
        let scanner =
            SubdomainScanner::with_resolver(ScanConfig::new("example.com"), NullResolver);
        let candidates = vec![
            "www".to_string(),
            "mail".to_string(),
            "www".to_string(),
        ];
        assert_eq!(
            scanner.queries(&candidates),
            vec![
                "www.example.com",
                "mail.example.com",
                "www.example.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_any_lookup() {
        let scanner = SubdomainScanner::with_resolver(ScanConfig::new(""), NullResolver);
        let err = scanner.scan(&["www".to_string()]).await.unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));

        let mut config = ScanConfig::new("example.com");
        config.concurrency = 0;
        let scanner = SubdomainScanner::with_resolver(config, NullResolver);
        let err = scanner.scan(&["www".to_string()]).await.unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));
    }

    #[tokio::test]
    async fn test_empty_candidate_set_is_not_an_error() {
        let scanner =
            SubdomainScanner::with_resolver(ScanConfig::new("example.com"), NullResolver);
        let outcomes = scanner.scan(&[]).await.unwrap();
        assert!(outcomes.is_empty());
    }
}
