//! Core data types for subdomain scanning.
//!
//! This module defines the main data structures used throughout the library:
//! scan configuration, per-query outcomes, and the aggregate summary.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ScanError;

/// Configuration for a subdomain scan.
///
/// Constructed once before the scan starts and read-only thereafter.
/// Validation happens in [`ScanConfig::validate`], which the orchestrator
/// calls before spawning any worker.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target domain the candidates are prepended to (e.g. "example.com")
    pub domain: String,

    /// Maximum number of concurrent resolutions in flight.
    /// Default: 8, Range: 1-100
    pub concurrency: usize,

    /// Verbose reporting: also emit a line for candidates that resolved
    /// to nothing. Default: false
    pub verbose: bool,

    /// Optional output file; when set, report lines are written there
    /// instead of the console.
    pub output: Option<PathBuf>,

    /// Fixed nameserver to query. When `None`, the Cloudflare public
    /// resolver is used.
    pub nameserver: Option<IpAddr>,

    /// Timeout for each individual lookup.
    /// Default: 5 seconds
    pub timeout: Duration,
}

impl Default for ScanConfig {
    /// Defaults chosen to be conservative about resource usage while
    /// still finishing typical wordlists quickly.
    fn default() -> Self {
        Self {
            domain: String::new(),
            concurrency: 8,
            verbose: false,
            output: None,
            nameserver: None,
            timeout: Duration::from_secs(5),
        }
    }
}

impl ScanConfig {
    /// Create a configuration for the given target domain with defaults
    /// for everything else.
    pub fn new<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Set the concurrency limit.
    ///
    /// Automatically caps the value at 100 to prevent resource exhaustion
    /// (file descriptors, sockets) and raises 0 to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Enable or disable verbose reporting.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Redirect report lines to a file.
    pub fn with_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Use a specific nameserver instead of the default endpoint.
    pub fn with_nameserver(mut self, nameserver: IpAddr) -> Self {
        self.nameserver = Some(nameserver);
        self
    }

    /// Set the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configuration before a scan starts.
    ///
    /// Fails with [`ScanError::Config`] on a zero concurrency limit or an
    /// empty target domain, so invalid configurations never reach the pool.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::config("concurrency must be at least 1"));
        }
        if self.domain.trim().is_empty() {
            return Err(ScanError::config("target domain must not be empty"));
        }
        if self.domain.contains(char::is_whitespace) {
            return Err(ScanError::config(format!(
                "target domain '{}' contains whitespace",
                self.domain
            )));
        }
        Ok(())
    }
}

/// Result of resolving one query.
///
/// A clean negative answer is `Resolved` with an empty address list:
/// the absence of a subdomain is a valid outcome, distinct from a
/// transport or lookup fault.
#[derive(Debug, Clone)]
pub enum LookupResult {
    /// The lookup completed; the address list may be empty.
    Resolved(Vec<IpAddr>),

    /// The lookup failed with a transport/protocol error.
    Failed(ScanError),
}

/// The outcome of resolving one query, produced exactly once per query
/// by a task pool worker and immutable after creation.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    /// The fully-qualified name that was resolved (e.g. "www.example.com")
    pub query: String,

    /// What the resolver returned for it
    pub lookup: LookupResult,

    /// How long the lookup took
    pub duration: Duration,
}

impl ResolutionOutcome {
    /// Build a successful outcome.
    pub fn resolved(query: impl Into<String>, addresses: Vec<IpAddr>, duration: Duration) -> Self {
        Self {
            query: query.into(),
            lookup: LookupResult::Resolved(addresses),
            duration,
        }
    }

    /// Build a failed outcome.
    pub fn failed(query: impl Into<String>, error: ScanError, duration: Duration) -> Self {
        Self {
            query: query.into(),
            lookup: LookupResult::Failed(error),
            duration,
        }
    }

    /// The query resolved to at least one address.
    pub fn is_match(&self) -> bool {
        matches!(&self.lookup, LookupResult::Resolved(addrs) if !addrs.is_empty())
    }

    /// The resolved addresses, if the lookup completed.
    pub fn addresses(&self) -> Option<&[IpAddr]> {
        match &self.lookup {
            LookupResult::Resolved(addrs) => Some(addrs),
            LookupResult::Failed(_) => None,
        }
    }

    /// The lookup error, if the lookup failed.
    pub fn error(&self) -> Option<&ScanError> {
        match &self.lookup {
            LookupResult::Resolved(_) => None,
            LookupResult::Failed(err) => Some(err),
        }
    }
}

/// Aggregate counts for a completed scan.
///
/// Maintained incrementally by the reporter, so memory use stays O(1)
/// regardless of wordlist size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Total outcomes observed
    pub total: usize,
    /// Queries that resolved to one or more addresses
    pub matched: usize,
    /// Queries that resolved cleanly to nothing
    pub unresolved: usize,
    /// Queries whose lookup failed
    pub failed: usize,
}

impl ScanSummary {
    /// Record one outcome.
    pub fn record(&mut self, outcome: &ResolutionOutcome) {
        self.total += 1;
        match &outcome.lookup {
            LookupResult::Resolved(addrs) if !addrs.is_empty() => self.matched += 1,
            LookupResult::Resolved(_) => self.unresolved += 1,
            LookupResult::Failed(_) => self.failed += 1,
        }
    }
}
