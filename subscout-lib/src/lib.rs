//! # Subscout Library
//!
//! A concurrent dictionary-based subdomain discovery engine.
//!
//! Given a target domain and a list of candidate name fragments, subscout
//! resolves `fragment.domain` for every candidate in parallel, bounded by a
//! configurable concurrency limit, and reports which candidates resolve to
//! one or more addresses. Individual lookup failures are captured as data in
//! the outcome stream; they never abort the scan.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use subscout_lib::{ScanConfig, SubdomainScanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::new("example.com").with_concurrency(16);
//!     let scanner = SubdomainScanner::with_config(config);
//!
//!     let candidates = vec!["www".to_string(), "mail".to_string()];
//!     for outcome in scanner.scan(&candidates).await? {
//!         if outcome.is_match() {
//!             println!("{}", outcome.query);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded fan-out**: at most N lookups in flight, however large the
//!   wordlist
//! - **Completion-order streaming**: outcomes arrive as they finish
//! - **Failure isolation**: one failing lookup never touches the rest
//! - **Pluggable resolver**: the [`Resolve`] seam accepts stub resolvers
//!   for deterministic tests

// Re-export main public API types and functions
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::ScanError;
pub use pool::TaskPool;
pub use report::{format_outcome, Reporter};
pub use resolver::{DnsClient, Resolve};
pub use scanner::SubdomainScanner;
pub use types::{LookupResult, ResolutionOutcome, ScanConfig, ScanSummary};

// Internal modules
mod config;
mod error;
mod pool;
mod report;
mod resolver;
mod scanner;
mod types;

// Candidate acquisition helpers (public: the CLI and other callers feed
// candidates through these)
pub mod wordlist;

/// Type alias for results from this library.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Library version, for display purposes.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
