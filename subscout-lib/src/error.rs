//! Error handling for subdomain scans.
//!
//! This module defines the error type shared across the library. The
//! important distinction is between fatal startup errors (bad configuration,
//! unreadable wordlist, unusable output sink) and per-query lookup errors,
//! which are captured as data in the outcome stream and never abort a scan.

use std::fmt;

/// Main error type for subdomain scanning operations.
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Invalid scan configuration (zero concurrency, empty target domain,
    /// conflicting candidate sources, etc.). Fatal: the scan does not start.
    Config { message: String },

    /// The candidate wordlist could not be read or contained nothing usable.
    /// Fatal at startup, before any query is dispatched.
    Wordlist { path: String, message: String },

    /// The output sink could not be opened or written.
    Output { path: String, message: String },

    /// A single resolution failed (transport error, lookup timeout,
    /// malformed response). Local: captured as a `Failed` outcome for that
    /// query only.
    Lookup { query: String, message: String },

    /// Generic internal errors that don't fit other categories.
    Internal { message: String },
}

impl ScanError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new wordlist error.
    pub fn wordlist<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Wordlist {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new output sink error.
    pub fn output<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Output {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new lookup error for a single query.
    pub fn lookup<Q: Into<String>, M: Into<String>>(query: Q, message: M) -> Self {
        Self::Lookup {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error aborts the scan before any query is dispatched.
    ///
    /// Lookup errors are never fatal: they surface as `Failed` outcomes
    /// and leave every other query untouched.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Lookup { .. })
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::Wordlist { path, message } => {
                write!(f, "Wordlist error at '{}': {}", path, message)
            }
            Self::Output { path, message } => {
                write!(f, "Output error at '{}': {}", path, message)
            }
            Self::Lookup { query, message } => {
                write!(f, "Lookup failed for '{}': {}", query, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ScanError {}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
