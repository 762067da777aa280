//! Streaming reporting of resolution outcomes.
//!
//! The reporter consumes outcomes one at a time, renders them according to
//! the verbosity policy, and writes the lines to a single sink (console by
//! default, a file when configured). It never buffers more than the line it
//! is rendering, so memory use is O(1) in the size of the wordlist, and it
//! keeps the aggregate counts as it goes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::types::{LookupResult, ResolutionOutcome, ScanSummary};

/// Render one outcome to its report line, if the policy emits one.
///
/// | Verbosity | Resolved, non-empty | Resolved, empty | Failed |
/// |-----------|---------------------|-----------------|--------|
/// | verbose   | `query - addresses` | `query - Not found` | error description |
/// | normal    | `query - addresses` | nothing         | error description |
///
/// Pure and deterministic: the same outcome and mode always produce the
/// same line.
pub fn format_outcome(outcome: &ResolutionOutcome, verbose: bool) -> Option<String> {
    match &outcome.lookup {
        LookupResult::Resolved(addresses) if !addresses.is_empty() => {
            let joined = addresses
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("{} - {}", outcome.query, joined))
        }
        LookupResult::Resolved(_) => {
            if verbose {
                Some(format!("{} - Not found", outcome.query))
            } else {
                None
            }
        }
        LookupResult::Failed(error) => Some(error.to_string()),
    }
}

#[derive(Debug)]
enum Sink {
    Console,
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

/// Streaming consumer of the outcome stream.
///
/// The single logical writer to the output sink: successes and per-query
/// failure diagnostics are interleaved on the same stream in completion
/// order, so file output never sees partial writes.
#[derive(Debug)]
pub struct Reporter {
    verbose: bool,
    sink: Sink,
    summary: ScanSummary,
}

impl Reporter {
    /// Reporter that writes to the console.
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            sink: Sink::Console,
            summary: ScanSummary::default(),
        }
    }

    /// Reporter that writes to a file instead of the console.
    ///
    /// The file is created eagerly so an unusable path fails the scan
    /// before any query is dispatched.
    pub fn to_file<P: AsRef<Path>>(verbose: bool, path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            ScanError::output(path.to_string_lossy(), format!("cannot create file: {}", e))
        })?;
        Ok(Self {
            verbose,
            sink: Sink::File {
                path: path.to_path_buf(),
                writer: BufWriter::new(file),
            },
            summary: ScanSummary::default(),
        })
    }

    /// Record one outcome and emit its report line, if any.
    pub fn report(&mut self, outcome: &ResolutionOutcome) -> Result<(), ScanError> {
        self.summary.record(outcome);

        if let Some(line) = format_outcome(outcome, self.verbose) {
            match &mut self.sink {
                Sink::Console => println!("{}", line),
                Sink::File { path, writer } => {
                    writeln!(writer, "{}", line).map_err(|e| {
                        ScanError::output(path.to_string_lossy(), format!("write failed: {}", e))
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Flush the sink after the last outcome.
    pub fn finish(&mut self) -> Result<(), ScanError> {
        if let Sink::File { path, writer } = &mut self.sink {
            writer.flush().map_err(|e| {
                ScanError::output(path.to_string_lossy(), format!("flush failed: {}", e))
            })?;
        }
        Ok(())
    }

    /// Counts of everything reported so far.
    pub fn summary(&self) -> ScanSummary {
        self.summary
    }
}
