//! Candidate wordlist acquisition.
//!
//! Candidates arrive either as an inline comma-separated string or as a
//! line-delimited file. Either way the engine only ever sees non-empty
//! fragments without embedded whitespace; everything else is discarded
//! here, before any query is built.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::ScanError;

/// Whether a fragment is usable as a candidate.
fn is_valid_candidate(fragment: &str) -> bool {
    !fragment.is_empty() && !fragment.contains(char::is_whitespace)
}

/// Parse an inline comma-separated wordlist.
///
/// Entries are trimmed; empty and whitespace-only entries are discarded.
/// An all-empty input yields an empty list, which scans to zero outcomes.
pub fn parse_inline(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| is_valid_candidate(entry))
        .map(str::to_string)
        .collect()
}

/// Read a line-delimited wordlist file.
///
/// Blank lines, whitespace-only lines, and `#` comment lines are skipped.
/// Entries with embedded whitespace are dropped with a warning. An
/// unreadable file is fatal, before any query is dispatched.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ScanError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ScanError::wordlist(path.to_string_lossy(), format!("cannot open file: {}", e))
    })?;

    let mut candidates = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            ScanError::wordlist(
                path.to_string_lossy(),
                format!("read failed at line {}: {}", line_num + 1, e),
            )
        })?;
        let entry = line.trim();

        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        if !is_valid_candidate(entry) {
            warn!(
                line = line_num + 1,
                entry, "skipping wordlist entry with embedded whitespace"
            );
            continue;
        }
        candidates.push(entry.to_string());
    }

    Ok(candidates)
}
