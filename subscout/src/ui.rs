//! Terminal display for the subscout CLI.
//!
//! Report lines themselves come from the library's reporter; this module
//! only adds the styled header and the closing summary around them.

use std::time::Duration;

use console::style;
use subscout_lib::ScanSummary;

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a verbose run.
pub fn print_header(domain: &str, candidate_count: usize, concurrency: usize) {
    println!(
        "{} {} {}",
        style("subscout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— {} candidate{} against {}",
            candidate_count,
            if candidate_count == 1 { "" } else { "s" },
            domain
        ))
        .dim(),
    );
    println!("{}", style(format!("Concurrency: {}", concurrency)).dim());
    println!();
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the closing summary line with per-category counts.
pub fn print_summary(summary: &ScanSummary, duration: Duration) {
    println!(
        "{} {} checked — {} found, {} not found, {} failed in {:.1}s",
        style("Summary:").bold(),
        summary.total,
        style(summary.matched).green().bold(),
        style(summary.unresolved).dim(),
        if summary.failed > 0 {
            style(summary.failed).red()
        } else {
            style(summary.failed).dim()
        },
        duration.as_secs_f64(),
    );
}
