//! Subscout CLI Application
//!
//! Command-line interface for dictionary-based subdomain discovery. This
//! binary handles argument parsing, configuration precedence, and output
//! selection; the scanning itself lives in subscout-lib.

mod ui;

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgGroup, Parser};
use subscout_lib::{
    load_env_config, parse_timeout_string, wordlist, ConfigManager, Reporter, ResolutionOutcome,
    ScanConfig, ScanError, SubdomainScanner,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for subscout
#[derive(Parser, Debug)]
#[command(name = "subscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dictionary-based subdomain discovery")]
#[command(
    long_about = "Resolve candidate subdomains of a target domain concurrently and report which ones exist.\n\nCandidates come from an inline comma-separated wordlist or a line-delimited file."
)]
#[command(styles = STYLES)]
#[command(group(ArgGroup::new("wordlist_source").required(true).args(["wordlist", "file"])))]
pub struct Args {
    /// Target domain the candidates are prepended to
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN", help_heading = "Target")]
    pub domain: String,

    /// Inline wordlist, comma-separated
    #[arg(short = 'w', long = "wordlist", value_name = "LIST", help_heading = "Wordlist")]
    pub wordlist: Option<String>,

    /// Wordlist file, one candidate per line
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Wordlist")]
    pub file: Option<String>,

    /// Max concurrent resolutions (1-100)
    #[arg(
        short = 'c',
        long = "concurrency",
        default_value = "8",
        help_heading = "Performance"
    )]
    pub concurrency: usize,

    /// Per-lookup timeout (e.g. "5s", "2m")
    #[arg(long = "timeout", value_name = "DUR", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Nameserver to query instead of the default endpoint
    #[arg(long = "nameserver", value_name = "IP", help_heading = "Performance")]
    pub nameserver: Option<IpAddr>,

    /// Write report lines to a file instead of the console
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output")]
    pub output: Option<PathBuf>,

    /// Also report candidates that resolved to nothing
    #[arg(short = 'v', long = "verbose", help_heading = "Output")]
    pub verbose: bool,

    /// Emit a JSON array of outcomes instead of report lines
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Print the derived queries without resolving anything
    #[arg(long = "dry-run", help_heading = "Output")]
    pub dry_run: bool,

    /// Use a specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug-level log output
    #[arg(long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.debug);

    // Fatal errors produce a single diagnostic and a non-zero exit; a scan
    // that completes exits 0 no matter how many candidates matched.
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Route library and CLI tracing to stderr so stdout stays report-only.
fn init_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if debug {
        "subscout=debug,subscout_lib=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.concurrency == 0 || args.concurrency > 100 {
        return Err("Concurrency must be between 1 and 100".to_string());
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use a form like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    Ok(())
}

/// Main scanning logic
async fn run_scan(args: Args) -> Result<(), ScanError> {
    let config = build_config(&args)?;
    config.validate()?;

    let candidates = get_candidates(&args)?;
    let scanner = SubdomainScanner::with_config(config.clone());

    // Dry-run: print the derived queries and exit without resolving
    if args.dry_run {
        let queries = scanner.queries(&candidates);
        if args.json {
            let json = serde_json::to_string_pretty(&queries)
                .map_err(|e| ScanError::internal(format!("JSON encoding failed: {}", e)))?;
            println!("{}", json);
        } else {
            for query in &queries {
                println!("{}", query);
            }
        }
        eprintln!("{} queries would be resolved", queries.len());
        return Ok(());
    }

    if config.verbose && !args.json {
        ui::print_header(&config.domain, candidates.len(), config.concurrency);
    }

    let start_time = Instant::now();

    if args.json {
        let outcomes = scanner.scan(&candidates).await?;
        write_json_results(&outcomes, config.output.as_deref())?;
        return Ok(());
    }

    let mut reporter = match &config.output {
        Some(path) => Reporter::to_file(config.verbose, path)?,
        None => Reporter::new(config.verbose),
    };
    let summary = scanner.execute(&candidates, &mut reporter).await?;

    println!();
    ui::print_summary(&summary, start_time.elapsed());

    Ok(())
}

/// Build the scan configuration from CLI args with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (SC_*)
/// 3. Local config file (./subscout.toml, ./.subscout.toml)
/// 4. Global config file (~/.subscout.toml)
/// 5. XDG config file (~/.config/subscout/config.toml)
/// 6. Built-in defaults
fn build_config(args: &Args) -> Result<ScanConfig, ScanError> {
    let mut config = ScanConfig::new(args.domain.clone());

    let config_manager = ConfigManager::new(args.debug);

    // Step 1: config files. An explicit path is a hard error if unloadable;
    // discovery failures fall through to defaults.
    let file_config = if let Some(explicit_path) = &args.config {
        Some(config_manager.load_file(explicit_path)?)
    } else if let Ok(env_path) = std::env::var("SC_CONFIG") {
        Some(config_manager.load_file(&env_path)?)
    } else {
        config_manager.discover_and_load().ok()
    };

    if let Some(defaults) = file_config.and_then(|fc| fc.defaults) {
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
            config.timeout = timeout;
        }
        if let Some(ns) = defaults.nameserver.as_deref().and_then(|s| s.parse().ok()) {
            config.nameserver = Some(ns);
        }
        if let Some(verbose) = defaults.verbose {
            config.verbose = verbose;
        }
    }

    // Step 2: SC_* environment variables
    let env_config = load_env_config();
    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout) = env_config.timeout.as_deref().and_then(parse_timeout_string) {
        config.timeout = timeout;
    }
    if let Some(ns) = env_config.nameserver.as_deref().and_then(|s| s.parse().ok()) {
        config.nameserver = Some(ns);
    }
    if let Some(verbose) = env_config.verbose {
        config.verbose = verbose;
    }

    // Step 3: CLI arguments (highest precedence). The clap default (8)
    // cannot be told apart from an explicit --concurrency 8, so
    // same-as-default falls through to env/file values.
    if args.concurrency != 8 {
        config.concurrency = args.concurrency;
    }
    if let Some(timeout_str) = &args.timeout {
        config.timeout = parse_timeout_string(timeout_str).ok_or_else(|| {
            ScanError::config(format!(
                "invalid timeout '{}', use a form like '5s', '2m'",
                timeout_str
            ))
        })?;
    }
    if let Some(ns) = args.nameserver {
        config.nameserver = Some(ns);
    }
    // The flag only enables: without it, config/env values are preserved.
    if args.verbose {
        config.verbose = true;
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }

    Ok(config)
}

/// Collect candidates from the configured wordlist source.
fn get_candidates(args: &Args) -> Result<Vec<String>, ScanError> {
    if let Some(list) = &args.wordlist {
        Ok(wordlist::parse_inline(list))
    } else if let Some(path) = &args.file {
        wordlist::from_file(path)
    } else {
        // clap's ArgGroup enforces one source; this is a safety net.
        Err(ScanError::config(
            "a wordlist (-w) or wordlist file (-f) is required",
        ))
    }
}

/// Serialize outcomes as a JSON array to stdout or the output file.
fn write_json_results(
    outcomes: &[ResolutionOutcome],
    output: Option<&Path>,
) -> Result<(), ScanError> {
    let records: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|o| {
            serde_json::json!({
                "query": o.query,
                "addresses": o
                    .addresses()
                    .map(|addrs| addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>()),
                "error": o.error().map(|e| e.to_string()),
                "duration_ms": o.duration.as_millis() as u64,
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| ScanError::internal(format!("JSON encoding failed: {}", e)))?;

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n").map_err(|e| {
                ScanError::output(path.to_string_lossy(), format!("write failed: {}", e))
            })?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
