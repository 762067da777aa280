//! Configuration file parsing and management.
//!
//! This module handles loading defaults from TOML files and from `SC_*`
//! environment variables, with proper precedence rules. The CLI merges
//! these under its own arguments; the library itself never reads ambient
//! state during a scan.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScanError;

/// Configuration loaded from a TOML file.
///
/// ```toml
/// [defaults]
/// concurrency = 16
/// timeout = "3s"
/// nameserver = "9.9.9.9"
/// verbose = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-lookup timeout (as string, e.g. "5s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default nameserver (IP address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameserver: Option<String>,

    /// Default verbose reporting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log config discovery details
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScanError::config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScanError::config(format!(
                "failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: FileConfig = toml::from_str(&content)
            .map_err(|e| ScanError::config(format!("failed to parse TOML configuration: {}", e)))?;

        self.validate_config(&config)?;
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is loaded first, then the home-directory config, then the
    /// local one, so later (more specific) files override earlier ones.
    pub fn discover_and_load(&self) -> Result<FileConfig, ScanError> {
        let mut merged = FileConfig::default();
        let mut loaded_files = Vec::new();

        if let Some(xdg_path) = self.xdg_config_path() {
            if let Ok(config) = self.load_file(&xdg_path) {
                merged = merge_configs(merged, config);
                loaded_files.push(xdg_path);
            }
        }

        if let Some(global_path) = self.global_config_path() {
            if let Ok(config) = self.load_file(&global_path) {
                merged = merge_configs(merged, config);
                loaded_files.push(global_path);
            }
        }

        if let Some(local_path) = self.local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged = merge_configs(merged, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            debug!(
                files = ?loaded_files,
                "multiple config files found; the last one wins per field"
            );
        }

        Ok(merged)
    }

    /// Configuration file in the current directory.
    fn local_config_path(&self) -> Option<PathBuf> {
        ["./subscout.toml", "./.subscout.toml"]
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }

    /// Configuration file in the user's home directory.
    fn global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".subscout.toml", "subscout.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|p| p.exists())
    }

    /// Configuration file per the XDG Base Directory Specification.
    fn xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("subscout").join("config.toml");
        path.exists().then_some(path)
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), ScanError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(ScanError::config("concurrency must be between 1 and 100"));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(ScanError::config(format!(
                        "invalid timeout '{}', use a form like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(nameserver) = &defaults.nameserver {
                if nameserver.parse::<std::net::IpAddr>().is_err() {
                    return Err(ScanError::config(format!(
                        "invalid nameserver '{}', expected an IP address",
                        nameserver
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Merge two configurations; values from `higher` win per field.
fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    FileConfig {
        defaults: match (lower.defaults, higher.defaults) {
            (Some(mut lower_defaults), Some(higher_defaults)) => {
                if higher_defaults.concurrency.is_some() {
                    lower_defaults.concurrency = higher_defaults.concurrency;
                }
                if higher_defaults.timeout.is_some() {
                    lower_defaults.timeout = higher_defaults.timeout;
                }
                if higher_defaults.nameserver.is_some() {
                    lower_defaults.nameserver = higher_defaults.nameserver;
                }
                if higher_defaults.verbose.is_some() {
                    lower_defaults.verbose = higher_defaults.verbose;
                }
                Some(lower_defaults)
            }
            (None, Some(higher_defaults)) => Some(higher_defaults),
            (Some(lower_defaults), None) => Some(lower_defaults),
            (None, None) => None,
        },
    }
}

/// Environment variable configuration that mirrors CLI options.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub nameserver: Option<String>,
    pub verbose: Option<bool>,
}

/// Load configuration from `SC_*` environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    let mut env_config = EnvConfig::default();

    if let Ok(val) = env::var("SC_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if (1..=100).contains(&concurrency) => {
                env_config.concurrency = Some(concurrency);
                debug!(concurrency, "using SC_CONCURRENCY");
            }
            _ => warn!(value = %val, "invalid SC_CONCURRENCY, must be 1-100"),
        }
    }

    if let Ok(timeout_str) = env::var("SC_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            debug!(timeout = %timeout_str, "using SC_TIMEOUT");
            env_config.timeout = Some(timeout_str);
        } else {
            warn!(value = %timeout_str, "invalid SC_TIMEOUT, use a form like '5s', '2m'");
        }
    }

    if let Ok(nameserver) = env::var("SC_NAMESERVER") {
        if nameserver.parse::<std::net::IpAddr>().is_ok() {
            debug!(nameserver = %nameserver, "using SC_NAMESERVER");
            env_config.nameserver = Some(nameserver);
        } else {
            warn!(value = %nameserver, "invalid SC_NAMESERVER, expected an IP address");
        }
    }

    if let Ok(val) = env::var("SC_VERBOSE") {
        match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => env_config.verbose = Some(true),
            "false" | "0" | "no" | "off" => env_config.verbose = Some(false),
            _ => warn!(value = %val, "invalid SC_VERBOSE, use true/false"),
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into a duration.
///
/// A bare number is taken as seconds. Returns `None` if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let seconds = if let Some(s) = timeout_str.strip_suffix('s') {
        s.parse::<u64>().ok()?
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        m.parse::<u64>().ok()? * 60
    } else {
        timeout_str.parse::<u64>().ok()?
    };

    Some(Duration::from_secs(seconds))
}
