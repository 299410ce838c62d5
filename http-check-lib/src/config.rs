//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, layering in
//! `HC_*` environment variables, and merging configurations with proper
//! precedence rules.

use crate::error::HttpCheckError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML files.
///
/// This represents the structure of configuration files that users can
/// create to set default values and define their own port catalogs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// User-defined port catalogs, usable as probe specs by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_catalogs: Option<HashMap<String, Vec<u16>>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default timeout (as string, e.g., "500ms", "5s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default probe specs (catalog names or protocol:port pairs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probes: Option<Vec<String>>,

    /// Suppress the default http/https candidate pair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_default: Option<bool>,

    /// Follow redirects instead of stopping at the first hop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    /// Emit `redirect - <url>` lines for successful checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_redirects: Option<bool>,

    /// Log failed candidates to stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if parsing fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, HttpCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HttpCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HttpCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig =
            toml::from_str(&content).map_err(|e| HttpCheckError::ConfigError {
                message: format!("Failed to parse TOML configuration: {}", e),
            })?;

        // Validate the loaded configuration
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks for configuration files in standard locations and merges them
    /// according to precedence rules.
    ///
    /// # Returns
    ///
    /// Merged configuration from all discovered files.
    pub fn discover_and_load(&self) -> Result<FileConfig, HttpCheckError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // 1. Load XDG config (lowest precedence)
        if let Some(xdg_path) = self.get_xdg_config_path() {
            if let Ok(config) = self.load_file(&xdg_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(xdg_path);
            }
        }

        // 2. Load global config
        if let Some(global_path) = self.get_global_config_path() {
            if let Ok(config) = self.load_file(&global_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(global_path);
            }
        }

        // 3. Load local config (highest precedence)
        if let Some(local_path) = self.get_local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("⚠️  Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "active"
                } else {
                    "overridden"
                };
                eprintln!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    ///
    /// Looks for configuration files in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./http-check.toml", "./.http-check.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Get the global configuration file path.
    ///
    /// Looks for configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let candidates = [".http-check.toml", "http-check.toml"];

            for candidate in &candidates {
                let path = Path::new(&home).join(candidate);
                if path.exists() {
                    return Some(path);
                }
            }
        }

        None
    }

    /// Get the XDG configuration file path.
    ///
    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("http-check").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    // Merge defaults with higher precedence winning
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.probes.is_some() {
                        lower_defaults.probes = higher_defaults.probes;
                    }
                    if higher_defaults.skip_default.is_some() {
                        lower_defaults.skip_default = higher_defaults.skip_default;
                    }
                    if higher_defaults.follow_redirects.is_some() {
                        lower_defaults.follow_redirects = higher_defaults.follow_redirects;
                    }
                    if higher_defaults.report_redirects.is_some() {
                        lower_defaults.report_redirects = higher_defaults.report_redirects;
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
            custom_catalogs: match (lower.custom_catalogs, higher.custom_catalogs) {
                (Some(mut lower_catalogs), Some(higher_catalogs)) => {
                    // Merge catalogs, higher precedence wins for conflicts
                    lower_catalogs.extend(higher_catalogs);
                    Some(lower_catalogs)
                }
                (None, Some(higher_catalogs)) => Some(higher_catalogs),
                (Some(lower_catalogs), None) => Some(lower_catalogs),
                (None, None) => None,
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), HttpCheckError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 {
                    return Err(HttpCheckError::ConfigError {
                        message: "Concurrency must be at least 1".to_string(),
                    });
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                match parse_timeout_string(timeout_str) {
                    Some(ms) if ms > 0 => {}
                    _ => {
                        return Err(HttpCheckError::ConfigError {
                            message: format!(
                                "Invalid timeout '{}'. Use format like '500ms', '5s', '2m'",
                                timeout_str
                            ),
                        });
                    }
                }
            }
        }

        // Validate custom catalogs
        if let Some(catalogs) = &config.custom_catalogs {
            for (name, ports) in catalogs {
                if name.is_empty() {
                    return Err(HttpCheckError::ConfigError {
                        message: "Custom catalog names cannot be empty".to_string(),
                    });
                }

                if ports.is_empty() {
                    return Err(HttpCheckError::ConfigError {
                        message: format!("Custom catalog '{}' cannot have an empty port list", name),
                    });
                }

                if ports.contains(&0) {
                    return Err(HttpCheckError::ConfigError {
                        message: format!("Custom catalog '{}' contains port 0", name),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via HC_* environment
/// variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub probes: Option<Vec<String>>,
    pub skip_default: Option<bool>,
    pub follow_redirects: Option<bool>,
    pub report_redirects: Option<bool>,
    pub verbose: Option<bool>,
    pub config: Option<String>,
}

/// Load configuration from environment variables.
///
/// Parses all HC_* environment variables and returns a structured
/// configuration. Invalid values are logged as warnings and ignored. All
/// notes go to stderr; stdout is reserved for probe results.
///
/// # Arguments
///
/// * `verbose` - Whether to log environment variable usage
///
/// # Returns
///
/// Parsed environment configuration with validated values.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // HC_CONCURRENCY - concurrent probe workers
    if let Ok(val) = env::var("HC_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if concurrency > 0 => {
                env_config.concurrency = Some(concurrency);
                if verbose {
                    eprintln!("🔧 Using HC_CONCURRENCY={}", concurrency);
                }
            }
            _ => {
                if verbose {
                    eprintln!("⚠️ Invalid HC_CONCURRENCY='{}', must be a positive integer", val);
                }
            }
        }
    }

    // HC_TIMEOUT - per-request timeout
    if let Ok(timeout_str) = env::var("HC_TIMEOUT") {
        match parse_timeout_string(&timeout_str) {
            Some(ms) if ms > 0 => {
                env_config.timeout = Some(timeout_str.clone());
                if verbose {
                    eprintln!("🔧 Using HC_TIMEOUT={}", timeout_str);
                }
            }
            _ => {
                if verbose {
                    eprintln!(
                        "⚠️ Invalid HC_TIMEOUT='{}', use format like '500ms', '5s', '2m'",
                        timeout_str
                    );
                }
            }
        }
    }

    // HC_PROBE - comma-separated probe specs
    if let Ok(probe_str) = env::var("HC_PROBE") {
        let probes: Vec<String> = probe_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !probes.is_empty() {
            env_config.probes = Some(probes);
            if verbose {
                eprintln!("🔧 Using HC_PROBE={}", probe_str);
            }
        }
    }

    // Boolean switches share one parser
    env_config.skip_default = env_bool("HC_SKIP_DEFAULT", verbose);
    env_config.follow_redirects = env_bool("HC_FOLLOW_REDIRECTS", verbose);
    env_config.report_redirects = env_bool("HC_REPORT_REDIRECTS", verbose);
    env_config.verbose = env_bool("HC_VERBOSE", verbose);

    // HC_CONFIG - default config file path
    if let Ok(config_path) = env::var("HC_CONFIG") {
        if !config_path.trim().is_empty() {
            env_config.config = Some(config_path.clone());
            if verbose {
                eprintln!("🔧 Using HC_CONFIG={}", config_path);
            }
        }
    }

    env_config
}

/// Parse one boolean HC_* variable, warning on unrecognized values.
fn env_bool(name: &str, verbose: bool) -> Option<bool> {
    let val = env::var(name).ok()?;
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => {
            if verbose {
                eprintln!("🔧 Using {}=true", name);
            }
            Some(true)
        }
        "false" | "0" | "no" | "off" => {
            if verbose {
                eprintln!("🔧 Using {}=false", name);
            }
            Some(false)
        }
        _ => {
            if verbose {
                eprintln!("⚠️ Invalid {}='{}', use true/false", name, val);
            }
            None
        }
    }
}

/// Parse a timeout string like "500ms", "5s", "2m" into milliseconds.
///
/// Bare numbers are interpreted as milliseconds.
///
/// # Arguments
///
/// * `timeout_str` - String representation of timeout
///
/// # Returns
///
/// Number of milliseconds, or None if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    // "ms" must be checked before the bare "m" suffix
    if let Some(stripped) = timeout_str.strip_suffix("ms") {
        stripped.parse::<u64>().ok()
    } else if let Some(stripped) = timeout_str.strip_suffix('s') {
        stripped.parse::<u64>().ok().map(|secs| secs * 1_000)
    } else if let Some(stripped) = timeout_str.strip_suffix('m') {
        stripped.parse::<u64>().ok().map(|mins| mins * 60_000)
    } else {
        timeout_str.parse::<u64>().ok()
    }
}
