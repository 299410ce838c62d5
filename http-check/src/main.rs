//! Command-line interface for bounded-concurrency HTTP(S) reachability
//! probing.
//!
//! Reads newline-delimited domains from stdin (or `--file`), expands each
//! into candidate URLs, probes them through the library pipeline, and
//! streams reachable URLs to stdout. Stdout carries nothing but results, so
//! the output pipes cleanly into other tools; diagnostics, verbose failure
//! lines, and tracing all go to stderr.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::EnvFilter;

use http_check_lib::{
    load_env_config, parse_timeout_string, ConfigManager, EnvConfig, FileConfig, HttpCheckError,
    ProbeConfig, ProbePipeline,
};

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(
    name = "http-check",
    version,
    about = "Probe domains for live HTTP(S) endpoints across protocol and port combinations",
    long_about = "Reads newline-delimited domain names and reports which ones expose a live \
HTTP(S) endpoint. Each domain expands into candidate URLs (http/https by default, plus any \
probe specs), every candidate receives one GET request under the configured timeout, and \
reachable URLs stream to stdout in completion order. Any response counts as reachable; \
certificate validity is ignored.",
    after_help = "EXAMPLES:\n    cat domains.txt | http-check\n    http-check -f domains.txt -p large -c 50\n    http-check -p http:8080 -p https:8443 -s < domains.txt\n    HC_TIMEOUT=5s http-check -v < domains.txt",
    styles = STYLES
)]
pub struct Args {
    /// Read domains from a file instead of stdin
    #[arg(short, long, value_name = "FILE", help_heading = "Input")]
    pub file: Option<PathBuf>,

    /// Add probe spec: a catalog name (large, xlarge, or one defined in the
    /// config file) or a literal protocol:port pair. Repeatable
    #[arg(short, long, value_name = "SPEC", help_heading = "Probe Selection")]
    pub probe: Vec<String>,

    /// Skip the default http:// and https:// probes
    #[arg(short, long, help_heading = "Probe Selection")]
    pub skip_default: bool,

    /// Number of concurrent probe workers [default: 20]
    #[arg(short, long, value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in milliseconds [default: 10000]
    #[arg(short, long, value_name = "MS", help_heading = "Performance")]
    pub timeout: Option<u64>,

    /// Follow redirects (up to 10 hops) instead of stopping at the first
    #[arg(long, help_heading = "Protocol")]
    pub follow_redirects: bool,

    /// Print "redirect - <final-url>" after each reachable URL
    #[arg(long, help_heading = "Protocol")]
    pub report_redirects: bool,

    /// Log failed candidates to stderr
    #[arg(short, long, help_heading = "Output")]
    pub verbose: bool,

    /// Use a specific configuration file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,
}

/// Validate argument combinations before any work starts.
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(0) = args.concurrency {
        return Err("Concurrency must be at least 1".to_string());
    }

    if let Some(0) = args.timeout {
        return Err("Timeout must be at least 1 millisecond".to_string());
    }

    Ok(())
}

/// Load the configuration file: explicit path (CLI, then HC_CONFIG) must
/// exist; otherwise fall back to standard-location discovery, where absence
/// is fine.
fn load_file_config(args: &Args, env_config: &EnvConfig) -> Result<FileConfig, HttpCheckError> {
    let manager = ConfigManager::new(args.verbose);

    let explicit = args
        .config
        .clone()
        .or_else(|| env_config.config.as_ref().map(PathBuf::from));

    match explicit {
        Some(path) => manager.load_file(path),
        None => manager.discover_and_load(),
    }
}

/// Merge file, environment, and CLI layers into the final run options.
///
/// Precedence: CLI > environment > config file > built-in defaults. Probe
/// spec lists replace rather than merge across layers. Returns the probe
/// configuration and the resolved verbose flag.
fn build_config(
    args: &Args,
    file_config: &FileConfig,
    env_config: &EnvConfig,
) -> (ProbeConfig, bool) {
    let mut config = ProbeConfig::default();
    let mut verbose = false;

    // 1. Config file defaults (lowest precedence)
    if let Some(defaults) = &file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout_str) = &defaults.timeout {
            // Already validated at load time
            if let Some(ms) = parse_timeout_string(timeout_str) {
                config.timeout = Duration::from_millis(ms);
            }
        }
        if let Some(probes) = &defaults.probes {
            config.probe_specs = probes.clone();
        }
        if let Some(skip) = defaults.skip_default {
            config.skip_default = skip;
        }
        if let Some(follow) = defaults.follow_redirects {
            config.follow_redirects = follow;
        }
        if let Some(report) = defaults.report_redirects {
            config.report_redirects = report;
        }
        if let Some(v) = defaults.verbose {
            verbose = v;
        }
    }
    if let Some(catalogs) = &file_config.custom_catalogs {
        config.custom_catalogs = Some(catalogs.clone());
    }

    // 2. Environment variables
    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_str) = &env_config.timeout {
        if let Some(ms) = parse_timeout_string(timeout_str) {
            config.timeout = Duration::from_millis(ms);
        }
    }
    if let Some(probes) = &env_config.probes {
        config.probe_specs = probes.clone();
    }
    if let Some(skip) = env_config.skip_default {
        config.skip_default = skip;
    }
    if let Some(follow) = env_config.follow_redirects {
        config.follow_redirects = follow;
    }
    if let Some(report) = env_config.report_redirects {
        config.report_redirects = report;
    }
    if let Some(v) = env_config.verbose {
        verbose = v;
    }

    // 3. CLI arguments (highest precedence; absent flags leave lower
    // layers in effect)
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(ms) = args.timeout {
        config.timeout = Duration::from_millis(ms);
    }
    if !args.probe.is_empty() {
        config.probe_specs = args.probe.clone();
    }
    if args.skip_default {
        config.skip_default = true;
    }
    if args.follow_redirects {
        config.follow_redirects = true;
    }
    if args.report_redirects {
        config.report_redirects = true;
    }
    if args.verbose {
        verbose = true;
    }

    (config, verbose)
}

/// Select the domain source: `--file` when given, stdin otherwise.
async fn open_input(args: &Args) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, HttpCheckError> {
    match &args.file {
        Some(path) => {
            let file = File::open(path).await.map_err(|e| {
                HttpCheckError::file_error(
                    path.to_string_lossy(),
                    format!("Failed to open input file: {}", e),
                )
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

/// Install the tracing subscriber. Filter comes from HC_LOG (default
/// `warn`); events go to stderr so stdout stays a pure result stream.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("HC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<(), HttpCheckError> {
    let env_config = load_env_config(args.verbose);
    let file_config = load_file_config(&args, &env_config)?;
    let (config, verbose) = build_config(&args, &file_config, &env_config);

    tracing::debug!(
        concurrency = config.concurrency,
        timeout_ms = config.timeout.as_millis() as u64,
        probes = config.probe_specs.len(),
        "configuration resolved"
    );

    let input = open_input(&args).await?;
    let pipeline = ProbePipeline::with_config(config);

    let stats = pipeline
        .run(input, |result| {
            if result.reachable {
                println!("{}", result.url);
                if let Some(target) = result.final_url {
                    println!("redirect - {}", target);
                }
            } else if verbose {
                eprintln!("failed: {}", result.url);
            }
        })
        .await?;

    // Reported once, after the drain, so dispatched work was not lost.
    if let Some(error) = stats.input_error {
        eprintln!("failed to read input: {}", error);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing();

    if let Err(error) = validate_args(&args) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }

    if let Err(error) = run(args).await {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_check_lib::DefaultsConfig;
    use std::collections::HashMap;

    fn create_test_args() -> Args {
        Args {
            file: None,
            probe: Vec::new(),
            skip_default: false,
            concurrency: None,
            timeout: None,
            follow_redirects: false,
            report_redirects: false,
            verbose: false,
            config: None,
        }
    }

    fn file_config_with(defaults: DefaultsConfig) -> FileConfig {
        FileConfig {
            defaults: Some(defaults),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_accepts_defaults() {
        assert!(validate_args(&create_test_args()).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_zero_concurrency() {
        let mut args = create_test_args();
        args.concurrency = Some(0);
        let error = validate_args(&args).unwrap_err();
        assert!(error.contains("Concurrency"));
    }

    #[test]
    fn test_validate_args_rejects_zero_timeout() {
        let mut args = create_test_args();
        args.timeout = Some(0);
        let error = validate_args(&args).unwrap_err();
        assert!(error.contains("Timeout"));
    }

    #[test]
    fn test_build_config_uses_builtin_defaults() {
        let args = create_test_args();
        let (config, verbose) =
            build_config(&args, &FileConfig::default(), &EnvConfig::default());

        assert_eq!(config.concurrency, 20);
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert!(config.probe_specs.is_empty());
        assert!(!config.skip_default);
        assert!(!verbose);
    }

    #[test]
    fn test_file_config_overrides_builtin() {
        let args = create_test_args();
        let file_config = file_config_with(DefaultsConfig {
            concurrency: Some(5),
            timeout: Some("5s".to_string()),
            probes: Some(vec!["large".to_string()]),
            ..Default::default()
        });

        let (config, _) = build_config(&args, &file_config, &EnvConfig::default());

        assert_eq!(config.concurrency, 5);
        assert_eq!(config.timeout, Duration::from_millis(5_000));
        assert_eq!(config.probe_specs, vec!["large".to_string()]);
    }

    #[test]
    fn test_env_overrides_file() {
        let args = create_test_args();
        let file_config = file_config_with(DefaultsConfig {
            concurrency: Some(5),
            skip_default: Some(true),
            ..Default::default()
        });
        let env_config = EnvConfig {
            concurrency: Some(7),
            skip_default: Some(false),
            ..Default::default()
        };

        let (config, _) = build_config(&args, &file_config, &env_config);

        assert_eq!(config.concurrency, 7);
        assert!(!config.skip_default); // env explicitly disabled it
    }

    #[test]
    fn test_cli_overrides_env_and_file() {
        let mut args = create_test_args();
        args.concurrency = Some(9);
        args.timeout = Some(750);
        let file_config = file_config_with(DefaultsConfig {
            concurrency: Some(5),
            ..Default::default()
        });
        let env_config = EnvConfig {
            concurrency: Some(7),
            timeout: Some("5s".to_string()),
            ..Default::default()
        };

        let (config, _) = build_config(&args, &file_config, &env_config);

        assert_eq!(config.concurrency, 9);
        assert_eq!(config.timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_probe_specs_replace_across_layers() {
        let mut args = create_test_args();
        args.probe = vec!["http:81".to_string()];
        let file_config = file_config_with(DefaultsConfig {
            probes: Some(vec!["large".to_string(), "xlarge".to_string()]),
            ..Default::default()
        });

        let (config, _) = build_config(&args, &file_config, &EnvConfig::default());

        // CLI replaces the file list instead of appending to it.
        assert_eq!(config.probe_specs, vec!["http:81".to_string()]);
    }

    #[test]
    fn test_absent_cli_flag_keeps_lower_layer_value() {
        let args = create_test_args();
        let file_config = file_config_with(DefaultsConfig {
            verbose: Some(true),
            follow_redirects: Some(true),
            ..Default::default()
        });

        let (config, verbose) = build_config(&args, &file_config, &EnvConfig::default());

        assert!(verbose);
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_custom_catalogs_flow_from_file() {
        let args = create_test_args();
        let mut catalogs = HashMap::new();
        catalogs.insert("admin".to_string(), vec![8080u16, 9090]);
        let file_config = FileConfig {
            custom_catalogs: Some(catalogs),
            ..Default::default()
        };

        let (config, _) = build_config(&args, &file_config, &EnvConfig::default());

        let stored = config.custom_catalogs.expect("catalogs should carry over");
        assert_eq!(stored.get("admin"), Some(&vec![8080, 9090]));
    }

    #[test]
    fn test_args_parse_repeatable_probe() {
        let args = Args::try_parse_from([
            "http-check",
            "-c",
            "50",
            "-p",
            "large",
            "-p",
            "http:8443",
            "-s",
        ])
        .unwrap();

        assert_eq!(args.concurrency, Some(50));
        assert_eq!(
            args.probe,
            vec!["large".to_string(), "http:8443".to_string()]
        );
        assert!(args.skip_default);
    }

    #[test]
    fn test_args_parse_redirect_flags() {
        let args = Args::try_parse_from([
            "http-check",
            "--follow-redirects",
            "--report-redirects",
        ])
        .unwrap();

        assert!(args.follow_redirects);
        assert!(args.report_redirects);
    }
}
