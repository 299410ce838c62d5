//! # http-check-lib
//!
//! A fast, concurrent library for probing HTTP(S) endpoint reachability.
//!
//! Feed it domain names and it expands each into candidate URLs (default
//! http/https plus configurable protocol/port combinations), probes every
//! candidate through a bounded worker pool, and reports which ones answer
//! within the deadline. Any response counts as reachable; TLS certificates
//! are not verified, because liveness is what is being measured.
//!
//! ## Quick Start
//!
//! ```no_run
//! use http_check_lib::{ProbeConfig, ProbePipeline};
//!
//! #[tokio::main]
//! async fn main() -> http_check_lib::Result<()> {
//!     let config = ProbeConfig::default()
//!         .with_concurrency(20)
//!         .with_probe_specs(vec!["large".to_string()]);
//!
//!     let pipeline = ProbePipeline::with_config(config);
//!     let input = tokio::io::BufReader::new(tokio::io::stdin());
//!
//!     let stats = pipeline
//!         .run(input, |result| {
//!             if result.reachable {
//!                 println!("{}", result.url);
//!             }
//!         })
//!         .await?;
//!
//!     eprintln!("{} of {} candidates reachable", stats.reachable, stats.candidates);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: fixed worker pool, backpressured producer
//! - **Port catalogs**: built-in `large`/`xlarge` sets plus user-defined
//!   catalogs from the config file
//! - **Deterministic shutdown**: closed-channel drain plus a join barrier
//! - **Streaming API**: [`HttpChecker::check_urls_stream`] for callers that
//!   manage their own candidate lists
//! - **Configuration files**: TOML discovery with environment overrides

// Public API re-exports
pub use checker::HttpChecker;
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::HttpCheckError;
pub use generate::candidate_urls;
pub use pipeline::ProbePipeline;
pub use ports::{available_catalogs, catalog_ports, LARGE_PORTS, XLARGE_PORTS};
pub use types::{ProbeConfig, ProbeResult, RunStats};

// Internal modules
mod checker;
mod config;
mod error;
mod generate;
mod pipeline;
mod ports;
mod types;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, HttpCheckError>;

/// Library version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
