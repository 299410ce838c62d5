//! Core types for reachability probing.
//!
//! This module defines the configuration shared by every worker in a run,
//! the per-candidate result, and the counters reported when a run
//! completes.

use std::collections::HashMap;
use std::time::Duration;

/// Configuration for one probe run.
///
/// Constructed once at startup, then shared read-only by every worker.
/// Nothing mutates it after the pipeline starts.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Number of concurrent worker tasks, bounding in-flight requests.
    pub concurrency: usize,

    /// Per-request deadline, covering connect, TLS handshake, and response.
    pub timeout: Duration,

    /// Additional probe specs: catalog names or literal `protocol:port`
    /// pairs. Order-preserving; duplicates probe twice.
    pub probe_specs: Vec<String>,

    /// Skip the default `http://domain` and `https://domain` candidates.
    pub skip_default: bool,

    /// Follow redirects (up to 10 hops) instead of stopping at the first
    /// redirect response.
    pub follow_redirects: bool,

    /// Surface the final request URL on successful checks.
    pub report_redirects: bool,

    /// User-defined port catalogs, usually loaded from the config file.
    /// Names shadow built-in catalogs.
    pub custom_catalogs: Option<HashMap<String, Vec<u16>>>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: 20,                          // Reasonable default for bulk probing
            timeout: Duration::from_millis(10_000),   // 10 second deadline per request
            probe_specs: Vec::new(),
            skip_default: false,
            follow_redirects: false,
            report_redirects: false,
            custom_catalogs: None,
        }
    }
}

impl ProbeConfig {
    /// Set the worker count. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the probe spec list.
    pub fn with_probe_specs(mut self, specs: Vec<String>) -> Self {
        self.probe_specs = specs;
        self
    }

    /// Enable or disable the default http/https candidate pair.
    pub fn with_skip_default(mut self, skip: bool) -> Self {
        self.skip_default = skip;
        self
    }

    /// Enable or disable redirect following.
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Enable or disable final-URL reporting for successful checks.
    pub fn with_report_redirects(mut self, report: bool) -> Self {
        self.report_redirects = report;
        self
    }

    /// Install user-defined port catalogs.
    pub fn with_custom_catalogs(mut self, catalogs: HashMap<String, Vec<u16>>) -> Self {
        self.custom_catalogs = Some(catalogs);
        self
    }
}

/// Outcome of probing one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The candidate URL that was attempted.
    pub url: String,

    /// Whether any response arrived within the deadline. Status codes are
    /// irrelevant; a 500 is as reachable as a 200.
    pub reachable: bool,

    /// Final request URL after redirect handling. Present only when
    /// redirect reporting is enabled and the check succeeded.
    pub final_url: Option<String>,
}

impl ProbeResult {
    /// Build an unreachable result for a URL.
    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reachable: false,
            final_url: None,
        }
    }
}

/// Counters accumulated over one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Non-blank input lines consumed.
    pub domains: u64,

    /// Candidate URLs handed to the workers.
    pub candidates: u64,

    /// Candidates that answered within the deadline.
    pub reachable: u64,

    /// Candidates that did not.
    pub unreachable: u64,

    /// Input stream read error, if one occurred. Work enqueued before the
    /// error still ran to completion.
    pub input_error: Option<String>,
}
