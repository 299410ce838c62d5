//! Core reachability checking.
//!
//! One [`HttpChecker`] owns the shared HTTP client for a run. Reachability
//! is deliberately coarse: any response within the deadline counts, whatever
//! the status code, and every failure mode (refused, timeout, DNS, TLS,
//! unparseable URL) collapses to `reachable == false` with no further
//! detail.

use std::pin::Pin;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use reqwest::header;

use crate::types::{ProbeConfig, ProbeResult};

/// Browser-like User-Agent sent with every probe request.
const PROBE_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/73.0.3683.103 Safari/537.36";

/// Checks candidate URLs for liveness through one shared client.
///
/// The client is configured once from [`ProbeConfig`]: both connect and
/// overall deadlines set to the configured timeout, TLS verification
/// disabled, connection reuse off, and the redirect policy chosen by
/// `follow_redirects`.
pub struct HttpChecker {
    config: ProbeConfig,
    client: reqwest::Client,
}

impl HttpChecker {
    /// Create a checker with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a checker with custom configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        let client = build_client(&config).expect("Failed to create HTTP client");
        Self { config, client }
    }

    /// Probe a single candidate URL.
    ///
    /// Returns a result rather than an error: an unreachable candidate is a
    /// normal outcome, not a fault. When redirect reporting is enabled and
    /// the request succeeds, the result carries the final request URL,
    /// which is the last hop when redirects are followed and the original
    /// URL otherwise.
    pub async fn check_url(&self, url: &str) -> ProbeResult {
        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, PROBE_USER_AGENT)
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.8")
            .header(header::CONNECTION, "close")
            .build();

        // A structurally invalid URL is indistinguishable from a dead host.
        let request = match request {
            Ok(request) => request,
            Err(_) => return ProbeResult::unreachable(url),
        };

        match self.client.execute(request).await {
            Ok(mut response) => {
                let final_url = if self.config.report_redirects {
                    Some(response.url().to_string())
                } else {
                    None
                };

                // Drain the body so the socket is released promptly.
                while let Ok(Some(_)) = response.chunk().await {}

                ProbeResult {
                    url: url.to_string(),
                    reachable: true,
                    final_url,
                }
            }
            Err(err) => {
                tracing::debug!(url, error = %err, "probe failed");
                ProbeResult::unreachable(url)
            }
        }
    }

    /// Probe many URLs concurrently, yielding results as they complete.
    ///
    /// Completion order is not arrival order. Concurrency is bounded by the
    /// configured worker count. This is the embedding-friendly alternative
    /// to [`ProbePipeline::run`](crate::ProbePipeline::run) for callers that
    /// already hold their candidate list in memory.
    pub fn check_urls_stream(
        &self,
        urls: Vec<String>,
    ) -> Pin<Box<dyn Stream<Item = ProbeResult> + Send + '_>> {
        let concurrency = self.config.concurrency.max(1);
        let results = stream::iter(urls)
            .map(move |url| async move { self.check_url(&url).await })
            .buffer_unordered(concurrency);
        Box::pin(results)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }
}

impl Default for HttpChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn build_client(config: &ProbeConfig) -> reqwest::Result<reqwest::Client> {
    let redirect_policy = if config.follow_redirects {
        reqwest::redirect::Policy::limited(10)
    } else {
        // Stop at the first hop; the 3xx itself is the successful response.
        reqwest::redirect::Policy::none()
    };

    reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .redirect(redirect_policy)
        // Self-signed and expired certificates are the normal case on the
        // ports being probed; certificate validity is not what is tested.
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(0)
        .pool_idle_timeout(Duration::from_secs(1))
        .tcp_keepalive(Duration::from_secs(1))
        .build()
}
