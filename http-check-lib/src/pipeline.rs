//! The producer/worker dispatch pipeline.
//!
//! One run wires together a single producer (reading domains, expanding
//! candidates), a fixed pool of workers sharing a bounded work channel, and
//! a single collector that forwards results to the caller. The channel is
//! the backpressure point: the producer blocks once workers fall behind, so
//! in-flight memory stays at roughly one domain's expansion plus the
//! channel capacity, regardless of input size.
//!
//! Termination is structural. The producer drops the sender when input is
//! exhausted; workers observe the closed, drained channel and exit; the
//! result channel closes when the last worker drops its sender; the run
//! returns only after every task handle has been awaited.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, Mutex};

use crate::checker::HttpChecker;
use crate::error::HttpCheckError;
use crate::generate::candidate_urls;
use crate::types::{ProbeConfig, ProbeResult, RunStats};
use crate::Result;

/// Bounded-concurrency probe pipeline over a line-oriented domain source.
pub struct ProbePipeline {
    config: ProbeConfig,
}

impl ProbePipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run the pipeline to completion over `input`.
    ///
    /// Lines are trimmed and lower-cased; blank lines are skipped. Every
    /// candidate of one domain is enqueued before the next line is read.
    /// `emit` is invoked once per candidate, from a single task, as results
    /// arrive. Ordering across workers is not meaningful, but under
    /// concurrency 1 results follow enqueue order.
    ///
    /// An input read error stops feeding but never aborts work already
    /// enqueued; it is returned in [`RunStats::input_error`] after the
    /// drain completes. `Err` is reserved for pipeline faults (a worker or
    /// producer task that panicked).
    pub async fn run<R, F>(&self, input: R, mut emit: F) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        F: FnMut(ProbeResult),
    {
        let concurrency = self.config.concurrency.max(1);
        let checker = Arc::new(HttpChecker::with_config(self.config.clone()));

        let (work_tx, work_rx) = mpsc::channel::<String>(concurrency);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<ProbeResult>(concurrency);

        let mut workers = Vec::with_capacity(concurrency);
        for worker_id in 0..concurrency {
            let work_rx = Arc::clone(&work_rx);
            let result_tx = result_tx.clone();
            let checker = Arc::clone(&checker);

            workers.push(tokio::spawn(async move {
                loop {
                    // Hold the lock only for the dequeue itself, so the
                    // next worker can take a URL while this request runs.
                    let url = {
                        let mut rx = work_rx.lock().await;
                        rx.recv().await
                    };

                    let url = match url {
                        Some(url) => url,
                        None => break, // channel closed and drained
                    };

                    let result = checker.check_url(&url).await;
                    if result_tx.send(result).await.is_err() {
                        break;
                    }
                }
                tracing::debug!(worker_id, "worker exiting");
            }));
        }

        // Workers hold their own clones; dropping ours lets the result
        // channel close once the last worker exits.
        drop(result_tx);

        let skip_default = self.config.skip_default;
        let probe_specs = self.config.probe_specs.clone();
        let custom_catalogs = self.config.custom_catalogs.clone();

        let producer = tokio::spawn(async move {
            let mut domains: u64 = 0;
            let mut candidates: u64 = 0;
            let mut input_error: Option<String> = None;
            let mut lines = input.lines();

            'feed: loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let domain = line.trim().to_lowercase();
                        if domain.is_empty() {
                            continue;
                        }
                        domains += 1;

                        for url in
                            candidate_urls(&domain, skip_default, &probe_specs, custom_catalogs.as_ref())
                        {
                            match work_tx.send(url).await {
                                Ok(()) => candidates += 1,
                                // Every worker is gone; nothing can consume.
                                Err(_) => break 'feed,
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        // Stop feeding but let enqueued work finish; the
                        // error is surfaced after the drain.
                        input_error = Some(err.to_string());
                        break;
                    }
                }
            }

            // work_tx drops here, closing the channel.
            (domains, candidates, input_error)
        });

        // Single collection point: stats and emission stay serialized, so
        // each emitted result is handled as one unit.
        let mut stats = RunStats::default();
        while let Some(result) = result_rx.recv().await {
            if result.reachable {
                stats.reachable += 1;
            } else {
                stats.unreachable += 1;
            }
            emit(result);
        }

        // Join barrier: the run is complete only once every worker exited.
        for worker in workers {
            worker
                .await
                .map_err(|e| HttpCheckError::internal(format!("worker task failed: {}", e)))?;
        }

        let (domains, candidates, input_error) = producer
            .await
            .map_err(|e| HttpCheckError::internal(format!("producer task failed: {}", e)))?;
        stats.domains = domains;
        stats.candidates = candidates;
        stats.input_error = input_error;

        tracing::info!(
            domains = stats.domains,
            candidates = stats.candidates,
            reachable = stats.reachable,
            unreachable = stats.unreachable,
            "probe run complete"
        );

        Ok(stats)
    }
}

impl Default for ProbePipeline {
    fn default() -> Self {
        Self::new()
    }
}
