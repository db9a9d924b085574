//! Bounded wait on a single run
//!
//! Unlike [`JobRunMonitor::monitor`], this watches a run id the caller
//! already knows, never starts or repairs anything, and gives up after a
//! fixed amount of time.

use runwatch_core::domain::run::{LifecycleState, RunId};
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::control::JobControl;
use crate::error::{MonitorError, Result};
use crate::monitor::JobRunMonitor;

/// Result of a bounded completion wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The run reached `TERMINATED`, `SKIPPED` or `INTERNAL_ERROR`
    Finished(LifecycleState),
    /// The time budget ran out first
    TimedOut {
        elapsed: Duration,
        last_state: Option<LifecycleState>,
    },
}

impl<C: JobControl> JobRunMonitor<C> {
    /// Waits for a run to reach a terminal state
    ///
    /// Polls the run's state every `poll_interval`. A failed fetch is retried
    /// after `retry_backoff`; a successful fetch resets the failure count.
    ///
    /// # Arguments
    /// * `run_id` - The run to watch
    /// * `max_timeout` - Time budget; the wait never reports a timeout before it elapsed
    /// * `max_retries` - Consecutive fetch failures tolerated before giving up
    ///
    /// # Errors
    /// [`MonitorError::TransientFetch`] carrying the last fetch error once
    /// more than `max_retries` fetches failed in a row.
    pub async fn await_completion(
        &self,
        run_id: RunId,
        max_timeout: Duration,
        max_retries: u32,
    ) -> Result<Completion> {
        info!(
            "Waiting up to {:?} for run {} to finish",
            max_timeout, run_id
        );

        let started = Instant::now();
        let mut failures = 0u32;
        let mut last_state = None;

        loop {
            let pause = match self.client.get_run_state(run_id).await {
                Ok(state) => {
                    failures = 0;
                    last_state = Some(state);

                    if state.is_completion_terminal() {
                        info!("Run {} finished as {}", run_id, state);
                        return Ok(Completion::Finished(state));
                    }

                    debug!("Run {} is {}", run_id, state);
                    self.config.poll_interval
                }
                Err(e) => {
                    failures += 1;

                    if failures > max_retries {
                        return Err(MonitorError::TransientFetch {
                            run_id,
                            attempts: failures,
                            source: e,
                        });
                    }

                    warn!(
                        "Failed to fetch state of run {} (attempt {}/{}): {}",
                        run_id,
                        failures,
                        max_retries.saturating_add(1),
                        e
                    );
                    self.config.retry_backoff
                }
            };

            let elapsed = started.elapsed();
            if elapsed >= max_timeout {
                warn!(
                    "Run {} still not finished after {:?} (last state {:?})",
                    run_id, elapsed, last_state
                );
                return Ok(Completion::TimedOut {
                    elapsed,
                    last_state,
                });
            }

            time::sleep(pause.min(max_timeout - elapsed)).await;
        }
    }
}
