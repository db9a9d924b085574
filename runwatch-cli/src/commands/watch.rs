//! Watch command handlers
//!
//! `monitor` and `wait`: the two long-running commands. Both block until
//! the watched run ends; interrupt the process to stop them early.

use anyhow::{Context, Result, bail};
use colored::*;
use runwatch_client::DatabricksClient;
use runwatch_core::domain::run::{LifecycleState, RunId};
use runwatch_monitor::{Completion, JobRunMonitor, TerminalOutcome};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::output::{colorize_state, print_run_details};

fn build_monitor(config: &Config, interval: Option<u64>) -> Result<JobRunMonitor<DatabricksClient>> {
    let mut monitor_config = config.monitor.clone();
    if let Some(secs) = interval {
        monitor_config = monitor_config.with_poll_interval(Duration::from_secs(secs));
    }
    monitor_config.validate()?;

    let client = DatabricksClient::new(&config.workspace).context("Failed to create client")?;
    Ok(JobRunMonitor::new(Arc::new(client), monitor_config))
}

/// Monitor a job by name until its latest run ends
pub async fn monitor_job(config: &Config, job: &str, user: &str, interval: Option<u64>) -> Result<()> {
    let monitor = build_monitor(config, interval)?;

    println!(
        "{}",
        format!(
            "Monitoring '{}' (polling every {:?})...",
            job,
            monitor.config().poll_interval
        )
        .bold()
    );

    let outcome = monitor
        .monitor(user, job)
        .await
        .with_context(|| format!("Monitoring of job '{}' failed", job))?;

    match outcome {
        TerminalOutcome::Finished(run) => {
            print_run_details(&run);
            if !run.succeeded() {
                bail!(
                    "Run {} ended as {}{}",
                    run.run_id,
                    run.lifecycle_state,
                    run.result_state
                        .map(|r| format!(" ({:?})", r))
                        .unwrap_or_default()
                );
            }
            println!("{}", "✓ Run succeeded".green());
        }
        TerminalOutcome::NoRuns { job_id } => {
            println!(
                "{}",
                format!("Job {} has no runs left to watch.", job_id).yellow()
            );
        }
    }

    Ok(())
}

/// Wait a bounded time for a known run to finish
pub async fn wait_for_run(
    config: &Config,
    run_id: i64,
    timeout: u64,
    retries: u32,
    interval: Option<u64>,
) -> Result<()> {
    let monitor = build_monitor(config, interval)?;
    let run_id = RunId(run_id);

    let completion = monitor
        .await_completion(run_id, Duration::from_secs(timeout), retries)
        .await
        .with_context(|| format!("Waiting for run {} failed", run_id))?;

    match completion {
        Completion::Finished(state) => {
            println!("Run {} finished: {}", run_id, colorize_state(state));
            if state == LifecycleState::InternalError {
                bail!("Run {} ended with an internal error", run_id);
            }
        }
        Completion::TimedOut {
            elapsed,
            last_state,
        } => {
            let last = last_state
                .map(|s| colorize_state(s).to_string())
                .unwrap_or_else(|| "unknown".dimmed().to_string());
            println!(
                "{}",
                format!(
                    "⚠ Run {} did not finish within {}s (last state: {})",
                    run_id,
                    elapsed.as_secs(),
                    last
                )
                .yellow()
            );
        }
    }

    Ok(())
}
