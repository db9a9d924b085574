//! Job run monitor
//!
//! Makes sure a named job has a run that is progressing, then watches that
//! run to its end.
//!
//! One invocation goes through three phases:
//! 1. Resolve the job name to exactly one job id.
//! 2. Look at the latest run: start a run when there is none, repair it when
//!    it died with `INTERNAL_ERROR`, otherwise leave it alone.
//! 3. Poll the latest run on a fixed interval until it leaves the active
//!    states, repairing again whenever it lands on `INTERNAL_ERROR`.

use runwatch_core::domain::job::{JobId, JobIdentity};
use runwatch_core::domain::run::{LifecycleState, RunHandle, RunId, RunRecord, latest_run};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::control::JobControl;
use crate::error::{MonitorError, Result};

/// How a monitoring invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// The latest run left the active states; carries its last snapshot
    Finished(RunRecord),
    /// The job no longer has any runs to watch
    NoRuns { job_id: JobId },
}

impl TerminalOutcome {
    /// Final lifecycle state, if a run was observed
    pub fn state(&self) -> Option<LifecycleState> {
        match self {
            TerminalOutcome::Finished(run) => Some(run.lifecycle_state),
            TerminalOutcome::NoRuns { .. } => None,
        }
    }
}

/// Remote mutation issued by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CorrectiveAction {
    Started(RunHandle),
    Repaired(RunId),
}

impl fmt::Display for CorrectiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectiveAction::Started(handle) => write!(f, "started run {}", handle.run_id),
            CorrectiveAction::Repaired(run_id) => write!(f, "repaired run {}", run_id),
        }
    }
}

/// State of one `monitor` invocation, dropped when it returns
#[derive(Debug)]
struct MonitorSession {
    user_name: String,
    job_id: JobId,
    poll_interval: Duration,
    last_seen: Option<RunRecord>,
    actions: Vec<CorrectiveAction>,
}

impl MonitorSession {
    fn new(user_name: &str, job_id: JobId, poll_interval: Duration) -> Self {
        Self {
            user_name: user_name.to_string(),
            job_id,
            poll_interval,
            last_seen: None,
            actions: Vec::new(),
        }
    }

    fn observe(&mut self, run: &RunRecord) {
        let changed = self
            .last_seen
            .as_ref()
            .is_none_or(|prev| prev.run_id != run.run_id || prev.lifecycle_state != run.lifecycle_state);

        if changed {
            info!(
                "Job {} run {} is {}",
                self.job_id, run.run_id, run.lifecycle_state
            );
        }

        self.last_seen = Some(run.clone());
    }
}

/// Watches job runs through a [`JobControl`] collaborator
pub struct JobRunMonitor<C> {
    pub(crate) client: Arc<C>,
    pub(crate) config: MonitorConfig,
}

impl<C: JobControl> JobRunMonitor<C> {
    /// Creates a new monitor
    pub fn new(client: Arc<C>, config: MonitorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Ensures a run of `job_name` progresses and waits for it to end
    ///
    /// Issues at most one corrective action (start or repair) before the
    /// wait loop, and one more each time the watched run lands on
    /// `INTERNAL_ERROR`. There is no overall timeout: this returns only on a
    /// terminal state, when the job has no runs left, or on a fatal error.
    ///
    /// # Errors
    /// - [`MonitorError::JobNotFound`] / [`MonitorError::AmbiguousJobName`]
    ///   when the name does not resolve to exactly one job; nothing is
    ///   mutated in that case
    /// - [`MonitorError::RepairFailed`] when a repair is refused for a reason
    ///   other than changed task topology
    /// - [`MonitorError::Control`] when any other service call fails
    pub async fn monitor(&self, user_name: &str, job_name: &str) -> Result<TerminalOutcome> {
        let job_id = self.resolve(job_name).await?;
        let mut session = MonitorSession::new(user_name, job_id, self.config.poll_interval);

        info!(
            "Monitoring job '{}' ({}) for {} every {:?}",
            job_name, job_id, session.user_name, session.poll_interval
        );

        let runs = self.client.list_runs(job_id).await?;

        match latest_run(&runs) {
            None => {
                info!("Job {} has no runs, starting one", job_id);
                self.start(&mut session).await?;
            }
            Some(run) if run.lifecycle_state == LifecycleState::InternalError => {
                session.observe(run);
                self.repair_or_restart(&mut session, run.run_id).await?;
            }
            Some(run) => session.observe(run),
        }

        if !session.actions.is_empty() {
            // Give the service time to register the new attempt
            time::sleep(session.poll_interval).await;
        }

        let outcome = self.wait(&mut session).await?;

        let actions = session
            .actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        info!(
            "Stopped monitoring job {} in state {:?} after {} corrective action(s) [{}]",
            job_id,
            outcome.state(),
            actions.len(),
            actions.join(", ")
        );

        Ok(outcome)
    }

    /// Resolves a job name to its single job id
    pub async fn resolve(&self, job_name: &str) -> Result<JobId> {
        let identity = JobIdentity::new(job_name, self.client.resolve_job_ids(job_name).await?);

        if let Some(job_id) = identity.single() {
            return Ok(job_id);
        }

        if identity.ids.is_empty() {
            error!("No job named '{}'", job_name);
            Err(MonitorError::JobNotFound { name: identity.name })
        } else {
            error!(
                "Job name '{}' matches {} jobs, refusing to pick one",
                job_name,
                identity.ids.len()
            );
            Err(MonitorError::AmbiguousJobName {
                name: identity.name,
                ids: identity.ids,
            })
        }
    }

    /// Polls the job's latest run until it is no longer active
    async fn wait(&self, session: &mut MonitorSession) -> Result<TerminalOutcome> {
        loop {
            let runs = self.client.list_runs(session.job_id).await?;

            let Some(latest) = latest_run(&runs) else {
                warn!("Job {} no longer has any runs", session.job_id);
                return Ok(TerminalOutcome::NoRuns {
                    job_id: session.job_id,
                });
            };

            session.observe(latest);

            match latest.lifecycle_state {
                state if state.is_active() => {
                    debug!(
                        "Job {} run {} is {}, waiting {:?}",
                        session.job_id, latest.run_id, state, session.poll_interval
                    );
                }
                LifecycleState::InternalError => {
                    self.repair_or_restart(session, latest.run_id).await?;
                }
                _ => return Ok(TerminalOutcome::Finished(latest.clone())),
            }

            time::sleep(session.poll_interval).await;
        }
    }

    /// Repairs a run that hit `INTERNAL_ERROR`
    ///
    /// Falls back to a fresh run when the service refuses the repair because
    /// the job's tasks changed since the run started.
    async fn repair_or_restart(&self, session: &mut MonitorSession, run_id: RunId) -> Result<()> {
        warn!(
            "Job {} run {} hit an internal error, repairing failed tasks",
            session.job_id, run_id
        );

        match self.client.repair_run(run_id, true).await {
            Ok(()) => {
                session.actions.push(CorrectiveAction::Repaired(run_id));
                Ok(())
            }
            Err(e) if e.mentions(&self.config.topology_changed_marker) => {
                warn!(
                    "Run {} cannot be repaired ({}), starting a new run instead",
                    run_id, e
                );
                self.start(session).await
            }
            Err(e) => {
                error!("Repair of run {} failed: {}", run_id, e);
                Err(MonitorError::RepairFailed { run_id, source: e })
            }
        }
    }

    async fn start(&self, session: &mut MonitorSession) -> Result<()> {
        let handle = self.client.start_run(session.job_id).await?;
        info!("Started run {} of job {}", handle.run_id, session.job_id);
        session.actions.push(CorrectiveAction::Started(handle));
        Ok(())
    }
}
