//! Job-service contract
//!
//! The monitor only needs five operations from the remote job service.
//! They sit behind a trait so the monitor can be driven by the HTTP client
//! in production and by scripted fakes in tests.

use async_trait::async_trait;
use runwatch_client::{ClientError, DatabricksClient};
use runwatch_core::domain::job::JobId;
use runwatch_core::domain::run::{LifecycleState, RunHandle, RunId, RunRecord};
use thiserror::Error;

/// Failure reported by the job service
///
/// Carries the service's message verbatim so callers can react to specific
/// failures (e.g. a repair refused because the job's tasks changed).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ControlError {
    pub message: String,
    pub status: Option<u16>,
}

impl ControlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether the service's message contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }
}

impl From<ClientError> for ControlError {
    fn from(err: ClientError) -> Self {
        let status = err.status();
        Self {
            message: err.to_string(),
            status,
        }
    }
}

pub type ControlResult<T> = std::result::Result<T, ControlError>;

/// Operations consumed from the remote job service
#[async_trait]
pub trait JobControl: Send + Sync {
    /// Resolves a job name to every job id carrying it
    async fn resolve_job_ids(&self, job_name: &str) -> ControlResult<Vec<JobId>>;

    /// Lists all runs of a job
    async fn list_runs(&self, job_id: JobId) -> ControlResult<Vec<RunRecord>>;

    /// Starts a new run of a job
    async fn start_run(&self, job_id: JobId) -> ControlResult<RunHandle>;

    /// Repairs a run, optionally re-running every failed task
    async fn repair_run(&self, run_id: RunId, rerun_all_failed_tasks: bool) -> ControlResult<()>;

    /// Fetches the current lifecycle state of a run
    async fn get_run_state(&self, run_id: RunId) -> ControlResult<LifecycleState>;
}

#[async_trait]
impl JobControl for DatabricksClient {
    async fn resolve_job_ids(&self, job_name: &str) -> ControlResult<Vec<JobId>> {
        Ok(DatabricksClient::resolve_job_ids(self, job_name).await?)
    }

    async fn list_runs(&self, job_id: JobId) -> ControlResult<Vec<RunRecord>> {
        Ok(DatabricksClient::list_runs(self, job_id).await?)
    }

    async fn start_run(&self, job_id: JobId) -> ControlResult<RunHandle> {
        Ok(DatabricksClient::start_run(self, job_id).await?)
    }

    async fn repair_run(&self, run_id: RunId, rerun_all_failed_tasks: bool) -> ControlResult<()> {
        DatabricksClient::repair_run(self, run_id, rerun_all_failed_tasks).await?;
        Ok(())
    }

    async fn get_run_state(&self, run_id: RunId) -> ControlResult<LifecycleState> {
        Ok(DatabricksClient::get_run_state(self, run_id).await?)
    }
}
