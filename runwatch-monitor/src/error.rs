//! Error types for the monitor

use runwatch_core::domain::job::JobId;
use runwatch_core::domain::run::RunId;
use thiserror::Error;

use crate::control::ControlError;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that stop a monitoring invocation
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The job name resolved to no job
    #[error("No job named '{name}'")]
    JobNotFound { name: String },

    /// The job name resolved to more than one job
    #[error("Job name '{name}' is ambiguous, it matches jobs {}", join_ids(.ids))]
    AmbiguousJobName { name: String, ids: Vec<JobId> },

    /// A repair was refused for a reason other than changed task topology
    #[error("Repair of run {run_id} failed: {source}")]
    RepairFailed {
        run_id: RunId,
        #[source]
        source: ControlError,
    },

    /// Fetching a run's state kept failing past the retry budget
    #[error("Fetching state of run {run_id} failed {attempts} time(s) in a row: {source}")]
    TransientFetch {
        run_id: RunId,
        attempts: u32,
        #[source]
        source: ControlError,
    },

    /// Any other job-service failure
    #[error("Job service call failed: {0}")]
    Control(#[from] ControlError),
}

fn join_ids(ids: &[JobId]) -> String {
    ids.iter()
        .map(JobId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
