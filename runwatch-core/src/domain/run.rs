//! Run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::job::JobId;

/// Numeric identifier of one run (execution attempt) of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub i64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RunId {
    fn from(id: i64) -> Self {
        RunId(id)
    }
}

/// Lifecycle state of a run as reported by the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Queued,
    Pending,
    Running,
    Terminating,
    Terminated,
    Skipped,
    InternalError,
    Blocked,
    WaitingForRetry,
    #[serde(other)]
    Unknown,
}

impl LifecycleState {
    /// The run is still making progress and should be polled again
    ///
    /// `PENDING` counts as active: a run that was just started or repaired
    /// usually reports it before `RUNNING`.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            LifecycleState::Queued
                | LifecycleState::Pending
                | LifecycleState::Running
                | LifecycleState::Terminating
                | LifecycleState::Blocked
                | LifecycleState::WaitingForRetry
        )
    }

    /// States that end a bounded completion wait
    pub fn is_completion_terminal(self) -> bool {
        matches!(
            self,
            LifecycleState::Terminated | LifecycleState::Skipped | LifecycleState::InternalError
        )
    }

    /// Wire name of the state (e.g. `INTERNAL_ERROR`)
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Queued => "QUEUED",
            LifecycleState::Pending => "PENDING",
            LifecycleState::Running => "RUNNING",
            LifecycleState::Terminating => "TERMINATING",
            LifecycleState::Terminated => "TERMINATED",
            LifecycleState::Skipped => "SKIPPED",
            LifecycleState::InternalError => "INTERNAL_ERROR",
            LifecycleState::Blocked => "BLOCKED",
            LifecycleState::WaitingForRetry => "WAITING_FOR_RETRY",
            LifecycleState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a run once its lifecycle has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultState {
    Success,
    SuccessWithFailures,
    Failed,
    Timedout,
    Canceled,
    MaximumConcurrentRunsReached,
    Excluded,
    UpstreamFailed,
    UpstreamCanceled,
    Disabled,
    #[serde(other)]
    Unknown,
}

impl ResultState {
    pub fn is_success(self) -> bool {
        matches!(self, ResultState::Success)
    }
}

/// Snapshot of one execution attempt
///
/// Produced fresh on every poll. `original_attempt_run_id` is the first
/// attempt of a retry chain and equals `run_id` for first attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub job_id: JobId,
    pub run_id: RunId,
    pub original_attempt_run_id: RunId,
    pub lifecycle_state: LifecycleState,
    pub result_state: Option<ResultState>,
    pub state_message: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub creator_user_name: Option<String>,
    pub run_page_url: Option<String>,
}

impl RunRecord {
    /// Whether the run ended and reported success
    pub fn succeeded(&self) -> bool {
        self.lifecycle_state == LifecycleState::Terminated
            && self.result_state.is_some_and(ResultState::is_success)
    }

    /// Whether this record is a retry of an earlier attempt
    pub fn is_retry(&self) -> bool {
        self.original_attempt_run_id != self.run_id
    }
}

/// Handle returned when a new run is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub run_id: RunId,
    pub number_in_job: Option<i64>,
}

/// Selects the most recent run
///
/// Runs are ordered by `start_time` descending; equal start times are
/// broken by the highest `run_id`. Runs without a start time sort oldest.
pub fn latest_run(runs: &[RunRecord]) -> Option<&RunRecord> {
    runs.iter().max_by_key(|r| (r.start_time, r.run_id))
}
