//! Run DTOs

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;
use crate::domain::run::{LifecycleState, ResultState, RunHandle, RunId, RunRecord};

/// Response of `GET /api/2.1/jobs/runs/list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRunsResponse {
    #[serde(default)]
    pub runs: Vec<BaseRun>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Run object as returned by `runs/list` and `runs/get`
///
/// Times are epoch milliseconds; the API reports `0` for times that are
/// not set yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRun {
    pub job_id: JobId,
    pub run_id: RunId,
    #[serde(default)]
    pub original_attempt_run_id: Option<RunId>,
    pub state: RunState,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub creator_user_name: Option<String>,
    #[serde(default)]
    pub run_page_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub life_cycle_state: LifecycleState,
    #[serde(default)]
    pub result_state: Option<ResultState>,
    #[serde(default)]
    pub state_message: Option<String>,
}

impl From<BaseRun> for RunRecord {
    fn from(run: BaseRun) -> Self {
        let millis = |t: Option<i64>| {
            t.filter(|ms| *ms > 0)
                .and_then(DateTime::from_timestamp_millis)
        };

        Self {
            job_id: run.job_id,
            run_id: run.run_id,
            original_attempt_run_id: run.original_attempt_run_id.unwrap_or(run.run_id),
            lifecycle_state: run.state.life_cycle_state,
            result_state: run.state.result_state,
            state_message: run.state.state_message.filter(|m| !m.is_empty()),
            start_time: millis(run.start_time),
            end_time: millis(run.end_time),
            creator_user_name: run.creator_user_name,
            run_page_url: run.run_page_url,
        }
    }
}

/// Response of `POST /api/2.1/jobs/run-now`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowResponse {
    pub run_id: RunId,
    #[serde(default)]
    pub number_in_job: Option<i64>,
}

impl From<RunNowResponse> for RunHandle {
    fn from(resp: RunNowResponse) -> Self {
        Self {
            run_id: resp.run_id,
            number_in_job: resp.number_in_job,
        }
    }
}

/// Request body of `POST /api/2.1/jobs/runs/repair`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairRunRequest {
    pub run_id: RunId,
    pub rerun_all_failed_tasks: bool,
}

/// Response of `POST /api/2.1/jobs/runs/repair`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairRunResponse {
    #[serde(default)]
    pub repair_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_run_into_record() {
        let json = r#"{
            "job_id": 11,
            "run_id": 502,
            "original_attempt_run_id": 500,
            "state": {
                "life_cycle_state": "INTERNAL_ERROR",
                "state_message": "Cluster terminated unexpectedly"
            },
            "start_time": 1700000000000,
            "end_time": 0,
            "creator_user_name": "someone@example.com",
            "run_page_url": "https://example.cloud.databricks.com/#job/11/run/502",
            "number_in_job": 502
        }"#;

        let run: BaseRun = serde_json::from_str(json).unwrap();
        let record = RunRecord::from(run);

        assert_eq!(record.job_id, JobId(11));
        assert_eq!(record.run_id, RunId(502));
        assert_eq!(record.original_attempt_run_id, RunId(500));
        assert!(record.is_retry());
        assert_eq!(record.lifecycle_state, LifecycleState::InternalError);
        assert_eq!(record.start_time.unwrap().timestamp_millis(), 1_700_000_000_000);
        assert!(record.end_time.is_none());
        assert_eq!(
            record.state_message.as_deref(),
            Some("Cluster terminated unexpectedly")
        );
    }

    #[test]
    fn test_missing_original_attempt_defaults_to_run_id() {
        let json = r#"{
            "job_id": 1,
            "run_id": 2,
            "state": {"life_cycle_state": "TERMINATED", "result_state": "SUCCESS"}
        }"#;

        let record = RunRecord::from(serde_json::from_str::<BaseRun>(json).unwrap());
        assert_eq!(record.original_attempt_run_id, RunId(2));
        assert!(!record.is_retry());
        assert!(record.succeeded());
        assert!(record.start_time.is_none());
    }

    #[test]
    fn test_empty_run_list_response() {
        let resp: ListRunsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.runs.is_empty());
        assert!(!resp.has_more);
    }
}
