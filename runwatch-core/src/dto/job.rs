//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;

/// Response of `GET /api/2.1/jobs/list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListJobsResponse {
    #[serde(default)]
    pub jobs: Vec<BaseJob>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Job as returned by `jobs/list` and `jobs/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseJob {
    pub job_id: JobId,
    #[serde(default)]
    pub creator_user_name: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(default)]
    pub settings: Option<JobSettings>,
}

impl BaseJob {
    pub fn name(&self) -> Option<&str> {
        self.settings.as_ref().and_then(|s| s.name.as_deref())
    }

    /// Task keys in definition order; empty when settings were omitted
    pub fn task_keys(&self) -> Vec<&str> {
        self.settings
            .as_ref()
            .map(|s| s.tasks.iter().map(|t| t.task_key.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub max_concurrent_runs: Option<i64>,
    #[serde(default)]
    pub timeout_seconds: Option<i64>,
    /// Only present in `jobs/get` responses
    #[serde(default)]
    pub tasks: Vec<JobTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTask {
    pub task_key: String,
}

/// Request body of `POST /api/2.1/jobs/run-now`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowRequest {
    pub job_id: JobId,
}
