//! Run-related API endpoints

use crate::DatabricksClient;
use crate::error::Result;
use runwatch_core::domain::job::JobId;
use runwatch_core::domain::run::{LifecycleState, RunId, RunRecord};
use runwatch_core::dto::run::{BaseRun, ListRunsResponse, RepairRunRequest, RepairRunResponse};
use tracing::{debug, info};

/// Page size for `runs/list` (API maximum is 25)
const RUNS_PAGE_LIMIT: &str = "25";

impl DatabricksClient {
    // =============================================================================
    // Run Listing
    // =============================================================================

    /// Fetch every page of `runs/list` for the given filters
    async fn list_runs_paged(&self, filters: &[(&str, String)]) -> Result<Vec<RunRecord>> {
        let url = self.url("runs/list");
        let mut runs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = filters.to_vec();
            query.push(("limit", RUNS_PAGE_LIMIT.to_string()));
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }

            let response = self.client.get(&url).query(&query).send().await?;
            let page: ListRunsResponse = self.handle_response(response).await?;

            runs.extend(page.runs.into_iter().map(RunRecord::from));

            match page.next_page_token {
                Some(token) if page.has_more && !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(runs)
    }

    /// List all runs of a job
    ///
    /// # Arguments
    /// * `job_id` - The job whose runs to list
    ///
    /// # Returns
    /// Every run the workspace still keeps for the job, in API order
    pub async fn list_runs(&self, job_id: JobId) -> Result<Vec<RunRecord>> {
        let runs = self
            .list_runs_paged(&[("job_id", job_id.to_string())])
            .await?;

        debug!("Job {} has {} run(s)", job_id, runs.len());
        Ok(runs)
    }

    /// List active runs across the workspace
    ///
    /// # Arguments
    /// * `user_name` - Only keep runs created by this user, if given
    pub async fn list_active_runs(&self, user_name: Option<&str>) -> Result<Vec<RunRecord>> {
        let runs = self
            .list_runs_paged(&[("active_only", "true".to_string())])
            .await?;

        Ok(runs
            .into_iter()
            .filter(|run| match user_name {
                Some(user) => run.creator_user_name.as_deref() == Some(user),
                None => true,
            })
            .collect())
    }

    /// List the runs of a job that are currently `RUNNING`
    pub async fn list_running_runs(&self, job_id: JobId) -> Result<Vec<RunRecord>> {
        let runs = self.list_runs(job_id).await?;
        Ok(runs
            .into_iter()
            .filter(|run| run.lifecycle_state == LifecycleState::Running)
            .collect())
    }

    // =============================================================================
    // Run Status
    // =============================================================================

    /// Get a single run
    pub async fn get_run(&self, run_id: RunId) -> Result<RunRecord> {
        let url = self.url("runs/get");
        let response = self
            .client
            .get(&url)
            .query(&[("run_id", run_id.to_string())])
            .send()
            .await?;

        let run: BaseRun = self.handle_response(response).await?;
        Ok(run.into())
    }

    /// Get the current lifecycle state of a run
    pub async fn get_run_state(&self, run_id: RunId) -> Result<LifecycleState> {
        Ok(self.get_run(run_id).await?.lifecycle_state)
    }

    // =============================================================================
    // Run Repair
    // =============================================================================

    /// Repair a run
    ///
    /// # Arguments
    /// * `run_id` - The run to repair
    /// * `rerun_all_failed_tasks` - Re-run every failed task of the run
    ///
    /// # Returns
    /// The repair id, when the workspace reports one
    pub async fn repair_run(&self, run_id: RunId, rerun_all_failed_tasks: bool) -> Result<Option<i64>> {
        let url = self.url("runs/repair");
        let response = self
            .client
            .post(&url)
            .json(&RepairRunRequest {
                run_id,
                rerun_all_failed_tasks,
            })
            .send()
            .await?;

        let resp: RepairRunResponse = self.handle_response(response).await?;
        info!("Repair of run {} accepted (repair id {:?})", run_id, resp.repair_id);
        Ok(resp.repair_id)
    }
}
