//! Job-related API endpoints

use crate::DatabricksClient;
use crate::error::Result;
use runwatch_core::domain::job::JobId;
use runwatch_core::domain::run::RunHandle;
use runwatch_core::dto::job::{BaseJob, ListJobsResponse, RunNowRequest};
use runwatch_core::dto::run::RunNowResponse;
use tracing::debug;

/// Page size for `jobs/list` (API maximum is 100)
const JOBS_PAGE_LIMIT: &str = "100";

impl DatabricksClient {
    // =============================================================================
    // Job Lookup
    // =============================================================================

    /// List all jobs whose name matches `name`
    ///
    /// The workspace matches names exactly, ignoring case. All pages are
    /// fetched.
    pub async fn list_jobs_by_name(&self, name: &str) -> Result<Vec<BaseJob>> {
        let url = self.url("list");
        let mut jobs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("name", name.to_string()), ("limit", JOBS_PAGE_LIMIT.to_string())];
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }

            let response = self.client.get(&url).query(&query).send().await?;
            let page: ListJobsResponse = self.handle_response(response).await?;

            jobs.extend(page.jobs);

            match page.next_page_token {
                Some(token) if page.has_more && !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Job name '{}' matched {} job(s)", name, jobs.len());
        Ok(jobs)
    }

    /// Resolve a job name to the ids of all jobs carrying it
    ///
    /// # Returns
    /// Zero, one or many ids; the caller decides what an ambiguous name means.
    pub async fn resolve_job_ids(&self, name: &str) -> Result<Vec<JobId>> {
        let jobs = self.list_jobs_by_name(name).await?;
        Ok(jobs.into_iter().map(|job| job.job_id).collect())
    }

    /// Get a job's details
    ///
    /// # Arguments
    /// * `job_id` - The job to fetch
    ///
    /// # Returns
    /// The job with its settings, including the task list
    pub async fn get_job(&self, job_id: JobId) -> Result<BaseJob> {
        let url = self.url("get");
        let response = self
            .client
            .get(&url)
            .query(&[("job_id", job_id.to_string())])
            .send()
            .await?;

        let job: BaseJob = self.handle_response(response).await?;
        debug!(
            "Job {} is '{}'",
            job_id,
            job.name().unwrap_or_default()
        );
        Ok(job)
    }

    // =============================================================================
    // Job Execution
    // =============================================================================

    /// Trigger a new run of a job
    ///
    /// # Arguments
    /// * `job_id` - The job to run
    ///
    /// # Returns
    /// A handle carrying the id of the new run
    pub async fn start_run(&self, job_id: JobId) -> Result<RunHandle> {
        let url = self.url("run-now");
        let response = self
            .client
            .post(&url)
            .json(&RunNowRequest { job_id })
            .send()
            .await?;

        let resp: RunNowResponse = self.handle_response(response).await?;
        Ok(resp.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_server::FakeWorkspace;
    use runwatch_core::domain::job::JobId;
    use runwatch_core::domain::run::RunId;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_job_ids_follows_pages() {
        let server = FakeWorkspace::start().await;
        server.push_get(
            "/api/2.1/jobs/list",
            200,
            json!({
                "jobs": [{"job_id": 1, "settings": {"name": "nightly"}}],
                "has_more": true,
                "next_page_token": "p2"
            }),
        );
        server.push_get(
            "/api/2.1/jobs/list",
            200,
            json!({
                "jobs": [{"job_id": 2, "settings": {"name": "nightly"}}],
                "has_more": false
            }),
        );

        let ids = server.client().resolve_job_ids("nightly").await.unwrap();
        assert_eq!(ids, vec![JobId(1), JobId(2)]);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].query.contains("name=nightly"));
        assert!(!requests[0].query.contains("page_token"));
        assert!(requests[1].query.contains("page_token=p2"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_name_is_empty() {
        let server = FakeWorkspace::start().await;
        server.push_get("/api/2.1/jobs/list", 200, json!({"has_more": false}));

        let ids = server.client().resolve_job_ids("missing").await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_get_job_returns_settings() {
        let server = FakeWorkspace::start().await;
        server.push_get(
            "/api/2.1/jobs/get",
            200,
            json!({
                "job_id": 11,
                "creator_user_name": "a@example.com",
                "settings": {
                    "name": "nightly",
                    "tasks": [{"task_key": "ingest"}, {"task_key": "publish"}]
                }
            }),
        );

        let job = server.client().get_job(JobId(11)).await.unwrap();
        assert_eq!(job.job_id, JobId(11));
        assert_eq!(job.name(), Some("nightly"));
        assert_eq!(job.task_keys(), vec!["ingest", "publish"]);
        assert!(server.requests()[0].query.contains("job_id=11"));
    }

    #[tokio::test]
    async fn test_get_unknown_job_is_not_found() {
        let server = FakeWorkspace::start().await;
        server.push_get(
            "/api/2.1/jobs/get",
            400,
            json!({"error_code": "RESOURCE_DOES_NOT_EXIST", "message": "Job 99 does not exist."}),
        );

        let err = server.client().get_job(JobId(99)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_start_run_posts_job_id() {
        let server = FakeWorkspace::start().await;
        server.push_post(
            "/api/2.1/jobs/run-now",
            200,
            json!({"run_id": 455, "number_in_job": 455}),
        );

        let handle = server.client().start_run(JobId(11)).await.unwrap();
        assert_eq!(handle.run_id, RunId(455));
        assert_eq!(handle.number_in_job, Some(455));

        let requests = server.requests();
        assert_eq!(requests[0].body, json!({"job_id": 11}));
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer dapi-test"));
    }

    #[tokio::test]
    async fn test_api_error_body_is_decoded() {
        let server = FakeWorkspace::start().await;
        server.push_post(
            "/api/2.1/jobs/run-now",
            400,
            json!({"error_code": "INVALID_PARAMETER_VALUE", "message": "Job 11 does not exist."}),
        );

        let err = server.client().start_run(JobId(11)).await.unwrap_err();
        match err {
            crate::ClientError::ApiError {
                status,
                error_code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(error_code.as_deref(), Some("INVALID_PARAMETER_VALUE"));
                assert_eq!(message, "Job 11 does not exist.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
