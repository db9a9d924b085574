//! Scripted job service for tests
//!
//! Each operation replays a queue of canned answers. The last answer of a
//! queue is sticky, so a single `RUNNING` snapshot keeps a job running
//! forever. Every call is recorded in order.

use async_trait::async_trait;
use chrono::DateTime;
use runwatch_core::domain::job::JobId;
use runwatch_core::domain::run::{LifecycleState, RunHandle, RunId, RunRecord};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::control::{ControlError, ControlResult, JobControl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve(String),
    ListRuns(JobId),
    Start(JobId),
    Repair(RunId, bool),
    GetState(RunId),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Start(_) | Call::Repair(..))
    }
}

#[derive(Default)]
pub struct ScriptedControl {
    jobs: HashMap<String, Vec<JobId>>,
    runs: Mutex<VecDeque<ControlResult<Vec<RunRecord>>>>,
    repairs: Mutex<VecDeque<ControlResult<()>>>,
    states: Mutex<VecDeque<ControlResult<LifecycleState>>>,
    calls: Mutex<Vec<Call>>,
    next_run_id: Mutex<i64>,
}

impl ScriptedControl {
    pub fn new() -> Self {
        Self {
            next_run_id: Mutex::new(1_000),
            ..Default::default()
        }
    }

    pub fn with_job(mut self, name: &str, ids: &[i64]) -> Self {
        self.jobs
            .insert(name.to_string(), ids.iter().copied().map(JobId).collect());
        self
    }

    /// Queue one `list_runs` answer
    pub fn then_runs(self, runs: Vec<RunRecord>) -> Self {
        self.runs.lock().unwrap().push_back(Ok(runs));
        self
    }

    pub fn then_runs_error(self, message: &str) -> Self {
        self.runs
            .lock()
            .unwrap()
            .push_back(Err(ControlError::new(message)));
        self
    }

    /// Queue one `repair_run` answer; repairs succeed when nothing is queued
    pub fn then_repair_error(self, message: &str) -> Self {
        self.repairs
            .lock()
            .unwrap()
            .push_back(Err(ControlError::new(message).with_status(400)));
        self
    }

    pub fn then_state(self, state: LifecycleState) -> Self {
        self.states.lock().unwrap().push_back(Ok(state));
        self
    }

    pub fn then_state_error(self, message: &str) -> Self {
        self.states
            .lock()
            .unwrap()
            .push_back(Err(ControlError::new(message).with_status(503)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn replay<T: Clone>(queue: &Mutex<VecDeque<ControlResult<T>>>) -> Option<ControlResult<T>> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[async_trait]
impl JobControl for ScriptedControl {
    async fn resolve_job_ids(&self, job_name: &str) -> ControlResult<Vec<JobId>> {
        self.record(Call::Resolve(job_name.to_string()));
        Ok(self.jobs.get(job_name).cloned().unwrap_or_default())
    }

    async fn list_runs(&self, job_id: JobId) -> ControlResult<Vec<RunRecord>> {
        self.record(Call::ListRuns(job_id));
        replay(&self.runs).unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn start_run(&self, job_id: JobId) -> ControlResult<RunHandle> {
        self.record(Call::Start(job_id));
        let mut next = self.next_run_id.lock().unwrap();
        *next += 1;
        Ok(RunHandle {
            run_id: RunId(*next),
            number_in_job: None,
        })
    }

    async fn repair_run(&self, run_id: RunId, rerun_all_failed_tasks: bool) -> ControlResult<()> {
        self.record(Call::Repair(run_id, rerun_all_failed_tasks));
        // Repair answers are consumed, not sticky
        self.repairs.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn get_run_state(&self, run_id: RunId) -> ControlResult<LifecycleState> {
        self.record(Call::GetState(run_id));
        replay(&self.states).unwrap_or_else(|| Ok(LifecycleState::Running))
    }
}

/// Builds a run of job 1 started at `start_ms`
pub fn run(run_id: i64, start_ms: i64, state: LifecycleState) -> RunRecord {
    RunRecord {
        job_id: JobId(1),
        run_id: RunId(run_id),
        original_attempt_run_id: RunId(run_id),
        lifecycle_state: state,
        result_state: None,
        state_message: None,
        start_time: DateTime::from_timestamp_millis(start_ms),
        end_time: None,
        creator_user_name: Some("owner@example.com".to_string()),
        run_page_url: None,
    }
}
