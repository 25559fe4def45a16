//! Bounded polling loop for lesson-generation jobs.
//!
//! Drives the start-then-poll protocol: issue the start request, then read
//! job status at a fixed cadence until the job completes, fails, or the poll
//! budget runs out. The returned future is the single terminal signal; each
//! non-terminal status is delivered to the `on_update` observer in poll
//! order.
//!
//! Any transport failure during a status read is terminal. The loop fails
//! fast rather than retrying transient blips; the budget on poll count keeps
//! an abandoned or stuck job from polling forever.

use serde_json::Value;
use std::time::Duration;

use crate::api::{ApiError, GenerationApi, GenerationRequest, JobStatus};

/// Default interval between status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default poll budget (300 polls at 2s is a 10 minute ceiling).
const DEFAULT_MAX_POLLS: u32 = 300;

/// Polling cadence and budget.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between status polls.
    pub interval: Duration,
    /// Maximum status polls per job before giving up.
    pub max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL, max_polls: DEFAULT_MAX_POLLS }
    }
}

/// Non-terminal status observation, delivered to `on_update`.
#[derive(Debug, Clone)]
pub struct JobUpdate {
    pub job_id: String,
    pub status: JobStatus,
    /// Partial-progress payload from the server, unmodified.
    pub progress: Option<Value>,
    /// Number of status polls issued so far for this job.
    pub polls: u32,
}

/// Terminal result of a polling run.
///
/// Exactly one of these is produced per job; once produced, no further
/// status requests are issued even if the remote job later finishes.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// The job finished; `progress` is the final payload, if any.
    Completed { progress: Option<Value>, polls: u32 },
    /// The server reported the job failed.
    Failed { message: String, polls: u32 },
    /// The poll budget ran out before the job reached a terminal status.
    TimedOut { polls: u32 },
}

impl JobOutcome {
    /// Number of status polls issued before the terminal signal.
    pub fn polls(&self) -> u32 {
        match self {
            JobOutcome::Completed { polls, .. }
            | JobOutcome::Failed { polls, .. }
            | JobOutcome::TimedOut { polls } => *polls,
        }
    }

    /// Timeout outcomes rendered as a normalized error, for callers that
    /// funnel every non-success into the `ApiError` taxonomy.
    pub fn timeout_error(&self) -> Option<ApiError> {
        match self {
            JobOutcome::TimedOut { polls } => {
                Some(ApiError::Timeout(format!("generation did not finish within {polls} status polls")))
            }
            _ => None,
        }
    }
}

/// Drives generation jobs to a terminal state under a bounded budget.
///
/// Stateless between runs; one poller can drive any number of jobs, and
/// multiple jobs may be polled concurrently.
#[derive(Debug, Clone)]
pub struct JobPoller<A> {
    api: A,
    config: PollConfig,
}

impl<A: GenerationApi> JobPoller<A> {
    /// Create a poller with the default cadence and budget.
    pub fn new(api: A) -> Self {
        Self::with_config(api, PollConfig::default())
    }

    pub fn with_config(api: A, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Start a generation job and poll it to a terminal state.
    ///
    /// On start failure the error is returned immediately and no status
    /// request is ever issued. Otherwise the loop polls at the configured
    /// interval: `pending`/`in_progress` go to `on_update`, `completed` and
    /// `failed` resolve the future, and exceeding the poll budget resolves
    /// it as `TimedOut`. A transport failure on any status read resolves the
    /// future with that error.
    pub async fn start_and_poll(
        &self, request: &GenerationRequest, mut on_update: impl FnMut(JobUpdate) + Send,
    ) -> Result<JobOutcome, ApiError> {
        let started = self.api.start_generation(request).await?;
        let job_id = started.job_id;

        tracing::debug!(%job_id, subject_id = %request.subject_id, "generation job started");

        // Some servers report a terminal status at start time.
        match started.status {
            Some(JobStatus::Completed) => {
                tracing::debug!(%job_id, "job already completed at start");
                return Ok(JobOutcome::Completed { progress: None, polls: 0 });
            }
            Some(JobStatus::Failed) => {
                tracing::warn!(%job_id, "job failed at start");
                return Ok(JobOutcome::Failed { message: "generation failed".to_string(), polls: 0 });
            }
            _ => {}
        }

        let mut polls: u32 = 0;
        loop {
            if polls >= self.config.max_polls {
                tracing::warn!(%job_id, polls, "poll budget exhausted, giving up on job");
                return Ok(JobOutcome::TimedOut { polls });
            }

            tokio::time::sleep(self.config.interval).await;

            let response = self.api.job_status(&job_id).await.inspect_err(|e| {
                tracing::warn!(%job_id, error = %e, "status read failed, stopping poll loop");
            })?;
            polls += 1;

            match response.status {
                JobStatus::Completed => {
                    tracing::debug!(%job_id, polls, "generation job completed");
                    return Ok(JobOutcome::Completed { progress: response.progress, polls });
                }
                JobStatus::Failed => {
                    let message =
                        response.error_message.unwrap_or_else(|| "generation failed".to_string());
                    tracing::warn!(%job_id, polls, %message, "generation job failed");
                    return Ok(JobOutcome::Failed { message, polls });
                }
                status @ (JobStatus::Pending | JobStatus::InProgress) => {
                    tracing::debug!(%job_id, polls, ?status, "generation job in flight");
                    on_update(JobUpdate {
                        job_id: job_id.clone(),
                        status,
                        progress: response.progress,
                        polls,
                    });
                }
            }
        }
    }
}
