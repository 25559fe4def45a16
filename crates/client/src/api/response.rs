//! API response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-side state of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status ends the polling loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Response from starting a generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    /// Opaque identifier issued by the server, unique per generation request.
    pub job_id: String,

    /// Initial status, when the server reports one at start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

/// Response from a job status poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,

    /// Partial-progress payload, passed through to observers unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Value>,

    /// Failure reason, present when status is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A subject users can pick lessons for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A generated lesson within a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-user progress summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatus {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_subject_id: Option<String>,
    #[serde(default)]
    pub lessons_completed: u32,
}

/// Error body shape the server uses for non-success responses.
///
/// All fields are optional; servers are inconsistent about which they send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl ErrorBody {
    /// Best available human-readable message, falling back to the status.
    pub fn message_or_status(&self, status: u16) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| format!("request failed with status {status}"))
    }
}
