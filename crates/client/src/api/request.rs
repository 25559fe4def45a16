//! Generation request types and validation.

use serde::Serialize;
use serde_json::Value;

use crate::api::ApiError;

/// Request to start a lesson-generation job.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerationRequest {
    /// Subject the lessons are generated for (required).
    pub subject_id: String,

    /// Survey answers shaping the generated content. Free-form; the server
    /// owns the schema.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub survey: Value,
}

impl GenerationRequest {
    /// Create a request for the given subject with no survey answers.
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self { subject_id: subject_id.into(), survey: Value::Null }
    }

    /// Attach survey answers.
    pub fn with_survey(mut self, survey: Value) -> Self {
        self.survey = survey;
        self
    }

    /// Validate the request before sending.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.subject_id.trim().is_empty() {
            return Err(ApiError::Unknown("invalid request: subject_id cannot be empty".to_string()));
        }
        Ok(())
    }
}
