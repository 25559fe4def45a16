//! Backend API client.
//!
//! Thin HTTP client over the learning backend's REST surface:
//!
//! - **Reads**: subject catalog, per-subject lesson lists, per-user status.
//!   All idempotent GETs, safe to retry and to cache for a TTL window.
//! - **Generation**: start a lesson-generation job, poll its status.
//!
//! Every failure path is normalized into [`ApiError`] before it leaves this
//! module; non-success statuses have their error body parsed into the
//! `server_error` shape.

pub mod error;
pub mod request;
pub mod response;

pub use error::{ApiError, ErrorKind};
pub use request::GenerationRequest;
pub use response::{ErrorBody, JobStatus, Lesson, StartResponse, StatusResponse, Subject, UserStatus};

use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use studia_core::AppConfig;

/// Default base URL for the backend API.
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "studia/0.1";

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend API.
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// The start-then-poll surface the job poller consumes.
///
/// Split out as a trait so the polling state machine can be driven by
/// scripted status sequences in tests.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Start a generation job, returning its identifier.
    async fn start_generation(&self, req: &GenerationRequest) -> Result<StartResponse, ApiError>;

    /// Read the current status of a job.
    async fn job_status(&self, job_id: &str) -> Result<StatusResponse, ApiError>;
}

/// HTTP client for the learning backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new API client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Url::parse(&config.base_url)
            .map_err(|e| ApiError::Unknown(format!("invalid base URL {}: {}", config.base_url, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ApiError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;

        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)?;

        Self::decode(response).await
    }

    /// Normalize a response: non-success statuses become `server_error` with
    /// the parsed error body, success bodies decode into `T`.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from)?;

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "server returned error response");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: body.message_or_status(status.as_u16()),
                details: body.details,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Unknown(format!("failed to decode response: {e}")))
    }

    /// List all subjects.
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.get_json("subjects").await
    }

    /// List the lessons generated for a subject.
    pub async fn subject_lessons(&self, subject_id: &str) -> Result<Vec<Lesson>, ApiError> {
        self.get_json(&format!("subjects/{subject_id}/lessons")).await
    }

    /// Read a user's progress summary.
    pub async fn user_status(&self, user_id: &str) -> Result<UserStatus, ApiError> {
        self.get_json(&format!("users/{user_id}/status")).await
    }
}

#[async_trait]
impl GenerationApi for ApiClient {
    async fn start_generation(&self, req: &GenerationRequest) -> Result<StartResponse, ApiError> {
        req.validate()?;
        self.post_json("lessons/generate", req).await
    }

    async fn job_status(&self, job_id: &str) -> Result<StatusResponse, ApiError> {
        self.get_json(&format!("lessons/generate/{job_id}/status")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "studia/0.1");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { api_base_url: "https://api.example.com".into(), timeout_ms: 5_000, ..Default::default() };
        let config = ApiConfig::from(&app);
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn test_client_new_rejects_bad_base_url() {
        let config = ApiConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(ApiClient::new(config), Err(ApiError::Unknown(_))));
    }

    #[test]
    fn test_endpoint_joining() {
        let client = ApiClient::new(ApiConfig { base_url: "http://localhost:8000/api/".into(), ..Default::default() })
            .unwrap();
        assert_eq!(client.endpoint("/subjects"), "http://localhost:8000/api/subjects");
        assert_eq!(client.endpoint("lessons/generate"), "http://localhost:8000/api/lessons/generate");
    }
}
