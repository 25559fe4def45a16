//! studia CLI entry point.
//!
//! Starts a lesson-generation job for a subject and streams its progress
//! until it completes, fails, or times out. Logging goes to stderr so the
//! final outcome on stdout stays machine-readable.
//!
//! Usage: `studia <subject-id> [survey-json]`

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use studia_client::{ApiClient, ApiConfig, CatalogClient, GenerationRequest, JobOutcome, JobPoller, PollConfig};
use studia_core::{AppConfig, MemoryCache};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(subject_id) = args.next() else {
        bail!("usage: studia <subject-id> [survey-json]");
    };
    let survey = match args.next() {
        Some(raw) => serde_json::from_str(&raw).context("survey must be valid JSON")?,
        None => serde_json::Value::Null,
    };

    let config = AppConfig::load().context("failed to load configuration")?;
    let api = ApiClient::new(ApiConfig::from(&config))?;
    let cache = MemoryCache::new(config.default_ttl());
    let catalog = CatalogClient::new(api.clone(), cache);

    let subjects = catalog.subjects().await?;
    if !subjects.iter().any(|s| s.id == subject_id) {
        bail!("unknown subject: {subject_id}");
    }

    let poller = JobPoller::with_config(
        api,
        PollConfig { interval: config.poll_interval(), max_polls: config.max_polls },
    );
    let request = GenerationRequest::new(&subject_id).with_survey(survey);

    tracing::info!(%subject_id, "starting lesson generation");

    let outcome = poller
        .start_and_poll(&request, |update| {
            tracing::info!(
                job_id = %update.job_id,
                polls = update.polls,
                status = ?update.status,
                progress = ?update.progress,
                "generation in progress"
            );
        })
        .await?;

    match outcome {
        JobOutcome::Completed { progress, polls } => {
            catalog.invalidate_lessons(&subject_id);
            let lessons = catalog.lessons(&subject_id).await?;
            tracing::info!(polls, "generation completed");
            println!(
                "{}",
                serde_json::json!({
                    "result": "completed",
                    "progress": progress,
                    "lessons": lessons.len(),
                })
            );
            Ok(())
        }
        JobOutcome::Failed { message, polls } => {
            tracing::error!(polls, "generation failed");
            bail!("generation failed: {message}");
        }
        JobOutcome::TimedOut { polls } => {
            tracing::error!(polls, "generation timed out");
            bail!("generation did not finish within {polls} status polls");
        }
    }
}
