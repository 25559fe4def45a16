//! Client core for studia.
//!
//! This crate provides the backend API client, the read-through cached
//! fetcher for slow-changing reads, and the bounded polling loop that drives
//! lesson-generation jobs to completion.

pub mod api;
pub mod cached;
pub mod poller;

pub use api::{
    ApiClient, ApiConfig, ApiError, ErrorKind, GenerationApi, GenerationRequest, JobStatus, Lesson, StartResponse,
    StatusResponse, Subject, UserStatus,
};
pub use cached::{CachedFetcher, CatalogClient};
pub use poller::{JobOutcome, JobPoller, JobUpdate, PollConfig};
