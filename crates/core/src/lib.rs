//! Core types and shared functionality for studia.
//!
//! This crate provides:
//! - In-memory TTL cache for remote read results
//! - Layered application configuration

pub mod cache;
pub mod config;

pub use cache::{CacheStats, MemoryCache};
pub use config::AppConfig;
