//! HTTP transport shared by all upstream clients
//!
//! This module provides:
//! - A thin client over reqwest with per-attempt timeouts
//! - Error classification and normalization
//! - Retry logic with fixed or exponential backoff

pub mod client;
pub mod error;
pub mod retry;
pub mod timeout;

pub use client::{HttpClient, HttpClientConfig};
pub use error::{ErrorClassification, HttpError};
pub use retry::{execute_with_retry, RetryDecision, RetryPolicy, RetryStrategy};
pub use timeout::TimeoutConfig;

// Re-export commonly used types
pub use reqwest::StatusCode;
