//! Retry logic for outbound HTTP requests
//!
//! Every upstream call goes through [`execute_with_retry`]. Only transient
//! failures (5xx, 408, connection errors and timeouts) are retried; the
//! default policy waits a fixed 600 ms between at most three retries.

use std::time::Duration;
use backoff::backoff::{Backoff, Constant};
use backoff::ExponentialBackoff;
use crate::http::error::HttpError;

/// Delay growth between retries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryStrategy {
    /// Same delay before every retry
    Fixed,
    /// Delay multiplied after every retry, capped at `max_delay`
    Exponential { multiplier: f64, jitter: bool },
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// How the delay evolves between retries
    pub strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(600),
            max_delay: Duration::from_secs(10),
            strategy: RetryStrategy::Fixed,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom settings
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Set the delay before the first retry
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Switch to exponential backoff
    pub fn exponential(mut self, multiplier: f64, jitter: bool) -> Self {
        self.strategy = RetryStrategy::Exponential { multiplier, jitter };
        self
    }

    /// Create the backoff schedule for one request
    fn create_backoff(&self) -> RetryBackoff {
        match self.strategy {
            RetryStrategy::Fixed => RetryBackoff::Fixed(Constant::new(self.delay.min(self.max_delay))),
            RetryStrategy::Exponential { multiplier, jitter } => {
                let mut backoff = ExponentialBackoff {
                    initial_interval: self.delay,
                    max_interval: self.max_delay,
                    multiplier,
                    max_elapsed_time: None, // We handle max retries separately
                    ..Default::default()
                };

                if !jitter {
                    backoff.randomization_factor = 0.0;
                }
                backoff.reset();

                RetryBackoff::Exponential(backoff)
            }
        }
    }
}

#[derive(Debug)]
enum RetryBackoff {
    Fixed(Constant),
    Exponential(ExponentialBackoff),
}

impl RetryBackoff {
    fn next_delay(&mut self) -> Option<Duration> {
        match self {
            RetryBackoff::Fixed(b) => b.next_backoff(),
            RetryBackoff::Exponential(b) => b.next_backoff(),
        }
    }
}

/// Decision on whether to retry a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the specified delay
    Retry { delay: Duration },
    /// Do not retry the request
    NoRetry,
}

/// Retry handler for HTTP requests
#[derive(Debug)]
pub struct RetryHandler {
    policy: RetryPolicy,
    retries: u32,
    backoff: RetryBackoff,
}

impl RetryHandler {
    /// Create a new retry handler with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        let backoff = policy.create_backoff();
        Self {
            policy,
            retries: 0,
            backoff,
        }
    }

    /// Determine if a request should be retried based on the error
    pub fn should_retry(&mut self, error: &HttpError) -> RetryDecision {
        if self.retries >= self.policy.max_retries || !error.should_retry() {
            return RetryDecision::NoRetry;
        }

        self.retries += 1;

        let delay = self
            .backoff
            .next_delay()
            .unwrap_or(self.policy.max_delay)
            .min(self.policy.max_delay);

        RetryDecision::Retry { delay }
    }

    /// Number of retries made so far
    pub fn retries(&self) -> u32 {
        self.retries
    }
}

/// Execute a request with retry logic
pub async fn execute_with_retry<F, Fut, T>(
    mut request_fn: F,
    policy: RetryPolicy,
) -> Result<T, HttpError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, HttpError>>,
{
    let mut handler = RetryHandler::new(policy);

    loop {
        match request_fn().await {
            Ok(response) => return Ok(response),
            Err(error) => match handler.should_retry(&error) {
                RetryDecision::Retry { delay } => {
                    tracing::warn!(
                        retry = handler.retries(),
                        delay_ms = delay.as_millis() as u64,
                        status = ?error.status_code,
                        "Request failed, retrying: {}",
                        error.message
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::NoRetry => {
                    if handler.retries() > 0 {
                        tracing::error!(
                            retries = handler.retries(),
                            status = ?error.status_code,
                            "Request failed after retries: {}",
                            error.message
                        );
                    }
                    return Err(error);
                }
            },
        }
    }
}
