//! Retry policy with exponential backoff for NCBI requests
//!
//! Every network call goes through [`with_retry_if`]. The general E-utilities path
//! uses [`RetryConfig::default`] (two retries), the optional open-access lookup uses
//! [`RetryConfig::open_access`] (one retry). Both share the same backoff schedule.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Errors that know whether repeating the operation can succeed
pub trait RetryableError {
    /// Whether the failure is transient
    fn is_retryable(&self) -> bool;

    /// Short human readable classification, used in logs
    fn retry_reason(&self) -> &str;
}

/// Backoff settings for a retried operation
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Factor applied to the delay for each subsequent retry
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_multiplier,
        }
    }

    /// Policy for the best-effort open-access lookup: a single retry
    pub fn open_access() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Fail on the first error
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay slept before each retry, in order
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let initial = self.initial_delay;
        let multiplier = self.backoff_multiplier;
        (0..self.max_retries).map(move |n| initial.mul_f64(multiplier.powi(n as i32)))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(1000),
            backoff_multiplier: 2.0,
        }
    }
}

/// Run `operation`, retrying failures classified as transient by [`RetryableError`]
pub async fn with_retry<T, E, F, Fut>(operation: F, config: &RetryConfig, label: &str) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    with_retry_if(operation, config, label, |err: &E| {
        let retryable = err.is_retryable();
        if !retryable {
            debug!(reason = err.retry_reason(), "{label}: permanent failure");
        }
        retryable
    })
    .await
}

/// Run `operation`, retrying while `should_retry` accepts the error
///
/// The error from the last attempt is returned unchanged once retries are exhausted
/// or the predicate rejects it.
pub async fn with_retry_if<T, E, F, Fut, P>(
    mut operation: F,
    config: &RetryConfig,
    label: &str,
    mut should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: FnMut(&E) -> bool,
{
    let attempts = AtomicU32::new(0);
    let max_attempts = config.max_attempts();

    let action = || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(attempt, max_attempts, "{label}: attempt");
        operation()
    };

    let condition = |err: &E| {
        let attempt = attempts.load(Ordering::Relaxed);
        let retry = should_retry(err);
        if retry && attempt < max_attempts {
            warn!(attempt, max_attempts, error = %err, "{label}: transient failure, retrying");
        }
        retry
    };

    let result = RetryIf::start(config.delays(), action, condition).await;

    if let Err(err) = &result {
        let attempt = attempts.load(Ordering::Relaxed);
        if attempt > 1 {
            warn!(attempts = attempt, error = %err, "{label}: giving up");
        }
    }

    result
}
