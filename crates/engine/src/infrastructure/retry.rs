//! Capped exponential backoff for remote calls.
//!
//! Only faults classified as transient are retried; everything else is
//! returned on the first attempt. The async variant waits on the tokio timer,
//! so dropping its future also cancels a pending delay.

use std::future::Future;
use std::time::Duration;

use super::ports::{ApiError, FaultKind};

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn fault_kind(&self) -> FaultKind;

    fn is_retryable(&self) -> bool {
        self.fault_kind() == FaultKind::Transient
    }
}

impl Retryable for ApiError {
    fn fault_kind(&self) -> FaultKind {
        ApiError::fault_kind(self)
    }
}

/// Rejected retry settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetryPolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("backoff multiplier must be a finite number >= 1.0, got {0}")]
    InvalidMultiplier(f64),
}

/// Immutable retry settings.
///
/// The delay after failed attempt `n` (1-based) is
/// `min(initial_delay * multiplier^(n-1), max_delay)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_multiplier: f64,
        max_delay: Duration,
    ) -> Result<Self, RetryPolicyError> {
        if max_attempts == 0 {
            return Err(RetryPolicyError::ZeroAttempts);
        }
        if !backoff_multiplier.is_finite() || backoff_multiplier < 1.0 {
            return Err(RetryPolicyError::InvalidMultiplier(backoff_multiplier));
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            backoff_multiplier,
            max_delay,
        })
    }

    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A single attempt, never retried.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Backoff to wait after failed attempt `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let scaled = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
    }

    fn should_retry<E: Retryable>(&self, error: &E, attempt: u32) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }

    /// Run `operation` until it succeeds, fails permanently, or runs out of
    /// attempts.
    ///
    /// Blocks the calling thread for every backoff delay. Use [`Self::execute`]
    /// from async code.
    pub fn execute_blocking<T, E, F>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => {
                    self.log_recovery(operation, attempt);
                    return Ok(value);
                }
                Err(e) if self.should_retry(&e, attempt) => {
                    let delay = self.delay_for_attempt(attempt);
                    self.log_retry(operation, attempt, delay, &e);
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => {
                    self.log_give_up(operation, attempt, &e);
                    return Err(e);
                }
            }
        }
    }

    /// Async counterpart of [`Self::execute_blocking`] with identical
    /// classification and backoff.
    pub async fn execute<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    self.log_recovery(operation, attempt);
                    return Ok(value);
                }
                Err(e) if self.should_retry(&e, attempt) => {
                    let delay = self.delay_for_attempt(attempt);
                    self.log_retry(operation, attempt, delay, &e);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.log_give_up(operation, attempt, &e);
                    return Err(e);
                }
            }
        }
    }

    fn log_recovery(&self, operation: &str, attempt: u32) {
        if attempt > 1 {
            tracing::info!(attempt, operation, "Remote call succeeded after retry");
        }
    }

    fn log_retry(
        &self,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &dyn std::fmt::Display,
    ) {
        tracing::warn!(
            attempt,
            max_attempts = self.max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            operation,
            "Remote call failed, retrying..."
        );
    }

    fn log_give_up<E>(&self, operation: &str, attempt: u32, error: &E)
    where
        E: Retryable + std::fmt::Display,
    {
        if error.is_retryable() {
            tracing::error!(
                attempts = attempt,
                error = %error,
                operation,
                "Remote call failed after all retry attempts"
            );
        } else {
            tracing::debug!(
                attempt,
                error = %error,
                operation,
                "Remote call failed with non-retryable error"
            );
        }
    }
}

/// Step-by-step construction of a [`RetryPolicy`], starting from the defaults.
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        let defaults = RetryPolicy::default();
        Self {
            max_attempts: defaults.max_attempts,
            initial_delay: defaults.initial_delay,
            backoff_multiplier: defaults.backoff_multiplier,
            max_delay: defaults.max_delay,
        }
    }
}

impl RetryPolicyBuilder {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn build(self) -> Result<RetryPolicy, RetryPolicyError> {
        RetryPolicy::new(
            self.max_attempts,
            self.initial_delay,
            self.backoff_multiplier,
            self.max_delay,
        )
    }
}
