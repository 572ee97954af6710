//! Bounded retry with exponential backoff and jitter.
//!
//! Only transient failures ([`ErrorKind::RateLimited`] and
//! [`ErrorKind::ServerError`]) are retried. After failed attempt `i`
//! (0-indexed) the caller sleeps `base * 2^i` plus a uniform jitter in
//! `[0, 1)` seconds.

use std::future::Future;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind, Result};

/// Tracing target for retry decisions.
pub const TRACING_TARGET: &str = "drivestamp_core::retry";

/// Default maximum number of attempts per call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff base: one second.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RetryConfig {
    /// Maximum number of attempts per remote call, the first one included.
    #[cfg_attr(
        feature = "config",
        arg(long = "max-attempts", env = "DRIVESTAMP_MAX_ATTEMPTS", default_value = "5")
    )]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff base in milliseconds, doubled after every failed attempt.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "backoff-base-ms",
            env = "DRIVESTAMP_BACKOFF_BASE_MS",
            default_value = "1000"
        )
    )]
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Disable the random jitter added to every backoff.
    #[cfg_attr(feature = "config", arg(long = "no-jitter", env = "DRIVESTAMP_NO_JITTER"))]
    #[serde(default)]
    pub no_jitter: bool,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BACKOFF_BASE_MS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            no_jitter: false,
        }
    }
}

/// Value produced by a retried operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    /// Value returned by the successful attempt.
    pub value: T,
    /// Number of attempts used, including the successful one.
    pub attempts: u32,
}

impl RetryConfig {
    /// Set the maximum number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the backoff base in milliseconds.
    #[must_use]
    pub fn with_backoff_base_ms(mut self, backoff_base_ms: u64) -> Self {
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Enable or disable jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.no_jitter = !jitter;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::configuration().with_message("max attempts must be at least 1"));
        }
        Ok(())
    }

    /// Deterministic part of the backoff after failed attempt `attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }

    /// Backoff after failed attempt `attempt` for a given jitter sample.
    ///
    /// The sample is clamped to `[0, 1)` and added as seconds.
    pub fn delay_with_jitter(&self, attempt: u32, sample: f64) -> Duration {
        let nanos = (sample.clamp(0.0, 1.0) * NANOS_PER_SEC) as u64;
        let jitter = Duration::from_nanos(nanos.min(999_999_999));
        self.base_delay(attempt).saturating_add(jitter)
    }

    /// Backoff after failed attempt `attempt`, with a fresh jitter sample.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let sample = if self.no_jitter {
            0.0
        } else {
            rand::random::<f64>()
        };
        self.delay_with_jitter(attempt, sample)
    }

    /// Runs `operation` until it succeeds, fails permanently, or runs out of attempts.
    ///
    /// Non-retryable errors are returned unchanged. When every attempt fails with a
    /// transient error the result is an [`ErrorKind::RetryExhausted`] error whose
    /// source is the last failure.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<Attempted<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let error = match operation().await {
                Ok(value) => {
                    return Ok(Attempted {
                        value,
                        attempts: attempt + 1,
                    });
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                tracing::error!(
                    target: TRACING_TARGET,
                    operation = operation_name,
                    attempt = attempt + 1,
                    error = %error,
                    "Non-retryable error"
                );
                return Err(error);
            }

            if attempt + 1 >= max_attempts {
                tracing::error!(
                    target: TRACING_TARGET,
                    operation = operation_name,
                    attempts = max_attempts,
                    error = %error,
                    "Retries exhausted"
                );
                return Err(Error::new(ErrorKind::RetryExhausted)
                    .with_message(format!(
                        "{operation_name} failed after {max_attempts} attempts"
                    ))
                    .with_source(error));
            }

            let backoff = self.backoff_duration(attempt);
            tracing::warn!(
                target: TRACING_TARGET,
                operation = operation_name,
                status = ?error.status(),
                attempt = attempt + 1,
                max_attempts,
                sleep_ms = backoff.as_millis(),
                "Transient error, retrying"
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.backoff_base_ms, 1000);
        assert!(!config.no_jitter);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_config_validation() {
        let config = RetryConfig::default().with_max_attempts(0);
        let error = config.validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_base_delay_doubles() {
        let config = RetryConfig::default();
        assert_eq!(config.base_delay(0), Duration::from_secs(1));
        assert_eq!(config.base_delay(1), Duration::from_secs(2));
        assert_eq!(config.base_delay(2), Duration::from_secs(4));
        assert_eq!(config.base_delay(4), Duration::from_secs(16));
    }

    #[test]
    fn test_base_delay_saturates() {
        let config = RetryConfig::default();
        assert_eq!(config.base_delay(200), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_delay_with_jitter_stays_in_window() {
        let config = RetryConfig::default();
        for attempt in 0..5 {
            let low = config.base_delay(attempt);
            let high = low + Duration::from_secs(1);
            for sample in [0.0, 0.25, 0.5, 0.999_999_999_9, 1.0, 7.0, -1.0] {
                let delay = config.delay_with_jitter(attempt, sample);
                assert!(delay >= low, "{delay:?} below {low:?}");
                assert!(delay < high, "{delay:?} not below {high:?}");
            }
        }
    }

    #[test]
    fn test_backoff_duration_stays_in_window() {
        let config = RetryConfig::default();
        for attempt in 0..5 {
            let low = config.base_delay(attempt);
            for _ in 0..100 {
                let delay = config.backoff_duration(attempt);
                assert!(delay >= low);
                assert!(delay < low + Duration::from_secs(1));
            }
        }
    }

    #[test]
    fn test_backoff_without_jitter_is_exact() {
        let config = RetryConfig::default().with_jitter(false);
        assert_eq!(config.backoff_duration(3), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_succeeds_first_try() {
        let config = RetryConfig::default();
        let calls = Cell::new(0);

        let result = config
            .run("test_op", || {
                calls.set(calls.get() + 1);
                async { Ok(42) }
            })
            .await
            .unwrap();

        assert_eq!(result.value, 42);
        assert_eq!(result.attempts, 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_retries_transient_errors() {
        let config = RetryConfig::default();
        let calls = Cell::new(0);
        let started = tokio::time::Instant::now();

        let result = config
            .run("test_op", || {
                let call = calls.get();
                calls.set(call + 1);
                async move {
                    if call < 2 {
                        Err(Error::from_status(503))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result.value, "done");
        assert_eq!(result.attempts, 3);

        // Two sleeps: [1, 2) then [2, 3) seconds.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_non_retryable_error() {
        let config = RetryConfig::default();
        let calls = Cell::new(0);
        let started = tokio::time::Instant::now();

        let error = config
            .run("test_op", || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(Error::from_status(404)) }
            })
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(calls.get(), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exhausts_attempts() {
        let config = RetryConfig::default().with_max_attempts(3).with_jitter(false);
        let calls = Cell::new(0);
        let started = tokio::time::Instant::now();

        let error = config
            .run("test_op", || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(Error::from_status(429)) }
            })
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::RetryExhausted);
        assert_eq!(calls.get(), 3);
        assert!(std::error::Error::source(&error).is_some());

        // Sleeps after the first two failures only: 1s + 2s.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));
    }
}
