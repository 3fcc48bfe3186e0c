//! # Convergence Polling
//!
//! Waits for an eventually-consistent system to reach an expected state by
//! re-evaluating a predicate until it holds, the time budget runs out, or the
//! caller cancels.
//!
//! The predicate returns `Ok(())` once satisfied, or an error describing why
//! not yet. The poller sleeps `interval` (clamped to the remaining budget)
//! after each unsatisfied attempt and never after a satisfied one. At least
//! one attempt is always made.
//!
//! # Example
//!
//! ```rust,no_run
//! use gateway_operator::convergence::retry_operation;
//! use std::time::Duration;
//!
//! # async fn run() -> gateway_operator::Result<()> {
//! retry_operation(Duration::from_secs(60), Duration::from_secs(5), || async {
//!     let resp = reqwest::get("http://localhost:7000/httpbin/get")
//!         .await
//!         .map_err(|e| e.to_string())?;
//!     if resp.status() == 200 { Ok(()) } else { Err("API is not created yet".to_string()) }
//! })
//! .await
//! # }
//! ```

pub mod clock;

pub use clock::{Clock, ManualClock, TokioClock};

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ConvergenceConfig;
use crate::errors::{GatewayError, Result};
use crate::observability::MetricsRecorder;

const NO_ATTEMPT_YET: &str = "no attempt completed";

/// Bounded "wait until predicate holds" primitive
#[derive(Debug, Clone)]
pub struct ConvergencePoller<C = TokioClock> {
    timeout: Duration,
    interval: Duration,
    clock: C,
    metrics: MetricsRecorder,
}

impl ConvergencePoller<TokioClock> {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self::with_clock(timeout, interval, TokioClock)
    }

    pub fn from_config(config: &ConvergenceConfig) -> Self {
        Self::new(config.timeout(), config.interval())
    }
}

impl<C: Clock> ConvergencePoller<C> {
    pub fn with_clock(timeout: Duration, interval: Duration, clock: C) -> Self {
        Self { timeout, interval, clock, metrics: MetricsRecorder::new() }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Poll until `predicate` succeeds; returns the number of attempts made
    pub async fn wait_until<F, Fut, E>(&self, label: &str, predicate: F) -> Result<u32>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Display,
    {
        self.wait_until_cancellable(label, &CancellationToken::new(), predicate).await
    }

    /// Like [`wait_until`](Self::wait_until), aborting with `Cancelled` as soon
    /// as `cancel` fires, including while a predicate call is in flight.
    pub async fn wait_until_cancellable<F, Fut, E>(
        &self,
        label: &str,
        cancel: &CancellationToken,
        mut predicate: F,
    ) -> Result<u32>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Display,
    {
        let start = self.clock.now();
        let mut attempts = 0u32;
        let mut last_reason = NO_ATTEMPT_YET.to_string();

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(label, last_reason));
            }

            attempts += 1;
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(label, last_reason)),
                outcome = predicate() => outcome,
            };

            match outcome {
                Ok(()) => {
                    self.metrics.record_convergence_attempt(true);
                    debug!(label, attempts, "Condition satisfied");
                    return Ok(attempts);
                }
                Err(reason) => {
                    self.metrics.record_convergence_attempt(false);
                    last_reason = reason.to_string();
                    debug!(label, attempts, reason = %last_reason, "Condition not met yet");
                }
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= self.timeout {
                warn!(
                    label,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    reason = %last_reason,
                    "Condition not met before timeout"
                );
                return Err(GatewayError::ConvergenceTimeout {
                    label: label.to_string(),
                    elapsed_ms: elapsed.as_millis() as u64,
                    attempts,
                    last_reason,
                });
            }

            let sleep_time = self.interval.min(self.timeout - elapsed);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(label, last_reason)),
                _ = self.clock.sleep(sleep_time) => {}
            }
        }
    }
}

fn cancelled(label: &str, last_reason: String) -> GatewayError {
    GatewayError::Cancelled { label: label.to_string(), last_reason }
}

/// Poll `predicate` every `interval` until it succeeds or `timeout` elapses
pub async fn retry_operation<F, Fut, E>(timeout: Duration, interval: Duration, predicate: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    E: Display,
{
    ConvergencePoller::new(timeout, interval).wait_until("retry_operation", predicate).await.map(|_| ())
}
