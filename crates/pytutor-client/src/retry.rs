// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry with a fixed backoff schedule.
//!
//! [`RetryScheduler`] knows nothing about HTTP: it drives an attempt closure,
//! bounds each attempt with a timeout, and acts on the [`AttemptOutcome`]
//! the closure reports.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Reason recorded when an attempt exceeds its time bound.
pub const TIMEOUT_REASON: &str = "timeout";

/// Reason reported if a run ends without any attempt having executed.
pub const UNKNOWN_FAILURE: &str = "unknown failure";

/// Fixed, ordered waits preceding attempts 2..N.
///
/// The first attempt never waits, so a schedule of `k` delays allows
/// `k + 1` attempts in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule {
    delays: Vec<Duration>,
}

impl Default for BackoffSchedule {
    /// One immediate attempt, then waits of 1s, 2s and 4s.
    fn default() -> Self {
        Self::from_secs(&[1, 2, 4])
    }
}

impl BackoffSchedule {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    pub fn from_secs(secs: &[u64]) -> Self {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    /// A schedule with a single attempt and no retries.
    pub fn no_retry() -> Self {
        Self::new(Vec::new())
    }

    /// Total number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        u32::try_from(self.delays.len()).map_or(u32::MAX, |n| n.saturating_add(1))
    }

    /// `(attempt_index, delay_before_attempt)` pairs, 1-based, starting with `(1, 0)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Duration)> + '_ {
        std::iter::once(Duration::ZERO)
            .chain(self.delays.iter().copied())
            .zip(1u32..)
            .map(|(delay, index)| (index, delay))
    }
}

/// What one attempt produced, as judged by the caller's classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome<T, E> {
    /// Stop and return the value.
    Success(T),
    /// Record the reason and continue with the next scheduled attempt.
    Retryable(String),
    /// Stop and propagate the error.
    Terminal(E),
}

/// Per-attempt bookkeeping, logged and then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub attempt_index: u32,
    pub delay_before_attempt: Duration,
    pub outcome: AttemptResult,
}

/// Outcome tag of an [`AttemptRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    Retryable,
    Terminal,
}

/// A successful run: the value plus how many attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<T> {
    pub value: T,
    pub attempts: u32,
}

/// Why a run ended without success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryFailure<E> {
    /// An attempt reported a terminal outcome; no further attempts were made.
    Terminal { attempts: u32, error: E },
    /// Every scheduled attempt reported a retryable outcome.
    Exhausted { attempts: u32, last_error: String },
}

/// Drives repeated attempts of one operation.
///
/// Holds no per-run state, so one scheduler may serve concurrent runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryScheduler {
    schedule: BackoffSchedule,
    attempt_timeout: Duration,
}

impl RetryScheduler {
    pub fn new(schedule: BackoffSchedule, attempt_timeout: Duration) -> Self {
        Self {
            schedule,
            attempt_timeout,
        }
    }

    pub fn schedule(&self) -> &BackoffSchedule {
        &self.schedule
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Runs `attempt` until success, a terminal outcome, or schedule exhaustion.
    ///
    /// `attempt` receives the 1-based attempt index. An attempt that outlives
    /// the timeout is dropped and counted as retryable with reason `"timeout"`.
    /// Backoff waits are `tokio` sleeps and hold no locks.
    pub async fn run<T, E, F, Fut>(&self, mut attempt: F) -> Result<Completed<T>, RetryFailure<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = AttemptOutcome<T, E>>,
    {
        let max_attempts = self.schedule.max_attempts();
        let mut attempts = 0;
        let mut last_error = None;

        for (attempt_index, delay) in self.schedule.iter() {
            if !delay.is_zero() {
                debug!(
                    attempt = attempt_index,
                    delay_ms = delay.as_millis() as u64,
                    "waiting before retry"
                );
                tokio::time::sleep(delay).await;
            }
            attempts = attempt_index;

            let outcome = tokio::time::timeout(self.attempt_timeout, attempt(attempt_index))
                .await
                .unwrap_or_else(|_| AttemptOutcome::Retryable(TIMEOUT_REASON.to_string()));

            let record = AttemptRecord {
                attempt_index,
                delay_before_attempt: delay,
                outcome: match &outcome {
                    AttemptOutcome::Success(_) => AttemptResult::Success,
                    AttemptOutcome::Retryable(_) => AttemptResult::Retryable,
                    AttemptOutcome::Terminal(_) => AttemptResult::Terminal,
                },
            };
            debug!(?record, "attempt finished");

            match outcome {
                AttemptOutcome::Success(value) => return Ok(Completed { value, attempts }),
                AttemptOutcome::Terminal(error) => {
                    return Err(RetryFailure::Terminal { attempts, error });
                }
                AttemptOutcome::Retryable(reason) => {
                    warn!(
                        attempt = attempt_index,
                        max_attempts,
                        retry = attempt_index < max_attempts,
                        reason = %reason,
                        "transient failure"
                    );
                    last_error = Some(reason);
                }
            }
        }

        Err(RetryFailure::Exhausted {
            attempts,
            last_error: last_error.unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
        })
    }
}
