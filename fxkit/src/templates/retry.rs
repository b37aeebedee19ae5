//! Bounded retries with explicit attempt outcomes
//!
//! Each attempt reports [`Attempt::Success`], [`Attempt::Retryable`] or
//! [`Attempt::Terminal`]; [`run_with_retries`] loops until success, a terminal
//! failure, or the attempt budget runs out.

use std::future::Future;
use std::time::Duration;

use crate::net::{HttpResponse, TransportError};

/// Outcome of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The attempt produced a value
    Success(T),
    /// The attempt failed but another one may succeed
    Retryable(String),
    /// The attempt failed and retrying cannot help
    Terminal(String),
}

/// Outcome of a retried operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    /// An attempt succeeded
    Succeeded(T),
    /// Every attempt failed with a retryable error
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Last failure
        reason: String,
    },
    /// An attempt failed with a terminal error
    Aborted {
        /// Attempts made, including the terminal one
        attempts: u32,
        /// Terminal failure
        reason: String,
    },
}

/// Attempt budget and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts; zero is treated as one
    pub try_limits: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy
    #[must_use]
    pub const fn new(try_limits: u32, delay: Duration) -> Self {
        Self { try_limits, delay }
    }

    const fn max_attempts(&self) -> u32 {
        if self.try_limits == 0 {
            1
        } else {
            self.try_limits
        }
    }
}

/// Run `op` until it succeeds, fails terminally, or the budget is spent
///
/// `op` receives the 1-based attempt number.
pub async fn run_with_retries<T, F, Fut>(policy: RetryPolicy, mut op: F) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let max = policy.max_attempts();
    let mut last = String::new();

    for attempt in 1..=max {
        match op(attempt).await {
            Attempt::Success(value) => return RetryOutcome::Succeeded(value),
            Attempt::Terminal(reason) => {
                return RetryOutcome::Aborted {
                    attempts: attempt,
                    reason,
                }
            }
            Attempt::Retryable(reason) => {
                tracing::warn!(attempt, max, %reason, "attempt failed");
                last = reason;
                if attempt < max && !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    RetryOutcome::Exhausted {
        attempts: max,
        reason: last,
    }
}

/// Classify a GET result: 2xx succeeds, 5xx/429 and transport errors retry,
/// any other status is terminal
#[must_use]
pub fn classify_response(result: Result<HttpResponse, TransportError>) -> Attempt<Vec<u8>> {
    match result {
        Ok(response) if response.is_success() => Attempt::Success(response.body),
        Ok(response) if response.is_transient() => {
            Attempt::Retryable(format!("HTTP {}", response.status))
        }
        Ok(response) => Attempt::Terminal(format!("HTTP {}", response.status)),
        Err(e) => Attempt::Retryable(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_succeeds_after_retryable_failures() {
        let outcome = run_with_retries(RetryPolicy::new(3, Duration::ZERO), |n| async move {
            if n < 3 {
                Attempt::Retryable(format!("blip {n}"))
            } else {
                Attempt::Success(n)
            }
        })
        .await;
        assert_eq!(outcome, RetryOutcome::Succeeded(3));
    }

    #[tokio::test]
    async fn test_exhausts_budget() {
        let mut calls = 0;
        let outcome: RetryOutcome<()> =
            run_with_retries(RetryPolicy::new(2, Duration::ZERO), |n| {
                calls += 1;
                async move { Attempt::Retryable(format!("blip {n}")) }
            })
            .await;
        assert_eq!(calls, 2);
        assert_eq!(
            outcome,
            RetryOutcome::Exhausted {
                attempts: 2,
                reason: "blip 2".into()
            }
        );
    }

    #[tokio::test]
    async fn test_terminal_stops_immediately() {
        let mut calls = 0;
        let outcome: RetryOutcome<()> =
            run_with_retries(RetryPolicy::new(5, Duration::ZERO), |_| {
                calls += 1;
                async { Attempt::Terminal("HTTP 404".into()) }
            })
            .await;
        assert_eq!(calls, 1);
        assert!(matches!(outcome, RetryOutcome::Aborted { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_zero_limit_still_tries_once() {
        let outcome = run_with_retries(RetryPolicy::new(0, Duration::ZERO), |n| async move {
            Attempt::Success(n)
        })
        .await;
        assert_eq!(outcome, RetryOutcome::Succeeded(1));
    }

    #[test]
    fn test_classify_response() {
        assert_eq!(
            classify_response(Ok(HttpResponse::new(200, b"ok".to_vec()))),
            Attempt::Success(b"ok".to_vec())
        );
        assert!(matches!(
            classify_response(Ok(HttpResponse::new(502, vec![]))),
            Attempt::Retryable(_)
        ));
        assert!(matches!(
            classify_response(Ok(HttpResponse::new(404, vec![]))),
            Attempt::Terminal(_)
        ));
        assert!(matches!(
            classify_response(Err(TransportError::Connect("refused".into()))),
            Attempt::Retryable(_)
        ));
    }
}
