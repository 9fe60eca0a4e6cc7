//! Retry decisions: whether a request may retry at all, and how long to wait
//! after a given attempt.

use std::time::{Duration, SystemTime};

use rand::Rng;

use super::policy::{RetryDecision, RetryPolicy};
use super::retry_after::retry_after;
use crate::request::{RequestDescriptor, RetryOption};
use crate::transport::Attempt;

/// Upper bound (exclusive) of the random jitter added to every backoff, in seconds.
pub const MAX_JITTER_SECS: f64 = 0.1;

/// Applies the per-request override to the policy's retry switch.
pub fn should_retry_request(request: &RequestDescriptor, policy: &RetryPolicy) -> bool {
    match request.retry_override() {
        RetryOption::Enable => true,
        RetryOption::Disable => false,
        RetryOption::UseGlobal => {
            policy.enable_retries() && policy.retries_method(request.method())
        }
    }
}

/// `retry_interval * backoff_factor ^ attempt_index`, without jitter.
/// `None` when the result does not fit in a `Duration`.
pub fn backoff_delay(policy: &RetryPolicy, attempt_index: u32) -> Option<Duration> {
    let exp = i32::try_from(attempt_index).unwrap_or(i32::MAX);
    let secs = policy.retry_interval().as_secs_f64() * policy.backoff_factor().powi(exp);
    Duration::try_from_secs_f64(secs).ok()
}

/// Decides whether to retry after attempt number `attempt_index` (0-based)
/// and for how long to sleep, given the sleep budget still available.
pub fn compute_wait_time(
    attempt_index: u32,
    attempt: &Attempt,
    policy: &RetryPolicy,
    remaining_budget: Duration,
) -> RetryDecision {
    let jitter = Duration::from_secs_f64(rand::rng().random_range(0.0..MAX_JITTER_SECS));
    compute_wait_time_at(
        attempt_index,
        attempt,
        policy,
        remaining_budget,
        jitter,
        SystemTime::now(),
    )
}

/// [`compute_wait_time`] with the jitter and the clock supplied by the caller.
pub fn compute_wait_time_at(
    attempt_index: u32,
    attempt: &Attempt,
    policy: &RetryPolicy,
    remaining_budget: Duration,
    jitter: Duration,
    now: SystemTime,
) -> RetryDecision {
    let (eligible, server_wait) = match &attempt.error {
        Some(failure) => (policy.retry_on_timeout() && failure.timed_out, Duration::ZERO),
        None => {
            let hint = retry_after(&attempt.headers, now);
            let listed = attempt.status.is_some_and(|s| policy.retries_status(s));
            (hint.is_some() || listed, hint.unwrap_or(Duration::ZERO))
        }
    };

    if !eligible || attempt_index >= policy.max_number_of_retries() {
        return RetryDecision::NoRetry;
    }

    let Some(backoff) = backoff_delay(policy, attempt_index) else {
        return RetryDecision::NoRetry;
    };
    let wait = backoff.saturating_add(jitter).max(server_wait);

    if wait <= remaining_budget {
        tracing::debug!(
            attempt_index,
            wait_ms = wait.as_millis() as u64,
            "retry scheduled"
        );
        RetryDecision::RetryAfter(wait)
    } else {
        tracing::debug!(
            attempt_index,
            wait_ms = wait.as_millis() as u64,
            remaining_ms = remaining_budget.as_millis() as u64,
            "retry wait exceeds remaining budget"
        );
        RetryDecision::NoRetry
    }
}
