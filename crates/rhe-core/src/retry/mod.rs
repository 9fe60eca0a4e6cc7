//! Retry and backoff policy.
//!
//! This module holds the immutable [`RetryPolicy`] and the pure decision
//! logic the client consults after every attempt: the per-request override
//! check, exponential backoff with jitter, `Retry-After` handling, and the
//! cumulative sleep budget.

mod decide;
mod policy;
mod retry_after;

pub use decide::{
    backoff_delay, compute_wait_time, compute_wait_time_at, should_retry_request,
    MAX_JITTER_SECS,
};
pub use policy::{
    RetryDecision, RetryPolicy, RetryPolicyBuilder, DEFAULT_METHODS_TO_RETRY,
    DEFAULT_STATUS_CODES_TO_RETRY,
};
pub use retry_after::{retry_after, RETRY_AFTER};
