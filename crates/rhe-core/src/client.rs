//! Request execution loop.
//!
//! [`HttpClient::execute`] runs one logical request: it performs an attempt,
//! asks the retry engine what to do, sleeps, and repeats until the engine says
//! stop. Attempts of one request are strictly sequential.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::Error;
use crate::request::{CompiledRequest, RequestDescriptor};
use crate::response::Response;
use crate::retry::{compute_wait_time, should_retry_request, RetryDecision, RetryPolicy};
use crate::transport::{Attempt, CurlTransport, TransportExecutor};
use crate::Result;

/// Blocks the calling thread between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Blocking HTTP client with policy-driven retries.
///
/// The policy is shared read-only (clone the `Arc` to build more clients
/// with the same settings). The transport belongs to this client; it is
/// locked for one round trip at a time and reset before each attempt, never
/// held across a sleep.
pub struct HttpClient<T = CurlTransport, S = ThreadSleeper> {
    policy: Arc<RetryPolicy>,
    transport: Mutex<T>,
    sleeper: S,
}

impl HttpClient {
    /// Client using libcurl and real sleeps.
    pub fn new(policy: impl Into<Arc<RetryPolicy>>) -> Self {
        Self::with_transport(policy, CurlTransport::new())
    }
}

impl<T: TransportExecutor> HttpClient<T> {
    pub fn with_transport(policy: impl Into<Arc<RetryPolicy>>, transport: T) -> Self {
        Self {
            policy: policy.into(),
            transport: Mutex::new(transport),
            sleeper: ThreadSleeper,
        }
    }
}

impl<T: TransportExecutor, S: Sleeper> HttpClient<T, S> {
    /// Replaces how the client waits between attempts.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> HttpClient<T, S2> {
        HttpClient {
            policy: self.policy,
            transport: self.transport,
            sleeper,
        }
    }

    pub fn policy(&self) -> &Arc<RetryPolicy> {
        &self.policy
    }

    pub fn into_transport(self) -> T {
        self.transport
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes `request`, retrying per the policy.
    ///
    /// Returns the final attempt as a [`Response`] whatever its status code.
    /// Fails with [`Error::Transport`] when the final attempt produced no
    /// response.
    pub fn execute(&self, request: &RequestDescriptor) -> Result<Response> {
        let policy = self.policy.as_ref();
        let compiled = CompiledRequest::compile(request, policy);
        let retry_enabled = should_retry_request(request, policy);

        let mut attempt_index: u32 = 0;
        let mut remaining = policy.maximum_retry_wait_time();
        let mut pending_wait: Option<Duration> = None;

        let last = loop {
            if let Some(wait) = pending_wait.take() {
                self.sleeper.sleep(wait);
                remaining = remaining.saturating_sub(wait);
            }

            let attempt = self.round_trip(&compiled);
            tracing::debug!(
                method = %compiled.method,
                url = %compiled.url,
                attempt = attempt_index + 1,
                status = ?attempt.status,
                error = ?attempt.error.as_ref().map(|e| e.message.as_str()),
                "attempt finished"
            );

            if !retry_enabled {
                break attempt;
            }
            match compute_wait_time(attempt_index, &attempt, policy, remaining) {
                RetryDecision::NoRetry => break attempt,
                RetryDecision::RetryAfter(wait) => {
                    pending_wait = Some(wait);
                    attempt_index += 1;
                }
            }
        };

        finish(&compiled, last, attempt_index + 1)
    }

    fn round_trip(&self, compiled: &CompiledRequest) -> Attempt {
        let mut transport = self.transport.lock().unwrap_or_else(PoisonError::into_inner);
        transport.reset();
        transport.execute(compiled)
    }
}

fn finish(compiled: &CompiledRequest, last: Attempt, attempts: u32) -> Result<Response> {
    let failure = match (last.error, last.status) {
        (None, Some(status)) => return Ok(Response::new(status, last.headers, last.raw_body)),
        (Some(failure), _) => failure,
        (None, None) => crate::transport::TransportFailure {
            message: "no response received".to_string(),
            timed_out: false,
        },
    };
    tracing::warn!(
        method = %compiled.method,
        url = %compiled.url,
        attempts,
        "request failed: {}",
        failure.message
    );
    Err(Error::Transport {
        message: failure.message,
        method: compiled.method,
        url: compiled.url.clone(),
        attempts,
        timed_out: failure.timed_out,
    })
}

impl<T, S> fmt::Debug for HttpClient<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
