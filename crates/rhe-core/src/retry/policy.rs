use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::request::Method;
use crate::transport::TransportOptions;

/// Status codes retried by default.
pub const DEFAULT_STATUS_CODES_TO_RETRY: [u16; 10] =
    [408, 413, 429, 500, 502, 503, 504, 521, 522, 524];

/// Methods retried by default when the request uses the global setting.
pub const DEFAULT_METHODS_TO_RETRY: [Method; 2] = [Method::Get, Method::Put];

/// Decision returned by the retry engine for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop; the attempt just made is final.
    NoRetry,
    /// Sleep for the given delay, then try again.
    RetryAfter(Duration),
}

impl RetryDecision {
    pub fn should_retry(&self) -> bool {
        matches!(self, RetryDecision::RetryAfter(_))
    }

    /// Wait before the next attempt (zero when stopping).
    pub fn wait(&self) -> Duration {
        match self {
            RetryDecision::NoRetry => Duration::ZERO,
            RetryDecision::RetryAfter(d) => *d,
        }
    }
}

/// Retry and backoff knobs plus pass-through transport options.
///
/// Built once through [`RetryPolicy::builder`] and then only read; clients
/// share it behind an `Arc` across concurrent requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    timeout: Option<Duration>,
    enable_retries: bool,
    max_number_of_retries: u32,
    retry_on_timeout: bool,
    retry_interval: Duration,
    maximum_retry_wait_time: Duration,
    backoff_factor: f64,
    status_codes_to_retry: BTreeSet<u16>,
    methods_to_retry: BTreeSet<Method>,
    transport: TransportOptions,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            enable_retries: false,
            max_number_of_retries: 3,
            retry_on_timeout: false,
            retry_interval: Duration::from_secs(1),
            maximum_retry_wait_time: Duration::from_secs(120),
            backoff_factor: 2.0,
            status_codes_to_retry: DEFAULT_STATUS_CODES_TO_RETRY.into_iter().collect(),
            methods_to_retry: DEFAULT_METHODS_TO_RETRY.into_iter().collect(),
            transport: TransportOptions::default(),
        }
    }
}

impl RetryPolicy {
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Per-attempt timeout; `None` means no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn enable_retries(&self) -> bool {
        self.enable_retries
    }

    pub fn max_number_of_retries(&self) -> u32 {
        self.max_number_of_retries
    }

    pub fn retry_on_timeout(&self) -> bool {
        self.retry_on_timeout
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Budget for the sum of all sleeps of one logical request.
    pub fn maximum_retry_wait_time(&self) -> Duration {
        self.maximum_retry_wait_time
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn status_codes_to_retry(&self) -> &BTreeSet<u16> {
        &self.status_codes_to_retry
    }

    pub fn methods_to_retry(&self) -> &BTreeSet<Method> {
        &self.methods_to_retry
    }

    pub fn transport(&self) -> &TransportOptions {
        &self.transport
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.status_codes_to_retry.contains(&status)
    }

    pub fn retries_method(&self, method: Method) -> bool {
        self.methods_to_retry.contains(&method)
    }
}

/// Builder for [`RetryPolicy`]. Every setter is optional and independent;
/// unset fields keep their defaults. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Per-attempt timeout. `Duration::ZERO` means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.policy.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn enable_retries(mut self, enable: bool) -> Self {
        self.policy.enable_retries = enable;
        self
    }

    pub fn max_number_of_retries(mut self, retries: u32) -> Self {
        self.policy.max_number_of_retries = retries;
        self
    }

    pub fn retry_on_timeout(mut self, retry: bool) -> Self {
        self.policy.retry_on_timeout = retry;
        self
    }

    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.policy.retry_interval = interval;
        self
    }

    pub fn maximum_retry_wait_time(mut self, budget: Duration) -> Self {
        self.policy.maximum_retry_wait_time = budget;
        self
    }

    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.policy.backoff_factor = factor;
        self
    }

    pub fn status_codes_to_retry(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.policy.status_codes_to_retry = codes.into_iter().collect();
        self
    }

    pub fn methods_to_retry(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.policy.methods_to_retry = methods.into_iter().collect();
        self
    }

    pub fn transport(mut self, transport: TransportOptions) -> Self {
        self.policy.transport = transport;
        self
    }

    pub fn build(self) -> Result<RetryPolicy, ConfigurationError> {
        let p = &self.policy;
        if !p.backoff_factor.is_finite() || p.backoff_factor < 1.0 {
            return Err(ConfigurationError::InvalidBackoffFactor(p.backoff_factor));
        }
        if p.retry_interval.is_zero() {
            return Err(ConfigurationError::InvalidRetryInterval(
                p.retry_interval.as_secs_f64(),
            ));
        }
        if let Some(code) = p
            .status_codes_to_retry
            .iter()
            .find(|c| !(100..=599).contains(*c))
        {
            return Err(ConfigurationError::InvalidStatusCode(*code));
        }
        Ok(self.policy)
    }
}
