//! Error types surfaced to callers of the engine.

use crate::request::Method;

/// Invalid retry policy values, reported when the policy is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("max_number_of_retries must be >= 0, got {0}")]
    NegativeRetryCount(i64),
    #[error("backoff_factor must be a finite number >= 1, got {0}")]
    InvalidBackoffFactor(f64),
    #[error("retry_interval must be a finite number of seconds > 0, got {0}")]
    InvalidRetryInterval(f64),
    #[error("timeout must be a finite number of seconds >= 0, got {0}")]
    InvalidTimeout(f64),
    #[error("maximum_retry_wait_time must be a finite number of seconds >= 0, got {0}")]
    InvalidWaitBudget(f64),
    #[error("unknown HTTP method in methods_to_retry: {0:?}")]
    UnknownMethod(String),
    #[error("status code out of range in status_codes_to_retry: {0}")]
    InvalidStatusCode(u16),
}

/// Error returned by request construction and [`crate::HttpClient::execute`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Policy could not be built from the supplied values.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A JSON request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    /// The final attempt failed at the transport level (connect, DNS, TLS, timeout).
    #[error("{method} {url} failed after {attempts} attempt(s): {message}")]
    Transport {
        message: String,
        method: Method,
        url: String,
        attempts: u32,
        /// True when the last failure was a transport timeout.
        timed_out: bool,
    },
}

impl Error {
    /// Number of attempts made, for terminal transport errors.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Error::Transport { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { timed_out: true, .. })
    }
}
