//! Transport seam: one blocking network round trip per call.
//!
//! The engine never talks to the network directly. A [`TransportExecutor`]
//! performs exactly one round trip for a [`CompiledRequest`] and reports the
//! outcome as an [`Attempt`]; it must not retry on its own.

mod easy;
mod options;

pub use easy::CurlTransport;
pub use options::{BasicAuth, ProxyConfig, TransportOptions};

use crate::headers::{parse_header_block, HeaderMap};
use crate::request::CompiledRequest;

/// Transport-level failure of one attempt (connect, DNS, TLS, timeout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
    /// True only for timeouts; feeds the `retry_on_timeout` rule.
    pub timed_out: bool,
}

/// Outcome of one physical round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attempt {
    pub status: Option<u16>,
    pub headers: HeaderMap,
    pub raw_body: String,
    pub error: Option<TransportFailure>,
}

impl Attempt {
    /// A response was received.
    pub fn response(status: u16, headers: HeaderMap, raw_body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            headers,
            raw_body: raw_body.into(),
            error: None,
        }
    }

    /// A response was received; `raw_headers` is the unparsed header block.
    pub fn from_raw(status: u16, raw_headers: &str, raw_body: impl Into<String>) -> Self {
        Self::response(status, parse_header_block(raw_headers), raw_body)
    }

    /// No usable response: the round trip failed.
    pub fn failed(message: impl Into<String>, timed_out: bool) -> Self {
        Self {
            error: Some(TransportFailure {
                message: message.into(),
                timed_out,
            }),
            ..Self::default()
        }
    }

    pub fn is_transport_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_timeout(&self) -> bool {
        self.error.as_ref().is_some_and(|e| e.timed_out)
    }
}

/// Performs single round trips. Owned by one client.
pub trait TransportExecutor: Send {
    /// Clears per-attempt state (options, buffers) left by a previous attempt.
    /// Called before every attempt.
    fn reset(&mut self);

    /// Performs exactly one round trip. Never retries.
    fn execute(&mut self, request: &CompiledRequest) -> Attempt;
}

impl<T: TransportExecutor + ?Sized> TransportExecutor for Box<T> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn execute(&mut self, request: &CompiledRequest) -> Attempt {
        (**self).execute(request)
    }
}
