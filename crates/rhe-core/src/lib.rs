//! `rhe-core`: a blocking HTTP client that executes one logical request with
//! policy-driven retries.
//!
//! ```no_run
//! use std::time::Duration;
//! use rhe_core::{HttpClient, RequestDescriptor, RetryPolicy};
//!
//! # fn main() -> rhe_core::Result<()> {
//! let policy = RetryPolicy::builder()
//!     .enable_retries(true)
//!     .max_number_of_retries(2)
//!     .retry_interval(Duration::from_millis(500))
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! let client = HttpClient::new(policy);
//!
//! let resp = client.execute(&RequestDescriptor::get("https://api.example.com/items")?)?;
//! println!("{} {}", resp.status(), resp.body());
//! # Ok(())
//! # }
//! ```
//!
//! A non-2xx status is not an error: it comes back in the [`Response`].
//! Only a final transport failure surfaces as [`Error::Transport`].

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod logging;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::{HttpClient, Sleeper, ThreadSleeper};
pub use error::{ConfigurationError, Error};
pub use headers::{parse_header_block, HeaderMap, HeaderValue};
pub use request::{Body, CompiledRequest, Method, RequestDescriptor, RetryOption};
pub use response::Response;
pub use retry::{RetryDecision, RetryPolicy, RetryPolicyBuilder};
pub use transport::{
    Attempt, BasicAuth, CurlTransport, ProxyConfig, TransportExecutor, TransportFailure,
    TransportOptions,
};

pub type Result<T> = std::result::Result<T, Error>;
