//! Merge a request with the policy's pass-through transport options.

use std::time::Duration;

use super::{Method, RequestDescriptor};
use crate::retry::RetryPolicy;
use crate::transport::{BasicAuth, ProxyConfig};

/// Everything the transport needs for one round trip. Built once per
/// logical request and replayed unchanged for each attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRequest {
    pub method: Method,
    /// Absolute URL with query parameters applied.
    pub url: String,
    /// Default headers first, then request headers; names are unique (case-insensitive).
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Per-attempt timeout; `None` means unbounded.
    pub timeout: Option<Duration>,
    pub verify_peer: bool,
    pub verify_host: bool,
    pub proxy: Option<ProxyConfig>,
    pub auth: Option<BasicAuth>,
}

impl CompiledRequest {
    pub fn compile(request: &RequestDescriptor, policy: &RetryPolicy) -> Self {
        let transport = policy.transport();
        let mut headers: Vec<(String, String)> = transport
            .default_headers
            .iter()
            .filter(|(name, _)| !has_header(request.headers(), name))
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect();
        headers.extend(request.headers().iter().cloned());

        let body = request.payload();
        if let Some(content_type) = body.content_type() {
            if !has_header(&headers, "content-type") {
                headers.push(("Content-Type".to_string(), content_type.to_string()));
            }
        }

        Self {
            method: request.method(),
            url: request.url().to_string(),
            headers,
            body: body.encode(),
            timeout: policy.timeout(),
            verify_peer: transport.verify_peer,
            verify_host: transport.verify_host,
            proxy: transport.proxy.clone(),
            auth: transport.auth.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}
