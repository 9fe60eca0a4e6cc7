//! Pass-through transport settings carried by the retry policy.
//!
//! The retry algorithm never reads these; they are copied into every
//! [`crate::CompiledRequest`] and applied by the transport.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default headers whose values never appear in Debug output.
const SENSITIVE_HEADERS: [&str; 4] = [
    "authorization",
    "proxy-authorization",
    "cookie",
    "x-api-key",
];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Verify the peer's TLS certificate.
    pub verify_peer: bool,
    /// Verify that the certificate matches the host name.
    pub verify_host: bool,
    /// Headers sent with every request unless the request sets the same name.
    pub default_headers: BTreeMap<String, String>,
    pub proxy: Option<ProxyConfig>,
    pub auth: Option<BasicAuth>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            verify_peer: true,
            verify_host: true,
            default_headers: BTreeMap::new(),
            proxy: None,
            auth: None,
        }
    }
}

impl fmt::Debug for TransportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .default_headers
            .iter()
            .map(|(name, value)| {
                let sensitive = SENSITIVE_HEADERS.iter().any(|s| name.eq_ignore_ascii_case(s));
                (name.as_str(), if sensitive { "<redacted>" } else { value.as_str() })
            })
            .collect();
        f.debug_struct("TransportOptions")
            .field("verify_peer", &self.verify_peer)
            .field("verify_host", &self.verify_host)
            .field("default_headers", &headers)
            .field("proxy", &self.proxy)
            .field("auth", &self.auth)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://proxy.internal:3128`.
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credentials for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
