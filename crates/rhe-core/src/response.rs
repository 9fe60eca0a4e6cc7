//! Final result of a logical request.

use serde_json::Value;

use crate::headers::{HeaderMap, HeaderValue};

/// Status, headers and body of the final attempt. Any status code, including
/// 4xx and 5xx, comes back as a `Response`; interpreting it is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    raw_body: String,
    body: Value,
}

impl Response {
    /// Builds the response and decodes the body as JSON if it parses;
    /// otherwise the decoded body is the raw text as a JSON string.
    pub fn new(status: u16, headers: HeaderMap, raw_body: String) -> Self {
        let body =
            serde_json::from_str(&raw_body).unwrap_or_else(|_| Value::String(raw_body.clone()));
        Self {
            status,
            headers,
            raw_body,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Best-effort decoded body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_parts(self) -> (u16, HeaderMap, String, Value) {
        (self.status, self.headers, self.raw_body, self.body)
    }
}
