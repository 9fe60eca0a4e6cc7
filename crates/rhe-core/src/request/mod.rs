//! Logical request description and per-request retry override.
//!
//! A [`RequestDescriptor`] is built per call and handed to
//! [`crate::HttpClient::execute`]; it is compiled against the client's policy
//! (default headers, TLS flags, timeout) once, then replayed for every attempt.

mod compile;
mod method;

pub use compile::CompiledRequest;
pub use method::Method;

use serde::Serialize;
use url::Url;

use crate::Result;

/// Per-request override of the policy's retry switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryOption {
    /// Retry this request whatever the policy's `enable_retries` and method list say.
    Enable,
    /// Never retry this request.
    Disable,
    /// Retry only if the policy enables retries and lists this method.
    #[default]
    UseGlobal,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
    /// Already-serialized JSON document.
    Json(Vec<u8>),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Bytes(b) | Body::Json(b) => b.is_empty(),
            Body::Form(fields) => fields.is_empty(),
        }
    }

    /// Content type implied by the body kind, if any.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Empty | Body::Bytes(_) => None,
            Body::Form(_) => Some("application/x-www-form-urlencoded"),
            Body::Json(_) => Some("application/json"),
        }
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        match self {
            Body::Empty => Vec::new(),
            Body::Bytes(b) | Body::Json(b) => b.clone(),
            Body::Form(fields) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields)
                .finish()
                .into_bytes(),
        }
    }
}

/// One fully specified logical HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Body,
    retry_option: RetryOption,
}

impl RequestDescriptor {
    /// Parses `url` (must be absolute) and creates a request with no headers or body.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        Ok(Self::from_url(method, Url::parse(url)?))
    }

    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Body::Empty,
            retry_option: RetryOption::UseGlobal,
        }
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::Get, url)
    }

    pub fn head(url: &str) -> Result<Self> {
        Self::new(Method::Head, url)
    }

    pub fn post(url: &str) -> Result<Self> {
        Self::new(Method::Post, url)
    }

    pub fn put(url: &str) -> Result<Self> {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: &str) -> Result<Self> {
        Self::new(Method::Patch, url)
    }

    pub fn delete(url: &str) -> Result<Self> {
        Self::new(Method::Delete, url)
    }

    pub fn options(url: &str) -> Result<Self> {
        Self::new(Method::Options, url)
    }

    /// Sets a header, replacing any earlier value of the same name (case-insensitive).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Appends a query parameter to the URL.
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Body::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Serializes `value` as the JSON body. Fails before any attempt is made.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Body::Json(serde_json::to_vec(value)?);
        Ok(self)
    }

    pub fn retry_option(mut self, option: RetryOption) -> Self {
        self.retry_option = option;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn payload(&self) -> &Body {
        &self.body
    }

    pub fn retry_override(&self) -> RetryOption {
        self.retry_option
    }
}
