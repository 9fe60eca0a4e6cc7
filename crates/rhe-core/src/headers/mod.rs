//! Response header storage.
//!
//! Headers keep their arrival order. A name seen more than once maps to a
//! list of values in occurrence order; names compare case-insensitively.

mod parse;

pub use parse::parse_header_block;

/// Value(s) stored under one header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// First value in occurrence order.
    pub fn first(&self) -> &str {
        match self {
            HeaderValue::Single(v) => v,
            HeaderValue::Multiple(vs) => vs.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Last value in occurrence order.
    pub fn last(&self) -> &str {
        match self {
            HeaderValue::Single(v) => v,
            HeaderValue::Multiple(vs) => vs.last().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            HeaderValue::Single(v) => std::slice::from_ref(v),
            HeaderValue::Multiple(vs) => vs,
        };
        values.iter().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            HeaderValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = HeaderValue::Multiple(vec![first, value]);
            }
            HeaderValue::Multiple(vs) => vs.push(value),
        }
    }

    fn last_mut(&mut self) -> Option<&mut String> {
        match self {
            HeaderValue::Single(v) => Some(v),
            HeaderValue::Multiple(vs) => vs.last_mut(),
        }
    }
}

/// Ordered, multi-valued header map with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, HeaderValue)>,
    /// Index of the entry that received the most recent value (for continuation lines).
    last: Option<usize>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value. If the name already exists (any case), the value is
    /// appended to that entry and the first-seen spelling is kept.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => {
                self.entries[i].1.push(value);
                self.last = Some(i);
            }
            None => {
                self.entries.push((name, HeaderValue::Single(value)));
                self.last = Some(self.entries.len() - 1);
            }
        }
    }

    /// Appends a folded continuation to the value most recently added.
    /// Returns false when there is no previous value to continue.
    pub(crate) fn continue_last(&mut self, continuation: &str) -> bool {
        let Some(value) = self
            .last
            .and_then(|i| self.entries.get_mut(i))
            .and_then(|(_, v)| v.last_mut())
        else {
            return false;
        };
        value.push_str("\r\n\t");
        value.push_str(continuation);
        true
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    /// First value for `name`, if present.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).map(HeaderValue::first)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.last = None;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}
