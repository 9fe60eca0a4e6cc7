//! `Retry-After` header interpretation.

use std::time::{Duration, SystemTime};

use crate::headers::HeaderMap;

pub const RETRY_AFTER: &str = "retry-after";

/// Reads `Retry-After` (case-insensitive).
///
/// Returns `None` when the header is absent. A present header is either a
/// count of seconds or an HTTP-date turned into `max(0, date - now)`; any
/// other value counts as zero seconds.
pub fn retry_after(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    let raw = headers.get_str(RETRY_AFTER)?.trim();
    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let wait = match httpdate::parse_http_date(raw) {
        Ok(date) => date.duration_since(now).unwrap_or(Duration::ZERO),
        Err(_) => {
            tracing::debug!(value = raw, "unparseable Retry-After, treating as 0s");
            Duration::ZERO
        }
    };
    Some(wait)
}
