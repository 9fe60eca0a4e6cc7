//! Parse a raw HTTP response header block into a [`HeaderMap`].

use super::HeaderMap;

/// Parse a raw header block (status line followed by `Name: value` lines).
///
/// - A line starting with `HTTP/` is a status line; it starts a fresh map, so a
///   block holding interim responses (100 Continue, redirects) keeps only the
///   headers of the last one.
/// - A line starting with a tab or space continues the previous value; it is
///   appended as `"\r\n\t" + trimmed line`.
/// - Other lines without a colon are ignored.
pub fn parse_header_block(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for line in raw.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if line.starts_with('\t') || line.starts_with(' ') {
            if !headers.continue_last(line.trim()) {
                tracing::trace!("dropping header continuation with no preceding header");
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.append(name, value.trim());
        }
    }

    headers
}
