//! Parse HTTP response header lines as curl delivers them.

/// Folds one raw header line into the running `Content-Length`.
///
/// With redirects curl reports every response's headers; a status line starts
/// a new response, so it clears the value and only the final response counts.
pub(crate) fn track_content_length(line: &str, current: Option<u64>) -> Option<u64> {
    let line = line.trim();
    if line.starts_with("HTTP/") {
        return None;
    }
    if let Some((name, value)) = line.split_once(':') {
        if name.trim().eq_ignore_ascii_case("content-length") {
            return value.trim().parse::<u64>().ok();
        }
    }
    current
}
