//! Scanning API responses for download candidates.

use regex::Regex;
use std::sync::LazyLock;

static LINK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)LinkID=(\d+)").expect("valid link id pattern"));

/// Absolute https URLs in `body` ending in `extension`, in order of appearance.
pub fn direct_urls<'a>(body: &'a str, extension: &str) -> Vec<&'a str> {
    let pattern = format!(r#"https://[^"'\s<>]+{}"#, regex::escape(extension));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(body).map(|m| m.as_str()).collect(),
        Err(e) => {
            tracing::warn!(%extension, "cannot build URL pattern: {}", e);
            Vec::new()
        }
    }
}

/// Redirect link identifiers (`LinkID=<digits>`) in `body`, first occurrence order, deduplicated.
pub fn link_ids(body: &str) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    for cap in LINK_ID.captures_iter(body) {
        if let Some(id) = cap.get(1).map(|m| m.as_str()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
