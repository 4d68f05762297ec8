//! CDN path guessing: base paths × file names.

use url::Url;

fn join(base: &str, file_name: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{file_name}")
    } else {
        format!("{base}/{file_name}")
    }
}

/// Candidate URLs in base-path-major order; malformed combinations are dropped.
pub fn candidates(base_paths: &[String], file_names: &[String]) -> Vec<String> {
    base_paths
        .iter()
        .flat_map(|base| file_names.iter().map(move |name| join(base, name)))
        .filter(|candidate| match Url::parse(candidate) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(%candidate, "skipping malformed candidate: {}", e);
                false
            }
        })
        .collect()
}
