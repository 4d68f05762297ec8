//! Exact-match lookup of catalog records.

use super::parse::ProductRecord;
use std::fmt;

/// Edition filter: exact, case-sensitive equality on all three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub language: String,
    pub edition: String,
    pub architecture: String,
}

impl MatchQuery {
    pub fn new(
        language: impl Into<String>,
        edition: impl Into<String>,
        architecture: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            edition: edition.into(),
            architecture: architecture.into(),
        }
    }

    /// The record's download URL, if it carries every identifying field and all match.
    pub fn matched_url<'r>(&self, record: &'r ProductRecord) -> Option<&'r str> {
        let url = record.file_path.as_deref()?;
        let matched = record.language_code.as_deref() == Some(self.language.as_str())
            && record.edition.as_deref() == Some(self.edition.as_str())
            && record.architecture.as_deref() == Some(self.architecture.as_str());
        matched.then_some(url)
    }
}

impl fmt::Display for MatchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "language={} edition={} architecture={}",
            self.language, self.edition, self.architecture
        )
    }
}

/// First record in document order that satisfies `query`, with its download URL.
pub fn find_match<'a>(
    records: &'a [ProductRecord],
    query: &MatchQuery,
) -> Option<(&'a ProductRecord, &'a str)> {
    records
        .iter()
        .find_map(|r| query.matched_url(r).map(|url| (r, url)))
}
