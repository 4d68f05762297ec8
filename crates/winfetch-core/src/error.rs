//! Fatal error taxonomy surfaced to the caller.
//!
//! Probe failures during heuristic discovery are not part of this enum; they
//! are recovered locally (see `transport::ProbeError`).

use crate::catalog::MatchQuery;

#[derive(Debug, thiserror::Error)]
pub enum WinfetchError {
    /// A required extraction or conversion tool is missing from the host.
    #[error("missing {purpose} tool ({tool}); install: {hint}")]
    ToolUnavailable {
        tool: &'static str,
        purpose: &'static str,
        hint: &'static str,
    },

    /// The catalog archive was retrieved but no extraction method produced
    /// a usable products document.
    #[error(
        "could not extract products.xml from the catalog ({reason}); install cabextract: \
         brew install cabextract (macOS) or sudo apt install cabextract (Linux)"
    )]
    DocumentNotExtractable { reason: String },

    /// The catalog parsed, but no entry matches the query.
    #[error("edition not found in catalog: {query}")]
    NoMatchingRecord { query: MatchQuery },

    /// The bulk download or the conversion process failed.
    #[error("{operation} failed: {detail}")]
    TransferFailure {
        operation: &'static str,
        detail: String,
    },
}

impl WinfetchError {
    pub(crate) fn transfer(operation: &'static str, err: impl std::fmt::Display) -> Self {
        WinfetchError::TransferFailure {
            operation,
            detail: err.to_string(),
        }
    }
}
