//! HTTP transport used by the resolvers and the bulk download.
//!
//! The resolvers only depend on the `Transport` trait; `CurlTransport` is the
//! libcurl-backed implementation. All calls are blocking and run on the
//! current thread, one at a time.

mod easy;
#[cfg(test)]
pub(crate) mod fake;
mod parse;

pub use easy::CurlTransport;

use crate::progress::DownloadProgress;
use std::path::Path;
use std::time::Duration;

/// Request method for a lightweight probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    /// Headers only, no body transfer.
    Head,
    /// Full GET; the body is discarded.
    Get,
}

/// What a probe learned about a URL after following redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Final HTTP status code.
    pub status: u32,
    /// URL the redirect chain ended at.
    pub effective_url: String,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single failed probe. Always recovered by the caller; never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{url}: timed out")]
    TimedOut { url: String },
    #[error("{url}: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("{url}: HTTP {status}")]
    Status { url: String, status: u32 },
}

impl ProbeError {
    pub(crate) fn from_curl(url: &str, source: curl::Error) -> Self {
        if source.is_operation_timedout() {
            ProbeError::TimedOut {
                url: url.to_string(),
            }
        } else {
            ProbeError::Curl {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Network capability the core needs.
pub trait Transport {
    /// Streams `url` into `dest`, calling `progress` as data arrives.
    /// Returns the number of bytes written. No overall timeout.
    fn fetch_to_file(
        &self,
        url: &str,
        dest: &Path,
        progress: &mut dyn FnMut(&DownloadProgress),
    ) -> anyhow::Result<u64>;

    /// GETs `url` with extra request headers and returns the body as text.
    /// Non-2xx responses are errors.
    fn get_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String, ProbeError>;

    /// Issues a probe and reports status and final location, whatever the status.
    fn probe(
        &self,
        url: &str,
        method: ProbeMethod,
        timeout: Duration,
    ) -> Result<ProbeResponse, ProbeError>;
}
