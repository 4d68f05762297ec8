//! In-memory transport for resolver tests.

use super::{ProbeError, ProbeMethod, ProbeResponse, Transport};
use crate::progress::DownloadProgress;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Serves canned responses; any URL without one behaves like a timeout.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    files: HashMap<String, Vec<u8>>,
    texts: HashMap<String, String>,
    probes: HashMap<String, ProbeResponse>,
    /// Every URL requested, in order, prefixed with the operation.
    pub calls: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.to_string(), bytes.into());
        self
    }

    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.texts.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_probe(mut self, url: &str, status: u32, effective_url: &str) -> Self {
        self.probes.insert(
            url.to_string(),
            ProbeResponse {
                status,
                effective_url: effective_url.to_string(),
            },
        );
        self
    }

    pub fn called(&self, prefix: &str, url: &str) -> bool {
        let wanted = format!("{prefix} {url}");
        self.calls.borrow().iter().any(|c| *c == wanted)
    }

    fn record(&self, op: &str, url: &str) {
        self.calls.borrow_mut().push(format!("{op} {url}"));
    }
}

impl Transport for FakeTransport {
    fn fetch_to_file(
        &self,
        url: &str,
        dest: &Path,
        progress: &mut dyn FnMut(&DownloadProgress),
    ) -> anyhow::Result<u64> {
        self.record("FETCH", url);
        let bytes = self
            .files
            .get(url)
            .ok_or_else(|| anyhow::anyhow!("GET {} returned HTTP 404", url))?;
        std::fs::write(dest, bytes)?;
        let len = bytes.len() as u64;
        progress(&DownloadProgress::new(len, Some(len), Instant::now()));
        Ok(len)
    }

    fn get_text(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
        _timeout: Duration,
    ) -> Result<String, ProbeError> {
        self.record("GET", url);
        self.texts.get(url).cloned().ok_or(ProbeError::TimedOut {
            url: url.to_string(),
        })
    }

    fn probe(
        &self,
        url: &str,
        method: ProbeMethod,
        _timeout: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        let op = match method {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Get => "PROBE",
        };
        self.record(op, url);
        self.probes.get(url).cloned().ok_or(ProbeError::TimedOut {
            url: url.to_string(),
        })
    }
}
