//! libcurl-backed transport (curl crate, easy interface).

use super::{parse, ProbeError, ProbeMethod, ProbeResponse, Transport};
use crate::progress::DownloadProgress;
use anyhow::{Context, Result};
use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str;
use std::time::{Duration, Instant};

const MAX_REDIRECTS: u32 = 10;

/// Blocking transport using one curl easy handle per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

impl CurlTransport {
    pub fn new() -> Self {
        CurlTransport
    }
}

fn header_list(headers: &[(&str, &str)]) -> Result<Option<curl::easy::List>, curl::Error> {
    if headers.is_empty() {
        return Ok(None);
    }
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    Ok(Some(list))
}

/// Easy handle with redirects followed and a short overall timeout.
fn probe_handle(
    url: &str,
    headers: &[(&str, &str)],
    timeout: Duration,
) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;
    if let Some(list) = header_list(headers)? {
        easy.http_headers(list)?;
    }
    Ok(easy)
}

impl Transport for CurlTransport {
    fn fetch_to_file(
        &self,
        url: &str,
        dest: &Path,
        progress: &mut dyn FnMut(&DownloadProgress),
    ) -> Result<u64> {
        let file = File::create(dest).with_context(|| format!("create {}", dest.display()))?;
        let mut writer = BufWriter::new(file);

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(Duration::from_secs(30))?;
        // Bulk transfers run for minutes: no overall timeout, only abort when stalled.
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;

        let total = Cell::new(None);
        let mut written: u64 = 0;
        let mut write_err: Option<std::io::Error> = None;
        let started = Instant::now();

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    total.set(parse::track_content_length(line, total.get()));
                }
                true
            })?;
            transfer.write_function(|data| match writer.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    progress(&DownloadProgress::new(written, total.get(), started));
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("download write failed: {}", e);
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(e).with_context(|| format!("write {}", dest.display()));
        }
        performed.context("GET request failed")?;

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            anyhow::bail!("GET {} returned HTTP {}", url, code);
        }
        writer
            .flush()
            .with_context(|| format!("flush {}", dest.display()))?;

        if let Some(expected) = total.get() {
            if written != expected {
                anyhow::bail!("partial transfer: wrote {} of {}", written, expected);
            }
        }
        Ok(written)
    }

    fn get_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String, ProbeError> {
        let mut easy = probe_handle(url, headers, timeout).map_err(|e| ProbeError::from_curl(url, e))?;
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(|e| ProbeError::from_curl(url, e))?;
            transfer
                .perform()
                .map_err(|e| ProbeError::from_curl(url, e))?;
        }

        let status = easy
            .response_code()
            .map_err(|e| ProbeError::from_curl(url, e))?;
        if !(200..300).contains(&status) {
            return Err(ProbeError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn probe(
        &self,
        url: &str,
        method: ProbeMethod,
        timeout: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        let mut easy = probe_handle(url, &[], timeout).map_err(|e| ProbeError::from_curl(url, e))?;
        if method == ProbeMethod::Head {
            easy.nobody(true).map_err(|e| ProbeError::from_curl(url, e))?;
        }

        // GET probes discard the body.
        easy.write_function(|data| Ok(data.len()))
            .map_err(|e| ProbeError::from_curl(url, e))?;
        easy.perform().map_err(|e| ProbeError::from_curl(url, e))?;

        let status = easy
            .response_code()
            .map_err(|e| ProbeError::from_curl(url, e))?;
        let effective_url = easy
            .effective_url()
            .map_err(|e| ProbeError::from_curl(url, e))?
            .unwrap_or(url)
            .to_string();

        Ok(ProbeResponse {
            status,
            effective_url,
        })
    }
}
