//! Bulk image download to a fixed local file name.
//!
//! Data is streamed into `<dest>.part` and renamed once complete, so `dest`
//! only ever holds a finished transfer. An existing `dest` is kept as is.

use crate::error::WinfetchError;
use crate::progress::DownloadProgress;
use crate::resolver::ResolvedTarget;
use crate::transport::Transport;
use std::fs;
use std::path::{Path, PathBuf};

/// What `fetch_image` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64 },
    AlreadyPresent,
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Downloads `target` to `dest` unless `dest` already exists.
pub fn fetch_image(
    transport: &dyn Transport,
    target: &ResolvedTarget,
    dest: &Path,
    progress: &mut dyn FnMut(&DownloadProgress),
) -> Result<FetchOutcome, WinfetchError> {
    if dest.exists() {
        tracing::info!(path = %dest.display(), "image already present, skipping download");
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let part = part_path(dest);
    tracing::info!(url = %target.url, path = %dest.display(), "downloading image");
    let bytes = match transport.fetch_to_file(&target.url, &part, progress) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&part);
            return Err(WinfetchError::transfer("image download", format!("{e:#}")));
        }
    };

    if let Some(declared) = target.size_bytes {
        if declared != bytes {
            tracing::warn!(declared, bytes, "downloaded size differs from catalog size");
        }
    }

    fs::rename(&part, dest).map_err(|e| {
        let _ = fs::remove_file(&part);
        WinfetchError::transfer(
            "image download",
            format!("rename {} to {}: {}", part.display(), dest.display(), e),
        )
    })?;

    tracing::info!(bytes, path = %dest.display(), "image downloaded");
    Ok(FetchOutcome::Downloaded { bytes })
}
