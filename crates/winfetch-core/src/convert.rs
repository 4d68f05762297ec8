//! ESD → WIM conversion through `wimlib-imagex export`.
//!
//! The converter is opaque: only its exit status and diagnostic output are
//! reported.

use crate::error::WinfetchError;
use crate::tools::ToolSet;
use std::path::Path;
use std::process::{Command, Stdio};

/// Image selector exporting every image in the source.
pub const ALL_IMAGES: &str = "all";

/// Runs `wimlib-imagex export <source> <selector> <dest>`.
pub fn export_image(
    tools: &ToolSet,
    source: &Path,
    selector: &str,
    dest: &Path,
) -> Result<(), WinfetchError> {
    let program = tools.require_converter()?;
    tracing::info!(
        source = %source.display(),
        selector,
        dest = %dest.display(),
        "exporting image"
    );

    let output = Command::new(program)
        .arg("export")
        .arg(source)
        .arg(selector)
        .arg(dest)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            WinfetchError::transfer("ESD conversion", format!("run {}: {}", program.display(), e))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => format!("{} exited with {}", program.display(), output.status),
            text => text.to_string(),
        };
        tracing::warn!(status = %output.status, "image export failed");
        return Err(WinfetchError::TransferFailure {
            operation: "ESD conversion",
            detail,
        });
    }

    tracing::info!(dest = %dest.display(), "image exported");
    Ok(())
}
