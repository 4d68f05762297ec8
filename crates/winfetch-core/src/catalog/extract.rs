//! Pulling products.xml out of the catalog CAB.
//!
//! Methods run in a fixed order and the first one that yields a non-empty
//! document wins. A method whose tool is not installed, that fails, or that
//! leaves no products.xml behind is skipped.

use crate::error::WinfetchError;
use crate::fallback::{first_found, Attempt, Step};
use crate::tools::{Tool, ToolSet};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// Name of the document inside the catalog archive.
pub const PRODUCTS_FILE: &str = "products.xml";

const XML_START: &[u8] = b"<?xml";
const XML_END: &[u8] = b"</Products>";

/// One way of extracting the products document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    Cabextract,
    Tar,
    SevenZip,
    /// Scan the archive bytes for an embedded, uncompressed document.
    RawScan,
}

impl ExtractionMethod {
    /// Priority order.
    pub const CHAIN: [ExtractionMethod; 4] = [
        ExtractionMethod::Cabextract,
        ExtractionMethod::Tar,
        ExtractionMethod::SevenZip,
        ExtractionMethod::RawScan,
    ];

    fn tool(self) -> Option<Tool> {
        match self {
            ExtractionMethod::Cabextract => Some(Tool::Cabextract),
            ExtractionMethod::Tar => Some(Tool::Tar),
            ExtractionMethod::SevenZip => Some(Tool::SevenZip),
            ExtractionMethod::RawScan => None,
        }
    }

    fn command(self, program: &Path, input: &ExtractionInput<'_>) -> Command {
        let mut cmd = Command::new(program);
        match self {
            ExtractionMethod::Cabextract => {
                cmd.arg("-q")
                    .arg("-d")
                    .arg(input.workdir)
                    .arg("-F")
                    .arg(PRODUCTS_FILE)
                    .arg(input.archive);
            }
            ExtractionMethod::Tar => {
                cmd.arg("xf")
                    .arg(input.archive)
                    .arg(PRODUCTS_FILE)
                    .current_dir(input.workdir);
            }
            ExtractionMethod::SevenZip => {
                let mut out = std::ffi::OsString::from("-o");
                out.push(input.workdir);
                cmd.arg("e").arg("-y").arg(out).arg(input.archive).arg(PRODUCTS_FILE);
            }
            ExtractionMethod::RawScan => {}
        }
        cmd.stdin(Stdio::null());
        cmd
    }

    fn run_tool(self, program: &Path, input: &ExtractionInput<'_>) -> Attempt<String> {
        let target = input.workdir.join(PRODUCTS_FILE);
        // A previous method may have left a partial file behind.
        let _ = fs::remove_file(&target);

        let output = match self.command(program, input).output() {
            Ok(output) => output,
            Err(e) => return Attempt::skip(format!("could not run {}: {}", program.display(), e)),
        };
        if !output.status.success() {
            return Attempt::skip(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        read_document(&target)
    }
}

/// Archive and scratch directory shared by every method of one run.
#[derive(Debug)]
pub struct ExtractionInput<'a> {
    pub archive: &'a Path,
    pub workdir: &'a Path,
    pub tools: &'a ToolSet,
}

impl Step<ExtractionInput<'_>, String> for ExtractionMethod {
    fn name(&self) -> &'static str {
        match self {
            ExtractionMethod::Cabextract => "cabextract",
            ExtractionMethod::Tar => "tar",
            ExtractionMethod::SevenZip => "7z",
            ExtractionMethod::RawScan => "raw-scan",
        }
    }

    fn attempt(&self, input: &ExtractionInput<'_>) -> Attempt<String> {
        match self.tool() {
            Some(tool) => match input.tools.path(tool) {
                Some(program) => self.run_tool(program, input),
                None => Attempt::skip(format!("{} not installed", tool.executable())),
            },
            None => raw_scan(input.archive),
        }
    }
}

fn read_document(path: &Path) -> Attempt<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return Attempt::skip(format!("no {} produced", PRODUCTS_FILE)),
    };
    match String::from_utf8(bytes) {
        Ok(text) => {
            let text = text.trim_start_matches('\u{feff}');
            if text.trim().is_empty() {
                Attempt::skip(format!("{} is empty", PRODUCTS_FILE))
            } else {
                Attempt::Found(text.to_string())
            }
        }
        Err(_) => Attempt::skip(format!("{} is not UTF-8", PRODUCTS_FILE)),
    }
}

fn raw_scan(archive: &Path) -> Attempt<String> {
    let data = match fs::read(archive) {
        Ok(data) => data,
        Err(e) => return Attempt::skip(format!("read {}: {}", archive.display(), e)),
    };
    match scan_embedded_xml(&data) {
        Some(slice) => match std::str::from_utf8(slice) {
            Ok(text) => Attempt::Found(text.to_string()),
            Err(_) => Attempt::skip("embedded document is not UTF-8"),
        },
        None => Attempt::skip("no embedded products document"),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Locates `<?xml` … `</Products>` in raw archive bytes.
///
/// Returns the slice from the first `<?xml` through the first `</Products>`
/// after it, inclusive.
pub fn scan_embedded_xml(data: &[u8]) -> Option<&[u8]> {
    let start = find(data, XML_START)?;
    let end = start + find(&data[start..], XML_END)? + XML_END.len();
    Some(&data[start..end])
}

/// Runs the extraction chain against a downloaded archive.
pub fn extract_document(archive: &Path, tools: &ToolSet) -> Result<String, WinfetchError> {
    let workdir = tempfile::Builder::new()
        .prefix("winfetch-extract-")
        .tempdir()
        .map_err(|e| WinfetchError::DocumentNotExtractable {
            reason: format!("create scratch directory: {e}"),
        })?;
    let input = ExtractionInput {
        archive,
        workdir: workdir.path(),
        tools,
    };

    match first_found(&ExtractionMethod::CHAIN, &input) {
        Some((method, document)) => {
            tracing::info!(method, bytes = document.len(), "extracted catalog document");
            Ok(document)
        }
        None => Err(WinfetchError::DocumentNotExtractable {
            reason: "all extraction methods exhausted".to_string(),
        }),
    }
}
