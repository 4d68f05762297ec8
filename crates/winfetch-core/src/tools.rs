//! External tool detection.
//!
//! Looks up the archive and conversion tools on PATH once per run. The
//! resulting `ToolSet` is passed explicitly to the catalog resolver and the
//! converter; nothing re-probes PATH later.

use crate::error::WinfetchError;
use std::path::{Path, PathBuf};

/// External tools the core may shell out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Cabextract,
    Tar,
    SevenZip,
    WimlibImagex,
}

impl Tool {
    pub const ALL: [Tool; 4] = [
        Tool::Cabextract,
        Tool::Tar,
        Tool::SevenZip,
        Tool::WimlibImagex,
    ];

    /// Executable name looked up on PATH.
    pub fn executable(self) -> &'static str {
        match self {
            Tool::Cabextract => "cabextract",
            Tool::Tar => "tar",
            Tool::SevenZip => "7z",
            Tool::WimlibImagex => "wimlib-imagex",
        }
    }

    /// Install command for the current host platform.
    pub fn install_hint(self) -> &'static str {
        let macos = cfg!(target_os = "macos");
        match (self, macos) {
            (Tool::Cabextract, true) => "brew install cabextract",
            (Tool::Cabextract, false) => "sudo apt install cabextract",
            (Tool::Tar, true) => "brew install libarchive",
            (Tool::Tar, false) => "sudo apt install libarchive-tools",
            (Tool::SevenZip, true) => "brew install p7zip",
            (Tool::SevenZip, false) => "sudo apt install p7zip-full",
            (Tool::WimlibImagex, true) => "brew install wimlib",
            (Tool::WimlibImagex, false) => "sudo apt install wimtools",
        }
    }
}

/// Tools found on this host, detected once at startup.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    cabextract: Option<PathBuf>,
    tar: Option<PathBuf>,
    seven_zip: Option<PathBuf>,
    wimlib_imagex: Option<PathBuf>,
}

impl ToolSet {
    /// Searches PATH for every known tool.
    pub fn detect() -> Self {
        let mut set = ToolSet::default();
        for tool in Tool::ALL {
            match which::which(tool.executable()) {
                Ok(path) => {
                    tracing::debug!(tool = tool.executable(), path = %path.display(), "found tool");
                    set = set.with(tool, path);
                }
                Err(_) => {
                    tracing::debug!(tool = tool.executable(), "tool not found on PATH");
                }
            }
        }
        set
    }

    /// A set with no tools; only the raw scan fallback remains usable.
    pub fn none() -> Self {
        ToolSet::default()
    }

    /// Returns a copy with `tool` marked available at `path`.
    pub fn with(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match tool {
            Tool::Cabextract => self.cabextract = path,
            Tool::Tar => self.tar = path,
            Tool::SevenZip => self.seven_zip = path,
            Tool::WimlibImagex => self.wimlib_imagex = path,
        }
        self
    }

    pub fn path(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Cabextract => self.cabextract.as_deref(),
            Tool::Tar => self.tar.as_deref(),
            Tool::SevenZip => self.seven_zip.as_deref(),
            Tool::WimlibImagex => self.wimlib_imagex.as_deref(),
        }
    }

    pub fn has(&self, tool: Tool) -> bool {
        self.path(tool).is_some()
    }

    /// Preflight for the catalog path: at least one of cabextract or tar.
    pub fn require_catalog_tools(&self) -> Result<(), WinfetchError> {
        if self.has(Tool::Cabextract) || self.has(Tool::Tar) {
            return Ok(());
        }
        Err(WinfetchError::ToolUnavailable {
            tool: Tool::Cabextract.executable(),
            purpose: "CAB extraction",
            hint: Tool::Cabextract.install_hint(),
        })
    }

    /// Preflight for ESD to WIM conversion.
    pub fn require_converter(&self) -> Result<&Path, WinfetchError> {
        self.path(Tool::WimlibImagex)
            .ok_or(WinfetchError::ToolUnavailable {
                tool: Tool::WimlibImagex.executable(),
                purpose: "ESD conversion",
                hint: Tool::WimlibImagex.install_hint(),
            })
    }
}
