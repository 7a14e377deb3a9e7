//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external
//! CLI tools vidprep drives (ffprobe, ffmpeg, mkvextract, subliminal) and
//! provides lookup methods for the rest of the crate.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Media prober.
pub const FFPROBE: &str = "ffprobe";
/// Encoder.
pub const FFMPEG: &str = "ffmpeg";
/// Matroska track extractor.
pub const MKVEXTRACT: &str = "mkvextract";
/// Subtitle search-and-download client.
pub const SUBLIMINAL: &str = "subliminal";

/// Known tool names that the registry manages.
pub const KNOWN_TOOLS: &[&str] = &[FFPROBE, FFMPEG, MKVEXTRACT, SUBLIMINAL];

/// Explicit tool locations, overriding the `PATH` search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffprobe: Option<PathBuf>,
    #[serde(default)]
    pub ffmpeg: Option<PathBuf>,
    #[serde(default)]
    pub mkvextract: Option<PathBuf>,
    #[serde(default)]
    pub subliminal: Option<PathBuf>,
}

impl ToolsConfig {
    fn custom_path(&self, name: &str) -> Option<&Path> {
        match name {
            FFPROBE => self.ffprobe.as_deref(),
            FFMPEG => self.ffmpeg.as_deref(),
            MKVEXTRACT => self.mkvextract.as_deref(),
            SUBLIMINAL => self.subliminal.as_deref(),
            _ => None,
        }
    }
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of the version output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PathBuf>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// A configured path is used when it exists; otherwise [`which::which`]
    /// locates the tool. Tools that are not found are omitted.
    pub fn discover(config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let resolved = match config.custom_path(name) {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "Configured path for {} does not exist: {:?}, searching PATH",
                        name,
                        p
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tracing::debug!("Found {} at {:?}", name, path);
                tools.insert(name.to_string(), path);
            }
        }

        Self { tools }
    }

    /// Build a registry from explicit `(name, path)` pairs without touching
    /// the filesystem.
    pub fn from_paths<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            tools: entries
                .into_iter()
                .map(|(n, p)| (n.into(), p.into()))
                .collect(),
        }
    }

    /// Path of a discovered tool.
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.tools.get(name).map(PathBuf::as_path)
    }

    /// Whether a tool was found during discovery.
    pub fn is_available(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Path of a tool, or [`Error::ToolNotFound`] if it was not discovered.
    pub fn require(&self, name: &str) -> Result<&Path> {
        self.path(name).ok_or_else(|| Error::tool_not_found(name))
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(path) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, path),
                    path: Some(path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run the tool's version flag and return the first line of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        FFMPEG | FFPROBE => "-version",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
