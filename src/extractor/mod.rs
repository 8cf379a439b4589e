//! Filesystem scan input and the extractor plugins.

pub mod pomxml;
pub mod pomxmlnet;

use crate::shared::Result;
use anyhow::Context;
use std::path::{Component, Path, PathBuf};

/// One manifest handed to an extractor: a slash-separated path relative
/// to the scan root, plus the root itself for locating sibling files
/// such as parent POMs.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub path: String,
    pub root: PathBuf,
}

impl ScanInput {
    pub fn new(root: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Reads the manifest bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        let full = self.root.join(&self.path);
        std::fs::read(&full).with_context(|| format!("failed to read {}", full.display()))
    }

    /// Reads another root-relative file, e.g. a local parent POM.
    pub fn read_relative(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        std::fs::read(&full).with_context(|| format!("failed to open parent file {path}"))
    }

    /// Whether a root-relative path exists, and if so whether it is a
    /// directory.
    pub fn stat(&self, path: &str) -> Option<bool> {
        std::fs::metadata(self.root.join(path))
            .ok()
            .map(|m| m.is_dir())
    }
}

/// Whether a path is a Maven manifest an extractor should handle.
pub fn file_required(path: &str) -> bool {
    Path::new(path)
        .file_name()
        .map(|name| name == "pom.xml")
        .unwrap_or(false)
}

/// Lexically normalizes a relative path, resolving `.` and `..`
/// components without touching the filesystem.
pub(crate) fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.is_empty() || parts.last().map(String::as_str) == Some("..") {
                    parts.push("..".to_string());
                } else {
                    parts.pop();
                }
            }
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }
    parts.join("/")
}
