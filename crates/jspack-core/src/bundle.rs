//! The collected path-to-content map and its JSON form.

use crate::error::{PackError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "js_server.json";

/// Relative path to file content, one entry per collected file.
///
/// Keys are kept sorted so two runs over the same tree serialize to
/// the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bundle {
    files: BTreeMap<String, String>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file. Returns the previous content if the key was taken.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.files.insert(path.into(), content.into())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Total bytes of content held.
    pub fn content_bytes(&self) -> usize {
        self.files.values().map(String::len).sum()
    }

    /// Serializes to pretty JSON: 2-space indent, non-ASCII left as is.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.files)?)
    }

    /// Writes the JSON document to `path`, replacing whatever is there.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| PackError::write(path, e))?;
        info!("Wrote {} files to {}", self.len(), path.display());
        Ok(())
    }
}

/// Where the output goes by default: next to the scan root, not inside it.
pub fn default_output_path(root: &Path, file_name: &str) -> Result<PathBuf> {
    root.parent()
        .map(|parent| parent.join(file_name))
        .ok_or_else(|| PackError::NoParentDirectory(root.to_path_buf()))
}
