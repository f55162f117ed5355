//! Which files get collected and which directories get pruned.
//!
//! Extensions are compared case-insensitively. Excluded directory
//! names are matched exactly against the basename.

use std::collections::BTreeSet;
use std::path::Path;

/// Extensions collected when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js"];

/// Directory names pruned when nothing else is configured.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Extension allowlist plus directory exclusions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    extensions: BTreeSet<String>,
    excluded_dirs: BTreeSet<String>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileFilter {
    /// Creates the default filter: `.js` files, `node_modules` pruned.
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| normalize_extension(e)).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Replaces the extension allowlist.
    ///
    /// Accepts `js`, `.js` or `.JS` alike. Empty entries are ignored.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Replaces the set of directory names to prune.
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_dirs = dirs
            .into_iter()
            .map(|d| d.as_ref().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn excluded_dirs(&self) -> impl Iterator<Item = &str> {
        self.excluded_dirs.iter().map(String::as_str)
    }

    /// True if the file's extension is in the allowlist.
    ///
    /// A dotfile like `.js` has no extension and never matches.
    pub fn matches_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// True if a directory with this basename must not be descended into.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
