//! Persistent configuration.
//!
//! A config lives at `<root>/.jspack/config.json`. Every field is
//! optional; anything left out falls back to the built-in defaults.

use crate::bundle::DEFAULT_OUTPUT_FILE;
use crate::decode::{DecodeOptions, DecodePolicy, NewlineMode};
use crate::error::{PackError, Result};
use crate::filter::{FileFilter, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding jspack state inside a scan root.
pub const CONFIG_DIR: &str = ".jspack";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Settings for a pack run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PackConfig {
    /// Extensions to collect.
    pub extensions: Vec<String>,

    /// Directory names never descended into.
    pub exclude: Vec<String>,

    /// Output file name, placed in the scan root's parent.
    pub output_name: String,

    pub follow_symlinks: bool,

    pub decode: DecodePolicy,

    pub newlines: NewlineMode,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            output_name: DEFAULT_OUTPUT_FILE.to_string(),
            follow_symlinks: false,
            decode: DecodePolicy::default(),
            newlines: NewlineMode::default(),
        }
    }
}

impl PackConfig {
    /// Path of the config file for a given scan root.
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PackError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PackError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the root's config if it has one, defaults otherwise.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = Self::path_for(root);
        if path.is_file() {
            debug!("Loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PackError::write(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PackError::write(path, e))
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            invalid: self.decode,
            newlines: self.newlines,
        }
    }

    /// Builds the file filter these settings describe.
    pub fn filter(&self) -> FileFilter {
        FileFilter::new()
            .with_extensions(&self.extensions)
            .with_excluded_dirs(&self.exclude)
    }
}
