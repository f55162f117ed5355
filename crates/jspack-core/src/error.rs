//! Error types for collection and serialization.
//!
//! Only structural failures live here. A single file that can't be
//! read is not an error at this level; the walker reports it as a
//! value and keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for fallible jspack operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Things that stop a run.
#[derive(Error, Debug)]
pub enum PackError {
    /// The scan root doesn't exist or can't be resolved.
    #[error("cannot access scan root '{path}': {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root exists but is a file.
    #[error("scan root is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    /// The default output lives next to the root, so the root needs a parent.
    #[error("scan root '{0}' has no parent directory for the output file")]
    NoParentDirectory(PathBuf),

    /// Walking failed at the root itself.
    #[error("failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Couldn't write the output document.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Couldn't read a config file.
    #[error("failed to read config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file exists but isn't valid.
    #[error("invalid config '{path}': {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PackError {
    /// Creates a root access error with the path for context.
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RootInaccessible {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error with the path for context.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
