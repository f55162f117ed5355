//! Tree collection.
//!
//! Walks a scan root, skips excluded directories entirely, and reads
//! every file whose extension is allowed into a bundle keyed by its
//! path relative to the root.

use jspack_core::{
    decode_text, Bundle, DecodeOptions, DecodePolicy, FileFilter, PackError, Result,
};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Outcome of reading one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRead {
    /// Content decoded; `lossy` means invalid bytes were dropped or replaced.
    Loaded { content: String, lossy: bool },
    /// The file couldn't be read.
    Failed { reason: String },
}

/// Options for a collection run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Follow symbolic links when walking directories.
    pub follow_symlinks: bool,

    /// How invalid UTF-8 and line endings are handled.
    pub decode: DecodeOptions,
}

/// Result of collecting a tree.
#[derive(Debug)]
pub struct CollectResult {
    /// The scan root as an absolute path, symlinks left unresolved.
    pub root: PathBuf,

    /// Collected files, keyed by path relative to `root`.
    pub bundle: Bundle,

    /// Number of files read successfully.
    pub files_collected: usize,

    /// Files that had invalid UTF-8 (still included).
    pub lossy_files: Vec<String>,

    /// Paths that couldn't be read, with the reason.
    pub failures: Vec<(String, String)>,

    /// Number of excluded directories skipped.
    pub dirs_pruned: usize,

    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

/// Reads a single file as text under the given decode options.
pub fn read_file(path: &Path, options: DecodeOptions) -> FileRead {
    match fs::read(path) {
        Ok(bytes) => {
            let decoded = decode_text(&bytes, options);
            FileRead::Loaded {
                content: decoded.text,
                lossy: decoded.lossy,
            }
        }
        Err(e) => FileRead::Failed {
            reason: e.to_string(),
        },
    }
}

/// Collects every matching file under `root`.
///
/// Fails only if the root itself can't be used. Anything that goes
/// wrong further down is logged, recorded in the result, and skipped.
///
/// # Example
///
/// ```no_run
/// use jspack_core::FileFilter;
/// use jspack_walker::{collect_tree, CollectOptions};
/// use std::path::Path;
///
/// let filter = FileFilter::default();
/// let result = collect_tree(Path::new("./server"), &filter, CollectOptions::default()).unwrap();
/// println!("Collected {} files", result.files_collected);
/// ```
pub fn collect_tree(
    root: &Path,
    filter: &FileFilter,
    options: CollectOptions,
) -> Result<CollectResult> {
    let start = Instant::now();

    let resolved = fs::canonicalize(root).map_err(|e| PackError::root(root, e))?;
    if !resolved.is_dir() {
        return Err(PackError::NotADirectory(resolved));
    }

    // Keys and the output location follow the path as given, not its target
    let root = absolute_root(root).map_err(|e| PackError::root(root, e))?;

    info!("Collecting files under {}", root.display());

    let mut bundle = Bundle::new();
    let mut lossy_files = Vec::new();
    let mut failures = Vec::new();
    let mut dirs_pruned = 0;

    let walker = WalkDir::new(&root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let prune = is_pruned(entry, filter);
            if prune {
                debug!("Pruning {}", entry.path().display());
                dirs_pruned += 1;
            }
            !prune
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(PackError::Walk {
                    path: root.clone(),
                    source: e.into(),
                });
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                warn!("Failed to walk {}: {}", path, e);
                failures.push((path, e.to_string()));
                continue;
            }
        };

        let path = entry.path();

        // Skip directories
        if path.is_dir() {
            continue;
        }

        if !filter.matches_extension(path) {
            continue;
        }

        let key = relative_key(&root, path);

        // Distinct non-UTF-8 names can collapse to the same key
        if bundle.contains(&key) {
            let reason = format!("key '{}' is already taken by another file", key);
            warn!("Skipping {}: {}", path.display(), reason);
            failures.push((path.display().to_string(), reason));
            continue;
        }

        match read_file(path, options.decode) {
            FileRead::Loaded { content, lossy } => {
                if lossy {
                    warn!(
                        "Invalid UTF-8 in {}, undecodable bytes {}",
                        path.display(),
                        lossy_verb(options.decode.invalid)
                    );
                    lossy_files.push(key.clone());
                }
                debug!("Read {}", path.display());
                bundle.insert(key, content);
            }
            FileRead::Failed { reason } => {
                warn!("Error reading {}: {}", path.display(), reason);
                failures.push((path.display().to_string(), reason));
            }
        }
    }

    let duration = start.elapsed();
    let files_collected = bundle.len();

    info!(
        "Collected {} files ({} failed, {} dirs pruned) in {:?}",
        files_collected,
        failures.len(),
        dirs_pruned,
        duration
    );

    Ok(CollectResult {
        root,
        bundle,
        files_collected,
        lossy_files,
        failures,
        dirs_pruned,
        duration_ms: duration.as_millis() as u64,
    })
}

/// Excluded directories are pruned anywhere below the root, never the root itself.
fn is_pruned(entry: &DirEntry, filter: &FileFilter) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| filter.is_excluded_dir(name))
            .unwrap_or(false)
}

/// Makes `path` absolute and folds `.` and `..` lexically, like `os.path.abspath`.
fn absolute_root(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn lossy_verb(policy: DecodePolicy) -> &'static str {
    match policy {
        DecodePolicy::Drop => "dropped",
        DecodePolicy::Replace => "replaced",
    }
}
