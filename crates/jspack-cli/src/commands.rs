//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use jspack_core::{default_output_path, DecodePolicy, NewlineMode, PackConfig};
use jspack_walker::{collect_tree, CollectOptions, CollectResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Command-line settings layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct PackOverrides {
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub follow_symlinks: bool,
    pub replace_invalid: bool,
    pub keep_newlines: bool,
    pub config: Option<PathBuf>,
}

/// Loads the config for `path` and applies command-line overrides.
///
/// An explicit `--config` must exist; the implicit one is optional.
pub fn resolve_config(path: &Path, overrides: &PackOverrides) -> Result<PackConfig> {
    let mut config = match overrides.config {
        Some(ref config_path) => PackConfig::load(config_path)?,
        None => PackConfig::load_or_default(path)?,
    };

    if !overrides.extensions.is_empty() {
        config.extensions = overrides.extensions.clone();
    }
    if !overrides.exclude.is_empty() {
        config.exclude = overrides.exclude.clone();
    }
    if overrides.follow_symlinks {
        config.follow_symlinks = true;
    }
    if overrides.replace_invalid {
        config.decode = DecodePolicy::Replace;
    }
    if overrides.keep_newlines {
        config.newlines = NewlineMode::Keep;
    }

    debug!("Resolved config: {:?}", config);
    Ok(config)
}

/// Write a default config into a scan root.
pub fn init(path: &Path) -> Result<()> {
    let config_path = PackConfig::path_for(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    PackConfig::default().write(&config_path)?;

    println!("{} Initialized jspack in {}", "✓".green(), path.display());
    println!("  Edit {} to change filters", config_path.display().to_string().cyan());
    println!("  Run {} to build the bundle", "jspack pack".cyan());

    Ok(())
}

/// Collect a tree and write the bundle.
///
/// Without `output`, the bundle goes beside the root as given on the
/// command line, even when that root is a symlink.
pub fn pack(
    path: &Path,
    output: Option<&Path>,
    overrides: &PackOverrides,
    spinner: &ProgressBar,
) -> Result<()> {
    let config = resolve_config(path, overrides)?;

    println!("{}", "Packing source tree...".cyan());
    let result = collect_with_spinner(path, &config, spinner)?;

    let out_path = match output {
        Some(out) => out.to_path_buf(),
        None => default_output_path(&result.root, &config.output_name)?,
    };

    result.bundle.write_to(&out_path)?;

    println!(
        "{} Exported {} files ({} bytes) in {}ms",
        "✓".green(),
        result.files_collected.to_string().cyan(),
        result.bundle.content_bytes(),
        result.duration_ms
    );
    println!("  Saved to {}", out_path.display().to_string().cyan());

    report_problems(&result, &config);

    Ok(())
}

/// Show what `pack` would collect.
pub fn list(path: &Path, overrides: &PackOverrides, spinner: &ProgressBar) -> Result<()> {
    let config = resolve_config(path, overrides)?;
    let result = collect_with_spinner(path, &config, spinner)?;

    println!("{}", "📁 Files to pack".cyan().bold());
    for (file, content) in result.bundle.iter() {
        println!("  {} {}", file, format!("({} bytes)", content.len()).dimmed());
    }

    println!();
    println!("  {} {}", "Root:".dimmed(), result.root.display());
    println!("  {} {}", "Files:".dimmed(), result.files_collected);
    println!("  {} {}", "Bytes:".dimmed(), result.bundle.content_bytes());
    println!("  {} {}", "Pruned dirs:".dimmed(), result.dirs_pruned);
    match default_output_path(&result.root, &config.output_name) {
        Ok(out) => println!("  {} {}", "Output:".dimmed(), out.display()),
        Err(e) => println!("  {} {}", "Output:".dimmed(), e.to_string().red()),
    }

    report_problems(&result, &config);

    Ok(())
}

fn collect_with_spinner(
    path: &Path,
    config: &PackConfig,
    spinner: &ProgressBar,
) -> Result<CollectResult> {
    spinner.set_draw_target(ProgressDrawTarget::stderr());
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Scanning files...");

    let options = CollectOptions {
        follow_symlinks: config.follow_symlinks,
        decode: config.decode_options(),
    };
    let result = collect_tree(path, &config.filter(), options);

    spinner.finish_and_clear();

    Ok(result?)
}

fn report_problems(result: &CollectResult, config: &PackConfig) {
    // Warn if nothing matched
    if result.bundle.is_empty() {
        eprintln!("\n{} No files collected. Check:", "⚠ Warning:".yellow());
        let filter = config.filter();
        eprintln!(
            "  - Extensions: {}",
            filter
                .extensions()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ")
        );
        eprintln!(
            "  - Excluded directories: {}",
            filter.excluded_dirs().collect::<Vec<_>>().join(", ")
        );
    }

    if !result.lossy_files.is_empty() {
        println!(
            "\n{} {} files had invalid UTF-8 (included anyway):",
            "⚠".yellow(),
            result.lossy_files.len()
        );
        for file in result.lossy_files.iter().take(5) {
            println!("  {}", file.yellow());
        }
        if result.lossy_files.len() > 5 {
            println!("  ... and {} more", result.lossy_files.len() - 5);
        }
    }

    if !result.failures.is_empty() {
        println!("\n{} files could not be read:", "⚠".yellow());
        for (file, error) in result.failures.iter().take(5) {
            println!("  {} - {}", file.red(), error);
        }
        if result.failures.len() > 5 {
            println!("  ... and {} more", result.failures.len() - 5);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run_pack(path: &Path, output: Option<&Path>) -> Result<()> {
        pack(path, output, &PackOverrides::default(), &ProgressBar::hidden())
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let dir = tempdir().unwrap();
        let overrides = PackOverrides {
            extensions: vec!["ts".into()],
            exclude: vec!["dist".into()],
            follow_symlinks: true,
            replace_invalid: true,
            keep_newlines: true,
            config: None,
        };

        let config = resolve_config(dir.path(), &overrides).unwrap();
        assert_eq!(config.extensions, vec!["ts"]);
        assert_eq!(config.exclude, vec!["dist"]);
        assert!(config.follow_symlinks);
        assert_eq!(config.decode, DecodePolicy::Replace);
        assert_eq!(config.newlines, NewlineMode::Keep);
    }

    #[test]
    fn test_empty_overrides_keep_config_file() {
        let dir = tempdir().unwrap();
        let saved = PackConfig {
            extensions: vec!["mjs".into()],
            ..PackConfig::default()
        };
        saved.write(&PackConfig::path_for(dir.path())).unwrap();

        let config = resolve_config(dir.path(), &PackOverrides::default()).unwrap();
        assert_eq!(config, saved);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempdir().unwrap();
        let overrides = PackOverrides {
            config: Some(dir.path().join("nope.json")),
            ..PackOverrides::default()
        };
        assert!(resolve_config(dir.path(), &overrides).is_err());
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();

        let loaded = PackConfig::load(&PackConfig::path_for(dir.path())).unwrap();
        assert_eq!(loaded, PackConfig::default());

        // Second run leaves the file alone
        init(dir.path()).unwrap();
    }

    #[test]
    fn test_pack_writes_beside_root() {
        let dir = tempdir().unwrap();
        let server = dir.path().join("server");
        fs::create_dir_all(server.join("node_modules")).unwrap();
        fs::write(server.join("a.js"), "x").unwrap();
        fs::write(server.join("b.txt"), "y").unwrap();
        fs::write(server.join("node_modules").join("c.js"), "z").unwrap();
        fs::write(server.join("crlf.js"), "a\r\nb\rc\n").unwrap();

        run_pack(&server, None).unwrap();

        let written = fs::read_to_string(dir.path().join("js_server.json")).unwrap();
        assert_eq!(
            written,
            "{\n  \"a.js\": \"x\",\n  \"crlf.js\": \"a\\nb\\nc\\n\"\n}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_pack_symlinked_root_writes_beside_link() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real").join("server");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("a.js"), "x").unwrap();

        let work = dir.path().join("work");
        fs::create_dir_all(&work).unwrap();
        let link = work.join("server");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        run_pack(&link, None).unwrap();

        assert!(work.join("js_server.json").exists());
        assert!(!dir.path().join("real").join("js_server.json").exists());
    }

    #[test]
    fn test_pack_explicit_output() {
        let dir = tempdir().unwrap();
        let server = dir.path().join("server");
        fs::create_dir_all(&server).unwrap();
        fs::write(server.join("a.js"), "x").unwrap();
        let out = dir.path().join("custom.json");

        run_pack(&server, Some(&out)).unwrap();

        assert!(out.exists());
        assert!(!dir.path().join("js_server.json").exists());
    }

    #[test]
    fn test_pack_missing_root_writes_nothing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("server");

        assert!(run_pack(&missing, None).is_err());
        assert!(!dir.path().join("js_server.json").exists());
    }

    #[test]
    fn test_list_writes_nothing() {
        let dir = tempdir().unwrap();
        let server = dir.path().join("server");
        fs::create_dir_all(&server).unwrap();
        fs::write(server.join("a.js"), "x").unwrap();

        list(&server, &PackOverrides::default(), &ProgressBar::hidden()).unwrap();

        assert!(!dir.path().join("js_server.json").exists());
    }
}
