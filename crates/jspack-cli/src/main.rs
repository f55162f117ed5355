//! jspack CLI - Command-line interface for jspack
//!
//! Collects the source files of a directory tree into a single JSON
//! document mapping relative paths to file contents.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::ProgressBar;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::PackOverrides;

#[derive(Parser)]
#[command(name = "jspack")]
#[command(author = "jspack Contributors")]
#[command(version)]
#[command(about = "Bundle a source tree into one JSON document", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config to <PATH>/.jspack/config.json
    Init {
        /// Scan root to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Collect matching files and write them as JSON
    Pack {
        /// Scan root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to <parent of PATH>/js_server.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show which files would be packed without writing anything
    List {
        /// Scan root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Extension to collect, repeatable (replaces the configured set)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Directory name to prune, repeatable (replaces the configured set)
    #[arg(long, value_name = "DIR")]
    exclude: Vec<String>,

    /// Follow symbolic links while walking
    #[arg(long)]
    follow_symlinks: bool,

    /// Replace invalid UTF-8 with U+FFFD instead of dropping it
    #[arg(long)]
    replace_invalid: bool,

    /// Keep \r\n and \r line endings instead of converting them to \n
    #[arg(long)]
    keep_newlines: bool,

    /// Config file to use instead of <PATH>/.jspack/config.json
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl From<FilterArgs> for PackOverrides {
    fn from(args: FilterArgs) -> Self {
        Self {
            extensions: args.extensions,
            exclude: args.exclude,
            follow_symlinks: args.follow_symlinks,
            replace_invalid: args.replace_invalid,
            keep_newlines: args.keep_newlines,
            config: args.config,
        }
    }
}

/// Writes log lines to stderr with the spinner cleared, so the two never share a line.
struct SpinnerAwareWriter {
    spinner: ProgressBar,
}

impl Write for SpinnerAwareWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.spinner.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

fn main() {
    let cli = Cli::parse();

    // Hidden until a command starts scanning
    let spinner = ProgressBar::hidden();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    let log_spinner = spinner.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(move || SpinnerAwareWriter {
                    spinner: log_spinner.clone(),
                }),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Pack {
            path,
            output,
            filter,
        } => commands::pack(&path, output.as_deref(), &filter.into(), &spinner),
        Commands::List { path, filter } => commands::list(&path, &filter.into(), &spinner),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_writer_passes_through_while_spinning() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Scanning files...");

        let mut writer = SpinnerAwareWriter {
            spinner: spinner.clone(),
        };
        let line = b"WARN Error reading a.js: denied\n";
        assert_eq!(writer.write(line).unwrap(), line.len());
        assert!(writer.flush().is_ok());

        // The spinner keeps going after the line is out
        assert!(!spinner.is_finished());
        spinner.finish_and_clear();
    }
}
