//! jspack Core - filters, decoding and the bundle format
//!
//! This crate holds everything about a pack run that doesn't touch
//! the directory walk: which files qualify, how their bytes become
//! text, and how the collected map is written out as JSON.
//!
//! # Example
//!
//! ```no_run
//! use jspack_core::{Bundle, FileFilter};
//! use std::path::Path;
//!
//! let filter = FileFilter::default();
//! assert!(filter.matches_extension(Path::new("index.js")));
//!
//! let mut bundle = Bundle::new();
//! bundle.insert("index.js", "console.log(1);");
//! bundle.write_to(Path::new("js_server.json")).unwrap();
//! ```

pub mod bundle;
pub mod config;
pub mod decode;
pub mod error;
pub mod filter;

pub use bundle::{default_output_path, Bundle, DEFAULT_OUTPUT_FILE};
pub use config::PackConfig;
pub use decode::{decode_text, DecodeOptions, DecodePolicy, Decoded, NewlineMode};
pub use error::{PackError, Result};
pub use filter::FileFilter;
