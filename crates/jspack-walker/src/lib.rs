//! jspack Walker - directory walking and file collection
//!
//! This crate handles the file system side of things:
//! - Walking the scan root depth-first
//! - Pruning excluded directories before descending
//! - Reading matching files into a [`jspack_core::Bundle`]
//!
//! Unreadable files are reported, never fatal.

mod collector;

pub use collector::{collect_tree, read_file, CollectOptions, CollectResult, FileRead};
