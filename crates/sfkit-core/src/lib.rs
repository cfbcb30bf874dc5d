//! # sfkit-core
//!
//! A library for parsing SF binary containers and extracting lines of text
//! from their sections.
//!
//! An SF container is a fixed 9-byte header (magic, declared header size,
//! version, section count) followed by a table of fixed-size section
//! descriptors, each naming a typed byte range elsewhere in the file.
//!
//! This crate provides the core functionality for:
//! - Reading and validating container headers and section tables
//! - Classifying arbitrary files as matching containers (bulk discovery)
//! - Extracting a single one-based line of text from a single section
//! - Formatting the structural report for a parsed container
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`container`]: Header, section table, and validity classification
//! - [`extract`]: Targeted single-line extraction
//! - [`report`]: Structural report formatting
//! - [`error`]: Error types and the stable reason codes
//!
//! ## Example
//!
//! ```no_run
//! use sfkit_core::{read_container_file, write_report};
//!
//! let container = read_container_file("./snippets.sf")?;
//! let mut stdout = std::io::stdout();
//! write_report(&container, &mut stdout)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Directory traversal and argument handling live in the `sfkit` CLI
//! crate; this crate only needs a byte-addressable handle
//! (`Read + Seek`).

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod container;
pub mod error;
pub mod extract;
pub mod report;

// Re-export primary types for convenience
pub use container::{
    is_container_file, read_container_file, Container, ContainerReader, FileHeader, ReaderConfig,
    SectionDescriptor, ALLOWED_SECTION_TYPES, MAGIC, SNIPPET_NEWLINES,
};
pub use error::{Error, Result};
pub use extract::{extract_line_from_file, line_at, newline_count, Extractor};
pub use report::{report_bytes, write_report};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
