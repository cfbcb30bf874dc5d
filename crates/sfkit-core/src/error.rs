//! Error types for the sfkit-core library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! detailed error variants for each validation failure, plus [`Error::report`]
//! which renders the stable one-line reason codes that form the tool's
//! external output contract.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sfkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all container operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to open or stat an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A read or seek on the container handle failed (truncated file included)
    #[error("read failed at offset {offset}: {source}")]
    Read {
        /// Byte offset where the read was attempted
        offset: u64,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The 4-byte magic does not identify an SF container
    #[error("wrong magic: expected {expected:#010x}, found {found:#010x}", expected = crate::container::MAGIC)]
    BadMagic {
        /// The magic value actually present in the file
        found: u32,
    },

    /// Format version outside the supported range
    #[error("wrong version: {found} not in [{min}, {max}]", min = crate::container::VERSION_MIN, max = crate::container::VERSION_MAX)]
    BadVersion {
        /// The version value actually present in the file
        found: u16,
    },

    /// Declared section count outside the supported range
    #[error("wrong section count: {found} not in [{min}, {max}]", min = crate::container::SECTION_COUNT_MIN, max = crate::container::SECTION_COUNT_MAX)]
    BadSectionCount {
        /// The section count actually present in the file
        found: u8,
    },

    /// A section descriptor carries a type code outside the allowed set
    #[error("wrong section type: section {index} has type {found}")]
    BadSectionType {
        /// Zero-based index of the offending descriptor
        index: usize,
        /// The type code actually present
        found: u8,
    },

    /// A section declares more content than the configured sanity bound
    #[error("section size {size} exceeds limit {limit}")]
    SectionOversized {
        /// Declared content size in bytes
        size: u32,
        /// Configured upper bound in bytes
        limit: u32,
    },

    /// Requested section index is out of range
    #[error("invalid section: index {index} out of range for {count} sections")]
    InvalidSection {
        /// Zero-based index that was requested
        index: usize,
        /// Number of sections the container declares
        count: u8,
    },

    /// Requested line number is out of range for the section content
    #[error("invalid line: {line} out of range for {available} lines")]
    InvalidLine {
        /// One-based line number that was requested
        line: u32,
        /// Number of newline-terminated lines the section holds
        available: u32,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new read failure at the given offset
    pub fn read(offset: u64, source: std::io::Error) -> Self {
        Self::Read { offset, source }
    }

    /// Returns true if this is a structural format violation
    /// (bad magic, version, section count, or section type)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. }
                | Self::BadVersion { .. }
                | Self::BadSectionCount { .. }
                | Self::BadSectionType { .. }
        )
    }

    /// Returns true if this is an I/O failure (open failed, short read)
    pub fn is_io(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::Read { .. })
    }

    /// Renders the stable reason line(s) printed for this failure.
    ///
    /// These strings are an external compatibility contract and must not
    /// change: structural and argument errors produce `ERROR` followed by a
    /// fixed reason code, resource failures produce a single bare line.
    pub fn report(&self) -> &'static str {
        match self {
            Self::FileRead { .. } | Self::Read { .. } => "Couldn't read from file",
            Self::SectionOversized { .. } => "Couldn't allocate memory",
            Self::BadMagic { .. } => "ERROR\nwrong magic",
            Self::BadVersion { .. } => "ERROR\nwrong version",
            Self::BadSectionCount { .. } => "ERROR\nwrong sect_nr",
            Self::BadSectionType { .. } => "ERROR\nwrong sect_types",
            Self::InvalidSection { .. } => "ERROR\ninvalid section",
            Self::InvalidLine { .. } => "ERROR\ninvalid line",
        }
    }
}
