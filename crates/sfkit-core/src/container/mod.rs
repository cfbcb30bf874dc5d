//! Container reading and validation.
//!
//! This module provides functionality to read the fixed header and section
//! descriptor table of an SF container and to classify arbitrary files as
//! matching containers.
//!
//! ## Algorithm Overview
//!
//! 1. Read and validate the 9-byte header (magic, version, section count)
//! 2. Read `section_count` contiguous descriptor records
//! 3. Check every descriptor's type code against the allowed set
//! 4. For bulk discovery, additionally require at least one section whose
//!    content holds exactly [`SNIPPET_NEWLINES`] newline bytes
//!
//! Readers are generic over [`Read`] + [`Seek`] because section content is
//! addressed by absolute file offset; [`read_container_file`] and
//! [`is_container_file`] wrap plain paths.

mod layout;

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, trace};

pub use layout::{
    is_allowed_type, FileHeader, SectionDescriptor, ALLOWED_SECTION_TYPES, HEADER_LEN, MAGIC,
    SECTION_COUNT_MAX, SECTION_COUNT_MIN, SECTION_NAME_LEN, SECTION_RECORD_LEN, VERSION_MAX,
    VERSION_MIN,
};

/// Exact number of newline bytes one section must contain for a container
/// to match during bulk discovery
pub const SNIPPET_NEWLINES: usize = 15;

/// A fully read container: one header plus its descriptor table.
///
/// Owns its descriptors for the duration of one operation; nothing is
/// shared or mutated after construction.
#[derive(Debug, Clone)]
pub struct Container {
    /// The validated file header
    pub header: FileHeader,
    /// Descriptors in file order, `header.section_count` of them
    pub sections: Vec<SectionDescriptor>,
}

/// Configuration for container reading
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Upper bound on a single section's content size in bytes.
    ///
    /// The `size` field is untrusted input; loads above this bound are
    /// rejected instead of allocating.
    pub max_section_size: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_section_size: 10 * 1024 * 1024, // 10 MiB
        }
    }
}

impl ReaderConfig {
    /// Creates a new reader config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum section content size
    pub fn max_section_size(mut self, size: u32) -> Self {
        self.max_section_size = size;
        self
    }
}

/// Reader for SF container headers and section tables
#[derive(Debug, Clone, Default)]
pub struct ContainerReader {
    config: ReaderConfig,
}

impl ContainerReader {
    /// Creates a new reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Reads and validates the file header.
    ///
    /// Always starts from offset 0, so the same handle can be reused
    /// across calls. On success the cursor sits at the start of the
    /// descriptor array.
    pub fn read_header<R: Read + Seek>(&self, reader: &mut R) -> Result<FileHeader> {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::read(0, e))?;

        let mut raw = [0u8; HEADER_LEN];
        reader.read_exact(&mut raw).map_err(|e| Error::read(0, e))?;

        let header = FileHeader::from_bytes(&raw)?;
        trace!(
            "Header ok: version={} sections={}",
            header.version,
            header.section_count
        );
        Ok(header)
    }

    /// Reads the first `count` section descriptors.
    ///
    /// Descriptors are contiguous 23-byte records immediately after the
    /// header. No type validation happens here; the validator checks the
    /// full table while the extractor only checks the records it read.
    pub fn read_sections<R: Read + Seek>(
        &self,
        reader: &mut R,
        count: u8,
    ) -> Result<Vec<SectionDescriptor>> {
        reader
            .seek(SeekFrom::Start(HEADER_LEN as u64))
            .map_err(|e| Error::read(HEADER_LEN as u64, e))?;

        let mut sections = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let record_offset = (HEADER_LEN + i * SECTION_RECORD_LEN) as u64;
            let mut raw = [0u8; SECTION_RECORD_LEN];
            reader
                .read_exact(&mut raw)
                .map_err(|e| Error::read(record_offset, e))?;
            sections.push(SectionDescriptor::from_bytes(&raw));
        }
        Ok(sections)
    }

    /// Loads the raw content of one section into memory.
    ///
    /// The allocation is sized from the descriptor's `size` field after
    /// checking it against the configured sanity bound; a truncated file
    /// surfaces as a read error, not a short buffer.
    pub fn read_section_content<R: Read + Seek>(
        &self,
        reader: &mut R,
        section: &SectionDescriptor,
    ) -> Result<Vec<u8>> {
        if section.size > self.config.max_section_size {
            return Err(Error::SectionOversized {
                size: section.size,
                limit: self.config.max_section_size,
            });
        }

        reader
            .seek(SeekFrom::Start(section.offset as u64))
            .map_err(|e| Error::read(section.offset as u64, e))?;

        let mut content = vec![0u8; section.size as usize];
        reader
            .read_exact(&mut content)
            .map_err(|e| Error::read(section.offset as u64, e))?;
        Ok(content)
    }

    /// Reads and validates a complete container: header, full descriptor
    /// table, and every descriptor's type code.
    pub fn read_container<R: Read + Seek>(&self, reader: &mut R) -> Result<Container> {
        let header = self.read_header(reader)?;
        let sections = self.read_sections(reader, header.section_count)?;

        for (index, section) in sections.iter().enumerate() {
            if !section.has_allowed_type() {
                return Err(Error::BadSectionType {
                    index,
                    found: section.type_code,
                });
            }
        }

        debug!(
            "Parsed container: version={} sections={}",
            header.version,
            sections.len()
        );
        Ok(Container { header, sections })
    }

    /// Classifies whether the handle holds a well-formed, matching
    /// container.
    ///
    /// Every failure collapses to `false`: structural violations,
    /// unreadable or oversized sections, everything. On top of structural
    /// validity, at least one section's content must contain exactly
    /// [`SNIPPET_NEWLINES`] newline bytes. Bulk discovery uses this to
    /// skip non-matching files silently.
    pub fn is_valid_container<R: Read + Seek>(&self, reader: &mut R) -> bool {
        let container = match self.read_container(reader) {
            Ok(container) => container,
            Err(e) => {
                trace!("Not a container: {}", e);
                return false;
            }
        };

        for (index, section) in container.sections.iter().enumerate() {
            match self.read_section_content(reader, section) {
                Ok(content) => {
                    let newlines = crate::extract::newline_count(&content);
                    trace!("Section {} holds {} newlines", index + 1, newlines);
                    if newlines == SNIPPET_NEWLINES {
                        return true;
                    }
                }
                Err(e) => {
                    trace!("Section {} unreadable: {}", index + 1, e);
                    return false;
                }
            }
        }
        false
    }
}

/// Reads and validates a container from a file path.
///
/// This is a convenience function that opens the file and reads it.
pub fn read_container_file(path: impl AsRef<Path>) -> Result<Container> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    ContainerReader::new().read_container(&mut file)
}

/// Classifies a file path with [`ContainerReader::is_valid_container`].
///
/// Files that cannot be opened simply do not match.
pub fn is_container_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match File::open(path) {
        Ok(mut file) => ContainerReader::new().is_valid_container(&mut file),
        Err(e) => {
            trace!("Cannot open {}: {}", path.display(), e);
            false
        }
    }
}
