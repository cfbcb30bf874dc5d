//! Targeted extraction of one line of text from one section.
//!
//! The extractor reads as little of the descriptor table as the request
//! needs: for section index `i` it reads records `0..=i` and type-checks
//! exactly those. A bad-typed descriptor before the target therefore
//! blocks extraction even when the target itself is well-typed, while a
//! bad-typed descriptor after the target is never examined. This scoping
//! is inherited from the reference implementation and kept on purpose;
//! callers wanting full-table validation use
//! [`ContainerReader::read_container`].
//!
//! Line numbering is one-based from the start of the section content. A
//! section holds as many addressable lines as it holds `\n` bytes; line
//! `k` is the k-th newline-terminated segment, returned without its
//! trailing newline. A trailing run of bytes not closed by `\n` is not
//! addressable.

use crate::container::{ContainerReader, ReaderConfig};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// Counts newline (0x0A) bytes in the content
pub fn newline_count(content: &[u8]) -> usize {
    content.iter().filter(|&&b| b == b'\n').count()
}

/// Returns the one-based line `line` of `content`, without its trailing
/// newline.
///
/// Fails with [`Error::InvalidLine`] when `line` is zero or exceeds the
/// number of newline-terminated lines.
pub fn line_at(content: &[u8], line: u32) -> Result<&[u8]> {
    let available = newline_count(content) as u32;
    if line == 0 || line > available {
        return Err(Error::InvalidLine { line, available });
    }
    content
        .split(|&b| b == b'\n')
        .nth(line as usize - 1)
        .ok_or(Error::InvalidLine { line, available })
}

/// Extracts single lines from container sections
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    reader: ContainerReader,
}

impl Extractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new extractor with custom reader configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            reader: ContainerReader::with_config(config),
        }
    }

    /// Extracts line `line` (one-based) from the section at
    /// `section_index` (zero-based).
    ///
    /// Validates the header, the requested index against the declared
    /// section count, and the type codes of descriptors `0..=section_index`
    /// only (see the module docs for why the scope stops there).
    pub fn extract_line<R: Read + Seek>(
        &self,
        reader: &mut R,
        section_index: usize,
        line: u32,
    ) -> Result<Vec<u8>> {
        let header = self.reader.read_header(reader)?;
        if section_index >= header.section_count as usize {
            return Err(Error::InvalidSection {
                index: section_index,
                count: header.section_count,
            });
        }

        // Records past the target are never read, let alone validated.
        let sections = self
            .reader
            .read_sections(reader, (section_index + 1) as u8)?;
        for (index, section) in sections.iter().enumerate() {
            if !section.has_allowed_type() {
                return Err(Error::BadSectionType {
                    index,
                    found: section.type_code,
                });
            }
        }

        let target = &sections[section_index];
        let content = self.reader.read_section_content(reader, target)?;
        debug!(
            "Extracting line {} from section {} ({} bytes)",
            line,
            section_index + 1,
            content.len()
        );

        line_at(&content, line).map(|l| l.to_vec())
    }
}

/// Extracts a line from a container at the given path.
///
/// This is a convenience function that opens the file and extracts.
pub fn extract_line_from_file(
    path: impl AsRef<Path>,
    section_index: usize,
    line: u32,
) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    Extractor::new().extract_line(&mut file, section_index, line)
}
