//! Low-level byte layout of the SF container format.
//!
//! This module pins down the on-disk encoding and decodes fixed-size
//! records into typed structs.
//!
//! ## Layout Overview
//!
//! All multi-byte integers are little-endian. The file opens with a 9-byte
//! header:
//!
//! | field         | type | offset |
//! |---------------|------|--------|
//! | magic         | u32  | 0      |
//! | header_size   | u16  | 4      |
//! | version       | u16  | 6      |
//! | section_count | u8   | 8      |
//!
//! followed immediately by `section_count` contiguous 23-byte descriptor
//! records (no padding between records):
//!
//! | field  | type     | offset in record |
//! |--------|----------|------------------|
//! | name   | [u8; 14] | 0                |
//! | type   | u8       | 14               |
//! | offset | u32      | 15               |
//! | size   | u32      | 19               |
//!
//! The reference producer wrote these structs through C `read()` calls with
//! a one-byte placeholder field and compensating seeks; the placeholder is
//! a read-side artifact and never appears on disk.

use crate::error::{Error, Result};

/// Magic constant identifying an SF container ("uJ4a" read as a
/// little-endian u32)
pub const MAGIC: u32 = 1_630_816_885;

/// Size of the file header in bytes
pub const HEADER_LEN: usize = 9;

/// Size of one section descriptor record in bytes
pub const SECTION_RECORD_LEN: usize = 23;

/// Fixed width of a section name in bytes
pub const SECTION_NAME_LEN: usize = 14;

/// Lowest supported format version
pub const VERSION_MIN: u16 = 76;

/// Highest supported format version
pub const VERSION_MAX: u16 = 103;

/// Lowest valid section count
pub const SECTION_COUNT_MIN: u8 = 5;

/// Highest valid section count
pub const SECTION_COUNT_MAX: u8 = 13;

/// The only section type codes a well-formed container may carry
pub const ALLOWED_SECTION_TYPES: [u8; 7] = [18, 21, 48, 60, 64, 70, 89];

/// Returns true if the given type code belongs to the allowed set
pub fn is_allowed_type(type_code: u8) -> bool {
    ALLOWED_SECTION_TYPES.contains(&type_code)
}

/// The fixed file header of an SF container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Format magic, always [`MAGIC`] in a valid container
    pub magic: u32,
    /// Declared header size; recorded but not enforced
    pub header_size: u16,
    /// Format version, valid range [`VERSION_MIN`]..=[`VERSION_MAX`]
    pub version: u16,
    /// Number of descriptor records following the header
    pub section_count: u8,
}

impl FileHeader {
    /// Decodes and validates a header from its 9-byte on-disk form.
    ///
    /// Validation order matches the reference behavior: magic first, then
    /// version, then section count, failing on the first violation.
    pub fn from_bytes(raw: &[u8; HEADER_LEN]) -> Result<Self> {
        let magic = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        if magic != MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        let header_size = u16::from_le_bytes([raw[4], raw[5]]);

        let version = u16::from_le_bytes([raw[6], raw[7]]);
        if !(VERSION_MIN..=VERSION_MAX).contains(&version) {
            return Err(Error::BadVersion { found: version });
        }

        let section_count = raw[8];
        if !(SECTION_COUNT_MIN..=SECTION_COUNT_MAX).contains(&section_count) {
            return Err(Error::BadSectionCount {
                found: section_count,
            });
        }

        Ok(Self {
            magic,
            header_size,
            version,
            section_count,
        })
    }
}

/// One entry of the section descriptor array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Raw name bytes, fixed width, not necessarily NUL-terminated
    pub name: [u8; SECTION_NAME_LEN],
    /// Section type code
    pub type_code: u8,
    /// Absolute file offset where the section content starts
    pub offset: u32,
    /// Section content length in bytes
    pub size: u32,
}

impl SectionDescriptor {
    /// Decodes a descriptor from its 23-byte on-disk record.
    ///
    /// Performs no validation; type checking is the caller's decision
    /// because the extractor only validates the descriptors it reads.
    pub fn from_bytes(raw: &[u8; SECTION_RECORD_LEN]) -> Self {
        let mut name = [0u8; SECTION_NAME_LEN];
        name.copy_from_slice(&raw[..SECTION_NAME_LEN]);

        Self {
            name,
            type_code: raw[14],
            offset: u32::from_le_bytes([raw[15], raw[16], raw[17], raw[18]]),
            size: u32::from_le_bytes([raw[19], raw[20], raw[21], raw[22]]),
        }
    }

    /// Returns true if this descriptor's type code is in the allowed set
    pub fn has_allowed_type(&self) -> bool {
        is_allowed_type(self.type_code)
    }

    /// Name bytes as displayed: up to the first NUL, at most the fixed
    /// width, passed through verbatim otherwise
    pub fn display_name(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(SECTION_NAME_LEN);
        &self.name[..end]
    }
}
