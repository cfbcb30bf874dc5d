//! End-to-end tests over real on-disk container files.

use sfkit_core::{
    extract_line_from_file, is_container_file, read_container_file, report_bytes, Error,
    ALLOWED_SECTION_TYPES, MAGIC,
};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER_LEN: usize = 9;
const RECORD_LEN: usize = 23;

/// Encodes a container image: header, descriptor table, then the section
/// contents packed in order.
fn encode(version: u16, sections: &[(&str, u8, &[u8])]) -> Vec<u8> {
    let mut image = Vec::new();
    image.extend_from_slice(&MAGIC.to_le_bytes());
    image.extend_from_slice(&(HEADER_LEN as u16).to_le_bytes());
    image.extend_from_slice(&version.to_le_bytes());
    image.push(sections.len() as u8);

    let mut offset = HEADER_LEN + sections.len() * RECORD_LEN;
    for (name, type_code, content) in sections {
        let mut record = [0u8; RECORD_LEN];
        record[..name.len()].copy_from_slice(name.as_bytes());
        record[14] = *type_code;
        record[15..19].copy_from_slice(&(offset as u32).to_le_bytes());
        record[19..23].copy_from_slice(&(content.len() as u32).to_le_bytes());
        image.extend_from_slice(&record);
        offset += content.len();
    }
    for (_, _, content) in sections {
        image.extend_from_slice(content);
    }
    image
}

fn write_temp(image: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(image).unwrap();
    file.flush().unwrap();
    file
}

fn sample_sections() -> Vec<(&'static str, u8, &'static [u8])> {
    vec![
        ("intro", 18, b"hello\nworld\n" as &[u8]),
        ("code", 21, b"fn main() {}\n"),
        ("blank", 48, b""),
        ("misc", 60, b"a\nb\nc\n"),
        ("close", 89, b"bye"),
    ]
}

#[test]
fn parse_report_roundtrip() {
    let file = write_temp(&encode(77, &sample_sections()));

    let container = read_container_file(file.path()).unwrap();
    assert_eq!(container.header.version, 77);
    assert_eq!(container.sections.len(), 5);

    let report = String::from_utf8(report_bytes(&container)).unwrap();
    assert!(report.starts_with("SUCCESS\nversion=77\nnr_sections=5\n"));
    assert!(report.contains("section2: code 21 13\n"));
    assert!(report.ends_with("section5: close 89 3\n"));
}

#[test]
fn roundtrip_reports_identical_sections_for_each_valid_count() {
    for count in 5..=13usize {
        let sections: Vec<(&str, u8, &[u8])> = (0..count)
            .map(|i| ("sect", ALLOWED_SECTION_TYPES[i % 7], b"data\n" as &[u8]))
            .collect();
        let file = write_temp(&encode(103, &sections));

        let container = read_container_file(file.path()).unwrap();
        assert_eq!(container.header.section_count as usize, count);
        for (i, section) in container.sections.iter().enumerate() {
            assert_eq!(section.type_code, ALLOWED_SECTION_TYPES[i % 7]);
            assert_eq!(section.size, 5);
        }
    }
}

#[test]
fn short_file_fails_with_read_error() {
    let file = write_temp(b"uJ4");
    let err = read_container_file(file.path()).unwrap_err();
    assert!(err.is_io());
    assert_eq!(err.report(), "Couldn't read from file");
}

#[test]
fn wrong_magic_dominates() {
    let mut image = encode(77, &sample_sections());
    image[0] ^= 0xff;
    let file = write_temp(&image);

    let err = read_container_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::BadMagic { .. }));
    assert_eq!(err.report(), "ERROR\nwrong magic");
}

#[test]
fn extract_lines_from_disk() {
    let file = write_temp(&encode(90, &sample_sections()));

    assert_eq!(extract_line_from_file(file.path(), 3, 1).unwrap(), b"a");
    assert_eq!(extract_line_from_file(file.path(), 3, 2).unwrap(), b"b");
    assert_eq!(extract_line_from_file(file.path(), 3, 3).unwrap(), b"c");

    let err = extract_line_from_file(file.path(), 3, 4).unwrap_err();
    assert_eq!(err.report(), "ERROR\ninvalid line");

    let err = extract_line_from_file(file.path(), 9, 1).unwrap_err();
    assert_eq!(err.report(), "ERROR\ninvalid section");
}

#[test]
fn discovery_filter_matches_fifteen_line_snippets() {
    let snippet = "line\n".repeat(15);
    let mut sections: Vec<(&str, u8, &[u8])> = sample_sections();
    sections[2] = ("snippet", 48, snippet.as_bytes());
    let matching = write_temp(&encode(85, &sections));
    assert!(is_container_file(matching.path()));

    let plain = write_temp(&encode(85, &sample_sections()));
    assert!(!is_container_file(plain.path()));

    let garbage = write_temp(b"not a container at all");
    assert!(!is_container_file(garbage.path()));
}
