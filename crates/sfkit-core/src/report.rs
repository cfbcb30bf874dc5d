//! Report formatting for successfully parsed containers.
//!
//! The report layout is an external compatibility contract:
//!
//! ```text
//! SUCCESS
//! version=<version>
//! nr_sections=<count>
//! section<i>: <name> <type> <size>
//! ```
//!
//! with one `section<i>` line per descriptor, in file order, one-based.
//! Name bytes are written raw because they may not be valid UTF-8, so the
//! report targets an [`io::Write`] sink rather than a `String`.

use crate::container::Container;
use std::io::{self, Write};

/// Writes the structural report for a parsed container to `out`.
pub fn write_report<W: Write>(container: &Container, out: &mut W) -> io::Result<()> {
    writeln!(out, "SUCCESS")?;
    writeln!(out, "version={}", container.header.version)?;
    writeln!(out, "nr_sections={}", container.header.section_count)?;

    for (i, section) in container.sections.iter().enumerate() {
        write!(out, "section{}: ", i + 1)?;
        out.write_all(section.display_name())?;
        writeln!(out, " {} {}", section.type_code, section.size)?;
    }
    Ok(())
}

/// Renders the report into an owned byte buffer.
pub fn report_bytes(container: &Container) -> Vec<u8> {
    let mut out = Vec::new();
    write_report(container, &mut out).expect("writing to a Vec cannot fail");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::fixtures::{build_image, TestSection};
    use crate::container::ContainerReader;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn parse(image: Vec<u8>) -> Container {
        ContainerReader::new()
            .read_container(&mut Cursor::new(image))
            .unwrap()
    }

    #[test]
    fn test_report_layout() {
        let container = parse(build_image(
            84,
            &[
                TestSection::new(b"alpha", 18, b"aaaa"),
                TestSection::new(b"beta", 21, b"bb"),
                TestSection::new(b"gamma", 48, b""),
                TestSection::new(b"delta", 60, b"dddddd"),
                TestSection::new(b"omega", 89, b"o"),
            ],
        ));

        let report = String::from_utf8(report_bytes(&container)).unwrap();
        assert_eq!(
            report,
            "SUCCESS\n\
             version=84\n\
             nr_sections=5\n\
             section1: alpha 18 4\n\
             section2: beta 21 2\n\
             section3: gamma 48 0\n\
             section4: delta 60 6\n\
             section5: omega 89 1\n"
        );
    }

    #[test]
    fn test_report_preserves_raw_name_bytes() {
        let container = parse(build_image(
            80,
            &[
                TestSection::new(&[0xff, 0xfe, b'!'], 18, b""),
                TestSection::new(b"b", 21, b""),
                TestSection::new(b"c", 48, b""),
                TestSection::new(b"d", 60, b""),
                TestSection::new(b"e", 64, b""),
            ],
        ));

        let report = report_bytes(&container);
        let line_start = b"section1: ";
        let pos = report
            .windows(line_start.len())
            .position(|w| w == line_start)
            .unwrap();
        assert_eq!(&report[pos + line_start.len()..pos + line_start.len() + 3], &[0xff, 0xfe, b'!']);
    }

    #[test]
    fn test_report_sections_in_file_order() {
        let container = parse(build_image(
            100,
            &[
                TestSection::new(b"z", 89, b""),
                TestSection::new(b"y", 70, b""),
                TestSection::new(b"x", 64, b""),
                TestSection::new(b"w", 60, b""),
                TestSection::new(b"v", 48, b""),
            ],
        ));

        let report = String::from_utf8(report_bytes(&container)).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[3], "section1: z 89 0");
        assert_eq!(lines[7], "section5: v 48 0");
    }
}
