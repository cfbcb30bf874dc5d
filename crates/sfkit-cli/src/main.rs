//! sfkit - Inspect SF binary containers and search directories for them
//!
//! This tool parses SF container files (fixed header plus a table of named,
//! typed sections), extracts single lines of text from sections, and walks
//! directories filtering entries by name suffix, permissions, or container
//! validity.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use sfkit_core::{extract_line_from_file, is_container_file, read_container_file, write_report};
use std::fs;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Inspect SF binary containers and search directories for them
#[derive(Parser, Debug)]
#[command(name = "sfkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a container and print its structural report
    Parse {
        /// Path to the container file
        file: PathBuf,
    },

    /// Extract one line of text from one section
    Extract {
        /// Path to the container file
        file: PathBuf,

        /// Section number (1-based)
        #[arg(short, long)]
        section: usize,

        /// Line number within the section (1-based)
        #[arg(short, long)]
        line: u32,
    },

    /// List directory entries, optionally filtered
    List {
        /// Directory to list
        directory: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Keep only entries whose file name ends with this suffix
        /// (case-sensitive, exact tail match)
        #[arg(long)]
        name_ends_with: Option<String>,

        /// Keep only entries whose mode renders exactly as this
        /// nine-character rwxrwxrwx string
        #[arg(long)]
        permissions: Option<String>,
    },

    /// Recursively find all files that are valid, matching containers
    Findall {
        /// Directory to search
        directory: PathBuf,
    },
}

/// Filters applied to directory entries during listing.
///
/// Built once per invocation; both filters must pass for an entry to be
/// printed, and an unset filter passes everything.
#[derive(Debug, Default)]
struct FilterConfig {
    /// Required file-name suffix
    name_ends_with: Option<String>,
    /// Required rwxrwxrwx permission rendering
    permissions: Option<String>,
}

impl FilterConfig {
    fn matches(&self, path: &Path) -> bool {
        if let Some(suffix) = &self.name_ends_with {
            // Compare raw bytes so non-UTF-8 file names still match
            let name = path.file_name().map(|n| n.as_bytes()).unwrap_or_default();
            if !name.ends_with(suffix.as_bytes()) {
                trace!("Suffix filter rejects {}", path.display());
                return false;
            }
        }

        if let Some(expected) = &self.permissions {
            // stat, following symlinks like the reference tool
            match fs::metadata(path) {
                Ok(meta) => {
                    let rendered = mode_string(meta.permissions().mode());
                    if rendered != *expected {
                        trace!(
                            "Permission filter rejects {} ({})",
                            path.display(),
                            rendered
                        );
                        return false;
                    }
                }
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    return false;
                }
            }
        }

        true
    }
}

/// Renders the low nine mode bits as the classic rwxrwxrwx string
fn mode_string(mode: u32) -> String {
    let mut out = String::with_capacity(9);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// Collects the entries under `directory` that pass the filters.
///
/// Non-recursive listing stays at depth 1. Directories themselves are
/// candidates, matching the reference behavior; only `.` and `..` have no
/// equivalent because walkdir never yields them.
fn list_entries(directory: &Path, recursive: bool, filters: &FilterConfig) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(directory).follow_links(false).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .map(|entry| entry.into_path())
        .filter(|path| filters.matches(path))
        .collect()
}

/// Recursively collects every file under `directory` that is a valid,
/// matching container.
fn find_containers(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let matched = is_container_file(path);
            if matched {
                debug!("Container match: {}", path.display());
            }
            matched
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Parse { file } => cmd_parse(&file, &mut out),
        Command::Extract {
            file,
            section,
            line,
        } => cmd_extract(&file, section, line, &mut out),
        Command::List {
            directory,
            recursive,
            name_ends_with,
            permissions,
        } => {
            let filters = FilterConfig {
                name_ends_with,
                permissions,
            };
            cmd_list(&directory, recursive, &filters, &mut out)
        }
        Command::Findall { directory } => cmd_findall(&directory, &mut out),
    }
}

/// Parse a single container and print the report or the reason code
fn cmd_parse(file: &Path, out: &mut impl Write) -> Result<()> {
    match read_container_file(file) {
        Ok(container) => {
            write_report(&container, out).context("failed to write report")?;
        }
        Err(e) => {
            debug!("Parse failed for {}: {}", file.display(), e);
            writeln!(out, "{}", e.report())?;
        }
    }
    Ok(())
}

/// Extract one line from one section; `section` and `line` are 1-based
fn cmd_extract(file: &Path, section: usize, line: u32, out: &mut impl Write) -> Result<()> {
    if section == 0 {
        writeln!(out, "ERROR\ninvalid section")?;
        return Ok(());
    }

    match extract_line_from_file(file, section - 1, line) {
        Ok(bytes) => {
            out.write_all(b"SUCCESS\n")
                .and_then(|()| out.write_all(&bytes))
                .and_then(|()| out.flush())
                .context("failed to write extracted line")?;
        }
        Err(e) => {
            debug!("Extract failed for {}: {}", file.display(), e);
            writeln!(out, "{}", e.report())?;
        }
    }
    Ok(())
}

/// List a directory with optional suffix/permission filters
fn cmd_list(
    directory: &Path,
    recursive: bool,
    filters: &FilterConfig,
    out: &mut impl Write,
) -> Result<()> {
    if !directory.is_dir() {
        writeln!(out, "ERROR\ninvalid directory path")?;
        return Ok(());
    }

    writeln!(out, "SUCCESS")?;
    for path in list_entries(directory, recursive, filters) {
        writeln!(out, "{}", path.display())?;
    }
    Ok(())
}

/// Recursively print every valid, matching container under a directory
fn cmd_findall(directory: &Path, out: &mut impl Write) -> Result<()> {
    if !directory.is_dir() {
        writeln!(out, "ERROR\ninvalid directory path")?;
        return Ok(());
    }

    writeln!(out, "SUCCESS")?;
    for path in find_containers(directory) {
        writeln!(out, "{}", path.display())?;
    }
    Ok(())
}
