//! 7-Zip based archive listing.
//!
//! Runs `7z l <archive> -slt` and reads the technical listing, where every
//! entry is reported on a `Path = <name>` line.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{ArchiveError, ArchiveLister, ArchiveResult};
use crate::process::run_captured;

const TOOL_NAME: &str = "7-Zip";
const PATH_PREFIX: &str = "Path = ";

/// Lists archives with the external 7-Zip executable.
#[derive(Debug, Clone)]
pub struct SevenZipLister {
    exe: PathBuf,
}

impl SevenZipLister {
    /// Create a lister using the given `7z` executable.
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// The command that lists `archive`.
    pub fn command(&self, archive: &Path) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("l").arg(archive).arg("-slt");
        cmd
    }
}

impl ArchiveLister for SevenZipLister {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn list_entries(&self, archive: &Path) -> ArchiveResult<Vec<String>> {
        if !archive.exists() {
            return Err(ArchiveError::FileNotFound(archive.to_path_buf()));
        }

        let output = run_captured(&mut self.command(archive)).map_err(|source| {
            ArchiveError::Launch {
                tool: TOOL_NAME.to_string(),
                source,
            }
        })?;

        if !output.success() {
            return Err(ArchiveError::ToolFailed {
                tool: TOOL_NAME.to_string(),
                exit_code: output.exit_code(),
                output: output.text.trim().to_string(),
            });
        }

        let entries = parse_technical_listing(&output.text, archive);
        tracing::debug!("7-Zip listed {} entries in {}", entries.len(), archive.display());
        Ok(entries)
    }
}

/// Extract entry names from `7z l -slt` output.
///
/// The header block repeats the archive's own path on a `Path = ` line, so
/// that line is skipped (compared case-insensitively).
pub fn parse_technical_listing(text: &str, archive: &Path) -> Vec<String> {
    let archive_path = archive.to_string_lossy();

    text.lines()
        .filter_map(|line| line.strip_prefix(PATH_PREFIX))
        .map(|entry| entry.trim_end_matches('\r'))
        .filter(|entry| !entry.is_empty())
        .filter(|entry| !entry.eq_ignore_ascii_case(&archive_path))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
7-Zip 19.00 (x64) : Copyright (c) 1999-2018 Igor Pavlov : 2019-02-21

Listing archive: C:\\Dumper\\hi2txt\\hi2txt.zip

--
Path = C:\\Dumper\\hi2txt\\hi2txt.zip
Type = zip
Physical Size = 1048576

----------
Path = _template.xml
Folder = -
Size = 512

Path = 1942.xml
Folder = -
Size = 2048

Path = pacman.xml
Folder = -
Size = 1024
";

    #[test]
    fn parses_entries_and_skips_archive_header() {
        let archive = Path::new("c:\\dumper\\hi2txt\\HI2TXT.zip");
        let entries = parse_technical_listing(SAMPLE, archive);
        assert_eq!(entries, vec!["_template.xml", "1942.xml", "pacman.xml"]);
    }

    #[test]
    fn ignores_empty_path_lines() {
        let text = "Path = \nPath = a.xml\r\nType = zip\n";
        let entries = parse_technical_listing(text, Path::new("x.zip"));
        assert_eq!(entries, vec!["a.xml"]);
    }

    #[test]
    fn command_uses_technical_listing() {
        let lister = SevenZipLister::new("7z");
        let cmd = lister.command(Path::new("hi2txt.zip"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, vec!["l", "hi2txt.zip", "-slt"]);
    }

    #[test]
    fn missing_archive_is_reported() {
        let lister = SevenZipLister::new("7z");
        let result = lister.list_entries(Path::new("/nonexistent/hi2txt.zip"));
        assert!(matches!(result, Err(ArchiveError::FileNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("hi2txt.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        let lister = SevenZipLister::new("false");
        let result = lister.list_entries(&archive);
        assert!(matches!(
            result,
            Err(ArchiveError::ToolFailed { exit_code: 1, .. })
        ));
    }
}
