//! In-process zip listing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use zip::ZipArchive;

use super::{ArchiveError, ArchiveLister, ArchiveResult};

/// Reads entry names from the zip central directory, no external tool needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeZipLister;

impl ArchiveLister for NativeZipLister {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn list_entries(&self, archive: &Path) -> ArchiveResult<Vec<String>> {
        if !archive.exists() {
            return Err(ArchiveError::FileNotFound(archive.to_path_buf()));
        }

        let file = File::open(archive).map_err(|source| ArchiveError::Open {
            path: archive.to_path_buf(),
            source,
        })?;

        let zip = ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source,
        })?;

        let entries: Vec<String> = zip
            .file_names()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("Read {} entries from {}", entries.len(), archive.display());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, names: &[&str]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for name in names {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"<hi2txt/>").unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn lists_zip_entries() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("hi2txt.zip");
        write_zip(&archive, &["pacman.xml", "_template.xml", "readme.txt"]);

        let mut entries = NativeZipLister.list_entries(&archive).unwrap();
        entries.sort();
        assert_eq!(entries, vec!["_template.xml", "pacman.xml", "readme.txt"]);
    }

    #[test]
    fn rejects_non_zip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("hi2txt.zip");
        std::fs::write(&archive, b"definitely not a zip").unwrap();

        let result = NativeZipLister.list_entries(&archive);
        assert!(matches!(result, Err(ArchiveError::Zip { .. })));
    }

    #[test]
    fn missing_archive_is_reported() {
        let result = NativeZipLister.list_entries(Path::new("/nonexistent/hi2txt.zip"));
        assert!(matches!(result, Err(ArchiveError::FileNotFound(_))));
    }
}
