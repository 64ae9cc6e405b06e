//! Listing the entries of the hi2txt archive.
//!
//! The archive holds one `<rom>.xml` per supported game, which is how the
//! catalog is discovered. Two listers are available behind [`ArchiveLister`]:
//! the external 7-Zip tool, and an in-process zip reader.

mod native;
mod seven_zip;

pub use native::NativeZipLister;
pub use seven_zip::{parse_technical_listing, SevenZipLister};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::ArchiveListerKind;

/// Errors from listing an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The archive does not exist.
    #[error("Archive not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The listing tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The listing tool exited with a failure code.
    #[error("{tool} failed with exit code {exit_code}: {output}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        output: String,
    },

    /// The archive could not be opened.
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive is not a readable zip file.
    #[error("Failed to read zip directory of {}: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Something that can enumerate entry names inside an archive.
pub trait ArchiveLister {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Entry paths inside `archive`, in archive order. Empty names are dropped.
    fn list_entries(&self, archive: &Path) -> ArchiveResult<Vec<String>>;
}

/// Build the lister selected in the settings.
pub fn lister_for(kind: ArchiveListerKind, seven_zip_exe: &Path) -> Box<dyn ArchiveLister> {
    match kind {
        ArchiveListerKind::SevenZip => Box::new(SevenZipLister::new(seven_zip_exe)),
        ArchiveListerKind::Native => Box::new(NativeZipLister),
    }
}
