//! Result records on disk.
//!
//! Every processed game gets exactly one file in one of three folders:
//!
//! ```text
//! Results/
//!     ├── Success/<rom>.xml|txt   hi2txt output, verbatim
//!     ├── Missing/<rom>.txt       fixed "no hiscore" message
//!     └── Error/<rom>.txt         hi2txt output, verbatim
//! ```
//!
//! A record's existence marks the game as done, so records are only written
//! once the outcome is known, via temp file + rename.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::{ItemId, Outcome, OutcomeKind, OutputFormat};

pub const SUCCESS_FOLDER: &str = "Success";
pub const MISSING_FOLDER: &str = "Missing";
pub const ERROR_FOLDER: &str = "Error";

/// Extension of Missing and Error records, whatever the output format.
const PLAIN_EXTENSION: &str = "txt";

/// The three possible record paths of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPaths {
    pub success: PathBuf,
    pub missing: PathBuf,
    pub error: PathBuf,
    /// Success record a run in the other output format would have written.
    pub other_success: PathBuf,
}

impl ResultPaths {
    /// Path used for the given classification.
    pub fn for_kind(&self, kind: OutcomeKind) -> &Path {
        match kind {
            OutcomeKind::Success => &self.success,
            OutcomeKind::Missing => &self.missing,
            OutcomeKind::Error => &self.error,
        }
    }

    /// First record that already exists, if any.
    ///
    /// A success record of either format counts, so switching between `-xml`
    /// and `-txt` never gives a game a second record.
    pub fn existing(&self) -> Option<&Path> {
        [&self.success, &self.other_success, &self.missing, &self.error]
            .into_iter()
            .find(|path| path.exists())
            .map(PathBuf::as_path)
    }
}

/// The Success / Missing / Error folder tree for one output format.
#[derive(Debug, Clone)]
pub struct ResultStore {
    success_dir: PathBuf,
    missing_dir: PathBuf,
    error_dir: PathBuf,
    format: OutputFormat,
}

impl ResultStore {
    /// Store rooted at `results_root`. Call `ensure_folders` before writing.
    pub fn new(results_root: &Path, format: OutputFormat) -> Self {
        Self {
            success_dir: results_root.join(SUCCESS_FOLDER),
            missing_dir: results_root.join(MISSING_FOLDER),
            error_dir: results_root.join(ERROR_FOLDER),
            format,
        }
    }

    /// Output format of success records.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Create the three folders if absent.
    pub fn ensure_folders(&self) -> io::Result<()> {
        for dir in [&self.success_dir, &self.missing_dir, &self.error_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Record paths for `item`.
    pub fn paths_for(&self, item: &ItemId) -> ResultPaths {
        ResultPaths {
            success: self
                .success_dir
                .join(format!("{}.{}", item, self.format.extension())),
            missing: self.missing_dir.join(format!("{}.{}", item, PLAIN_EXTENSION)),
            error: self.error_dir.join(format!("{}.{}", item, PLAIN_EXTENSION)),
            other_success: self
                .success_dir
                .join(format!("{}.{}", item, self.format.other().extension())),
        }
    }

    /// Write the record for `outcome`, returning its path.
    ///
    /// Never overwrites: callers check `ResultPaths::existing` first.
    pub fn write(&self, item: &ItemId, outcome: &Outcome) -> io::Result<PathBuf> {
        let paths = self.paths_for(item);
        let path = paths.for_kind(outcome.kind()).to_path_buf();
        atomic_write(&path, outcome.record_text())?;
        Ok(path)
    }
}

/// Write to `<path>.tmp` then rename over `path`.
fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)
}
