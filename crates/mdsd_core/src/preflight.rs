//! Resolving tool locations and checking they exist before any work starts.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PathSettings;
use crate::models::{ArchiveListerKind, SessionStrategy};

/// Missing dependency found during pre-flight validation.
///
/// Checked in declaration order; the first one found aborts the run.
#[derive(Error, Debug)]
pub enum PreflightError {
    #[error(
        "MAME 64 files not found; place the latest version of MAME 64-bit at {}.\n\
         The hiscore plugin database is expected at {}.\n\n\
         Do not overwrite the existing MAME configuration files when copying MAME. \
         However, you may need to edit the mame.ini\nfile to set the path to your ROMs (rompath setting).",
        .emulator.display(),
        .reference_db.display()
    )]
    MissingEmulator {
        emulator: PathBuf,
        reference_db: PathBuf,
    },

    #[error("Missing hi2txt executable {}. Cannot continue.", .0.display())]
    MissingConverter(PathBuf),

    #[error("Missing hi2txt archive {}. Cannot continue.", .0.display())]
    MissingConverterArchive(PathBuf),

    #[error("Missing 7-Zip executable {}. Cannot continue.", .0.display())]
    MissingArchiveTool(PathBuf),

    #[error("Missing AutoHotkey executable {}. Cannot continue.", .0.display())]
    MissingAutomationTool(PathBuf),
}

/// Result type for pre-flight validation.
pub type PreflightResult<T> = Result<T, PreflightError>;

/// Absolute locations of every external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub emulator_exe: PathBuf,
    /// Working directory of the emulator.
    pub emulator_dir: PathBuf,
    pub hiscore_dat: PathBuf,
    pub hi_folder: PathBuf,
    pub nvram_folder: PathBuf,
    pub converter_exe: PathBuf,
    pub converter_archive: PathBuf,
    pub archive_tool_exe: PathBuf,
    pub automation_exe: PathBuf,
    pub results_folder: PathBuf,
}

impl Toolchain {
    /// Resolve configured paths against the install root.
    ///
    /// Absolute settings are kept as they are.
    pub fn resolve(root: &Path, paths: &PathSettings) -> Self {
        let emulator_exe = root.join(&paths.emulator_exe);
        let emulator_dir = emulator_exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());

        Self {
            emulator_exe,
            emulator_dir,
            hiscore_dat: root.join(&paths.hiscore_dat),
            hi_folder: root.join(&paths.hi_folder),
            nvram_folder: root.join(&paths.nvram_folder),
            converter_exe: root.join(&paths.converter_exe),
            converter_archive: root.join(&paths.converter_archive),
            archive_tool_exe: root.join(&paths.archive_tool_exe),
            automation_exe: root.join(&paths.automation_exe),
            results_folder: root.join(&paths.results_folder),
        }
    }
}

/// Check the tools needed by this strategy and lister are present.
///
/// The 7-Zip check only applies to the `seven_zip` lister and the AutoHotkey
/// check only to the timed strategy.
pub fn validate(
    toolchain: &Toolchain,
    strategy: SessionStrategy,
    lister: ArchiveListerKind,
) -> PreflightResult<()> {
    if !toolchain.emulator_exe.is_file() || !toolchain.hiscore_dat.is_file() {
        return Err(PreflightError::MissingEmulator {
            emulator: toolchain.emulator_exe.clone(),
            reference_db: toolchain.hiscore_dat.clone(),
        });
    }

    if !toolchain.converter_exe.is_file() {
        return Err(PreflightError::MissingConverter(
            toolchain.converter_exe.clone(),
        ));
    }

    if !toolchain.converter_archive.is_file() {
        return Err(PreflightError::MissingConverterArchive(
            toolchain.converter_archive.clone(),
        ));
    }

    if lister == ArchiveListerKind::SevenZip && !toolchain.archive_tool_exe.is_file() {
        return Err(PreflightError::MissingArchiveTool(
            toolchain.archive_tool_exe.clone(),
        ));
    }

    if strategy == SessionStrategy::Timed && !toolchain.automation_exe.is_file() {
        return Err(PreflightError::MissingAutomationTool(
            toolchain.automation_exe.clone(),
        ));
    }

    tracing::debug!("Pre-flight checks passed for {:?}", toolchain);
    Ok(())
}
