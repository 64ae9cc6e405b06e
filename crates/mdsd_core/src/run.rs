//! One complete run: resolve and validate tools, build the catalog, drive
//! the batch and report the summary.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::archive::{lister_for, ArchiveError};
use crate::batch::{BatchDriver, BatchError, BatchSummary};
use crate::catalog::{load_catalog, CatalogRules};
use crate::config::Settings;
use crate::converter::Hi2TxtConverter;
use crate::logging::RunLogger;
use crate::models::{ArchiveListerKind, OutputFormat, SessionStrategy};
use crate::preflight::{validate, PreflightResult, Toolchain};
use crate::results::ResultStore;
use crate::session::{build_session, EmulatorLaunch, SessionError, StateLocator};

/// Failure after pre-flight validation passed.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to list hi2txt archive: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Failed to prepare emulator session: {0}")]
    Session(#[from] SessionError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Result type for a run.
pub type RunResult<T> = Result<T, RunError>;

/// Validated, immutable input of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub format: OutputFormat,
    /// How long each game runs before MAME is closed.
    pub delay: Duration,
    pub toolchain: Toolchain,
    pub strategy: SessionStrategy,
    pub emulator_args: Vec<String>,
    pub lister: ArchiveListerKind,
    pub catalog_rules: CatalogRules,
}

impl RunConfig {
    /// Combine command line inputs with settings and check every needed
    /// tool exists. Nothing is launched or written.
    pub fn prepare(
        root: &Path,
        settings: &Settings,
        format: OutputFormat,
        delay: Duration,
    ) -> PreflightResult<Self> {
        let toolchain = Toolchain::resolve(root, &settings.paths);
        validate(
            &toolchain,
            settings.session.strategy,
            settings.catalog.lister,
        )?;

        Ok(Self {
            format,
            delay,
            toolchain,
            strategy: settings.session.strategy,
            emulator_args: settings.session.emulator_args.clone(),
            lister: settings.catalog.lister,
            catalog_rules: CatalogRules::from(&settings.catalog),
        })
    }

    fn emulator_launch(&self) -> EmulatorLaunch {
        EmulatorLaunch {
            exe: self.toolchain.emulator_exe.clone(),
            working_dir: self.toolchain.emulator_dir.clone(),
            args: self.emulator_args.clone(),
        }
    }
}

/// Run the whole batch for `config`.
pub fn execute(config: &RunConfig, logger: &RunLogger) -> RunResult<BatchSummary> {
    let toolchain = &config.toolchain;

    logger.phase("Catalog");
    let lister = lister_for(config.lister, &toolchain.archive_tool_exe);
    let catalog = load_catalog(
        lister.as_ref(),
        &toolchain.converter_archive,
        &config.catalog_rules,
    )?;
    logger.info(&format!(
        "Found {} supported games in {}",
        catalog.len(),
        toolchain.converter_archive.display()
    ));

    let session = build_session(
        config.strategy,
        config.emulator_launch(),
        &toolchain.automation_exe,
        config.delay,
    )?;
    let driver = BatchDriver::new(
        session,
        StateLocator::new(&toolchain.hi_folder, &toolchain.nvram_folder),
        Box::new(Hi2TxtConverter::new(
            &toolchain.converter_exe,
            &toolchain.hiscore_dat,
        )),
        ResultStore::new(&toolchain.results_folder, config.format),
    );

    let summary = driver.run(&catalog, logger)?;
    summary.report(logger);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;
    use crate::models::RunCounters;
    use crate::preflight::PreflightError;
    use tempfile::tempdir;

    #[test]
    fn prepare_rejects_empty_install() {
        let dir = tempdir().unwrap();
        let err = RunConfig::prepare(
            dir.path(),
            &Settings::default(),
            OutputFormat::Xml,
            Duration::from_secs(30),
        )
        .unwrap_err();
        assert!(matches!(err, PreflightError::MissingEmulator { .. }));
        // nothing created
        assert!(!dir.path().join("Results").exists());
    }

    #[cfg(unix)]
    #[test]
    fn end_to_end_with_benchmark_and_native_lister() {
        use std::fs::{self, File};
        use std::io::Write;
        use zip::write::SimpleFileOptions;
        use zip::ZipWriter;

        crate::logging::init_test_tracing();
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("MAME/hi")).unwrap();
        fs::write(root.join("MAME/hiscore.dat"), b"").unwrap();
        fs::write(root.join("MAME/hi/bar.hi"), b"\x00\x10").unwrap();

        fs::create_dir_all(root.join("hi2txt")).unwrap();
        let mut zip = ZipWriter::new(File::create(root.join("hi2txt/hi2txt.zip")).unwrap());
        for name in ["foo.xml", "bar.xml", "_template.xml"] {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(b"<hi2txt/>").unwrap();
        }
        zip.finish().unwrap();

        let mut settings = Settings::default();
        settings.paths.emulator_exe = "/bin/sh".to_string();
        settings.paths.hiscore_dat = "MAME/hiscore.dat".to_string();
        settings.paths.converter_exe = "/bin/echo".to_string();
        settings.session.strategy = SessionStrategy::Benchmark;
        settings.session.emulator_args = vec!["-c".to_string(), "exit 0".to_string()];
        settings.catalog.lister = ArchiveListerKind::Native;

        let config =
            RunConfig::prepare(root, &settings, OutputFormat::Xml, Duration::ZERO).unwrap();
        let logger = RunLogger::console_only(LogConfig::default(), None);
        let summary = execute(&config, &logger).unwrap();

        assert_eq!(summary.catalog_size, 2);
        assert_eq!(
            summary.counters,
            RunCounters {
                success: 1,
                missing: 1,
                error: 0
            }
        );

        let success = fs::read_to_string(root.join("Results/Success/bar.xml")).unwrap();
        assert!(success.starts_with("-xml -r "));
        assert!(success.contains("bar.hi -hiscoredat "));
        assert!(root.join("Results/Missing/foo.txt").is_file());

        // second run resumes and does nothing
        let summary = execute(&config, &logger).unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.counters.total(), 0);
    }
}
