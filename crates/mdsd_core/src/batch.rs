//! Batch driver: the sequential run-and-classify loop over the catalog.
//!
//! Per game:
//!
//! ```text
//! Pending ──► Skipped                      (a record already exists)
//!         └─► Running ──► Classified(Success | Missing | Error)
//! ```
//!
//! There are no retries. A record is only written once the outcome is known,
//! so re-running the batch resumes where the previous run stopped.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::classify::classify;
use crate::converter::{Converter, ConverterError};
use crate::logging::{LineKind, RunLogger};
use crate::models::{ItemId, MissingCause, Outcome, RunCounters};
use crate::results::ResultStore;
use crate::session::{EmulatorSession, SessionError, StateLocator};

/// Error that stops the whole batch, with the game it happened on.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Result folders could not be created.
    #[error("Failed to create result folders: {source}")]
    Setup {
        #[source]
        source: io::Error,
    },

    #[error("'{item}' failed in emulator session: {source}")]
    Session {
        item: String,
        #[source]
        source: SessionError,
    },

    #[error("'{item}' failed in conversion: {source}")]
    Converter {
        item: String,
        #[source]
        source: ConverterError,
    },

    #[error("'{item}' failed writing {}: {source}", .path.display())]
    Write {
        item: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// What happened to one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// A record from an earlier run exists; nothing was launched.
    Skipped { existing: PathBuf },
    /// The game was run and its record written.
    Classified { outcome: Outcome, record: PathBuf },
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of games in the catalog.
    pub catalog_size: usize,
    /// Games skipped because a record already existed.
    pub skipped: usize,
    /// Outcomes of the games processed in this run.
    pub counters: RunCounters,
}

impl BatchSummary {
    /// Write the final summary to the run log, whatever its level.
    pub fn report(&self, logger: &RunLogger) {
        logger.summary(&LineKind::Phase.decorate("Process completed"));
        logger.summary(&format!("Total ROMs Processed: {}", self.catalog_size));
        logger.summary(&format!("Skipped: {}", self.skipped));
        logger.summary(&format!(
            "ROMs Successfully Parsed: {}",
            self.counters.success
        ));
        logger.summary(&format!(
            "ROMs Missing hiscore/nvram: {}",
            self.counters.missing
        ));
        logger.summary(&format!("ROMs Errored: {}", self.counters.error));
    }
}

/// Runs every game of a catalog through session, conversion and recording.
pub struct BatchDriver {
    session: Box<dyn EmulatorSession>,
    locator: StateLocator,
    converter: Box<dyn Converter>,
    store: ResultStore,
}

impl BatchDriver {
    pub fn new(
        session: Box<dyn EmulatorSession>,
        locator: StateLocator,
        converter: Box<dyn Converter>,
        store: ResultStore,
    ) -> Self {
        Self {
            session,
            locator,
            converter,
            store,
        }
    }

    /// Process `catalog` in order.
    ///
    /// Per-game Missing and Error outcomes do not stop the loop; launch and
    /// I/O failures do.
    pub fn run(&self, catalog: &[ItemId], logger: &RunLogger) -> BatchResult<BatchSummary> {
        self.store
            .ensure_folders()
            .map_err(|source| BatchError::Setup { source })?;

        let mut summary = BatchSummary {
            catalog_size: catalog.len(),
            ..BatchSummary::default()
        };

        logger.phase(&format!(
            "Processing {} games ({} session, {} output)",
            catalog.len(),
            self.session.name(),
            self.store.format()
        ));

        for item in catalog {
            match self.process_item(item, logger)? {
                ItemState::Skipped { .. } => summary.skipped += 1,
                ItemState::Classified { outcome, .. } => summary.counters.record(outcome.kind()),
            }
        }

        tracing::info!(
            "Batch finished: {} skipped, {} processed",
            summary.skipped,
            summary.counters.total()
        );
        Ok(summary)
    }

    /// Process a single game.
    pub fn process_item(&self, item: &ItemId, logger: &RunLogger) -> BatchResult<ItemState> {
        let paths = self.store.paths_for(item);
        if let Some(existing) = paths.existing() {
            logger.info(&format!(
                "Skipping {} because a results file already exists.",
                item
            ));
            return Ok(ItemState::Skipped {
                existing: existing.to_path_buf(),
            });
        }

        self.store
            .ensure_folders()
            .map_err(|source| BatchError::Setup { source })?;

        logger.info(&format!("Launching MAME to create {} files...", item));
        self.session
            .run(item)
            .map_err(|source| BatchError::Session {
                item: item.to_string(),
                source,
            })?;

        let outcome = match self.locator.locate(item) {
            Some(state) => {
                logger.info(&format!(
                    "Attempting to dump {} high scores from {}...",
                    item,
                    state.describe()
                ));
                let output = self
                    .converter
                    .convert(state.path(), self.store.format())
                    .map_err(|source| BatchError::Converter {
                        item: item.to_string(),
                        source,
                    })?;

                logger.clear_tail();
                for line in output.lines() {
                    logger.output_line(line);
                }
                classify(output)
            }
            None => Outcome::Missing {
                cause: MissingCause::StateNotFound,
            },
        };

        let record = self
            .store
            .write(item, &outcome)
            .map_err(|source| BatchError::Write {
                item: item.to_string(),
                path: paths.for_kind(outcome.kind()).to_path_buf(),
                source,
            })?;

        match &outcome {
            Outcome::Success { .. } => {
                logger.success(&format!("High scores for {} dumped successfully.", item));
            }
            Outcome::Missing {
                cause: MissingCause::StateNotFound,
            } => {
                logger.warn(&format!(
                    "No {} hiscore file or nvram folder was found.",
                    item
                ));
            }
            Outcome::Missing {
                cause: MissingCause::ConverterReported,
            } => {
                logger.warn(&format!("hi2txt found no hiscores for {}.", item));
            }
            Outcome::Error { .. } => {
                logger.error(&format!("Dump errored out for {}.", item));
                logger.show_tail(item.as_str());
            }
        }
        match &outcome {
            Outcome::Missing { cause } => {
                tracing::info!("{} recorded as missing ({}) -> {}", item, cause, record.display())
            }
            _ => tracing::debug!("{} classified as {} -> {}", item, outcome.kind(), record.display()),
        }

        Ok(ItemState::Classified { outcome, record })
    }
}
