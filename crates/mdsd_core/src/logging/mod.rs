//! Two log streams:
//!
//! - the run log ([`RunLogger`]): progress lines for the user, printed and
//!   optionally saved per run, with hi2txt output held back in a tail;
//! - diagnostics via `tracing`: spawned commands, exit codes and internals,
//!   in a daily file. Only warnings reach stderr unless the run is verbose
//!   or `RUST_LOG` is set.
//!
//! ```no_run
//! use mdsd_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new(
//!     "run_20260101_120000",
//!     Some(std::path::Path::new("Results/logs")),
//!     LogConfig::default(),
//!     Some(Box::new(|line: &str| println!("{}", line))),
//! ).unwrap();
//!
//! logger.phase("Catalog");
//! logger.info("Launching MAME to create pacman files...");
//! logger.success("High scores for pacman dumped successfully.");
//! ```

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub use types::{ConsoleCallback, LineKind, LogConfig, LogLevel};

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

const DIAGNOSTICS_FILE_PREFIX: &str = "mdsd-diagnostics.log";

/// Level of the stderr layer.
///
/// Progress already goes to stdout through the run log, so stderr only
/// carries warnings and errors unless the run is verbose.
pub fn console_level(level: LogLevel, verbose: bool) -> LogLevel {
    if verbose {
        level
    } else {
        level.max(LogLevel::Warn)
    }
}

/// Install the global diagnostics subscriber on stderr.
///
/// `RUST_LOG` wins over `console_level`. Call once, at startup.
pub fn init_tracing(console_level: LogLevel) {
    tracing_subscriber::registry()
        .with(stderr_layer(console_level))
        .init();
}

/// Like [`init_tracing`], plus a daily `mdsd-diagnostics.log.<date>` in `logs_dir`.
///
/// Keep the guard alive until exit or buffered lines are lost. Falls back to
/// stderr only when `logs_dir` cannot be created.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    console_level: LogLevel,
    logs_dir: &Path,
) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(logs_dir) {
        init_tracing(console_level);
        tracing::warn!(
            "Could not create logs folder {}: {}; logging to stderr only",
            logs_dir.display(),
            e
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, DIAGNOSTICS_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(stderr_layer(console_level))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter(default_level)),
        )
        .init();

    Some(guard)
}

/// Warnings and up, captured by the test harness.
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn stderr_layer<S>(level: LogLevel) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(level))
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter()))
}
