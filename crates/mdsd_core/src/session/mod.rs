//! Emulator sessions: run MAME for one game so it writes its score state.
//!
//! ```text
//! EmulatorSession::run(item)
//!     ├── TimedSession      MAME + AutoHotkey pressing Escape after the delay
//!     └── BenchmarkSession  MAME -bench <secs>, exits on its own
//! StateLocator::locate(item)
//!     hi/<item>.hi  →  nvram/<item>/  →  not found
//! ```

mod benchmark;
mod timed;

pub use benchmark::BenchmarkSession;
pub use timed::{escape_script, TimedSession};

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use thiserror::Error;

use crate::models::{ItemId, SessionStrategy};

/// Errors from running an emulator session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A process could not be started.
    #[error("Failed to launch {tool} ({}): {source}", .path.display())]
    Launch {
        tool: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Waiting for a started process failed.
    #[error("Failed waiting for {tool}: {source}")]
    Wait {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    /// The automation script could not be written.
    #[error("Failed to write automation script: {source}")]
    Script {
        #[source]
        source: io::Error,
    },
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Runs the emulator for one game and returns once it has exited.
pub trait EmulatorSession {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Launch the emulator for `item` and block until it exits.
    fn run(&self, item: &ItemId) -> SessionResult<()>;
}

/// How to start the emulator, shared by both strategies.
#[derive(Debug, Clone)]
pub struct EmulatorLaunch {
    pub exe: PathBuf,
    /// MAME resolves its ini, plugins, `hi/` and `nvram/` from here.
    pub working_dir: PathBuf,
    /// Options placed before the session arguments.
    pub args: Vec<String>,
}

impl EmulatorLaunch {
    /// Command with the base options applied; session arguments come next.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.current_dir(&self.working_dir)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    pub(crate) fn launch_error(&self, source: io::Error) -> SessionError {
        SessionError::Launch {
            tool: "MAME",
            path: self.exe.clone(),
            source,
        }
    }
}

/// Where the emulator left a game's score state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateLocation {
    /// `hi/<item>.hi`, written by the hiscore plugin.
    HiscoreFile(PathBuf),
    /// `nvram/<item>/`, written by the emulated hardware.
    NvramFolder(PathBuf),
}

impl StateLocation {
    pub fn path(&self) -> &Path {
        match self {
            StateLocation::HiscoreFile(path) | StateLocation::NvramFolder(path) => path,
        }
    }

    /// Human readable kind, for progress lines.
    pub fn describe(&self) -> &'static str {
        match self {
            StateLocation::HiscoreFile(_) => "hiscore file",
            StateLocation::NvramFolder(_) => "nvram folder",
        }
    }
}

/// Finds persisted score state after a session.
#[derive(Debug, Clone)]
pub struct StateLocator {
    hi_folder: PathBuf,
    nvram_folder: PathBuf,
}

impl StateLocator {
    pub fn new(hi_folder: impl Into<PathBuf>, nvram_folder: impl Into<PathBuf>) -> Self {
        Self {
            hi_folder: hi_folder.into(),
            nvram_folder: nvram_folder.into(),
        }
    }

    /// The hiscore file wins over the nvram folder.
    pub fn locate(&self, item: &ItemId) -> Option<StateLocation> {
        let hi_path = self.hi_folder.join(format!("{}.hi", item));
        if hi_path.is_file() {
            return Some(StateLocation::HiscoreFile(hi_path));
        }

        let nvram_path = self.nvram_folder.join(item.as_str());
        if nvram_path.is_dir() {
            return Some(StateLocation::NvramFolder(nvram_path));
        }

        None
    }
}

/// Build the session for the configured strategy.
///
/// `automation_exe` is only used by the timed strategy.
pub fn build_session(
    strategy: SessionStrategy,
    launch: EmulatorLaunch,
    automation_exe: &Path,
    delay: Duration,
) -> SessionResult<Box<dyn EmulatorSession>> {
    let session: Box<dyn EmulatorSession> = match strategy {
        SessionStrategy::Timed => Box::new(TimedSession::new(launch, automation_exe, delay)?),
        SessionStrategy::Benchmark => Box::new(BenchmarkSession::new(launch, delay)),
    };
    tracing::debug!("Using {} session, delay {:?}", session.name(), delay);
    Ok(session)
}
