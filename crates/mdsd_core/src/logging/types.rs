//! Run log vocabulary: levels, line kinds and logger options.

use serde::{Deserialize, Serialize};

use crate::config::LoggingSettings;

/// Verbosity threshold, shared by the run log and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Kind of a user-facing run log line. Decides its tag and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Progress text, untagged.
    Plain,
    /// Section header, `=== Catalog ===`.
    Phase,
    /// A game dumped, `[SUCCESS] ...`.
    Success,
    /// A game without scores, `[WARNING] ...`.
    Warning,
    /// A game hi2txt failed on, `[ERROR] ...`.
    Error,
}

impl LineKind {
    pub fn level(&self) -> LogLevel {
        match self {
            LineKind::Plain | LineKind::Phase | LineKind::Success => LogLevel::Info,
            LineKind::Warning => LogLevel::Warn,
            LineKind::Error => LogLevel::Error,
        }
    }

    /// Apply the tag for this kind to `text`.
    pub fn decorate(&self, text: &str) -> String {
        match self {
            LineKind::Plain => text.to_string(),
            LineKind::Phase => format!("=== {} ===", text),
            LineKind::Success => format!("[SUCCESS] {}", text),
            LineKind::Warning => format!("[WARNING] {}", text),
            LineKind::Error => format!("[ERROR] {}", text),
        }
    }
}

/// Options of a [`super::RunLogger`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Lines below this level are dropped.
    pub level: LogLevel,
    /// Keep hi2txt output off the console unless a game errors.
    pub compact: bool,
    /// How many hi2txt output lines are remembered per game.
    pub error_tail: usize,
    /// Prefix each line with the wall-clock time.
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from(&LoggingSettings::default())
    }
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level,
            compact: settings.compact,
            error_tail: settings.error_tail as usize,
            show_timestamps: settings.show_timestamps,
        }
    }
}

/// Receives every formatted run log line; the CLI prints them.
pub type ConsoleCallback = Box<dyn Fn(&str) + Send + Sync>;
