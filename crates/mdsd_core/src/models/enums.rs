//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Format of the records written for successfully parsed games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// hi2txt structured markup (`-xml`).
    #[default]
    Xml,
    /// hi2txt plain text table (`-txt`).
    Text,
}

impl OutputFormat {
    /// Parse the command line mode token (`-xml` or `-txt`).
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-xml" => Some(OutputFormat::Xml),
            "-txt" => Some(OutputFormat::Text),
            _ => None,
        }
    }

    /// The command line token for this format.
    pub fn flag(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "-xml",
            OutputFormat::Text => "-txt",
        }
    }

    /// Extension of success records.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Text => "txt",
        }
    }

    /// Flag passed to hi2txt. Plain text is its default, so it takes none.
    pub fn converter_flag(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Xml => Some("-xml"),
            OutputFormat::Text => None,
        }
    }

    /// The format not chosen.
    pub fn other(&self) -> Self {
        match self {
            OutputFormat::Xml => OutputFormat::Text,
            OutputFormat::Text => OutputFormat::Xml,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xml => write!(f, "XML"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// How the emulator is made to exit after the wait duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStrategy {
    /// Normal session closed by an AutoHotkey script pressing Escape.
    #[default]
    Timed,
    /// `-bench <seconds>`, the emulator exits on its own.
    Benchmark,
}

impl std::fmt::Display for SessionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStrategy::Timed => write!(f, "timed"),
            SessionStrategy::Benchmark => write!(f, "benchmark"),
        }
    }
}

/// Mechanism used to list the entries of the hi2txt archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveListerKind {
    /// External `7z l -slt`.
    #[default]
    SevenZip,
    /// In-process zip central directory reader.
    Native,
}

/// Terminal classification of one processed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Missing,
    Error,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Success => write!(f, "success"),
            OutcomeKind::Missing => write!(f, "missing"),
            OutcomeKind::Error => write!(f, "error"),
        }
    }
}

/// Why a game ended up in the Missing folder.
///
/// Both causes write the same record text; the cause only shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingCause {
    /// Neither `hi/<id>.hi` nor `nvram/<id>/` existed after the session.
    StateNotFound,
    /// hi2txt ran and reported that it found no hiscore data.
    ConverterReported,
}

impl std::fmt::Display for MissingCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingCause::StateNotFound => write!(f, "no hiscore file or nvram folder"),
            MissingCause::ConverterReported => write!(f, "hi2txt found no hiscores"),
        }
    }
}
