//! Per-game outcomes and run counters.

use super::enums::{MissingCause, OutcomeKind};

/// Record text written for every Missing outcome, whatever its cause.
pub const MISSING_MESSAGE: &str = "No hiscore file or nvram directory could be found to parse.";

/// Classified result of processing one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// hi2txt produced a table; the output is kept verbatim.
    Success { output: String },
    /// No hiscore data exists for the game.
    Missing { cause: MissingCause },
    /// hi2txt reported an error; the output is kept for diagnosis.
    Error { output: String },
}

impl Outcome {
    /// Classification without payload.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success { .. } => OutcomeKind::Success,
            Outcome::Missing { .. } => OutcomeKind::Missing,
            Outcome::Error { .. } => OutcomeKind::Error,
        }
    }

    /// Text stored in the result record.
    pub fn record_text(&self) -> &str {
        match self {
            Outcome::Success { output } | Outcome::Error { output } => output,
            Outcome::Missing { .. } => MISSING_MESSAGE,
        }
    }
}

/// Success / missing / error tallies for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub success: u32,
    pub missing: u32,
    pub error: u32,
}

impl RunCounters {
    /// Count one classified game.
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.success += 1,
            OutcomeKind::Missing => self.missing += 1,
            OutcomeKind::Error => self.error += 1,
        }
    }

    /// Number of games classified so far.
    pub fn total(&self) -> u32 {
        self.success + self.missing + self.error
    }
}
