//! Classification of hi2txt output.
//!
//! Checked in order, case-insensitively, against the start of the output:
//! the "no hiscores file" marker means Missing, any other leading `Error`
//! means Error, anything else is a successful dump.

use crate::models::{MissingCause, Outcome};

/// Leading text hi2txt prints when the game has no hiscore data.
pub const MISSING_MARKER: &str = "ERROR: No hiscores file found";

/// Leading text of every other hi2txt failure.
pub const ERROR_PREFIX: &str = "Error";

/// Classify hi2txt's combined output.
pub fn classify(output: String) -> Outcome {
    if starts_with_ignore_case(&output, MISSING_MARKER) {
        Outcome::Missing {
            cause: MissingCause::ConverterReported,
        }
    } else if starts_with_ignore_case(&output, ERROR_PREFIX) {
        Outcome::Error { output }
    } else {
        Outcome::Success { output }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
