//! Core data types shared by the batch, the config layer and the front end.

mod enums;
mod item;
mod outcome;

pub use enums::{ArchiveListerKind, MissingCause, OutcomeKind, OutputFormat, SessionStrategy};
pub use item::ItemId;
pub use outcome::{Outcome, RunCounters, MISSING_MESSAGE};
