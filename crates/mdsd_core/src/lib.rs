//! MDSD Core - Backend logic for MAME Default Scores Dumper
//!
//! This crate drives the batch that launches MAME once per supported game,
//! lets the hiscore plugin persist its state, and hands that state to hi2txt.
//! It has no terminal dependencies and can be driven by any front end.
//!
//! # Flow
//!
//! ```text
//! archive listing ──► catalog ──► for each game:
//!                                   ├── skip if a result record exists
//!                                   ├── emulator session (timed / benchmark)
//!                                   ├── locate hi file or nvram folder
//!                                   ├── hi2txt conversion
//!                                   └── classify + write record
//! ```

pub mod archive;
pub mod batch;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod converter;
pub mod logging;
pub mod models;
pub mod preflight;
pub mod process;
pub mod results;
pub mod run;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
