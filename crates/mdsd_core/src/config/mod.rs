//! The `mame-default-scores-dumper.toml` settings file.
//!
//! Holds tool locations, the session strategy, catalog rules and logging
//! options. The output format and wait duration are per-run command line
//! inputs and never stored.
//!
//! ```no_run
//! use mdsd_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new("mame-default-scores-dumper.toml");
//! config.load_or_create().unwrap();
//!
//! println!("MAME: {}", config.settings().paths.emulator_exe);
//! println!("Strategy: {}", config.settings().session.strategy);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    CatalogSettings, ConfigSection, LoggingSettings, PathSettings, SessionSettings, Settings,
};
