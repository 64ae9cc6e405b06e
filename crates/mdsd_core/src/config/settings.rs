//! Typed contents of the settings file, one struct per TOML table.
//!
//! Paths are relative to the install folder unless given absolute. Every
//! field has a default so older or hand-trimmed files still load.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::{ArchiveListerKind, SessionStrategy};

/// Whole settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Locations of MAME, hi2txt, helper tools and the results folder.
    #[serde(default)]
    pub paths: PathSettings,

    /// Emulator session settings.
    #[serde(default)]
    pub session: SessionSettings,

    /// Catalog discovery settings.
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Run log and diagnostics.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Locations of every external collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// MAME executable. Its folder is the emulator's working directory.
    #[serde(default = "default_emulator_exe")]
    pub emulator_exe: String,

    /// hiscore plugin database handed to hi2txt.
    #[serde(default = "default_hiscore_dat")]
    pub hiscore_dat: String,

    /// Folder where the hiscore plugin writes `<rom>.hi` files.
    #[serde(default = "default_hi_folder")]
    pub hi_folder: String,

    /// Folder where MAME writes `<rom>/` nvram directories.
    #[serde(default = "default_nvram_folder")]
    pub nvram_folder: String,

    /// hi2txt executable.
    #[serde(default = "default_converter_exe")]
    pub converter_exe: String,

    /// hi2txt bundled archive (one `<rom>.xml` per supported game).
    #[serde(default = "default_converter_archive")]
    pub converter_archive: String,

    /// 7-Zip executable, used by the `seven_zip` lister.
    #[serde(default = "default_archive_tool_exe")]
    pub archive_tool_exe: String,

    /// AutoHotkey executable, used by the timed session.
    #[serde(default = "default_automation_exe")]
    pub automation_exe: String,

    /// Root of the Success / Missing / Error folders.
    #[serde(default = "default_results_folder")]
    pub results_folder: String,
}

fn default_emulator_exe() -> String {
    "MAME/Mame64.exe".to_string()
}

fn default_hiscore_dat() -> String {
    "MAME/plugins/hiscore/hiscore.dat".to_string()
}

fn default_hi_folder() -> String {
    "MAME/hi".to_string()
}

fn default_nvram_folder() -> String {
    "MAME/nvram".to_string()
}

fn default_converter_exe() -> String {
    "hi2txt/hi2txt.exe".to_string()
}

fn default_converter_archive() -> String {
    "hi2txt/hi2txt.zip".to_string()
}

fn default_archive_tool_exe() -> String {
    "7-Zip/7z.exe".to_string()
}

fn default_automation_exe() -> String {
    "AutoHotkey/AutoHotkey.exe".to_string()
}

fn default_results_folder() -> String {
    "Results".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            emulator_exe: default_emulator_exe(),
            hiscore_dat: default_hiscore_dat(),
            hi_folder: default_hi_folder(),
            nvram_folder: default_nvram_folder(),
            converter_exe: default_converter_exe(),
            converter_archive: default_converter_archive(),
            archive_tool_exe: default_archive_tool_exe(),
            automation_exe: default_automation_exe(),
            results_folder: default_results_folder(),
        }
    }
}

/// Emulator session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// How the emulator is closed after the wait duration.
    #[serde(default)]
    pub strategy: SessionStrategy,

    /// Options passed to MAME before the session arguments.
    #[serde(default = "default_emulator_args")]
    pub emulator_args: Vec<String>,
}

fn default_emulator_args() -> Vec<String> {
    // dinput lets the AutoHotkey keystroke reach MAME
    vec!["-keyboardprovider".to_string(), "dinput".to_string()]
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            strategy: SessionStrategy::default(),
            emulator_args: default_emulator_args(),
        }
    }
}

/// Catalog discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// How the hi2txt archive is listed.
    #[serde(default)]
    pub lister: ArchiveListerKind,

    /// Extension of per-game reference entries, without the dot.
    #[serde(default = "default_entry_extension")]
    pub entry_extension: String,

    /// Archive entry that is a template rather than a game.
    #[serde(default = "default_template_entry")]
    pub template_entry: String,
}

fn default_entry_extension() -> String {
    "xml".to_string()
}

fn default_template_entry() -> String {
    "_template.xml".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            lister: ArchiveListerKind::default(),
            entry_extension: default_entry_extension(),
            template_entry: default_template_entry(),
        }
    }
}

/// `[logging]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for console, run log and diagnostics.
    #[serde(default)]
    pub level: LogLevel,

    /// Keep hi2txt output out of the console unless an item errors.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of hi2txt output lines shown when an item errors.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix log lines with a timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Write a run log file next to the diagnostics log.
    #[serde(default = "default_true")]
    pub write_run_log: bool,

    /// Folder for run logs and diagnostics.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_logs_folder() -> String {
    "Results/logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            show_timestamps: true,
            write_run_log: true,
            logs_folder: default_logs_folder(),
        }
    }
}

/// Tables of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Session,
    Catalog,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Paths,
        ConfigSection::Session,
        ConfigSection::Catalog,
        ConfigSection::Logging,
    ];

    /// `[name]` of the table.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Session => "session",
            ConfigSection::Catalog => "catalog",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Tool locations, relative to the install folder",
            ConfigSection::Session => "Emulator session (strategy: \"timed\" or \"benchmark\")",
            ConfigSection::Catalog => "Game discovery (lister: \"seven_zip\" or \"native\")",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
