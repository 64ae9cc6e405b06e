//! Loading and saving the settings file.
//!
//! The file is created with defaults on first run. On later runs it is
//! reconciled: keys added in newer versions are filled in, unknown tables
//! are dropped, and the file is rewritten only when one of those happened.
//! Every write goes to `<name>.toml.tmp` first and is renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::DocumentMut;

use super::settings::{ConfigSection, Settings};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot access settings file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Malformed settings file: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("Settings file not found: {}", .0.display())]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file and its in-memory [`Settings`].
pub struct ConfigManager {
    path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Manager for `path`, holding defaults until something is loaded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory only until [`save`](Self::save).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read an existing file as-is.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.path.is_file() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }
        let text = fs::read_to_string(&self.path)?;
        self.settings = toml::from_str(&text)?;
        Ok(())
    }

    /// Read the file, writing defaults first if it is absent.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if !self.path.exists() {
            tracing::info!("Creating default settings at {}", self.path.display());
            self.settings = Settings::default();
            return self.save();
        }

        let text = fs::read_to_string(&self.path)?;
        let (settings, stale) = reconcile(&text)?;
        self.settings = settings;
        if stale {
            tracing::debug!("Rewriting reconciled settings at {}", self.path.display());
            self.save()?;
        }
        Ok(())
    }

    /// Write the current settings, with section comments.
    pub fn save(&self) -> ConfigResult<()> {
        let text = render(&self.settings)?;
        write_atomically(&self.path, &text)?;
        Ok(())
    }
}

/// Parse `text` and tell whether the file differs from what [`render`] writes
/// in table or key set.
fn reconcile(text: &str) -> ConfigResult<(Settings, bool)> {
    let settings: Settings = toml::from_str(text)?;
    let found: DocumentMut = text.parse()?;

    let unknown_table = found
        .iter()
        .any(|(name, _)| !ConfigSection::ALL.iter().any(|s| s.table_name() == name));

    let mut missing_key = false;
    for section in ConfigSection::ALL {
        let wanted: DocumentMut = section_body(&settings, section)?.parse()?;
        missing_key |= match found.get(section.table_name()).and_then(|t| t.as_table()) {
            Some(table) => wanted.iter().any(|(key, _)| !table.contains_key(key)),
            None => true,
        };
    }

    Ok((settings, unknown_table || missing_key))
}

/// Body of one table, without the `[header]` line.
fn section_body(settings: &Settings, section: ConfigSection) -> ConfigResult<String> {
    Ok(match section {
        ConfigSection::Paths => toml::to_string_pretty(&settings.paths)?,
        ConfigSection::Session => toml::to_string_pretty(&settings.session)?,
        ConfigSection::Catalog => toml::to_string_pretty(&settings.catalog)?,
        ConfigSection::Logging => toml::to_string_pretty(&settings.logging)?,
    })
}

fn render(settings: &Settings) -> ConfigResult<String> {
    let mut text = String::from(
        "# MAME Default Scores Dumper settings\n\
         # Rewritten automatically when keys are missing or tables are unknown.\n",
    );

    for section in ConfigSection::ALL {
        text.push_str(&format!(
            "\n# {}\n[{}]\n",
            section.comment(),
            section.table_name()
        ));
        text.push_str(section_body(settings, section)?.trim_end());
        text.push('\n');
    }

    Ok(text)
}

fn write_atomically(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let staging = path.with_extension("toml.tmp");
    {
        let mut file = fs::File::create(&staging)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&staging, path)
}
