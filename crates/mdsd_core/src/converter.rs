//! hi2txt invocation.
//!
//! hi2txt decodes a game's persisted score state using the layout described
//! in the hiscore plugin database. Its exit code is meaningless; the captured
//! text is classified by [`crate::classify`].

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::models::OutputFormat;
use crate::process::run_captured;

/// Errors from running the converter.
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Failed to run hi2txt ({}): {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

/// Turns persisted score state into text.
pub trait Converter {
    /// Combined stdout and stderr of converting `state`.
    fn convert(&self, state: &Path, format: OutputFormat) -> ConverterResult<String>;
}

/// The hi2txt executable plus the database it reads layouts from.
#[derive(Debug, Clone)]
pub struct Hi2TxtConverter {
    exe: PathBuf,
    reference_db: PathBuf,
}

impl Hi2TxtConverter {
    pub fn new(exe: impl Into<PathBuf>, reference_db: impl Into<PathBuf>) -> Self {
        Self {
            exe: exe.into(),
            reference_db: reference_db.into(),
        }
    }

    /// `[-xml] -r <state> -hiscoredat <dat>`
    fn command(&self, state: &Path, format: OutputFormat) -> Command {
        let mut cmd = Command::new(&self.exe);
        if let Some(flag) = format.converter_flag() {
            cmd.arg(flag);
        }
        cmd.arg("-r")
            .arg(state)
            .arg("-hiscoredat")
            .arg(&self.reference_db);
        cmd
    }
}

impl Converter for Hi2TxtConverter {
    fn convert(&self, state: &Path, format: OutputFormat) -> ConverterResult<String> {
        let output = run_captured(&mut self.command(state, format)).map_err(|source| {
            ConverterError::Launch {
                path: self.exe.clone(),
                source,
            }
        })?;

        if !output.success() {
            tracing::debug!("hi2txt exited with code {}", output.exit_code());
        }
        Ok(output.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn xml_mode_adds_flag_first() {
        let converter = Hi2TxtConverter::new("hi2txt", "hiscore.dat");
        let cmd = converter.command(Path::new("hi/pacman.hi"), OutputFormat::Xml);
        assert_eq!(
            args(&cmd),
            vec!["-xml", "-r", "hi/pacman.hi", "-hiscoredat", "hiscore.dat"]
        );
    }

    #[test]
    fn text_mode_has_no_flag() {
        let converter = Hi2TxtConverter::new("hi2txt", "hiscore.dat");
        let cmd = converter.command(Path::new("nvram/sf2"), OutputFormat::Text);
        assert_eq!(args(&cmd), vec!["-r", "nvram/sf2", "-hiscoredat", "hiscore.dat"]);
    }

    #[test]
    fn missing_converter_is_launch_error() {
        let converter = Hi2TxtConverter::new("/nonexistent/hi2txt.exe", "hiscore.dat");
        let err = converter
            .convert(Path::new("pacman.hi"), OutputFormat::Xml)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to run hi2txt"));
    }

    #[cfg(unix)]
    #[test]
    fn returns_captured_text() {
        let converter = Hi2TxtConverter::new("echo", "hiscore.dat");
        let text = converter
            .convert(Path::new("hi/pacman.hi"), OutputFormat::Xml)
            .unwrap();
        assert_eq!(text, "-xml -r hi/pacman.hi -hiscoredat hiscore.dat\n");
    }

    #[cfg(unix)]
    #[test]
    fn failure_exit_still_returns_text() {
        let converter = Hi2TxtConverter::new("false", "hiscore.dat");
        let text = converter
            .convert(Path::new("hi/pacman.hi"), OutputFormat::Text)
            .unwrap();
        assert_eq!(text, "");
    }
}
