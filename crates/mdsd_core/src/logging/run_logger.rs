//! The run log: what the user sees while a batch runs.
//!
//! Every line goes to the console callback and, when enabled, to
//! `<logs>/<run_name>.log`. hi2txt output of the current game is kept in a
//! bounded tail so it can be shown when that game errors.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{ConsoleCallback, LineKind, LogConfig};

pub struct RunLogger {
    log_path: Option<PathBuf>,
    file: Mutex<Option<BufWriter<File>>>,
    console: Option<ConsoleCallback>,
    config: LogConfig,
    /// hi2txt output of the game being processed.
    tail: Mutex<VecDeque<String>>,
    /// Set after the first failed write to the run log file.
    write_failed: AtomicBool,
}

impl RunLogger {
    /// Logger writing `<log_dir>/<run_name>.log` as well as the console.
    ///
    /// With `log_dir` set to `None` no file is created.
    pub fn new(
        run_name: &str,
        log_dir: Option<&Path>,
        config: LogConfig,
        console: Option<ConsoleCallback>,
    ) -> io::Result<Self> {
        let Some(dir) = log_dir else {
            return Ok(Self::console_only(config, console));
        };

        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", run_name));
        let file = BufWriter::new(File::create(&path)?);

        let mut logger = Self::console_only(config, console);
        logger.log_path = Some(path);
        *logger.file.get_mut() = Some(file);
        Ok(logger)
    }

    /// Logger without a run log file.
    pub fn console_only(config: LogConfig, console: Option<ConsoleCallback>) -> Self {
        let tail = VecDeque::with_capacity(config.error_tail);
        Self {
            log_path: None,
            file: Mutex::new(None),
            console,
            config,
            tail: Mutex::new(tail),
            write_failed: AtomicBool::new(false),
        }
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Emit one tagged line, unless its level is filtered out.
    pub fn line(&self, kind: LineKind, text: &str) {
        if kind.level() < self.config.level {
            return;
        }
        self.emit(&kind.decorate(text));
    }

    pub fn info(&self, text: &str) {
        self.line(LineKind::Plain, text);
    }

    pub fn phase(&self, title: &str) {
        self.line(LineKind::Phase, title);
    }

    pub fn success(&self, text: &str) {
        self.line(LineKind::Success, text);
    }

    pub fn warn(&self, text: &str) {
        self.line(LineKind::Warning, text);
    }

    pub fn error(&self, text: &str) {
        self.line(LineKind::Error, text);
    }

    /// Emit an untagged line regardless of the configured level.
    pub fn summary(&self, text: &str) {
        self.emit(text);
    }

    /// Record one line of hi2txt output.
    ///
    /// Always remembered in the tail; echoed only outside compact mode.
    pub fn output_line(&self, line: &str) {
        let limit = self.config.error_tail;
        if limit > 0 {
            let mut tail = self.tail.lock();
            while tail.len() >= limit {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        }

        if !self.config.compact {
            self.emit(&format!("  | {}", line));
        }
    }

    /// Print the remembered hi2txt output under a `[<item>/tail]` header.
    pub fn show_tail(&self, item: &str) {
        let lines: Vec<String> = self.tail.lock().iter().cloned().collect();
        if lines.is_empty() {
            return;
        }

        self.emit(&format!("[{}/tail]", item));
        for line in &lines {
            self.emit(line);
        }
    }

    /// Forget the previous game's output.
    pub fn clear_tail(&self) {
        self.tail.lock().clear();
    }

    /// Remembered hi2txt output, oldest first.
    pub fn tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    /// Flush and release the run log file. Later lines only reach the console.
    pub fn close(&self) {
        if let Some(mut file) = self.file.lock().take() {
            if let Err(e) = file.flush() {
                tracing::warn!("Could not flush run log: {}", e);
            }
        }
    }

    fn emit(&self, text: &str) {
        let line = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), text)
        } else {
            text.to_string()
        };

        if let Some(file) = self.file.lock().as_mut() {
            if let Err(e) = writeln!(file, "{}", line) {
                if !self.write_failed.swap(true, Ordering::Relaxed) {
                    tracing::warn!("Could not write run log: {}", e);
                }
            }
        }
        if let Some(console) = &self.console {
            console(&line);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn plain() -> LogConfig {
        LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        }
    }

    /// Console callback collecting lines into a shared vector.
    fn collector() -> (ConsoleCallback, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let callback: ConsoleCallback = Box::new(move |line: &str| sink.lock().push(line.to_string()));
        (callback, lines)
    }

    #[test]
    fn writes_run_log_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run_20260101_120000", Some(dir.path()), plain(), None).unwrap();

        let path = logger.log_path().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("run_20260101_120000.log"));

        logger.info("Launching MAME to create pacman files...");
        logger.warn("No qux hiscore file or nvram folder was found.");
        logger.close();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Launching MAME to create pacman files...\n\
             [WARNING] No qux hiscore file or nvram folder was found.\n"
        );
    }

    #[test]
    fn no_file_without_log_dir() {
        let logger = RunLogger::new("run", None, plain(), None).unwrap();
        assert!(logger.log_path().is_none());
        logger.info("console only");
    }

    #[test]
    fn console_gets_tagged_lines() {
        let (callback, lines) = collector();
        let logger = RunLogger::console_only(plain(), Some(callback));

        logger.phase("Catalog");
        logger.success("High scores for foo dumped successfully.");
        logger.error("Dump errored out for bar.");

        assert_eq!(
            *lines.lock(),
            vec![
                "=== Catalog ===",
                "[SUCCESS] High scores for foo dumped successfully.",
                "[ERROR] Dump errored out for bar.",
            ]
        );
    }

    #[test]
    fn level_filters_lines() {
        let (callback, lines) = collector();
        let config = LogConfig {
            level: crate::logging::LogLevel::Warn,
            ..plain()
        };
        let logger = RunLogger::console_only(config, Some(callback));

        logger.info("hidden");
        logger.success("hidden too");
        logger.warn("shown");

        assert_eq!(*lines.lock(), vec!["[WARNING] shown"]);
    }

    #[test]
    fn timestamps_prefix_lines() {
        let (callback, lines) = collector();
        let logger = RunLogger::console_only(LogConfig::default(), Some(callback));
        logger.info("tick");

        let line = lines.lock()[0].clone();
        // [HH:MM:SS] tick
        assert_eq!(line.len(), "[00:00:00] tick".len());
        assert!(line.starts_with('[') && line.ends_with("] tick"));
    }

    #[test]
    fn summary_ignores_level() {
        let (callback, lines) = collector();
        let config = LogConfig {
            level: crate::logging::LogLevel::Error,
            ..plain()
        };
        let logger = RunLogger::console_only(config, Some(callback));

        logger.info("hidden");
        logger.summary("ROMs Errored: 0");

        assert_eq!(*lines.lock(), vec!["ROMs Errored: 0"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_file_write_is_flagged_and_console_continues() {
        let (callback, lines) = collector();
        let logger = RunLogger::console_only(plain(), Some(callback));
        let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
        *logger.file.lock() = Some(BufWriter::with_capacity(0, full));

        logger.info("first");
        logger.info("second");

        assert!(logger.write_failed.load(Ordering::Relaxed));
        assert_eq!(*lines.lock(), vec!["first", "second"]);
    }

    #[test]
    fn tail_keeps_last_lines() {
        let config = LogConfig {
            error_tail: 3,
            ..plain()
        };
        let logger = RunLogger::console_only(config, None);

        for i in 0..6 {
            logger.output_line(&format!("row {}", i));
        }
        assert_eq!(logger.tail(), vec!["row 3", "row 4", "row 5"]);

        logger.clear_tail();
        assert!(logger.tail().is_empty());
    }

    #[test]
    fn zero_tail_remembers_nothing() {
        let config = LogConfig {
            error_tail: 0,
            ..plain()
        };
        let logger = RunLogger::console_only(config, None);
        logger.output_line("Error: something");
        assert!(logger.tail().is_empty());
    }

    #[test]
    fn compact_mode_hides_output_until_shown() {
        let (callback, lines) = collector();
        let logger = RunLogger::console_only(plain(), Some(callback));

        logger.output_line("Error: bar not found in hiscore.dat");
        assert!(lines.lock().is_empty());

        logger.show_tail("bar");
        assert_eq!(
            *lines.lock(),
            vec!["[bar/tail]", "Error: bar not found in hiscore.dat"]
        );
    }

    #[test]
    fn verbose_mode_echoes_output() {
        let (callback, lines) = collector();
        let config = LogConfig {
            compact: false,
            ..plain()
        };
        let logger = RunLogger::console_only(config, Some(callback));

        logger.output_line("RANK|SCORE|NAME");
        assert_eq!(*lines.lock(), vec!["  | RANK|SCORE|NAME"]);
    }
}
