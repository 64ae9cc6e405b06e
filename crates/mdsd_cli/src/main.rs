//! MAME Default Scores Dumper - command line entry point
//!
//! Parses the mode and delay, loads settings, validates the install, then
//! hands off to `mdsd_core::run`. Usage:
//!
//! ```text
//! mame-default-scores-dumper -xml 30
//! mame-default-scores-dumper -txt 240 --root D:/Dumper --verbose
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;

use mdsd_core::config::ConfigManager;
use mdsd_core::logging::{
    console_level, init_tracing, init_tracing_with_file, ConsoleCallback, LogConfig, LogLevel,
    RunLogger,
};
use mdsd_core::models::OutputFormat;
use mdsd_core::run::{execute, RunConfig};

/// Settings file looked up next to the executable.
const CONFIG_FILE_NAME: &str = "mame-default-scores-dumper.toml";

#[derive(Parser, Debug)]
#[command(
    name = "mame-default-scores-dumper",
    version,
    about = "Dump MAME default high scores for every game hi2txt supports"
)]
struct Cli {
    /// Output format of dumped scores: -xml or -txt
    #[arg(value_name = "MODE", value_parser = parse_mode, allow_hyphen_values = true)]
    mode: OutputFormat,

    /// Seconds each game runs before MAME is closed
    #[arg(value_name = "SECONDS", allow_hyphen_values = true)]
    delay: u64,

    /// Settings file [default: <root>/mame-default-scores-dumper.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Install folder holding MAME, hi2txt and the tools [default: folder of the executable]
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Debug-level diagnostics
    #[arg(long)]
    verbose: bool,
}

fn parse_mode(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_flag(value)
        .ok_or_else(|| format!("unknown mode '{}', expected -xml or -txt", value))
}

fn print_banner() {
    println!("MAME Default Scores Dumper v{}", mdsd_core::version());
    println!("Thanks to GreatStone and community for hi2txt!");
    println!();
}

fn print_usage_examples() {
    println!();
    println!("Examples:");
    println!();
    println!("  mame-default-scores-dumper -xml 30");
    println!("  mame-default-scores-dumper -txt 240");
    println!();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            print_banner();
            let _ = e.print();
            print_usage_examples();
            return ExitCode::from(2);
        }
    };

    print_banner();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Run aborted: {:#}", e);
            println!("\nUnexpected Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let root = match cli.root {
        Some(root) => root,
        None => install_root()?,
    };
    let config_path = cli.config.unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

    let mut config = ConfigManager::new(&config_path);
    if let Err(e) = config.load_or_create() {
        println!("ERROR: {} ({})", e, config_path.display());
        return Ok(ExitCode::FAILURE);
    }
    let settings = config.settings();

    // Before tracing starts, so a failed check leaves no log folder behind
    let run_config = match RunConfig::prepare(
        &root,
        settings,
        cli.mode,
        Duration::from_secs(cli.delay),
    ) {
        Ok(run_config) => run_config,
        Err(e) => {
            println!("ERROR: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        settings.logging.level
    };
    let stderr_level = console_level(level, cli.verbose);
    let logs_dir = root.join(&settings.logging.logs_folder);
    let _log_guard = if settings.logging.write_run_log {
        init_tracing_with_file(level, stderr_level, &logs_dir)
    } else {
        init_tracing(stderr_level);
        None
    };

    tracing::info!("MAME Default Scores Dumper starting");
    tracing::info!("Root: {}", root.display());
    tracing::info!("Config: {}", config_path.display());

    let run_name = format!("run_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let log_dir = settings
        .logging
        .write_run_log
        .then_some(logs_dir.as_path());
    let console: ConsoleCallback = Box::new(|line: &str| println!("{}", line));
    let logger = RunLogger::new(
        &run_name,
        log_dir,
        LogConfig::from(&settings.logging),
        Some(console),
    )
    .context("Failed to create run log")?;

    if let Some(path) = logger.log_path() {
        tracing::info!("Run log: {}", path.display());
    }

    let summary = execute(&run_config, &logger)?;
    logger.close();

    tracing::info!(
        "Finished: {} processed, {} skipped",
        summary.counters.total(),
        summary.skipped
    );
    Ok(ExitCode::SUCCESS)
}

/// Folder containing the running executable.
fn install_root() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot locate the running executable")?;
    exe.parent()
        .map(PathBuf::from)
        .context("Executable has no parent folder")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mame-default-scores-dumper").chain(args.iter().copied()))
    }

    #[test]
    fn parses_xml_mode() {
        let cli = parse(&["-xml", "30"]).unwrap();
        assert_eq!(cli.mode, OutputFormat::Xml);
        assert_eq!(cli.delay, 30);
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_txt_mode_with_options() {
        let cli = parse(&[
            "-txt",
            "240",
            "--root",
            "/opt/dumper",
            "--config",
            "custom.toml",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.mode, OutputFormat::Text);
        assert_eq!(cli.delay, 240);
        assert_eq!(cli.root, Some(PathBuf::from("/opt/dumper")));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn zero_delay_is_allowed() {
        assert_eq!(parse(&["-xml", "0"]).unwrap().delay, 0);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = parse(&["-zzz", "10"]).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
        assert!(parse(&["xml", "10"]).is_err());
        assert!(parse(&["-XML", "10"]).is_err());
    }

    #[test]
    fn rejects_bad_delay() {
        assert!(parse(&["-xml", "soon"]).is_err());
        assert!(parse(&["-xml", "-5"]).is_err());
        assert!(parse(&["-xml", "1.5"]).is_err());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["-xml"]).is_err());
        assert!(parse(&["-xml", "30", "extra"]).is_err());
    }

    #[test]
    fn parse_mode_accepts_exact_flags() {
        assert_eq!(parse_mode("-xml"), Ok(OutputFormat::Xml));
        assert_eq!(parse_mode("-txt"), Ok(OutputFormat::Text));
        assert!(parse_mode("-text").is_err());
    }

    #[test]
    fn failed_preflight_writes_only_settings() {
        let root = tempfile::tempdir().unwrap();
        let cli = parse(&["-xml", "10", "--root", root.path().to_str().unwrap()]).unwrap();

        let code = run(cli).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));

        let names: Vec<String> = std::fs::read_dir(root.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![CONFIG_FILE_NAME.to_string()]);
    }
}
