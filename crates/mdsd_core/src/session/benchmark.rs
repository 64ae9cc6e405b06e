//! Benchmark session: `-bench <secs>` makes MAME exit by itself.

use std::process::Command;
use std::time::Duration;

use super::{EmulatorLaunch, EmulatorSession, SessionResult};
use crate::models::ItemId;

/// Runs MAME in benchmark mode; no helper process needed.
pub struct BenchmarkSession {
    launch: EmulatorLaunch,
    seconds: u64,
}

impl BenchmarkSession {
    pub fn new(launch: EmulatorLaunch, delay: Duration) -> Self {
        Self {
            launch,
            seconds: delay.as_secs(),
        }
    }

    fn command(&self, item: &ItemId) -> Command {
        let mut cmd = self.launch.command();
        cmd.arg("-bench")
            .arg(self.seconds.to_string())
            .arg(item.as_str());
        cmd
    }
}

impl EmulatorSession for BenchmarkSession {
    fn name(&self) -> &'static str {
        "benchmark"
    }

    fn run(&self, item: &ItemId) -> SessionResult<()> {
        let mut cmd = self.command(item);
        tracing::debug!("Running: {}", crate::process::describe_command(&cmd));

        let status = cmd
            .status()
            .map_err(|source| self.launch.launch_error(source))?;
        if !status.success() {
            // MAME exits non-zero for unknown or broken sets; the state check decides
            tracing::debug!("MAME exited with {} for {}", status, item);
        }
        Ok(())
    }
}
