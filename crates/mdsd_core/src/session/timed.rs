//! Timed session: MAME is closed by an AutoHotkey script pressing Escape.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempPath;

use super::{EmulatorLaunch, EmulatorSession, SessionError, SessionResult};
use crate::models::ItemId;

/// AutoHotkey script that waits `delay` then taps Escape.
pub fn escape_script(delay: Duration) -> String {
    format!(
        "#NoTrayIcon\nSleep {}\nSend {{Escape down}}\nSleep 50\nSend {{Escape up}}\nExit\n",
        delay.as_millis()
    )
}

/// Runs MAME normally alongside an AutoHotkey helper that closes it.
pub struct TimedSession {
    launch: EmulatorLaunch,
    automation_exe: PathBuf,
    /// Deleted when the session is dropped.
    script: TempPath,
}

impl TimedSession {
    /// Write the helper script for `delay` to a temp file.
    pub fn new(
        launch: EmulatorLaunch,
        automation_exe: &Path,
        delay: Duration,
    ) -> SessionResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("mdsd-escape-")
            .suffix(".ahk")
            .tempfile()
            .map_err(|source| SessionError::Script { source })?;
        file.write_all(escape_script(delay).as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| SessionError::Script { source })?;

        let script = file.into_temp_path();
        tracing::debug!("Wrote automation script {}", script.display());

        Ok(Self {
            launch,
            automation_exe: automation_exe.to_path_buf(),
            script,
        })
    }

    /// Path of the generated script.
    pub fn script_path(&self) -> &Path {
        &self.script
    }

    fn emulator_command(&self, item: &ItemId) -> Command {
        let mut cmd = self.launch.command();
        cmd.arg(item.as_str());
        cmd
    }

    fn helper_command(&self) -> Command {
        let mut cmd = Command::new(&self.automation_exe);
        cmd.arg(&*self.script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl EmulatorSession for TimedSession {
    fn name(&self) -> &'static str {
        "timed"
    }

    fn run(&self, item: &ItemId) -> SessionResult<()> {
        let mut emulator_cmd = self.emulator_command(item);
        tracing::debug!("Running: {}", crate::process::describe_command(&emulator_cmd));
        let mut emulator = emulator_cmd
            .spawn()
            .map_err(|source| self.launch.launch_error(source))?;

        let mut helper = match self.helper_command().spawn() {
            Ok(child) => child,
            Err(source) => {
                // Nothing would ever close the emulator
                let _ = emulator.kill();
                let _ = emulator.wait();
                return Err(SessionError::Launch {
                    tool: "AutoHotkey",
                    path: self.automation_exe.clone(),
                    source,
                });
            }
        };

        let waited = emulator.wait();
        reap_helper(&mut helper);

        let status = waited.map_err(|source| SessionError::Wait {
            tool: "MAME",
            source,
        })?;
        tracing::debug!("MAME exited with {} for {}", status, item);
        Ok(())
    }
}

/// Kill the helper if it is still running. Failures are ignored.
fn reap_helper(helper: &mut Child) {
    match helper.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            if let Err(e) = helper.kill() {
                tracing::debug!("Could not kill AutoHotkey: {}", e);
            }
            let _ = helper.wait();
        }
    }
}
