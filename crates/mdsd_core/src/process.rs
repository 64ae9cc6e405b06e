//! Child process helpers.
//!
//! External tools write diagnostics to both stdout and stderr. Both pipes are
//! pumped line by line on scoped threads into one shared buffer, so lines are
//! never torn but their cross-stream order is not guaranteed.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use parking_lot::Mutex;

/// Combined output of a finished child process.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// stdout and stderr lines, each terminated by `\n`.
    pub text: String,
    /// Exit status.
    pub status: ExitStatus,
}

impl CapturedOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, or -1 if the process was killed by a signal.
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

/// Run `cmd` to completion, capturing stdout and stderr into one buffer.
///
/// Blocks until both pipes are drained and the process has exited.
pub fn run_captured(cmd: &mut Command) -> io::Result<CapturedOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!("Running: {}", describe_command(cmd));

    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let sink = Mutex::new(String::new());
    thread::scope(|scope| {
        let sink = &sink;
        if let Some(out) = stdout {
            scope.spawn(move || pump_lines(out, sink));
        }
        if let Some(err) = stderr {
            scope.spawn(move || pump_lines(err, sink));
        }
    });

    let status = child.wait()?;
    tracing::debug!("Exited with {}", status);

    Ok(CapturedOutput {
        text: sink.into_inner(),
        status,
    })
}

/// Render a command line for logs.
pub fn describe_command(cmd: &Command) -> String {
    let mut parts = vec![quote(&cmd.get_program().to_string_lossy())];
    parts.extend(cmd.get_args().map(|arg| quote(&arg.to_string_lossy())));
    parts.join(" ")
}

fn quote(part: &str) -> String {
    if part.is_empty() || part.contains(char::is_whitespace) {
        format!("\"{}\"", part)
    } else {
        part.to_string()
    }
}

/// Append every line from `reader` to `sink`, whole lines at a time.
fn pump_lines<R: Read>(reader: R, sink: &Mutex<String>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(&['\r', '\n'][..]);
                let mut text = sink.lock();
                text.push_str(line);
                text.push('\n');
            }
            Err(e) => {
                tracing::debug!("Stopped reading child output: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_quotes_spaces() {
        let mut cmd = Command::new("hi2txt");
        cmd.args(["-r", "C:/My Games/hi/pacman.hi", "-hiscoredat", "hiscore.dat"]);
        assert_eq!(
            describe_command(&cmd),
            "hi2txt -r \"C:/My Games/hi/pacman.hi\" -hiscoredat hiscore.dat"
        );
    }

    #[test]
    fn missing_program_is_io_error() {
        let mut cmd = Command::new("/nonexistent/tool/for/mdsd");
        assert!(run_captured(&mut cmd).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn captures_both_streams() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out-line; echo err-line 1>&2"]);

        let output = run_captured(&mut cmd).unwrap();
        assert!(output.success());
        assert!(output.text.contains("out-line\n"));
        assert!(output.text.contains("err-line\n"));
        assert_eq!(output.text.lines().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn reports_exit_code() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "printf 'no newline'; exit 3"]);

        let output = run_captured(&mut cmd).unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code(), 3);
        assert_eq!(output.text, "no newline\n");
    }
}
