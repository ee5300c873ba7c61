use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::MediaError;

/// Run an external tool with an argument vector and a hard deadline.
///
/// The child is killed if the deadline passes or the calling future is dropped.
pub(crate) async fn run_tool<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
    timeout: Duration,
) -> Result<Output, MediaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(MediaError::Tool { tool, source }),
        Err(_) => {
            tracing::warn!(tool, timeout_ms = timeout.as_millis() as u64, "Media tool timed out");
            Err(MediaError::Timeout { tool, timeout })
        }
    }
}

/// Last few lines of a tool's stderr, for error messages.
pub(crate) fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}
