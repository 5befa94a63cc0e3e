//! Running external tools and mapping their exit status.
//!
//! Two flavours: `run_attached` lets the tool talk to the terminal directly
//! (package installs, the interactive image fetcher), `run_captured` collects
//! stdout for parsing and keeps stderr for the error message.

use kvmac_core::ToolError;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Build a command for `program` with `args`.
pub(crate) fn command<I, S>(program: &str, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

/// Run with inherited stdio and fail on a non-zero exit.
pub(crate) async fn run_attached(tool: &str, mut cmd: Command) -> Result<(), ToolError> {
    debug!(tool, command = ?cmd.as_std(), "Running attached");
    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| ToolError::spawn_failed(tool, e))?;

    check_status(tool, status, "")
}

/// Run with captured output and return trimmed stdout on success.
pub(crate) async fn run_captured(tool: &str, mut cmd: Command) -> Result<String, ToolError> {
    debug!(tool, command = ?cmd.as_std(), "Running captured");
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ToolError::spawn_failed(tool, e))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    check_status(tool, output.status, stderr.trim())?;

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run with captured output, returning the exit status instead of failing.
pub(crate) async fn run_probe(tool: &str, mut cmd: Command) -> Result<(ExitStatus, String), ToolError> {
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ToolError::spawn_failed(tool, e))?;

    Ok((
        output.status,
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

fn check_status(tool: &str, status: ExitStatus, message: &str) -> Result<(), ToolError> {
    if status.success() {
        return Ok(());
    }
    let message = if message.is_empty() {
        "see output above".to_string()
    } else {
        message.to_string()
    };
    Err(ToolError::failed(tool, status.code(), message))
}
