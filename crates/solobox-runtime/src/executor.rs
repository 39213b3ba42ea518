//! Target command execution.
//!
//! The child inherits standard input but has stdout and stderr captured
//! as byte buffers; they are relayed to the parent's streams only after
//! the child has fully terminated. An explicit copy, not a live redirect.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use solobox_common::constants::GENERIC_FAILURE_CODE;
use solobox_common::error::{LaunchError, Result};

/// Captured outcome of a terminated child process.
#[derive(Debug, Clone)]
pub struct ChildResult {
    /// Captured standard output bytes.
    pub stdout: Vec<u8>,
    /// Captured standard error bytes.
    pub stderr: Vec<u8>,
    /// Child exit status: 0 success, positive child-reported failure.
    pub status: i32,
}

/// Spawns `command` with `args` and blocks until it terminates.
///
/// A child that starts and exits non-zero is a successful call carrying
/// a non-zero [`ChildResult::status`].
///
/// # Errors
///
/// Returns a spawn error only when the command cannot be started at all
/// (missing executable, permission denied).
pub fn run(command: &Path, args: &[String]) -> Result<ChildResult> {
    tracing::info!(command = %command.display(), ?args, "spawning target command");

    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::inherit())
        .output()
        .map_err(|e| LaunchError::Spawn {
            command: command.display().to_string(),
            source: e,
        })?;

    // A signal-killed child has no exit code; map it to the generic
    // failure code rather than inventing a negative translation.
    let status = output.status.code().unwrap_or(GENERIC_FAILURE_CODE);
    tracing::info!(status, "target command terminated");

    Ok(ChildResult {
        stdout: output.stdout,
        stderr: output.stderr,
        status,
    })
}

/// Writes the captured stdout and stderr to the parent's streams as
/// UTF-8 text. Write failures (e.g. a closed pipe) are ignored.
pub fn relay(result: &ChildResult) {
    if !result.stdout.is_empty() {
        let text = String::from_utf8_lossy(&result.stdout);
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
    if !result.stderr.is_empty() {
        let text = String::from_utf8_lossy(&result.stderr);
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(text.as_bytes());
        let _ = err.flush();
    }
}
