// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process isolation: re-exec the harness binary itself with a hidden
//! `--run-probe-child` mode, hand it the request over stdin, and read its
//! result back over stdout (§4.2, §9).
//!
//! The parent side mirrors `oj-adapters::subprocess::run_with_timeout`:
//! `tokio::process::Command` plus `tokio::time::timeout`, with
//! `kill_on_drop(true)` so a timed-out child is reaped automatically rather
//! than left running. The child has no inherited descriptors beyond
//! stdin/stdout/stderr (§5 isolation guarantee) — `Command`'s defaults
//! already withhold everything else.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use escape_core::probe;
use escape_core::EscapeDetails;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{render_panic, NativeFn, RunOutcome};
use crate::error::RunnerError;

/// Sent from the parent to the re-exec'd child over stdin.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChildRequest {
    /// The dispatcher's native-registry key for the target.
    pub target: String,
    pub input: String,
    /// How long the child waits after the target returns before taking its
    /// post-snapshot (§9 Open Question 2); forwarded from
    /// `escape-daemon::config::Config` so the isolated settle delay stays
    /// configurable even though the parent can't perform the sleep itself.
    pub settle_delay_ms: u64,
}

/// Sent from the child back to the parent over stdout.
///
/// Carries `escape_details` directly — the probe registry is per-process,
/// so the child is the only one positioned to diff it, and must serialize
/// the result back rather than leaving the parent to guess (§9).
#[derive(Debug, Serialize, Deserialize)]
pub struct ChildResponse {
    pub output: String,
    pub error: String,
    pub crashed: bool,
    pub escape_details: EscapeDetails,
}

/// Parent side: spawn `exe --run-probe-child`, feed it `input`, wait up to
/// `timeout`.
pub async fn run(exe: &Path, registry_key: &str, input: &str, timeout: Duration, settle_delay: Duration) -> Result<RunOutcome, RunnerError> {
    let request = ChildRequest {
        target: registry_key.to_string(),
        input: input.to_string(),
        settle_delay_ms: settle_delay.as_millis() as u64,
    };
    let payload = serde_json::to_vec(&request).map_err(|e| RunnerError::ChildProtocol(e.to_string()))?;

    let mut child = Command::new(exe)
        .arg("--run-probe-child")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(RunnerError::ProcessSpawn)?;

    let mut stdin = child.stdin.take().ok_or_else(|| RunnerError::ChildProtocol("no stdin handle on spawned child".to_string()))?;

    let start = Instant::now();
    let wait = async {
        stdin
            .write_all(&payload)
            .await
            .map_err(|e| RunnerError::ChildProtocol(format!("failed writing child request: {e}")))?;
        drop(stdin);
        child
            .wait_with_output()
            .await
            .map_err(|e| RunnerError::ChildProtocol(format!("failed reading child response: {e}")))
    };

    let output = match tokio::time::timeout(timeout, wait).await {
        Ok(result) => result?,
        Err(_elapsed) => {
            return Ok(RunOutcome {
                output: String::new(),
                error: format!("isolated child exceeded timeout of {timeout:?}"),
                crashed: true,
                timed_out: true,
                execution_time_ms: start.elapsed().as_millis() as u64,
                escape_details: None,
            });
        }
    };
    let execution_time_ms = start.elapsed().as_millis() as u64;

    if output.stdout.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Ok(RunOutcome {
            output: String::new(),
            error: format!("isolated child exited with {} and no output: {stderr}", output.status),
            crashed: true,
            timed_out: false,
            execution_time_ms,
            escape_details: None,
        });
    }

    let response: ChildResponse =
        serde_json::from_slice(&output.stdout).map_err(|e| RunnerError::ChildProtocol(format!("malformed child response: {e}")))?;

    Ok(RunOutcome {
        output: response.output,
        error: response.error,
        crashed: response.crashed,
        timed_out: false,
        execution_time_ms,
        escape_details: Some(response.escape_details),
    })
}

/// Child side: read a `ChildRequest` from stdin, invoke `lookup(target)` on
/// the calling thread, diff the pre/post snapshot, and write a
/// `ChildResponse` to stdout. Returns the process exit code the caller's
/// `main` should use (0 success, 1 on any failure including target crash,
/// matching §6's exit-code contract for the outer session too).
pub fn run_probe_child(lookup: impl Fn(&str) -> Option<NativeFn>) -> i32 {
    run_probe_child_with_io(std::io::stdin(), std::io::stdout(), lookup)
}

/// The testable core of [`run_probe_child`]: reads the request from `input`
/// instead of assuming the real process stdin, so tests can drive it with
/// an in-memory buffer.
pub fn run_probe_child_with_io<R: std::io::Read, W: std::io::Write>(
    mut input: R,
    mut output: W,
    lookup: impl Fn(&str) -> Option<NativeFn>,
) -> i32 {
    let mut buf = String::new();
    if input.read_to_string(&mut buf).is_err() {
        return write_protocol_error(&mut output, "failed to read child request from stdin");
    }

    let request: ChildRequest = match serde_json::from_str(&buf) {
        Ok(r) => r,
        Err(e) => return write_protocol_error(&mut output, &format!("malformed child request: {e}")),
    };

    let target = match lookup(&request.target) {
        Some(f) => f,
        None => return write_protocol_error(&mut output, &format!("unknown native target: {}", request.target)),
    };

    let pre = probe::snapshot();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| target(&request.input)));
    std::thread::sleep(Duration::from_millis(request.settle_delay_ms));
    let post = probe::snapshot();
    let escape_details = probe::diff(&pre, &post);

    let response = match result {
        Ok(Ok(body)) => ChildResponse {
            output: body,
            error: String::new(),
            crashed: false,
            escape_details,
        },
        Ok(Err(error)) => ChildResponse {
            output: String::new(),
            error,
            crashed: true,
            escape_details,
        },
        Err(payload) => ChildResponse {
            output: String::new(),
            error: render_panic(payload),
            crashed: true,
            escape_details,
        },
    };

    let crashed = response.crashed;
    match serde_json::to_writer(output, &response) {
        Ok(()) => i32::from(crashed),
        Err(_) => 1,
    }
}

fn write_protocol_error<W: std::io::Write>(output: &mut W, message: &str) -> i32 {
    let response = ChildResponse {
        output: String::new(),
        error: message.to_string(),
        crashed: true,
        escape_details: EscapeDetails::default(),
    };
    let _ = serde_json::to_writer(output, &response);
    1
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
