// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-process bridge client: shell out to a foreign-language bridge
//! binary, hand it the §6 request verbatim, and parse its stdout as a
//! `SessionReport` (§4.7). The bridge owns its own harness, classifier, and
//! timeout enforcement on the other side of the pipe — this client never
//! re-analyzes or second-guesses what comes back, matching the "never
//! re-analyzing the foreign result" rule.
//!
//! Spawn/wait plumbing mirrors `oj-adapters::subprocess::run_with_timeout`:
//! `tokio::process::Command` with piped stdio, `kill_on_drop(true)` so a
//! wedged bridge process doesn't outlive this call, `stdout` parsed only on
//! a zero exit status.

use std::process::Stdio;
use std::time::Duration;

use escape_core::{AnalysisRequest, SessionReport};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::BridgeError;

/// Where to find the bridge binary for one non-native language.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bridge_binary: String,
}

/// Send `request` to `config.bridge_binary` over stdin and parse its
/// stdout as a `SessionReport`. `timeout` bounds the whole round trip,
/// including the bridge's own per-run timeouts, so a bridge that hangs
/// outright can't wedge the orchestrator either.
pub async fn run_bridge(config: &BridgeConfig, request: &AnalysisRequest, timeout: Duration) -> Result<SessionReport, BridgeError> {
    tracing::debug!(bridge = %config.bridge_binary, session_id = %request.session_id, "invoking bridge");
    let payload = serde_json::to_vec(request).map_err(|e| BridgeError::Write(e.to_string()))?;

    let mut child = Command::new(&config.bridge_binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BridgeError::Spawn {
            path: config.bridge_binary.clone(),
            source,
        })?;

    let mut stdin = child.stdin.take().ok_or_else(|| BridgeError::Write("no stdin handle on spawned bridge".to_string()))?;

    let wait = async {
        stdin.write_all(&payload).await.map_err(|e| BridgeError::Write(e.to_string()))?;
        drop(stdin);
        child.wait_with_output().await.map_err(|e| BridgeError::Write(e.to_string()))
    };

    let output = match tokio::time::timeout(timeout, wait).await {
        Ok(result) => result?,
        Err(_elapsed) => {
            return Err(BridgeError::NonZeroExit {
                status: "timed out".to_string(),
                stderr: format!("bridge did not return within {timeout:?}"),
            });
        }
    };

    if !output.status.success() {
        return Err(BridgeError::NonZeroExit {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let report: SessionReport = serde_json::from_slice(&output.stdout).map_err(|e| BridgeError::MalformedResponse(e.to_string()))?;
    tracing::info!(bridge = %config.bridge_binary, session_id = %request.session_id, "bridge returned a report");
    Ok(report)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
