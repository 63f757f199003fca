// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Isolation runners: invoke a target under one of three modes, enforce a
//! timeout, and capture its outcome (§4.2).

pub mod inline;
pub mod process;
pub mod thread;

use escape_core::EscapeDetails;
use serde::{Deserialize, Serialize};

/// One of the three isolation modes a target can be invoked under (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationMode {
    Process,
    WorkerThread,
    Inline,
}

/// A Rust-native, in-process target: takes the run input, returns the
/// target's stdout-equivalent output or an error message. A target that
/// spawns concurrency primitives is expected to use
/// `escape_core::probe::spawn_tracked_thread`/`spawn_tracked_task` so the
/// registry can observe them; one that doesn't simply won't be detected,
/// the same "best-effort, vantage-point-relative" limitation spec.md §4.1
/// already accepts.
pub type NativeFn = fn(&str) -> Result<String, String>;

/// What one isolation runner invocation produced, before the harness folds
/// it into a full `RunResult` (§4.3).
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output: String,
    pub error: String,
    pub crashed: bool,
    pub timed_out: bool,
    pub execution_time_ms: u64,
    /// `Some` only for process-mode isolation, which diffs its own
    /// snapshot inside the child since the probe registry is per-process
    /// and the parent can't see into it directly (§4.1, §9 "serialize
    /// snapshots back to the parent" rule). `None` for worker-thread/inline,
    /// where the harness diffs the shared, process-wide registry itself.
    pub escape_details: Option<EscapeDetails>,
}

/// Render a caught panic payload as the harness's crash-message form.
pub fn render_panic(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic in target: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic in target: {s}")
    } else {
        "panic in target: <non-string payload>".to_string()
    }
}
