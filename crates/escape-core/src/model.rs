// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The escape-details data model and the per-run result it attaches to.

use serde::{Deserialize, Serialize};

/// A thread that existed at the post-snapshot but not the pre-snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadEscape {
    pub thread_id: String,
    pub name: String,
    pub is_daemon: bool,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// A child process that was not in the pre-snapshot child-pid set and is
/// still running at the post-snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessEscape {
    pub pid: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmdline: Option<String>,
}

/// An async task pending on an observable event loop at the post-snapshot
/// that was not observable pre-snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncTaskEscape {
    pub name: String,
    pub state: String,
}

/// A language-specific escape bucket entry (goroutines, or anything a
/// foreign bridge reports that doesn't map onto the other buckets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherEscape {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// The escape diff between a pre- and post-snapshot, enriched with metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscapeDetails {
    #[serde(default)]
    pub threads: Vec<ThreadEscape>,
    #[serde(default)]
    pub processes: Vec<ProcessEscape>,
    #[serde(default)]
    pub async_tasks: Vec<AsyncTaskEscape>,
    #[serde(default)]
    pub goroutines: Vec<OtherEscape>,
    #[serde(default)]
    pub other: Vec<OtherEscape>,
}

impl EscapeDetails {
    /// True iff the diff contains at least one escaped worker of any kind.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
            && self.processes.is_empty()
            && self.async_tasks.is_empty()
            && self.goroutines.is_empty()
            && self.other.is_empty()
    }

    /// True iff at least one non-daemon thread, or any process/task/other
    /// entry, escaped. This is the "genuine escape" / `concurrency_escape`
    /// predicate shared by the classifier and the summary counters.
    pub fn has_genuine_worker(&self) -> bool {
        self.threads.iter().any(|t| !t.is_daemon)
            || !self.processes.is_empty()
            || !self.async_tasks.is_empty()
            || !self.goroutines.is_empty()
            || !self.other.is_empty()
    }

    /// True iff the diff is non-empty and every escaped entry is a daemon
    /// thread (the `daemon_thread_escape` classifier predicate).
    pub fn is_daemon_only(&self) -> bool {
        !self.is_empty() && !self.has_genuine_worker()
    }
}

/// The outcome of a single (input, repeat) invocation of the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub input: String,
    pub success: bool,
    pub crashed: bool,
    pub timed_out: bool,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: String,
    pub execution_time_ms: u64,
    pub escape_detected: bool,
    #[serde(default)]
    pub escape_details: EscapeDetails,
}

impl RunResult {
    /// Asserts the `success <-> (not crashed and not timed_out)` invariant
    /// from the data model. Used by tests and by callers constructing a
    /// `RunResult` outside of the harness (e.g. bridge ingestion).
    pub fn invariant_holds(&self) -> bool {
        self.success == (!self.crashed && !self.timed_out)
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
