// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot probe: enumerate live workers at an instant, diff two instants.
//!
//! See `escape_core::probe::registry` for why thread/task liveness is
//! tracked via an explicit registry rather than runtime introspection, and
//! the module-level docs on [`snapshot`] for the child-process side, which
//! *is* available from the OS.

pub mod registry;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::{AsyncTaskEscape, EscapeDetails, OtherEscape, ProcessEscape, ThreadEscape};

/// Settle delay for cooperative isolation modes (worker-thread, inline).
pub const SETTLE_DELAY_COOPERATIVE: Duration = Duration::from_millis(100);
/// Settle delay for isolated mode (child process).
pub const SETTLE_DELAY_ISOLATED: Duration = Duration::from_millis(500);

/// Process names suppressed from the "other" bucket when the OS process
/// table is consulted directly, to avoid false positives from system
/// processes that happen to share our parent PID (§4.1).
pub const SUPPRESSED_SYSTEM_BINARIES: &[&str] =
    &["systemd", "bash", "sh", "grep", "ps", "init", "sshd"];

/// A live-worker snapshot taken at one instant.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub thread_ids: HashSet<u64>,
    pub child_pids: HashSet<u32>,
    pub async_task_ids: HashSet<u64>,
}

/// Take a snapshot from the registries plus (on Linux) the OS process
/// table filtered by the current PID's children.
pub fn snapshot() -> Snapshot {
    let thread_ids = registry::snapshot_threads().into_iter().map(|t| t.thread_id).collect();
    let async_task_ids = registry::snapshot_tasks().into_iter().map(|t| t.task_id).collect();
    let child_pids = child_pids_of(std::process::id());
    Snapshot {
        thread_ids,
        child_pids,
        async_task_ids,
    }
}

/// Child PIDs of `parent_pid`, read from `/proc` (Linux only; returns an
/// empty set elsewhere or if `/proc` is unreadable — absence of the OS
/// process table is not treated as an error per §4.1).
pub fn child_pids_of(parent_pid: u32) -> HashSet<u32> {
    let mut children = HashSet::new();
    let proc_dir = match std::fs::read_dir("/proc") {
        Ok(dir) => dir,
        Err(_) => return children,
    };

    for entry in proc_dir.flatten() {
        let pid: u32 = match entry.file_name().to_str().and_then(|s| s.parse().ok()) {
            Some(pid) => pid,
            None => continue,
        };
        let status_path = entry.path().join("status");
        let content = match std::fs::read_to_string(&status_path) {
            Ok(c) => c,
            Err(_) => continue,
        };
        if status_ppid(&content) == Some(parent_pid) {
            children.insert(pid);
        }
    }
    children
}

fn status_ppid(status_content: &str) -> Option<u32> {
    for line in status_content.lines() {
        if let Some(rest) = line.strip_prefix("PPid:") {
            return rest.trim().parse().ok();
        }
    }
    None
}

fn process_name_of(pid: u32) -> Option<String> {
    let status_path = PathBuf::from(format!("/proc/{pid}/status"));
    let content = std::fs::read_to_string(status_path).ok()?;
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("Name:") {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Apply strict set subtraction between `pre` and `post`, enriching each
/// escaped element with metadata. A worker present in both snapshots is
/// never reported, regardless of whether its name or state changed
/// in-between (Testable Property 2 — membership is by identity).
pub fn diff(pre: &Snapshot, post: &Snapshot) -> EscapeDetails {
    let mut details = EscapeDetails::default();

    let escaped_thread_ids: Vec<u64> = post
        .thread_ids
        .iter()
        .filter(|id| !pre.thread_ids.contains(id))
        .copied()
        .collect();
    let live_threads = registry::snapshot_threads();
    for id in escaped_thread_ids {
        if let Some(entry) = live_threads.iter().find(|t| t.thread_id == id) {
            details.threads.push(ThreadEscape {
                thread_id: id.to_string(),
                name: entry.name.clone(),
                is_daemon: entry.is_daemon,
                state: "alive".to_string(),
                stack_trace: None,
            });
        }
    }

    let escaped_pids: Vec<u32> = post
        .child_pids
        .iter()
        .filter(|pid| !pre.child_pids.contains(pid))
        .copied()
        .collect();
    for pid in escaped_pids {
        let name = process_name_of(pid).unwrap_or_default();
        if SUPPRESSED_SYSTEM_BINARIES.contains(&name.as_str()) {
            continue;
        }
        details.processes.push(ProcessEscape {
            pid,
            name,
            cmdline: None,
        });
    }

    let escaped_task_ids: Vec<u64> = post
        .async_task_ids
        .iter()
        .filter(|id| !pre.async_task_ids.contains(id))
        .copied()
        .collect();
    let live_tasks = registry::snapshot_tasks();
    for id in escaped_task_ids {
        if let Some(entry) = live_tasks.iter().find(|t| t.task_id == id) {
            details.async_tasks.push(AsyncTaskEscape {
                name: entry.name.clone(),
                state: "pending".to_string(),
            });
        }
    }

    details
}

/// Spawn a thread whose liveness is tracked by the registry.
///
/// Registers before `f` starts running and deregisters the instant it
/// returns (including on panic, via a `scopeguard`). A thread spawned this
/// way that is still running at the post-snapshot shows up as an escape;
/// one that finishes (or is joined) before then never does. This is the one
/// spawn primitive harness-managed workers and native fixtures are required
/// to route through instead of bare `std::thread::Builder::spawn` (§4.1).
pub fn spawn_tracked_thread<F>(name: impl Into<String>, is_daemon: bool, f: F) -> std::io::Result<std::thread::JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let name = name.into();
    let id = registry::register_thread(name.clone(), is_daemon);
    std::thread::Builder::new().name(name).spawn(move || {
        let _deregister = scopeguard::guard(id, |id| registry::deregister_thread(id));
        f();
    })
}

/// Spawn a Tokio task whose liveness is tracked by the registry, the async
/// analogue of [`spawn_tracked_thread`]. Requires a Tokio runtime context;
/// absent one, callers simply don't invoke this and the async bucket stays
/// empty, which is not an error (§4.1).
pub fn spawn_tracked_task<F>(name: impl Into<String>, fut: F) -> tokio::task::JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    let name = name.into();
    let id = registry::register_task(name);
    tokio::spawn(async move {
        let _deregister = scopeguard::guard(id, |id| registry::deregister_task(id));
        fut.await
    })
}

/// Build an `OtherEscape` bucket entry for a foreign-language worker kind
/// the native probe has no typed bucket for (used by the bridge path when
/// ingesting a goroutine or similar from a non-Rust report).
pub fn other_escape(name: impl Into<String>, state: Option<String>) -> OtherEscape {
    OtherEscape { name: name.into(), state }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
