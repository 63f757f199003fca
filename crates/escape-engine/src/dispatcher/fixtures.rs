// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled-in Rust targets exercising each end-to-end scenario from §8
//! (S1-S6 in spec.md), registered by name in
//! [`crate::dispatcher::lookup_native`]. Each mirrors one of
//! `original_source/tests/python/{escape_threads,no_escape,escape_process}.py`'s
//! fixture functions, translated into the idiom the snapshot probe
//! actually observes here (tracked spawns, not raw `std::thread::spawn`).

use std::time::Duration;

use escape_core::probe;

/// S1: spawns one non-daemon worker sleeping 2s and returns immediately,
/// leaving it running.
pub fn leaks_a_thread(_input: &str) -> Result<String, String> {
    probe::spawn_tracked_thread("leaked-worker", false, || {
        std::thread::sleep(Duration::from_secs(2));
    })
    .map_err(|e| e.to_string())?;
    Ok("spawned".to_string())
}

/// S2: spawns and joins a worker before returning, so nothing escapes.
pub fn joins_its_thread(_input: &str) -> Result<String, String> {
    let handle = probe::spawn_tracked_thread("joined-worker", false, || {
        std::thread::sleep(Duration::from_millis(50));
    })
    .map_err(|e| e.to_string())?;
    handle.join().map_err(|_| "worker thread panicked".to_string())?;
    Ok("joined".to_string())
}

/// S3: spawns a daemon-marked worker only, leaving it running.
pub fn leaks_a_daemon_thread(_input: &str) -> Result<String, String> {
    probe::spawn_tracked_thread("leaked-daemon", true, || {
        std::thread::sleep(Duration::from_secs(2));
    })
    .map_err(|e| e.to_string())?;
    Ok("spawned".to_string())
}

/// S4: blocks far past any reasonable timeout on the calling thread/task.
pub fn sleeps_past_its_timeout(_input: &str) -> Result<String, String> {
    std::thread::sleep(Duration::from_secs(10));
    Ok("woke up".to_string())
}

/// S5: spawns a child process via `std::process::Command` and does not
/// wait on it, leaving the PID running past return.
pub fn leaks_a_child_process(_input: &str) -> Result<String, String> {
    std::process::Command::new("sleep")
        .arg("2")
        .spawn()
        .map_err(|e| format!("failed to spawn child: {e}"))?;
    Ok("spawned".to_string())
}

/// An async analogue of S1: spawns a task that outlives the call. Only
/// meaningful under inline isolation, where the target runs on the
/// orchestrator's own tokio runtime thread; worker-thread isolation runs
/// this on a bare OS thread with no runtime to spawn onto.
pub fn leaks_an_async_task(_input: &str) -> Result<String, String> {
    probe::spawn_tracked_task("leaked-task", async {
        tokio::time::sleep(Duration::from_secs(2)).await;
    });
    Ok("spawned".to_string())
}

/// A target that always fails without crashing the process, for crash
/// classification tests that aren't platform aborts.
pub fn returns_an_error(_input: &str) -> Result<String, String> {
    Err("invalid input".to_string())
}

/// A target that aborts the process outright, for the `Crash` classifier
/// rule's platform-abort pattern match.
pub fn aborts_the_process(_input: &str) -> Result<String, String> {
    panic!("fatal runtime error: simulated abort");
}

#[cfg(test)]
#[path = "fixtures_tests.rs"]
mod tests;
