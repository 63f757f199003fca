// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide registries the probe reads from.
//!
//! Rust has no runtime-level API to enumerate "every thread the scheduler
//! knows about" or "every task pending on an event loop" (§9 Design Notes).
//! Instead, every harness-managed spawn primitive is required to register
//! itself here before running the caller's code and deregister when it
//! finishes. This is the one piece of process-wide mutable state the core
//! owns, and it exists only because the alternative (OS-level enumeration)
//! is unavailable for in-process threads in a portable way.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A live entry in the thread registry.
#[derive(Debug, Clone)]
pub struct ThreadEntry {
    pub thread_id: u64,
    pub name: String,
    pub is_daemon: bool,
}

/// A live entry in the async-task registry.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    pub task_id: u64,
    pub name: String,
}

struct Registries {
    threads: HashMap<u64, ThreadEntry>,
    tasks: HashMap<u64, TaskEntry>,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static REGISTRIES: Mutex<Option<Registries>> = Mutex::new(None);

fn with_registries<R>(f: impl FnOnce(&mut Registries) -> R) -> R {
    let mut guard = REGISTRIES.lock();
    let registries = guard.get_or_insert_with(|| Registries {
        threads: HashMap::new(),
        tasks: HashMap::new(),
    });
    f(registries)
}

/// Allocate a fresh, process-unique id. Used to hand out stable identities
/// that survive name collisions (two threads can share a name).
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Register a thread as live. Returns the id to later pass to
/// [`deregister_thread`].
pub fn register_thread(name: impl Into<String>, is_daemon: bool) -> u64 {
    let id = next_id();
    with_registries(|r| {
        r.threads.insert(
            id,
            ThreadEntry {
                thread_id: id,
                name: name.into(),
                is_daemon,
            },
        );
    });
    id
}

pub fn deregister_thread(id: u64) {
    with_registries(|r| {
        r.threads.remove(&id);
    });
}

/// Register an async task as pending. Returns the id to later pass to
/// [`deregister_task`].
pub fn register_task(name: impl Into<String>) -> u64 {
    let id = next_id();
    with_registries(|r| {
        r.tasks.insert(id, TaskEntry { task_id: id, name: name.into() });
    });
    id
}

pub fn deregister_task(id: u64) {
    with_registries(|r| {
        r.tasks.remove(&id);
    });
}

/// A read-only snapshot of the registries at one instant.
pub fn snapshot_threads() -> Vec<ThreadEntry> {
    with_registries(|r| r.threads.values().cloned().collect())
}

pub fn snapshot_tasks() -> Vec<TaskEntry> {
    with_registries(|r| r.tasks.values().cloned().collect())
}

/// Test-only: clear all registries so tests don't observe leakage from a
/// previous test's abandoned workers. Tests that touch the registry must
/// run under `#[serial_test::serial]` since this state is process-wide.
#[cfg(any(test, feature = "test-support"))]
pub fn reset_for_test() {
    let mut guard = REGISTRIES.lock();
    *guard = Some(Registries {
        threads: HashMap::new(),
        tasks: HashMap::new(),
    });
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
