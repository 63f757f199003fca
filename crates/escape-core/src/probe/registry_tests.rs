// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn register_then_deregister_removes_entry() {
    reset_for_test();
    let id = register_thread("worker", false);
    assert!(snapshot_threads().iter().any(|t| t.thread_id == id));
    deregister_thread(id);
    assert!(!snapshot_threads().iter().any(|t| t.thread_id == id));
}

#[test]
#[serial]
fn distinct_registrations_get_distinct_ids() {
    reset_for_test();
    let a = register_thread("a", false);
    let b = register_thread("b", false);
    assert_ne!(a, b);
    deregister_thread(a);
    deregister_thread(b);
}

#[test]
#[serial]
fn task_registry_round_trips() {
    reset_for_test();
    let id = register_task("bg_fetch");
    assert!(snapshot_tasks().iter().any(|t| t.task_id == id && t.name == "bg_fetch"));
    deregister_task(id);
    assert!(snapshot_tasks().is_empty());
}
