// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn thread(name: &str, is_daemon: bool) -> ThreadEscape {
    ThreadEscape {
        thread_id: name.to_string(),
        name: name.to_string(),
        is_daemon,
        state: "alive".to_string(),
        stack_trace: None,
    }
}

#[test]
fn empty_details_is_empty() {
    assert!(EscapeDetails::default().is_empty());
    assert!(!EscapeDetails::default().has_genuine_worker());
    assert!(!EscapeDetails::default().is_daemon_only());
}

#[test]
fn daemon_only_threads_are_not_genuine() {
    let details = EscapeDetails {
        threads: vec![thread("watchdog", true)],
        ..Default::default()
    };
    assert!(!details.is_empty());
    assert!(!details.has_genuine_worker());
    assert!(details.is_daemon_only());
}

#[test]
fn one_non_daemon_thread_is_genuine() {
    let details = EscapeDetails {
        threads: vec![thread("worker", false), thread("watchdog", true)],
        ..Default::default()
    };
    assert!(details.has_genuine_worker());
    assert!(!details.is_daemon_only());
}

#[test]
fn any_process_escape_is_genuine_even_without_threads() {
    let details = EscapeDetails {
        processes: vec![ProcessEscape {
            pid: 4242,
            name: "child".to_string(),
            cmdline: None,
        }],
        ..Default::default()
    };
    assert!(details.has_genuine_worker());
}

#[test]
fn any_async_task_escape_is_genuine() {
    let details = EscapeDetails {
        async_tasks: vec![AsyncTaskEscape {
            name: "bg".to_string(),
            state: "pending".to_string(),
        }],
        ..Default::default()
    };
    assert!(details.has_genuine_worker());
}

#[test]
fn run_result_invariant_success_matches_flags() {
    let ok = RunResult {
        input: String::new(),
        success: true,
        crashed: false,
        timed_out: false,
        output: String::new(),
        error: String::new(),
        execution_time_ms: 10,
        escape_detected: false,
        escape_details: EscapeDetails::default(),
    };
    assert!(ok.invariant_holds());

    let mut broken = ok.clone();
    broken.crashed = true;
    assert!(!broken.invariant_holds());
}
