use std::time::Duration;

use escape_core::probe;

use super::*;

#[test]
#[serial_test::serial]
fn leaks_a_thread_leaves_exactly_one_non_daemon_thread_running() {
    probe::registry::reset_for_test();
    let pre = probe::snapshot();
    leaks_a_thread("").unwrap();
    std::thread::sleep(Duration::from_millis(20));
    let post = probe::snapshot();
    let details = probe::diff(&pre, &post);
    assert_eq!(details.threads.len(), 1);
    assert!(!details.threads[0].is_daemon);
}

#[test]
#[serial_test::serial]
fn joins_its_thread_leaves_nothing_running() {
    probe::registry::reset_for_test();
    let pre = probe::snapshot();
    joins_its_thread("").unwrap();
    let post = probe::snapshot();
    assert!(probe::diff(&pre, &post).is_empty());
}

#[test]
#[serial_test::serial]
fn leaks_a_daemon_thread_is_daemon_only() {
    probe::registry::reset_for_test();
    let pre = probe::snapshot();
    leaks_a_daemon_thread("").unwrap();
    std::thread::sleep(Duration::from_millis(20));
    let post = probe::snapshot();
    let details = probe::diff(&pre, &post);
    assert!(details.is_daemon_only());
}

#[test]
fn leaks_a_child_process_leaves_its_pid_in_the_child_set() {
    let pre = probe::child_pids_of(std::process::id());
    leaks_a_child_process("").unwrap();
    std::thread::sleep(Duration::from_millis(50));
    let post = probe::child_pids_of(std::process::id());
    assert!(post.difference(&pre).count() >= 1);
}

#[test]
fn returns_an_error_is_an_ordinary_err() {
    assert_eq!(returns_an_error("x"), Err("invalid input".to_string()));
}

#[test]
fn aborts_the_process_panics_with_a_platform_abort_message() {
    let result = std::panic::catch_unwind(|| aborts_the_process("x"));
    assert!(result.is_err());
}
