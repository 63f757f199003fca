use escape_core::{AsyncTaskEscape, EscapeDetails, ProcessEscape, ThreadEscape};

use super::*;

fn run(crashed: bool, timed_out: bool, escape_detected: bool, escape_details: EscapeDetails, error: &str) -> RunResult {
    RunResult {
        input: "x".to_string(),
        success: !crashed && !timed_out,
        crashed,
        timed_out,
        output: String::new(),
        error: error.to_string(),
        execution_time_ms: 1,
        escape_detected,
        escape_details,
    }
}

fn with_thread(is_daemon: bool) -> EscapeDetails {
    EscapeDetails {
        threads: vec![ThreadEscape {
            thread_id: "1".to_string(),
            name: "worker".to_string(),
            is_daemon,
            state: "alive".to_string(),
            stack_trace: None,
        }],
        ..Default::default()
    }
}

#[test]
fn non_daemon_thread_escape_is_a_high_severity_concurrency_escape() {
    let result = run(false, false, true, with_thread(false), "");
    let finding = analyze_result(&result).expect("expected a vulnerability");
    assert_eq!(finding.vulnerability_type, VulnerabilityType::ConcurrencyEscape);
    assert_eq!(finding.severity, Severity::High);
}

#[test]
fn process_escape_is_a_concurrency_escape_even_with_no_threads() {
    let details = EscapeDetails {
        processes: vec![ProcessEscape {
            pid: 123,
            name: "child".to_string(),
            cmdline: None,
        }],
        ..Default::default()
    };
    let result = run(false, false, true, details, "");
    let finding = analyze_result(&result).expect("expected a vulnerability");
    assert_eq!(finding.vulnerability_type, VulnerabilityType::ConcurrencyEscape);
}

#[test]
fn async_task_escape_is_a_concurrency_escape() {
    let details = EscapeDetails {
        async_tasks: vec![AsyncTaskEscape {
            name: "task".to_string(),
            state: "pending".to_string(),
        }],
        ..Default::default()
    };
    let result = run(false, false, true, details, "");
    let finding = analyze_result(&result).expect("expected a vulnerability");
    assert_eq!(finding.vulnerability_type, VulnerabilityType::ConcurrencyEscape);
}

#[test]
fn daemon_only_escape_is_a_low_severity_daemon_thread_escape() {
    let result = run(false, false, true, with_thread(true), "");
    let finding = analyze_result(&result).expect("expected a vulnerability");
    assert_eq!(finding.vulnerability_type, VulnerabilityType::DaemonThreadEscape);
    assert_eq!(finding.severity, Severity::Low);
}

#[test]
fn timeout_with_a_genuine_escape_is_high_severity_timeout_with_escape() {
    let result = run(false, true, true, with_thread(false), "");
    let finding = analyze_result(&result).expect("expected a vulnerability");
    assert_eq!(finding.vulnerability_type, VulnerabilityType::TimeoutWithEscape);
    assert_eq!(finding.severity, Severity::High);
}

#[test]
fn timeout_without_any_escape_yields_no_vulnerability() {
    let result = run(false, true, false, EscapeDetails::default(), "");
    assert!(analyze_result(&result).is_none());
}

#[yare::parameterized(
    abort = { "process aborted" },
    segfault = { "Segmentation fault (core dumped)" },
    sigsegv = { "terminated by SIGSEGV" },
    sigabrt = { "terminated by SIGABRT" },
    panic_in = { "panic in target thread" },
    fatal_runtime = { "fatal runtime error: stack overflow" },
)]
fn crash_with_a_platform_abort_message_is_a_medium_severity_crash(message: &str) {
    let result = run(true, false, false, EscapeDetails::default(), message);
    let finding = analyze_result(&result).expect("expected a vulnerability");
    assert_eq!(finding.vulnerability_type, VulnerabilityType::Crash);
    assert_eq!(finding.severity, Severity::Medium);
}

#[test]
fn crash_with_an_ordinary_error_message_yields_no_vulnerability() {
    let result = run(true, false, false, EscapeDetails::default(), "invalid input");
    assert!(analyze_result(&result).is_none());
}

#[test]
fn successful_run_with_no_escape_yields_no_vulnerability() {
    let result = run(false, false, false, EscapeDetails::default(), "");
    assert!(analyze_result(&result).is_none());
}

#[test]
fn categorize_results_pairs_vulnerabilities_with_the_folded_summary() {
    let runs = vec![
        run(false, false, false, EscapeDetails::default(), ""),
        run(false, false, true, with_thread(false), ""),
        run(true, false, false, EscapeDetails::default(), "sigsegv"),
    ];
    let (vulnerabilities, summary) = categorize_results(&runs);
    assert_eq!(vulnerabilities.len(), 2);
    assert_eq!(summary.total_tests, 3);
    assert_eq!(summary.successes, 1);
    assert_eq!(summary.crashes, 1);
    assert_eq!(summary.genuine_escapes, 1);
}
