// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::model::EscapeDetails;

fn run(success: bool, crashed: bool, timed_out: bool, escape_detected: bool, genuine: bool) -> RunResult {
    let mut details = EscapeDetails::default();
    if escape_detected {
        if genuine {
            details.processes.push(crate::model::ProcessEscape {
                pid: 1,
                name: "child".to_string(),
                cmdline: None,
            });
        } else {
            details.threads.push(crate::model::ThreadEscape {
                thread_id: "t".to_string(),
                name: "t".to_string(),
                is_daemon: true,
                state: "alive".to_string(),
                stack_trace: None,
            });
        }
    }
    RunResult {
        input: String::new(),
        success,
        crashed,
        timed_out,
        output: String::new(),
        error: String::new(),
        execution_time_ms: 1,
        escape_detected,
        escape_details: details,
    }
}

#[test]
fn summary_arithmetic_holds() {
    let results = vec![
        run(true, false, false, false, false),
        run(false, true, false, false, false),
        run(false, true, true, false, false),
        run(true, false, false, true, true),
        run(true, false, false, true, false),
    ];
    let summary = Summary::from_results(&results);
    assert_eq!(summary.total_tests, 5);
    assert_eq!(summary.timeouts, 1);
    assert_eq!(summary.crashes, 1);
    assert_eq!(summary.successes, 3);
    assert_eq!(
        summary.successes + summary.crashes + summary.timeouts,
        summary.total_tests
    );
    assert_eq!(summary.escapes, 2);
    assert_eq!(summary.genuine_escapes, 1);
    assert!(summary.genuine_escapes <= summary.escapes);
    assert!(summary.escapes <= summary.total_tests);
}

#[test]
fn summary_crash_rate_counts_timeouts_and_crashes_together() {
    let results = vec![
        run(false, true, false, false, false),
        run(false, true, true, false, false),
        run(true, false, false, false, false),
        run(true, false, false, false, false),
    ];
    let summary = Summary::from_results(&results);
    assert_eq!(summary.crash_rate, 0.5);
}

#[test]
fn summary_crash_rate_on_empty_results_does_not_divide_by_zero() {
    let summary = Summary::from_results(&[]);
    assert_eq!(summary.total_tests, 0);
    assert_eq!(summary.crash_rate, 0.0);
}

#[test]
fn fatal_report_has_crash_rate_one_and_one_crash() {
    let report = SessionReport::fatal("sess-1", "python", "target not found");
    assert_eq!(report.summary.crash_rate, 1.0);
    assert_eq!(report.summary.crashes, 1);
    assert_eq!(report.summary.total_tests, 0);
    assert!(report.results.is_empty());
    assert!(report.vulnerabilities.is_empty());
    assert_eq!(report.error.as_deref(), Some("target not found"));
}

#[test]
fn analysis_mode_serializes_snake_case() {
    assert_eq!(serde_json::to_value(AnalysisMode::Both).unwrap(), "both");
}
