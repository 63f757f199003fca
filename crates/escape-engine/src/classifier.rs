// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Convert `RunResult`s into vulnerabilities and a session summary (§4.4).

use escape_core::{RunResult, Severity, Summary, Vulnerability, VulnerabilityType};

/// Substrings that mark a crash message as a platform-level abort rather
/// than an ordinary target error (Supplement #2 of SPEC_FULL.md,
/// grounded in the source's crash-kind strings: `SystemExit`,
/// `Segmentation fault`, `abort`, and friends). Matched case-insensitively.
const PLATFORM_ABORT_PATTERNS: &[&str] = &["abort", "segmentation fault", "sigsegv", "sigabrt", "panic in", "fatal runtime error"];

/// True iff `message` looks like a platform-level abort rather than an
/// ordinary `Err`/exception the target raised on its own.
pub fn is_platform_abort(message: &str) -> bool {
    let lower = message.to_lowercase();
    PLATFORM_ABORT_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Emit at most one vulnerability per run (§4.4's first-match-wins rule
/// table). Order matters: a genuine concurrency escape always wins over a
/// daemon-only one, which wins over a timeout-with-escape, etc.
pub fn analyze_result(run: &RunResult) -> Option<Vulnerability> {
    if run.escape_detected && run.escape_details.has_genuine_worker() {
        return Some(vulnerability(
            run,
            VulnerabilityType::ConcurrencyEscape,
            Severity::High,
            "target left a non-daemon thread, child process, or async task running after it returned",
        ));
    }

    if run.escape_detected && run.escape_details.is_daemon_only() {
        return Some(vulnerability(
            run,
            VulnerabilityType::DaemonThreadEscape,
            Severity::Low,
            "target left only daemon threads running after it returned",
        ));
    }

    if run.timed_out && run.escape_detected {
        return Some(vulnerability(
            run,
            VulnerabilityType::TimeoutWithEscape,
            Severity::High,
            "target timed out and left workers running",
        ));
    }

    if run.timed_out {
        return None;
    }

    if run.crashed && is_platform_abort(&run.error) {
        return Some(vulnerability(run, VulnerabilityType::Crash, Severity::Medium, &run.error));
    }

    None
}

fn vulnerability(run: &RunResult, vulnerability_type: VulnerabilityType, severity: Severity, description: &str) -> Vulnerability {
    Vulnerability {
        input: run.input.clone(),
        vulnerability_type,
        severity,
        description: description.to_string(),
        escape_details: run.escape_details.clone(),
    }
}

/// Fold a list of runs into vulnerabilities plus the summary counters
/// (§4.4; arithmetic lives in `escape_core::Summary::from_results`, which
/// this is a thin wrapper over so the classifier owns both halves of §4.4
/// from one call site).
pub fn categorize_results(runs: &[RunResult]) -> (Vec<Vulnerability>, Summary) {
    let vulnerabilities = runs.iter().filter_map(analyze_result).collect();
    let summary = Summary::from_results(runs);
    (vulnerabilities, summary)
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
