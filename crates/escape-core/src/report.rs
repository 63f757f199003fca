// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level session report emitted over the §6 wire interface.

use serde::{Deserialize, Serialize};

use crate::finding::EscapeFinding;
use crate::model::RunResult;
use crate::vulnerability::Vulnerability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Dynamic,
    Static,
    Both,
}

/// Aggregate counters over a session's `RunResult`s.
///
/// Invariants (Testable Properties 3-4): `successes + crashes + timeouts ==
/// total_tests`; `genuine_escapes <= escapes <= total_tests`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_tests: usize,
    pub successes: usize,
    pub crashes: usize,
    pub timeouts: usize,
    pub escapes: usize,
    pub genuine_escapes: usize,
    pub crash_rate: f64,
}

impl Summary {
    /// Fold a list of results into the summary structure (§4.4).
    ///
    /// `crashed` and `timed_out` are treated as disjoint: a timed-out run
    /// is never also counted as a crash, even if the harness additionally
    /// marks it `crashed` for the `success` invariant's sake.
    pub fn from_results(results: &[RunResult]) -> Self {
        let total_tests = results.len();
        let timeouts = results.iter().filter(|r| r.timed_out).count();
        let crashes = results
            .iter()
            .filter(|r| r.crashed && !r.timed_out)
            .count();
        let successes = total_tests.saturating_sub(crashes).saturating_sub(timeouts);
        let escapes = results.iter().filter(|r| r.escape_detected).count();
        let genuine_escapes = results
            .iter()
            .filter(|r| r.escape_detected && r.escape_details.has_genuine_worker())
            .count();
        let crash_rate = (crashes + timeouts) as f64 / (total_tests.max(1) as f64);

        Summary {
            total_tests,
            successes,
            crashes,
            timeouts,
            escapes,
            genuine_escapes,
            crash_rate,
        }
    }

    /// The degenerate summary used on fatal bridge/session failure (§6):
    /// no results were collected, and the whole session counts as one crash.
    pub fn fatal() -> Self {
        Summary {
            total_tests: 0,
            successes: 0,
            crashes: 1,
            timeouts: 0,
            escapes: 0,
            genuine_escapes: 0,
            crash_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub language: String,
    pub analyzer_version: String,
    pub analysis_mode: AnalysisMode,
    #[serde(default)]
    pub results: Vec<RunResult>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub static_findings: Vec<EscapeFinding>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionReport {
    /// Build the error-shaped report emitted on fatal bridge failure or a
    /// session-terminating error (§6, §7): `results`/`vulnerabilities` empty,
    /// `summary.crash_rate = 1.0`, and a populated `error` string.
    pub fn fatal(session_id: impl Into<String>, language: impl Into<String>, error: impl Into<String>) -> Self {
        SessionReport {
            session_id: session_id.into(),
            language: language.into(),
            analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
            analysis_mode: AnalysisMode::Dynamic,
            results: Vec::new(),
            vulnerabilities: Vec::new(),
            static_findings: Vec::new(),
            summary: Summary::fatal(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
