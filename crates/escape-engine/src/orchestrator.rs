// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session orchestrator: turn one `AnalysisRequest` into a `SessionReport`
//! (§4.6). Input-major, repeat-minor iteration, exactly as spec.md §6/§8
//! require — the ordering the `original_source` bridge script itself
//! applies inconsistently across its own call sites; this implementation
//! picks the one ordering and holds to it everywhere (see DESIGN.md).

use std::path::Path;
use std::time::Duration;

use escape_core::target::{TargetLocator, TargetRef};
use escape_core::{AnalysisMode, AnalysisRequest, RunResult, SessionReport};

use crate::dispatcher::{self, LanguageSupport};
use crate::error::OrchestratorError;
use crate::harness::{self, HarnessConfig, SettleDelays};

/// Run one full session: resolve the target, drive every (input, repeat)
/// invocation through the harness or delegate wholesale to a bridge, then
/// classify and finalize the report.
///
/// `self_exe` is this binary's own path, passed down to process-mode
/// isolation so it can re-exec itself as a probe child. `settle_delays`
/// carries the configured §9 Open Question 2 delays; callers with no
/// opinion can pass `SettleDelays::default()`.
pub async fn run_session(request: &AnalysisRequest, self_exe: &Path, settle_delays: &SettleDelays) -> Result<SessionReport, OrchestratorError> {
    tracing::debug!(session_id = %request.session_id, target = %request.target, "starting session");

    let target = TargetRef::parse(&request.target).map_err(|e| OrchestratorError::InvalidRequest(e.to_string()))?;
    let language = request.language.clone().unwrap_or_else(|| dispatcher::infer_language(&target.locator).to_string());

    let registry = dispatcher::default_registry();
    let report = match registry.get(language.as_str()) {
        Some(LanguageSupport::Bridge(config)) => {
            tracing::debug!(language, bridge = %config.bridge_binary, "delegating session to bridge");
            let timeout = Duration::from_secs_f64(request.timeout_seconds);
            escape_bridge::run_bridge(config, request, timeout).await?
        }
        Some(LanguageSupport::Native) | None => run_native_session(request, &target, self_exe, settle_delays).await?,
    };

    tracing::info!(
        session_id = %request.session_id,
        total_tests = report.summary.total_tests,
        escapes = report.summary.escapes,
        "session complete"
    );
    Ok(report)
}

async fn run_native_session(
    request: &AnalysisRequest,
    target: &TargetRef,
    self_exe: &Path,
    settle_delays: &SettleDelays,
) -> Result<SessionReport, OrchestratorError> {
    let native_target = dispatcher::lookup_native(&target.symbol).ok_or_else(|| OrchestratorError::TargetNotFound(target.symbol.clone()))?;

    let timeout = Duration::from_secs_f64(request.timeout_seconds);
    let mut results: Vec<RunResult> = Vec::with_capacity(request.inputs.len() * request.repeat as usize);

    for input in &request.inputs {
        let mode = harness::default_mode_for(input);
        let config = HarnessConfig {
            mode,
            timeout,
            settle_delay: settle_delays.for_mode(mode),
        };
        for _ in 0..request.repeat {
            let result = harness::run_test(native_target, &target.symbol, self_exe, input, &config).await;
            results.push(result);
        }
    }

    let (vulnerabilities, summary) = crate::classifier::categorize_results(&results);
    let static_findings = match request.analysis_mode {
        AnalysisMode::Static | AnalysisMode::Both => run_static_analysis(target),
        AnalysisMode::Dynamic => Vec::new(),
    };

    Ok(SessionReport {
        session_id: request.session_id.clone(),
        language: "rust".to_string(),
        analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
        analysis_mode: request.analysis_mode,
        results,
        vulnerabilities,
        static_findings,
        summary,
        error: None,
    })
}

fn run_static_analysis(target: &TargetRef) -> Vec<escape_core::EscapeFinding> {
    match &target.locator {
        TargetLocator::Path(path) => {
            let output = escape_analyzer::analyze_file(path, &target.symbol);
            if !output.success {
                tracing::warn!(function = %target.symbol, error = ?output.error, "static analysis failed");
            }
            output.escapes
        }
        TargetLocator::Logical(_) => {
            tracing::debug!(symbol = %target.symbol, "skipping static analysis: target has no source file");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
