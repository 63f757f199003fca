// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the runner and the session orchestrator.
//!
//! Split the way `oj-engine`'s `RuntimeError` wraps `ExecuteError`: low-level
//! execution failures live in [`RunnerError`], and the orchestrator wraps
//! them into its own [`OrchestratorError`] alongside the fatal,
//! session-ending error kinds (§7). A target that merely panics, crashes, or
//! times out never reaches either of these — the harness folds that into the
//! `RunResult` it returns (§4.3's "no error from target or isolation may
//! terminate the session" rule). These enums exist for the failures that
//! *do* end a session: a target that can't be found or invoked at all, an
//! isolation mechanism that breaks before the target even runs, or a bridge
//! that can't be reached.

use thiserror::Error;

/// Errors raised by an isolation runner before/around invoking the target,
/// never by the target's own behavior.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn isolation process: {0}")]
    ProcessSpawn(#[source] std::io::Error),
    #[error("failed to spawn worker thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),
    #[error("isolation child produced malformed output: {0}")]
    ChildProtocol(String),
    #[error("isolation channel closed before the worker reported a result")]
    ChannelClosed,
}

/// Errors that can end a session outright (§7).
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("target not found: {0}")]
    TargetNotFound(String),
    #[error("target is not callable: {0}")]
    TargetNotCallable(String),
    #[error("isolation failure: {0}")]
    Isolation(#[from] RunnerError),
    #[error("static analysis failed: {0}")]
    ParseFailure(#[from] escape_analyzer::AnalyzerError),
    #[error("bridge failure: {0}")]
    BridgeFailure(#[from] escape_bridge::BridgeError),
    #[error("invalid analysis request: {0}")]
    InvalidRequest(String),
}
