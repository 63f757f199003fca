// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the daemon binary itself, before a request ever reaches
//! `escape-engine` (§7's session-ending kinds are `OrchestratorError`'s
//! job; this is only for "couldn't even get a request to run").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to read request from stdin: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed analysis request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
}
