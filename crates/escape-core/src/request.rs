// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The §6 analysis-request shape, read from stdin by `escape-daemon` and
//! reused verbatim as the payload `escape-bridge` forwards to a foreign
//! bridge binary.

use serde::{Deserialize, Serialize};

use crate::report::AnalysisMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub session_id: String,
    pub target: String,
    pub inputs: Vec<String>,
    pub repeat: u32,
    pub timeout_seconds: f64,
    pub analysis_mode: AnalysisMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
