// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifier output: a per-run vulnerability verdict.

use serde::{Deserialize, Serialize};

use crate::model::EscapeDetails;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// The classifier's taxonomy of dynamic findings (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityType {
    ConcurrencyEscape,
    DaemonThreadEscape,
    TimeoutWithEscape,
    Crash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub input: String,
    pub vulnerability_type: VulnerabilityType,
    pub severity: Severity,
    pub description: String,
    pub escape_details: EscapeDetails,
}

#[cfg(test)]
#[path = "vulnerability_tests.rs"]
mod tests;
