// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static-analysis findings.

use serde::{Deserialize, Serialize};

/// The kind of syntactic escape pattern a finding represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeKind {
    Return,
    Global,
    Closure,
    Concurrency,
    Parameter,
    Heap,
}

/// How confident the analyzer is that a finding is a real escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A single static-analysis finding, built once per pass and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscapeFinding {
    pub kind: EscapeKind,
    pub line: u32,
    pub column: u32,
    pub variable_name: String,
    pub reason: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

#[cfg(test)]
#[path = "finding_tests.rs"]
mod tests;
