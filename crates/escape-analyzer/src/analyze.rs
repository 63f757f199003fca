// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level entry point: source file + function name in, findings out.

use std::path::Path;

use escape_core::EscapeFinding;
use serde::Serialize;

use crate::error::AnalyzerError;
use crate::escape_visitor::EscapeVisitor;
use crate::lexer::tokenize;
use crate::parser::{find_matching_brace, locate_function, Parser};

/// Mirrors `analyze_file`'s JSON shape in
/// `original_source/analyzers/python/static_analyzer.py`: always
/// serializable, `success: false` with an `error` string rather than a
/// thrown exception when the target can't be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerOutput {
    pub target_function: String,
    pub escapes: Vec<EscapeFinding>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn analyze_file(path: &Path, function_name: &str) -> AnalyzerOutput {
    match analyze_file_inner(path, function_name) {
        Ok(escapes) => AnalyzerOutput {
            target_function: function_name.to_string(),
            escapes,
            success: true,
            error: None,
        },
        Err(err) => AnalyzerOutput {
            target_function: function_name.to_string(),
            escapes: Vec::new(),
            success: false,
            error: Some(err.to_string()),
        },
    }
}

fn analyze_file_inner(path: &Path, function_name: &str) -> Result<Vec<EscapeFinding>, AnalyzerError> {
    let source = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let tokens = tokenize(&source);
    let (params, body_start) =
        locate_function(&tokens, function_name).ok_or_else(|| AnalyzerError::FunctionNotFound(function_name.to_string()))?;
    let body_end =
        find_matching_brace(&tokens, body_start).ok_or_else(|| AnalyzerError::FunctionNotFound(function_name.to_string()))?;

    let body = Parser::new(&tokens[body_start..=body_end])
        .parse_function_body()
        .map_err(|source| AnalyzerError::Parse {
            function: function_name.to_string(),
            source,
        })?;

    let findings = EscapeVisitor::analyze_function(&params, &body, &source);
    tracing::debug!(function = function_name, findings = findings.len(), "static analysis complete");
    Ok(findings)
}

#[cfg(test)]
#[path = "analyze_tests.rs"]
mod tests;
