// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::lexer::Pos;

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("unexpected end of input while parsing")]
    UnexpectedEof,

    #[error("expected {expected} at line {}, column {}", pos.line, pos.column)]
    UnexpectedToken { expected: String, pos: Pos },
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("failed to read source file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("function '{0}' was not found in the source file")]
    FunctionNotFound(String),

    #[error("failed to parse the body of '{function}': {source}")]
    Parse {
        function: String,
        #[source]
        source: ParserError,
    },
}
