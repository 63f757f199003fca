// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised talking to a foreign-language bridge binary (§7
//! `BridgeFailure`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no bridge configured for language {0:?}")]
    UnsupportedLanguage(String),
    #[error("failed to spawn bridge binary {path:?}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed writing request to bridge stdin: {0}")]
    Write(String),
    #[error("bridge exited with {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },
    #[error("bridge produced malformed JSON on stdout: {0}")]
    MalformedResponse(String),
}
