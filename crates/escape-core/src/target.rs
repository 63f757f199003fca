// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target reference parsing: `"<locator>:<symbol>"`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where a target's code lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetLocator {
    /// A source-file path, identified by a language-specific extension.
    Path(PathBuf),
    /// A dotted logical name understood by a language's loader (e.g. a
    /// natively-registered Rust fixture, or a Python `package.module`).
    Logical(String),
}

impl TargetLocator {
    /// The file extension, if this locator looks like a path (contains a
    /// `.` in its final path component and at least one path separator or a
    /// recognized source extension).
    pub fn extension(&self) -> Option<&str> {
        match self {
            TargetLocator::Path(p) => p.extension().and_then(|e| e.to_str()),
            TargetLocator::Logical(_) => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetRefError {
    #[error("target reference must be in '<locator>:<symbol>' form, got {0:?}")]
    MissingSeparator(String),
    #[error("target reference has an empty symbol: {0:?}")]
    EmptySymbol(String),
    #[error("target reference has an empty locator: {0:?}")]
    EmptyLocator(String),
}

/// Extensions recognized as source-file locators rather than logical names.
/// Windows drive letters (`C:\...`) also produce a colon, so a bare
/// single-character locator segment before the separator is never treated
/// as a path split point for that colon.
const KNOWN_SOURCE_EXTENSIONS: &[&str] = &["py", "rs", "go", "js", "ts", "rb", "java"];

/// A fully parsed `"<locator>:<symbol>"` target reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub locator: TargetLocator,
    pub symbol: String,
}

impl TargetRef {
    /// Parse a target reference string.
    ///
    /// The split point is the *last* colon whose locator-side prefix, when
    /// treated as a path, has a recognized source extension, or (if none
    /// qualifies) the first colon. This mirrors the source's
    /// `target.rsplit(":", 1)` / `target.split(":", 1)` split inconsistency
    /// by picking deterministically: prefer a split that yields a known
    /// source extension, otherwise split on the first colon.
    pub fn parse(raw: &str) -> Result<Self, TargetRefError> {
        if !raw.contains(':') {
            return Err(TargetRefError::MissingSeparator(raw.to_string()));
        }

        let candidates: Vec<usize> = raw
            .char_indices()
            .filter(|(_, c)| *c == ':')
            .map(|(i, _)| i)
            .collect();

        let split_at = candidates
            .iter()
            .find(|&&i| {
                let locator_part = &raw[..i];
                Path::new(locator_part)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| KNOWN_SOURCE_EXTENSIONS.contains(&ext))
            })
            .copied()
            .unwrap_or(candidates[0]);

        let (locator_part, symbol_part) = (&raw[..split_at], &raw[split_at + 1..]);

        if locator_part.is_empty() {
            return Err(TargetRefError::EmptyLocator(raw.to_string()));
        }
        if symbol_part.is_empty() {
            return Err(TargetRefError::EmptySymbol(raw.to_string()));
        }

        let locator = if Path::new(locator_part)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| KNOWN_SOURCE_EXTENSIONS.contains(&ext))
        {
            TargetLocator::Path(PathBuf::from(locator_part))
        } else {
            TargetLocator::Logical(locator_part.to_string())
        };

        Ok(TargetRef {
            locator,
            symbol: symbol_part.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
