// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Language dispatcher: route a target to native Rust dispatch or to a
//! foreign-language bridge, never carrying analysis logic of its own
//! (§4.7).
//!
//! The `rust` entry resolves targets through a compile-time registration
//! table rather than `dlopen`-ing a `cdylib` at runtime (§9 Open Question):
//! this harness ships its own fixtures for S1-S6-style scenarios and has no
//! plugin-loading requirement, so a `match` over known symbol names is the
//! pragmatic choice — see DESIGN.md for the full tradeoff.

pub mod fixtures;

use std::collections::HashMap;

use escape_core::target::TargetLocator;
use escape_bridge::BridgeConfig;

use crate::runner::NativeFn;

/// What a language tag routes to.
#[derive(Debug, Clone)]
pub enum LanguageSupport {
    /// Resolved against the compile-time fixture table.
    Native,
    /// Resolved by shelling out to the configured bridge binary.
    Bridge(BridgeConfig),
}

/// Build the default language registry: `rust` native, every other
/// well-known tag bridged to a binary named `escape-bridge-<language>`
/// found on `PATH` unless overridden (`escape-daemon::config` supplies the
/// override map at startup).
pub fn default_registry() -> HashMap<&'static str, LanguageSupport> {
    let mut registry = HashMap::new();
    registry.insert("rust", LanguageSupport::Native);
    for language in ["python", "go", "javascript", "typescript", "ruby", "java"] {
        registry.insert(
            language,
            LanguageSupport::Bridge(BridgeConfig {
                bridge_binary: format!("escape-bridge-{language}"),
            }),
        );
    }
    registry
}

/// Infer a language tag from a target locator when the request doesn't
/// supply one explicitly (§6: "otherwise inferred from extension").
/// Logical locators (no source extension) are assumed native, since only
/// the compile-time fixture table resolves those.
pub fn infer_language(locator: &TargetLocator) -> &'static str {
    match locator {
        TargetLocator::Path(path) => match path.extension().and_then(|e| e.to_str()) {
            Some("rs") => "rust",
            Some("py") => "python",
            Some("go") => "go",
            Some("js") => "javascript",
            Some("ts") => "typescript",
            Some("rb") => "ruby",
            Some("java") => "java",
            _ => "rust",
        },
        TargetLocator::Logical(_) => "rust",
    }
}

/// Resolve a native fixture symbol name to its function pointer. Returns
/// `None` for anything not compiled into the registration table, which the
/// orchestrator surfaces as `TargetNotFound`.
pub fn lookup_native(symbol: &str) -> Option<NativeFn> {
    match symbol {
        "leaks_a_thread" => Some(fixtures::leaks_a_thread as NativeFn),
        "joins_its_thread" => Some(fixtures::joins_its_thread as NativeFn),
        "leaks_a_daemon_thread" => Some(fixtures::leaks_a_daemon_thread as NativeFn),
        "sleeps_past_its_timeout" => Some(fixtures::sleeps_past_its_timeout as NativeFn),
        "leaks_a_child_process" => Some(fixtures::leaks_a_child_process as NativeFn),
        "leaks_an_async_task" => Some(fixtures::leaks_an_async_task as NativeFn),
        "returns_an_error" => Some(fixtures::returns_an_error as NativeFn),
        "aborts_the_process" => Some(fixtures::aborts_the_process as NativeFn),
        _ => None,
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
