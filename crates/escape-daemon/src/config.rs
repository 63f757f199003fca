// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: default timeout, default settle delays, env var
//! overrides (§9). Mirrors `oj-daemon::lifecycle::Config::load`'s
//! env-override-over-default pattern, minus the on-disk state directory
//! layout that pattern also carries — this daemon is a single stdin/stdout
//! request per invocation, not a long-lived resident with its own socket
//! and WAL.

use std::time::Duration;

/// Default per-run timeout (seconds) when an `AnalysisRequest` doesn't
/// specify one explicitly enough to override it (the request's own
/// `timeout_seconds` always wins; this is only the config-level fallback
/// documented in §9).
const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub default_timeout: Duration,
    pub settle_delay_cooperative: Duration,
    pub settle_delay_isolated: Duration,
}

impl Config {
    /// Load configuration from the environment, falling back to the
    /// engine's built-in defaults for anything unset or unparsable.
    pub fn load() -> Self {
        Config {
            default_timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            settle_delay_cooperative: env_millis("ESCD_SETTLE_MS_COOPERATIVE", escape_core::probe::SETTLE_DELAY_COOPERATIVE),
            settle_delay_isolated: env_millis("ESCD_SETTLE_MS_ISOLATED", escape_core::probe::SETTLE_DELAY_ISOLATED),
        }
    }
}

fn env_millis(var: &str, default: Duration) -> Duration {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                tracing::warn!(var, raw, "ignoring unparsable env override, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
