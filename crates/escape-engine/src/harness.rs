// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-invocation harness: pick an isolation mode, drive one call
//! through it, and return a fully populated `RunResult` (§4.3).
//!
//! Infallible by design: §7's `IsolationFailure` kind (child died without
//! returning a result, channel closed, broken pipe) is "per-run... session
//! continues", not one of the session-terminating error kinds. A
//! `RunnerError` the runner layer surfaces is therefore folded in here as a
//! crashed `RunResult` rather than propagated — the same place
//! `oj-engine::Executor::execute` stamps timing/outcome around a fallible
//! effect, except here the fallible step never gets to end the caller's
//! loop.

use std::path::Path;
use std::time::{Duration, Instant};

use escape_core::probe;
use escape_core::RunResult;

use crate::error::RunnerError;
use crate::runner::{self, IsolationMode, NativeFn, RunOutcome};

/// Settle delays for the two isolation-mode families (§4.1, §9 Open
/// Question 2), configurable from `escape-daemon::config::Config` rather
/// than fixed at `IsolationMode`'s built-in defaults.
#[derive(Debug, Clone, Copy)]
pub struct SettleDelays {
    pub cooperative: Duration,
    pub isolated: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        SettleDelays {
            cooperative: escape_core::probe::SETTLE_DELAY_COOPERATIVE,
            isolated: escape_core::probe::SETTLE_DELAY_ISOLATED,
        }
    }
}

impl SettleDelays {
    pub fn for_mode(&self, mode: IsolationMode) -> Duration {
        match mode {
            IsolationMode::Process => self.isolated,
            IsolationMode::WorkerThread | IsolationMode::Inline => self.cooperative,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub mode: IsolationMode,
    pub timeout: Duration,
    /// How long to wait after the target returns before taking the
    /// post-invocation snapshot (§4.1, §9 Open Question 2). Configurable
    /// per session rather than baked into `IsolationMode` so
    /// `escape-daemon::config::Config`'s `ESCD_SETTLE_MS_*` knobs can reach
    /// every isolation mode uniformly.
    pub settle_delay: Duration,
}

/// §4.2's isolation-mode selection rule, for callers with no explicit
/// override: default to process isolation when `input` round-trips through
/// `serde_json` losslessly as a JSON string (i.e. is
/// cross-process-serializable as-is), otherwise fall back to worker-thread.
/// Run inputs in this engine are already plain UTF-8 strings (§3), so in
/// practice this only ever picks `WorkerThread` for inputs containing
/// characters `serde_json` would need to escape in a way that round-trips
/// unfaithfully — which for valid UTF-8 essentially never happens; the
/// check exists so the rule is enforced in code rather than assumed.
pub fn default_mode_for(input: &str) -> IsolationMode {
    match serde_json::to_string(input).ok().and_then(|encoded| serde_json::from_str::<String>(&encoded).ok()) {
        Some(roundtripped) if roundtripped == input => IsolationMode::Process,
        _ => IsolationMode::WorkerThread,
    }
}

fn isolation_failure(error: RunnerError, execution_time_ms: u64) -> RunOutcome {
    tracing::warn!(error = %error, "isolation failure, recording as a crash");
    RunOutcome {
        output: String::new(),
        error: error.to_string(),
        crashed: true,
        timed_out: false,
        execution_time_ms,
        escape_details: None,
    }
}

/// Run one invocation of `native_target` under `config.mode` and fold the
/// result into a `RunResult`. The settle delay (§4.1, §9 Open Question 2)
/// is honored on every exit path: for the cooperative modes via a
/// `scopeguard` that sleeps on drop regardless of how the runner call
/// returns, matching `Executor::execute`'s "wrap fallible effect execution
/// with timing" pattern; for process isolation the child performs its own
/// settle delay before it ever writes a response (`runner::process`).
pub async fn run_test(native_target: NativeFn, registry_key: &str, self_exe: &Path, input: &str, config: &HarnessConfig) -> RunResult {
    tracing::debug!(mode = ?config.mode, registry_key, "running test");
    let start = Instant::now();

    let (outcome, escape_details) = match config.mode {
        IsolationMode::Process => {
            let elapsed = || start.elapsed().as_millis() as u64;
            match runner::process::run(self_exe, registry_key, input, config.timeout, config.settle_delay).await {
                Ok(outcome) => {
                    let details = outcome.escape_details.clone().unwrap_or_default();
                    (outcome, details)
                }
                Err(error) => (isolation_failure(error, elapsed()), escape_core::EscapeDetails::default()),
            }
        }
        IsolationMode::WorkerThread => {
            let pre = probe::snapshot();
            let settle = scopeguard::guard((), |_| std::thread::sleep(config.settle_delay));
            let outcome = match runner::thread::run(native_target, input, config.timeout) {
                Ok(outcome) => outcome,
                Err(error) => isolation_failure(error, start.elapsed().as_millis() as u64),
            };
            drop(settle);
            let post = probe::snapshot();
            (outcome, probe::diff(&pre, &post))
        }
        IsolationMode::Inline => {
            let pre = probe::snapshot();
            let settle = scopeguard::guard((), |_| std::thread::sleep(config.settle_delay));
            let outcome = runner::inline::run(native_target, input, config.timeout);
            drop(settle);
            let post = probe::snapshot();
            (outcome, probe::diff(&pre, &post))
        }
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    let crashed = outcome.crashed;
    let timed_out = outcome.timed_out;
    let success = !crashed && !timed_out;
    let escape_detected = !escape_details.is_empty();

    tracing::info!(
        registry_key,
        success,
        crashed,
        timed_out,
        escape_detected,
        elapsed_ms = execution_time_ms,
        "test run complete"
    );

    RunResult {
        input: input.to_string(),
        success,
        crashed,
        timed_out,
        output: outcome.output,
        error: outcome.error,
        execution_time_ms,
        escape_detected,
        escape_details,
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
