// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-thread isolation: run the target on a dedicated OS thread and wait
//! on it with a bound (§4.2).
//!
//! The worker thread itself is *not* registered with the probe registry —
//! it's harness infrastructure, not a concurrency primitive the target
//! created, and registering it would make every invocation look like it
//! escaped a thread of its own. Only primitives the target spawns via the
//! tracked-spawn helpers show up in the diff.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::error::RunnerError;

use super::{render_panic, NativeFn, RunOutcome};

/// Run `target(input)` on a worker thread, waiting up to `timeout`.
///
/// On timeout the worker thread is left running rather than joined — it
/// may be blocked on something the target spawned, and forcibly killing an
/// OS thread has no safe API in Rust. The thread is simply abandoned; any
/// concurrency primitives it or the target left behind are exactly what
/// the post-snapshot is meant to observe.
pub fn run(target: NativeFn, input: &str, timeout: Duration) -> Result<RunOutcome, RunnerError> {
    let input = input.to_string();
    let (tx, rx) = mpsc::channel();

    let start = Instant::now();
    std::thread::Builder::new()
        .name("escape-engine-worker".to_string())
        .spawn(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| target(&input)));
            let _ = tx.send(result);
        })
        .map_err(RunnerError::ThreadSpawn)?;

    let received = rx.recv_timeout(timeout);
    let execution_time_ms = start.elapsed().as_millis() as u64;

    let outcome = match received {
        Ok(Ok(Ok(output))) => RunOutcome {
            output,
            error: String::new(),
            crashed: false,
            timed_out: false,
            execution_time_ms,
            escape_details: None,
        },
        Ok(Ok(Err(target_error))) => RunOutcome {
            output: String::new(),
            error: target_error,
            crashed: true,
            timed_out: false,
            execution_time_ms,
            escape_details: None,
        },
        Ok(Err(panic_payload)) => RunOutcome {
            output: String::new(),
            error: render_panic(panic_payload),
            crashed: true,
            timed_out: false,
            execution_time_ms,
            escape_details: None,
        },
        Err(mpsc::RecvTimeoutError::Timeout) => RunOutcome {
            output: String::new(),
            error: format!("target exceeded timeout of {timeout:?}"),
            crashed: true,
            timed_out: true,
            execution_time_ms,
            escape_details: None,
        },
        Err(mpsc::RecvTimeoutError::Disconnected) => return Err(RunnerError::ChannelClosed),
    };

    Ok(outcome)
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod tests;
