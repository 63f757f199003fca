// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inline isolation: run the target on the calling thread/task (§4.2).
//!
//! No preemptive cancellation is possible here (there is no separate
//! thread/process to kill) — `timed_out` is set after the fact if the
//! measured wall-clock exceeds `timeout`, matching a synchronous call that
//! simply ran long rather than one that was interrupted mid-flight.

use std::time::{Duration, Instant};

use super::{render_panic, NativeFn, RunOutcome};

pub fn run(target: NativeFn, input: &str, timeout: Duration) -> RunOutcome {
    let start = Instant::now();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| target(input)));
    let elapsed = start.elapsed();
    let execution_time_ms = elapsed.as_millis() as u64;
    let timed_out = elapsed > timeout;

    let mut outcome = match result {
        Ok(Ok(output)) => RunOutcome {
            output,
            error: String::new(),
            crashed: false,
            timed_out,
            execution_time_ms,
            escape_details: None,
        },
        Ok(Err(error)) => RunOutcome {
            output: String::new(),
            error,
            crashed: true,
            timed_out,
            execution_time_ms,
            escape_details: None,
        },
        Err(payload) => RunOutcome {
            output: String::new(),
            error: render_panic(payload),
            crashed: true,
            timed_out,
            execution_time_ms,
            escape_details: None,
        },
    };

    // A target that ran long is a crash regardless of whether it eventually
    // returned normally, matching `test_harness.py`'s "Timeout exceeded"
    // results (always `crashed=True`, never a bare `timed_out` with no
    // crash).
    if timed_out {
        outcome.crashed = true;
        if outcome.error.is_empty() {
            outcome.output.clear();
            outcome.error = format!("target exceeded timeout of {timeout:?} (ran for {elapsed:?})");
        }
    }

    outcome
}

#[cfg(test)]
#[path = "inline_tests.rs"]
mod tests;
