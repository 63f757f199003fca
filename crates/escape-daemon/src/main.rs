// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency Escape Daemon (escd)
//!
//! One request in on stdin, one `SessionReport` out on stdout, per §6.
//! Also doubles as its own process-isolation child: invoked with
//! `--run-probe-child`, it reads a `ChildRequest` instead and reports back
//! over stdout in the runner's own wire shape (`escape-engine::runner::process`).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod error;
mod logging;

use std::io::Read;

use escape_core::{AnalysisRequest, SessionReport};
use escape_engine::{dispatcher, SettleDelays};

use crate::error::DaemonError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--run-probe-child") {
        let code = escape_engine::runner::process::run_probe_child(dispatcher::lookup_native);
        std::process::exit(code);
    }

    logging::init();
    let config = config::Config::load();

    let request = match read_request() {
        Ok(r) => r,
        Err(e) => {
            emit_fatal(SessionReport::fatal("unknown", "unknown", e.to_string()));
            std::process::exit(1);
        }
    };

    let self_exe = std::env::current_exe()?;
    let timeout_seconds = if request.timeout_seconds > 0.0 {
        request.timeout_seconds
    } else {
        config.default_timeout.as_secs_f64()
    };
    let request = AnalysisRequest { timeout_seconds, ..request };
    let settle_delays = SettleDelays {
        cooperative: config.settle_delay_cooperative,
        isolated: config.settle_delay_isolated,
    };

    match escape_engine::run_session(&request, &self_exe, &settle_delays).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(error) => {
            emit_fatal(SessionReport::fatal(request.session_id.clone(), request.language.clone().unwrap_or_else(|| "unknown".to_string()), error.to_string()));
            std::process::exit(1);
        }
    }
}

fn read_request() -> Result<AnalysisRequest, DaemonError> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    Ok(serde_json::from_str(&raw)?)
}

fn emit_fatal(report: SessionReport) {
    match serde_json::to_string_pretty(&report) {
        Ok(json) => eprintln!("{json}"),
        Err(e) => eprintln!("failed to serialize fatal report: {e}"),
    }
}
