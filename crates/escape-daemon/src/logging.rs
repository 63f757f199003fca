// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup: `ESCD_LOG`-driven `EnvFilter`, written to stderr so
//! stdout stays reserved for the §6 JSON response (mirrors `oj`'s `OJ_LOG`
//! convention, per `oj-daemon::main::setup_logging` — minus the
//! `tracing-appender` file sink that daemon needs and this one-shot
//! process doesn't).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_env("ESCD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
