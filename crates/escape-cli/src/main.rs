// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static-analyzer subcommand CLI (escc)
//!
//! `escc <file_path> <function_name>` prints the `AnalyzerOutput` as
//! pretty-printed JSON on stdout and exits 0 iff `success` (§6).

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (file_path, function_name) = match (args.next(), args.next()) {
        (Some(file_path), Some(function_name)) => (PathBuf::from(file_path), function_name),
        _ => {
            eprintln!("usage: escc <file_path> <function_name>");
            std::process::exit(1);
        }
    };

    let output = escape_analyzer::analyze_file(&file_path, &function_name);
    let success = output.success;
    println!("{}", serde_json::to_string_pretty(&output)?);
    std::process::exit(i32::from(!success));
}
