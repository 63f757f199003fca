// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The semicolon-separated escape-details interchange format used for
//! human-facing logging and for ingesting a foreign bridge's response when
//! it reports escapes as a flat string rather than structured JSON (§6).
//!
//! Items: `thread:<name>:<daemon|nondaemon>`, `process:<pid>[:<name>]`,
//! `asyncio_task:<name>:<state>`. Unrecognized items land in the `other`
//! bucket verbatim, matching the source bridge's permissive parsing.

use crate::model::{AsyncTaskEscape, EscapeDetails, OtherEscape, ProcessEscape, ThreadEscape};

/// Render an `EscapeDetails` as the canonical semicolon-joined line.
pub fn format_escape_details_line(details: &EscapeDetails) -> String {
    let mut items = Vec::new();

    for thread in &details.threads {
        let daemon = if thread.is_daemon { "daemon" } else { "nondaemon" };
        items.push(format!("thread:{}:{daemon}", thread.name));
    }
    for process in &details.processes {
        if process.name.is_empty() {
            items.push(format!("process:{}", process.pid));
        } else {
            items.push(format!("process:{}:{}", process.pid, process.name));
        }
    }
    for task in &details.async_tasks {
        items.push(format!("asyncio_task:{}:{}", task.name, task.state));
    }
    for other in details.goroutines.iter().chain(details.other.iter()) {
        items.push(other.name.clone());
    }

    items.join(";")
}

/// Parse the semicolon-joined line back into structured `EscapeDetails`.
///
/// Thread entries parsed this way have no identity beyond their name (the
/// wire format carries no stable thread id), so `thread_id` is set equal to
/// `name`; callers that need strict pre/post identity comparisons should
/// use the structured JSON form instead.
pub fn parse_escape_details_line(line: &str) -> EscapeDetails {
    let mut details = EscapeDetails::default();
    if line.trim().is_empty() {
        return details;
    }

    for raw_item in line.split(';') {
        let item = raw_item.trim();
        if item.is_empty() {
            continue;
        }

        if let Some(rest) = item.strip_prefix("thread:") {
            let mut parts = rest.splitn(2, ':');
            let name = parts.next().unwrap_or_default().to_string();
            let is_daemon = parts.next() == Some("daemon");
            details.threads.push(ThreadEscape {
                thread_id: name.clone(),
                name,
                is_daemon,
                state: "alive".to_string(),
                stack_trace: None,
            });
        } else if let Some(rest) = item.strip_prefix("process:") {
            let mut parts = rest.splitn(2, ':');
            let pid_str = parts.next().unwrap_or_default();
            match pid_str.parse::<u32>() {
                Ok(pid) => {
                    let name = parts.next().unwrap_or_default().to_string();
                    details.processes.push(ProcessEscape {
                        pid,
                        name,
                        cmdline: None,
                    });
                }
                Err(_) => details.other.push(OtherEscape {
                    name: item.to_string(),
                    state: None,
                }),
            }
        } else if let Some(rest) = item.strip_prefix("asyncio_task:") {
            let mut parts = rest.splitn(2, ':');
            let name = parts.next().unwrap_or_default().to_string();
            let state = parts.next().unwrap_or("pending").to_string();
            details.async_tasks.push(AsyncTaskEscape { name, state });
        } else {
            details.other.push(OtherEscape {
                name: item.to_string(),
                state: None,
            });
        }
    }

    details
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
