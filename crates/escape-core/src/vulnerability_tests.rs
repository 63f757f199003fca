// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn vulnerability_type_serializes_snake_case() {
    let vuln = Vulnerability {
        input: "".to_string(),
        vulnerability_type: VulnerabilityType::DaemonThreadEscape,
        severity: Severity::Low,
        description: "daemon-only thread escape".to_string(),
        escape_details: EscapeDetails::default(),
    };
    let json = serde_json::to_value(&vuln).unwrap();
    assert_eq!(json["vulnerability_type"], "daemon_thread_escape");
    assert_eq!(json["severity"], "low");
}
