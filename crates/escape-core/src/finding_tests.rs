// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn confidence_ordering_is_low_medium_high() {
    assert!(Confidence::Low < Confidence::Medium);
    assert!(Confidence::Medium < Confidence::High);
}

#[test]
fn finding_serializes_kind_as_snake_case() {
    let finding = EscapeFinding {
        kind: EscapeKind::Concurrency,
        line: 10,
        column: 4,
        variable_name: "worker".to_string(),
        reason: "Thread 'worker' created but not visibly joined/closed".to_string(),
        confidence: Confidence::High,
        code_snippet: Some("let worker = thread::spawn(move || {});".to_string()),
    };
    let json = serde_json::to_value(&finding).unwrap();
    assert_eq!(json["kind"], "concurrency");
    assert_eq!(json["confidence"], "high");
}

#[test]
fn finding_omits_absent_code_snippet() {
    let finding = EscapeFinding {
        kind: EscapeKind::Return,
        line: 1,
        column: 0,
        variable_name: "x".to_string(),
        reason: "returned".to_string(),
        confidence: Confidence::High,
        code_snippet: None,
    };
    let json = serde_json::to_value(&finding).unwrap();
    assert!(json.get("code_snippet").is_none());
}
