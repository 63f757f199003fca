// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn session_id_display() {
    let id = SessionId::new("sess-1");
    assert_eq!(id.to_string(), "sess-1");
}

#[test]
fn session_id_equality() {
    let a = SessionId::new("a");
    let b = SessionId::new("a");
    let c = SessionId::new("b");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn session_id_from_str() {
    let id: SessionId = "demo".into();
    assert_eq!(id.as_str(), "demo");
}

#[test]
fn session_id_serde_roundtrip() {
    let id = SessionId::new("round-trip");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"round-trip\"");
    let parsed: SessionId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn run_id_compares_to_str() {
    let id = RunId::new("run-0");
    assert_eq!(id, "run-0");
    assert_eq!(id.as_str(), "run-0");
}
