use super::*;

#[test]
fn deserializes_the_wire_shape_from_spec_with_language_omitted() {
    let raw = r#"{
        "session_id": "s1",
        "target": "fixtures.rs:leaks_a_thread",
        "inputs": [""],
        "repeat": 1,
        "timeout_seconds": 5.0,
        "analysis_mode": "dynamic"
    }"#;
    let request: AnalysisRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(request.session_id, "s1");
    assert_eq!(request.inputs, vec!["".to_string()]);
    assert_eq!(request.repeat, 1);
    assert_eq!(request.analysis_mode, AnalysisMode::Dynamic);
    assert!(request.language.is_none());
}

#[test]
fn round_trips_through_json_with_language_present() {
    let request = AnalysisRequest {
        session_id: "s2".to_string(),
        target: "mod.py:handler".to_string(),
        inputs: vec!["a".to_string(), "b".to_string()],
        repeat: 3,
        timeout_seconds: 2.5,
        analysis_mode: AnalysisMode::Both,
        language: Some("python".to_string()),
    };
    let encoded = serde_json::to_string(&request).unwrap();
    let decoded: AnalysisRequest = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.language, Some("python".to_string()));
    assert_eq!(decoded.repeat, 3);
}
