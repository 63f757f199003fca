use std::path::Path;

use escape_core::AnalysisMode;

use super::*;

fn request(target: &str, inputs: &[&str], repeat: u32, analysis_mode: AnalysisMode) -> AnalysisRequest {
    AnalysisRequest {
        session_id: "s1".to_string(),
        target: target.to_string(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        repeat,
        timeout_seconds: 5.0,
        analysis_mode,
        language: Some("rust".to_string()),
    }
}

#[tokio::test]
#[serial_test::serial]
async fn a_registered_rust_fixture_produces_a_full_session_report() {
    escape_core::probe::registry::reset_for_test();
    let req = request("fixtures:leaks_a_thread", &[""], 1, AnalysisMode::Dynamic);
    let report = run_session(&req, Path::new("unused"), &SettleDelays::default()).await.unwrap();
    assert_eq!(report.session_id, "s1");
    assert_eq!(report.summary.total_tests, 1);
    assert_eq!(report.summary.genuine_escapes, 1);
    assert_eq!(report.vulnerabilities.len(), 1);
}

#[tokio::test]
async fn results_cover_every_input_times_repeat_combination() {
    let req = request("fixtures:joins_its_thread", &["a", "b"], 2, AnalysisMode::Dynamic);
    let report = run_session(&req, Path::new("unused"), &SettleDelays::default()).await.unwrap();
    assert_eq!(report.results.len(), 4);
    assert!(report.results.iter().all(|r| r.success));
}

#[tokio::test]
async fn an_unregistered_native_symbol_is_target_not_found() {
    let req = request("fixtures:does_not_exist", &[""], 1, AnalysisMode::Dynamic);
    let err = run_session(&req, Path::new("unused"), &SettleDelays::default()).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::TargetNotFound(_)));
}

#[tokio::test]
async fn a_malformed_target_reference_is_an_invalid_request() {
    let req = request("no-colon-here", &[""], 1, AnalysisMode::Dynamic);
    let err = run_session(&req, Path::new("unused"), &SettleDelays::default()).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidRequest(_)));
}

#[tokio::test]
async fn static_analysis_of_a_logical_target_yields_no_findings_but_still_succeeds() {
    let req = request("fixtures:joins_its_thread", &[""], 1, AnalysisMode::Both);
    let report = run_session(&req, Path::new("unused"), &SettleDelays::default()).await.unwrap();
    assert!(report.static_findings.is_empty());
}
