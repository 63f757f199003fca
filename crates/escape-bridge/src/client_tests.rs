use std::os::unix::fs::PermissionsExt;

use escape_core::AnalysisMode;

use super::*;

fn request() -> AnalysisRequest {
    AnalysisRequest {
        session_id: "s1".to_string(),
        target: "mod.py:handler".to_string(),
        inputs: vec!["hi".to_string()],
        repeat: 1,
        timeout_seconds: 5.0,
        analysis_mode: AnalysisMode::Dynamic,
        language: Some("python".to_string()),
    }
}

fn executable_script(body: &str) -> tempfile::TempPath {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, body.as_bytes()).unwrap();
    let path = file.into_temp_path();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn spawn_failure_is_reported_as_a_spawn_error() {
    let config = BridgeConfig {
        bridge_binary: "/nonexistent/bridge-binary".to_string(),
    };
    let result = run_bridge(&config, &request(), Duration::from_secs(5)).await;
    assert!(matches!(result, Err(BridgeError::Spawn { .. })));
}

#[tokio::test]
async fn a_successful_bridge_response_is_parsed_into_a_session_report() {
    let script = executable_script(
        "#!/bin/sh\ncat <<'EOF'\n{\"session_id\":\"s1\",\"language\":\"python\",\"analyzer_version\":\"1.0.0\",\"analysis_mode\":\"dynamic\",\"results\":[],\"vulnerabilities\":[],\"static_findings\":[],\"summary\":{\"total_tests\":0,\"successes\":0,\"crashes\":0,\"timeouts\":0,\"escapes\":0,\"genuine_escapes\":0,\"crash_rate\":0.0}}\nEOF\n",
    );
    let config = BridgeConfig {
        bridge_binary: script.to_str().unwrap().to_string(),
    };
    let report = run_bridge(&config, &request(), Duration::from_secs(5)).await.unwrap();
    assert_eq!(report.session_id, "s1");
    assert_eq!(report.language, "python");
}

#[tokio::test]
async fn a_non_zero_exit_is_reported_with_stderr() {
    let script = executable_script("#!/bin/sh\necho 'boom' 1>&2\nexit 1\n");
    let config = BridgeConfig {
        bridge_binary: script.to_str().unwrap().to_string(),
    };
    let result = run_bridge(&config, &request(), Duration::from_secs(5)).await;
    match result {
        Err(BridgeError::NonZeroExit { stderr, .. }) => assert!(stderr.contains("boom")),
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[tokio::test]
async fn a_hung_bridge_times_out_rather_than_blocking_forever() {
    let script = executable_script("#!/bin/sh\nsleep 5\n");
    let config = BridgeConfig {
        bridge_binary: script.to_str().unwrap().to_string(),
    };
    let result = run_bridge(&config, &request(), Duration::from_millis(50)).await;
    assert!(matches!(result, Err(BridgeError::NonZeroExit { .. })));
}
