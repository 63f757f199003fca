use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;

use super::*;

fn ok_target(input: &str) -> Result<String, String> {
    Ok(format!("ok:{input}"))
}

fn err_target(_input: &str) -> Result<String, String> {
    Err("boom".to_string())
}

fn panicking_target(_input: &str) -> Result<String, String> {
    panic!("kaboom");
}

fn lookup(name: &str) -> Option<NativeFn> {
    match name {
        "ok" => Some(ok_target),
        "err" => Some(err_target),
        "panic" => Some(panicking_target),
        _ => None,
    }
}

fn child_roundtrip(target: &str, input: &str) -> (i32, ChildResponse) {
    let request = ChildRequest {
        target: target.to_string(),
        input: input.to_string(),
        settle_delay_ms: 0,
    };
    let request_bytes = serde_json::to_vec(&request).unwrap();
    let mut output = Vec::new();
    let code = run_probe_child_with_io(Cursor::new(request_bytes), &mut output, lookup);
    let response: ChildResponse = serde_json::from_slice(&output).unwrap();
    (code, response)
}

#[test]
fn successful_target_yields_exit_code_zero_and_the_output() {
    let (code, response) = child_roundtrip("ok", "hi");
    assert_eq!(code, 0);
    assert!(!response.crashed);
    assert_eq!(response.output, "ok:hi");
}

#[test]
fn target_returning_err_yields_exit_code_one() {
    let (code, response) = child_roundtrip("err", "hi");
    assert_eq!(code, 1);
    assert!(response.crashed);
    assert_eq!(response.error, "boom");
}

#[test]
fn panicking_target_is_caught_and_reported() {
    let (code, response) = child_roundtrip("panic", "hi");
    assert_eq!(code, 1);
    assert!(response.crashed);
    assert!(response.error.contains("kaboom"));
}

#[test]
fn unknown_target_is_a_protocol_error_not_a_panic() {
    let (code, response) = child_roundtrip("nonexistent", "hi");
    assert_eq!(code, 1);
    assert!(response.error.contains("nonexistent"));
}

#[test]
fn malformed_request_is_a_protocol_error() {
    let mut output = Vec::new();
    let code = run_probe_child_with_io(Cursor::new(b"not json".to_vec()), &mut output, lookup);
    assert_eq!(code, 1);
    let response: ChildResponse = serde_json::from_slice(&output).unwrap();
    assert!(response.crashed);
}

fn executable_script(body: &str) -> tempfile::TempPath {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, body.as_bytes()).unwrap();
    let path = file.into_temp_path();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn parent_side_run_reports_process_spawn_failure() {
    let result = run(Path::new("/nonexistent/escd-binary"), "ok", "hi", Duration::from_secs(5), Duration::ZERO).await;
    assert!(matches!(result, Err(RunnerError::ProcessSpawn(_))));
}

#[tokio::test]
async fn parent_side_run_parses_a_successful_child_response() {
    let script = executable_script(
        "#!/bin/sh\ncat <<'EOF'\n{\"output\":\"ok\",\"error\":\"\",\"crashed\":false,\"escape_details\":{\"threads\":[],\"processes\":[],\"async_tasks\":[],\"goroutines\":[],\"other\":[]}}\nEOF\n",
    );
    let outcome = run(&script, "ok", "hi", Duration::from_secs(5), Duration::ZERO).await.unwrap();
    assert!(!outcome.crashed);
    assert!(!outcome.timed_out);
    assert_eq!(outcome.output, "ok");
    assert!(outcome.escape_details.is_some());
}

#[tokio::test]
async fn parent_side_run_reports_timeout_and_does_not_block_on_a_hung_child() {
    let script = executable_script("#!/bin/sh\nsleep 5\n");
    let outcome = run(&script, "ok", "hi", Duration::from_millis(50), Duration::ZERO).await.unwrap();
    assert!(outcome.timed_out);
    assert!(outcome.crashed);
}
