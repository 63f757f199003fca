use super::*;
use yare::parameterized;

#[parameterized(
    thread_spawn = { "spawn", Some("thread"), Some(ConstructorKind::Thread) },
    builder_spawn = { "spawn", Some("Builder"), Some(ConstructorKind::Thread) },
    tokio_spawn = { "spawn", Some("tokio"), Some(ConstructorKind::AsyncTask) },
    task_spawn = { "spawn", Some("task"), Some(ConstructorKind::AsyncTask) },
    command_spawn = { "spawn", Some("Command"), Some(ConstructorKind::Process) },
    pool_new = { "new", Some("ThreadPool"), Some(ConstructorKind::Pool) },
    unrelated_call = { "spawn", Some("unknown_module"), None },
    unrelated_method = { "len", None, None },
)]
fn classifies_constructor_calls(call: &str, root: Option<&str>, expected: Option<ConstructorKind>) {
    assert_eq!(classify_constructor_call(call, root), expected);
}

#[parameterized(
    join = { "join", true },
    wait = { "wait", true },
    shutdown = { "shutdown", true },
    unrelated = { "spawn", false },
)]
fn recognizes_join_like_calls(method: &str, expected: bool) {
    assert_eq!(is_join_like_call(method), expected);
}
