// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recognized concurrency-constructor call shapes.
//!
//! Grounded in the three worker kinds this engine's own runtime spawns
//! (`escape_engine::runner::{process,thread,inline}`) plus the pool/executor
//! shapes common to idiomatic Rust concurrency code, generalizing the
//! construct list `original_source/analyzers/python/static_analyzer.py`
//! hardcodes for `threading.Thread`, `multiprocessing.Process`, and
//! `ThreadPoolExecutor`.

use crate::ast::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorKind {
    Thread,
    Process,
    AsyncTask,
    Pool,
}

struct ConstructorPattern {
    /// Root path segment the call chain must start from, e.g. `thread` in
    /// `thread::spawn(...)`, or `None` to match on method name alone.
    root: Option<&'static str>,
    /// The call/method name that constructs the worker.
    call: &'static str,
    kind: ConstructorKind,
}

const PATTERNS: &[ConstructorPattern] = &[
    ConstructorPattern { root: Some("thread"), call: "spawn", kind: ConstructorKind::Thread },
    ConstructorPattern { root: Some("Builder"), call: "spawn", kind: ConstructorKind::Thread },
    ConstructorPattern { root: Some("tokio"), call: "spawn", kind: ConstructorKind::AsyncTask },
    ConstructorPattern { root: Some("task"), call: "spawn", kind: ConstructorKind::AsyncTask },
    ConstructorPattern { root: Some("Command"), call: "spawn", kind: ConstructorKind::Process },
    ConstructorPattern { root: Some("ThreadPool"), call: "new", kind: ConstructorKind::Pool },
    ConstructorPattern { root: Some("ThreadPoolBuilder"), call: "build", kind: ConstructorKind::Pool },
];

/// Does this call expression construct a concurrency worker, and if so
/// what kind? Matches on the tail call/method name and, when present, the
/// root identifier of the callee path — loose enough to catch
/// `std::thread::spawn`, `thread::Builder::new().spawn`, and
/// `self.pool.spawn` alike, since we don't resolve imports or types.
pub fn classify_constructor_call(callee_or_method: &str, root: Option<&str>) -> Option<ConstructorKind> {
    PATTERNS.iter().find_map(|p| {
        if p.call != callee_or_method {
            return None;
        }
        match (p.root, root) {
            (Some(expected), Some(actual)) if expected == actual => Some(p.kind),
            (Some(_), _) => None,
            (None, _) => Some(p.kind),
        }
    })
}

/// True for the handful of methods that consume a worker handle and block
/// until it settles — the "joined" side of the live-set tracking in
/// `escape_visitor`.
pub fn is_join_like_call(method: &str) -> bool {
    matches!(method, "join" | "wait" | "await_all" | "shutdown")
}

/// Best-effort read of the call's "shape": the tail name plus, for method
/// calls, the receiver's root identifier.
pub fn call_shape(expr: &Expr) -> Option<(String, Option<String>)> {
    match expr {
        Expr::Call { callee, .. } => match callee.as_ref() {
            Expr::Path(segments, _) => {
                let tail = segments.last()?.clone();
                let root = if segments.len() > 1 {
                    Some(segments[segments.len() - 2].clone())
                } else {
                    None
                };
                Some((tail, root))
            }
            Expr::Ident(name, _) => Some((name.clone(), None)),
            _ => None,
        },
        Expr::MethodCall { receiver, method, .. } => {
            Some((method.clone(), receiver.root_ident().map(str::to_string)))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "constructors_tests.rs"]
mod tests;
