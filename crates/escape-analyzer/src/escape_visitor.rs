// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The visitor that turns a parsed function body into [`EscapeFinding`]s.
//!
//! Ported rule-for-rule from `original_source/analyzers/python/static_analyzer.py`'s
//! `EscapeAnalyzer`, which keeps three live sets while walking a function
//! body — local variables, concurrency objects, and the subset of those
//! that are joined — and emits a finding whenever a rule's shape matches.
//! `_check_unjoined_concurrency` there always takes its "not visibly
//! joined/closed" branch in practice (`join_in_some_paths` is declared but
//! never populated), so this port drops that dead branch rather than carry
//! it over as dead code here too.

use std::collections::{HashMap, HashSet};

use escape_core::{Confidence, EscapeFinding, EscapeKind};

use crate::ast::{Block, ClosureBody, Expr, Stmt};
use crate::constructors::{call_shape, classify_constructor_call, is_join_like_call, ConstructorKind};
use crate::lexer::Pos;
use crate::visitor::AstVisitor;

/// Constructors Rust code reaches for that aren't concurrency primitives
/// and don't usually escape in harmful ways — skipped by the heap-escape
/// rule the same way the original skips `list`/`dict`/`set`/`tuple`/`str`.
const COMMON_CONTAINER_CTORS: &[&str] = &[
    "new", "default", "with_capacity", "from", "collect", "to_string", "to_owned", "clone",
];

/// Methods that fire work on a pool/executor without guaranteeing it has
/// settled, the Rust-side analogue of `apply_async`/`map_async`.
const POOL_FIRE_AND_FORGET_METHODS: &[&str] = &["execute", "submit", "spawn_detached"];

const CLEANUP_CALLEE_HINTS: &[&str] = &["join", "wait", "close", "shutdown"];

struct ConcurrencyObject {
    pos: Pos,
    kind: ConstructorKind,
    is_collection: bool,
}

pub struct EscapeVisitor<'a> {
    source_lines: Vec<&'a str>,
    locals: HashSet<String>,
    concurrency_objects: HashMap<String, ConcurrencyObject>,
    joined: HashSet<String>,
    reassigned: HashSet<String>,
    escapes: Vec<EscapeFinding>,
}

impl<'a> EscapeVisitor<'a> {
    /// Run the analysis and return every finding, in traversal order
    /// except for the unjoined-concurrency check, which always runs last
    /// (it can only be evaluated once the whole body has been seen).
    pub fn analyze_function(params: &[String], body: &Block, source: &'a str) -> Vec<EscapeFinding> {
        let mut visitor = EscapeVisitor {
            source_lines: source.lines().collect(),
            locals: params.iter().cloned().collect(),
            concurrency_objects: HashMap::new(),
            joined: HashSet::new(),
            reassigned: HashSet::new(),
            escapes: Vec::new(),
        };
        visitor.visit_block(body);
        visitor.check_unjoined_concurrency();
        visitor.escapes
    }

    fn snippet(&self, pos: Pos) -> Option<String> {
        self.source_lines
            .get(pos.line.saturating_sub(1) as usize)
            .map(|line| line.trim().to_string())
    }

    fn push(&mut self, kind: EscapeKind, pos: Pos, variable_name: String, reason: String, confidence: Confidence) {
        self.escapes.push(EscapeFinding {
            kind,
            line: pos.line,
            column: pos.column,
            variable_name,
            reason,
            confidence,
            code_snippet: self.snippet(pos),
        });
    }

    fn check_unjoined_concurrency(&mut self) {
        let mut findings = Vec::new();
        for (name, obj) in &self.concurrency_objects {
            if self.joined.contains(name) || self.reassigned.contains(name) {
                continue;
            }
            let label = if obj.is_collection {
                format!("{:?} list", obj.kind)
            } else {
                format!("{:?}", obj.kind)
            };
            findings.push((
                obj.pos,
                name.clone(),
                format!("{label} '{name}' created but not visibly joined/closed"),
            ));
        }
        findings.sort_by_key(|(pos, name, _)| (pos.line, pos.column, name.clone()));
        for (pos, name, reason) in findings {
            self.push(EscapeKind::Concurrency, pos, name, reason, Confidence::High);
        }
    }

    fn record_concurrency_object(&mut self, name: &str, pos: Pos, kind: ConstructorKind, is_collection: bool) {
        self.concurrency_objects.insert(
            name.to_string(),
            ConcurrencyObject { pos, kind, is_collection },
        );
    }

    fn mark_reassigned_if_tracked(&mut self, names: &[String]) {
        for name in names {
            if self.concurrency_objects.contains_key(name) {
                self.reassigned.insert(name.clone());
            }
        }
    }

    fn handle_heap_escape(&mut self, names: &[String], value: &Expr, pos: Pos) {
        let Some((tail, root)) = call_shape(value) else { return };
        if classify_constructor_call(&tail, root.as_deref()).is_some() {
            return;
        }
        if COMMON_CONTAINER_CTORS.contains(&tail.as_str()) {
            return;
        }
        for name in names {
            self.push(
                EscapeKind::Heap,
                pos,
                name.clone(),
                format!("Variable '{name}' assigned heap-allocated object"),
                Confidence::Low,
            );
        }
    }

    fn handle_assignment_target_and_value(&mut self, target: &Expr, value: &Expr, pos: Pos, is_attr_or_index: bool) {
        let names = extract_names(target);
        self.mark_reassigned_if_tracked(&names);
        self.locals.extend(names.iter().cloned());

        // Only the attribute/subscript-assignment shape of the source's global
        // finding is ported (`obj.field = thread.spawn(...)`). Its other shape —
        // a `global`/`nonlocal` declaration naming a module-level variable before
        // assigning a constructor to it — has no Rust counterpart: there is no
        // statement form that binds a function-local name to an outer-scope
        // variable, since `static` items are declared at module scope directly
        // rather than opted into from inside a function body (see DESIGN.md).
        if is_attr_or_index {
            if let Expr::Call { .. } = value {
                if let Some((tail, root)) = call_shape(value) {
                    if let Some(kind) = classify_constructor_call(&tail, root.as_deref()) {
                        let rendered = render_expr(target);
                        self.push(
                            EscapeKind::Global,
                            pos,
                            rendered.clone(),
                            format!("{kind:?} assigned to global/attribute {rendered}"),
                            Confidence::High,
                        );
                    }
                }
            }
        }

        if let Expr::Call { .. } = value {
            if let Some((tail, root)) = call_shape(value) {
                if let Some(kind) = classify_constructor_call(&tail, root.as_deref()) {
                    if let Expr::Ident(name, _) = target {
                        self.record_concurrency_object(name, pos, kind, false);
                    }
                }
            }
        } else if let Some(kind) = find_constructor_in_collection_expr(value) {
            if let Expr::Ident(name, _) = target {
                self.record_concurrency_object(name, pos, kind, true);
            }
        }

        self.handle_heap_escape(&names, value, pos);
    }
}

impl<'a> AstVisitor for EscapeVisitor<'a> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let { name, value, pos } => {
                self.locals.insert(name.clone());
                if let Some(value) = value {
                    self.handle_assignment_target_and_value(
                        &Expr::Ident(name.clone(), *pos),
                        value,
                        *pos,
                        false,
                    );
                    self.visit_expr(value);
                }
            }
            Stmt::Assign { target, value, pos } => {
                let is_attr_or_index = matches!(target, Expr::Field { .. } | Expr::Index { .. });
                self.handle_assignment_target_and_value(target, value, *pos, is_attr_or_index);
                self.visit_expr(value);
            }
            Stmt::Return { value, pos } => {
                if let Some(value) = value {
                    for name in extract_names(value) {
                        if self.locals.contains(&name) {
                            self.push(
                                EscapeKind::Return,
                                *pos,
                                name.clone(),
                                format!("Variable '{name}' returned from function"),
                                Confidence::High,
                            );
                        }
                    }
                    self.visit_expr(value);
                }
            }
            Stmt::For { iter, body, .. } => {
                if let Expr::Ident(iter_var, _) = iter {
                    if block_calls_join_like(body) {
                        self.joined.insert(iter_var.clone());
                    }
                }
                self.visit_expr(iter);
                self.visit_block(body);
            }
            other => self.walk_stmt(other),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::MethodCall { receiver, method, args, pos } => {
                if let Expr::Ident(name, _) = receiver.as_ref() {
                    if is_join_like_call(method) {
                        self.joined.insert(name.clone());
                    } else if POOL_FIRE_AND_FORGET_METHODS.contains(&method.as_str())
                        && self.concurrency_objects.contains_key(name)
                        && !self.joined.contains(name)
                    {
                        self.push(
                            EscapeKind::Concurrency,
                            *pos,
                            name.clone(),
                            "Pool method called without a shutdown() in all paths".to_string(),
                            Confidence::Medium,
                        );
                    }
                }
                self.check_parameter_escape(args, &render_expr(expr), *pos);
                self.walk_expr(expr);
            }
            Expr::Call { args, pos, .. } => {
                let callee_text = call_shape(expr).map(|(tail, _)| tail).unwrap_or_default();
                self.check_parameter_escape(args, &callee_text, *pos);
                self.walk_expr(expr);
            }
            Expr::Closure { params, body, pos } => {
                let mut used = HashSet::new();
                collect_idents_in_closure_body(body, &mut used);
                let closure_params: HashSet<&String> = params.iter().collect();
                let mut captured: Vec<&String> = used
                    .iter()
                    .filter(|v| self.locals.contains(*v) && !closure_params.contains(v))
                    .collect();
                captured.sort();
                for var in captured {
                    self.push(
                        EscapeKind::Closure,
                        *pos,
                        var.clone(),
                        format!("Variable '{var}' captured in closure"),
                        Confidence::High,
                    );
                }
                self.walk_expr(expr);
            }
            other => self.walk_expr(other),
        }
    }
}

impl<'a> EscapeVisitor<'a> {
    fn check_parameter_escape(&mut self, args: &[Expr], callee_text: &str, pos: Pos) {
        let looks_like_cleanup = CLEANUP_CALLEE_HINTS.iter().any(|hint| callee_text.contains(hint));
        if looks_like_cleanup {
            return;
        }
        for arg in args {
            for name in extract_names(arg) {
                if self.concurrency_objects.contains_key(&name) && !self.joined.contains(&name) {
                    self.push(
                        EscapeKind::Parameter,
                        pos,
                        name.clone(),
                        format!("Concurrency handle '{name}' passed without a documented join"),
                        Confidence::Medium,
                    );
                }
            }
        }
    }
}

fn block_calls_join_like(body: &Block) -> bool {
    body.stmts().iter().any(|stmt| match stmt {
        Stmt::Expr(Expr::MethodCall { method, .. }) => is_join_like_call(method),
        _ => false,
    })
}

fn extract_names(expr: &Expr) -> Vec<String> {
    match expr {
        Expr::Ident(name, _) => vec![name.clone()],
        Expr::Tuple(items) | Expr::Array(items) => items.iter().flat_map(extract_names).collect(),
        Expr::Field { base, .. } | Expr::Index { base, .. } => extract_names(base),
        Expr::Paren(inner) | Expr::Ref { expr: inner } => extract_names(inner),
        _ => Vec::new(),
    }
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name, _) => name.clone(),
        Expr::Path(segments, _) => segments.join("::"),
        Expr::Field { base, field } => format!("{}.{}", render_expr(base), field),
        Expr::Index { base, index } => format!("{}[{}]", render_expr(base), render_expr(index)),
        Expr::Paren(inner) | Expr::Ref { expr: inner } | Expr::Unary { expr: inner, .. } => render_expr(inner),
        Expr::Call { callee, .. } => format!("{}(..)", render_expr(callee)),
        Expr::MethodCall { receiver, method, .. } => format!("{}.{method}(..)", render_expr(receiver)),
        Expr::Literal => "<literal>".to_string(),
        _ => "<expr>".to_string(),
    }
}

/// True if a `.map(|_| ...)`-style chain anywhere inside `expr` constructs a
/// concurrency worker — the Rust-shaped analogue of the original's
/// list-comprehension check.
fn find_constructor_in_collection_expr(expr: &Expr) -> Option<ConstructorKind> {
    match expr {
        Expr::MethodCall { receiver, method, args, .. } => {
            if method == "collect" {
                return find_constructor_in_collection_expr(receiver);
            }
            if method == "map" {
                if let Some(Expr::Closure { body, .. }) = args.first() {
                    return find_constructor_in_closure_body(body);
                }
            }
            find_constructor_in_collection_expr(receiver)
        }
        _ => None,
    }
}

fn find_constructor_in_closure_body(body: &ClosureBody) -> Option<ConstructorKind> {
    match body {
        ClosureBody::Expr(expr) => find_constructor_call(expr),
        ClosureBody::Block(block) => block.stmts().iter().find_map(|stmt| match stmt {
            Stmt::Expr(expr) => find_constructor_call(expr),
            Stmt::Let { value: Some(expr), .. } => find_constructor_call(expr),
            _ => None,
        }),
    }
}

fn find_constructor_call(expr: &Expr) -> Option<ConstructorKind> {
    if let Some((tail, root)) = call_shape(expr) {
        if let Some(kind) = classify_constructor_call(&tail, root.as_deref()) {
            return Some(kind);
        }
    }
    match expr {
        Expr::Call { callee, .. } => find_constructor_call(callee),
        Expr::MethodCall { receiver, .. } => find_constructor_call(receiver),
        _ => None,
    }
}

fn collect_idents_in_closure_body(body: &ClosureBody, out: &mut HashSet<String>) {
    match body {
        ClosureBody::Expr(expr) => collect_idents_in_expr(expr, out),
        ClosureBody::Block(block) => {
            for stmt in block.stmts() {
                collect_idents_in_stmt(stmt, out);
            }
        }
    }
}

fn collect_idents_in_stmt(stmt: &Stmt, out: &mut HashSet<String>) {
    match stmt {
        Stmt::Let { value, .. } => {
            if let Some(value) = value {
                collect_idents_in_expr(value, out);
            }
        }
        Stmt::Assign { target, value, .. } => {
            collect_idents_in_expr(target, out);
            collect_idents_in_expr(value, out);
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                collect_idents_in_expr(value, out);
            }
        }
        Stmt::Expr(expr) => collect_idents_in_expr(expr, out),
        Stmt::For { iter, body, .. } => {
            collect_idents_in_expr(iter, out);
            for stmt in body.stmts() {
                collect_idents_in_stmt(stmt, out);
            }
        }
        Stmt::While { cond, body, .. } => {
            collect_idents_in_expr(cond, out);
            for stmt in body.stmts() {
                collect_idents_in_stmt(stmt, out);
            }
        }
        Stmt::If { cond, then_block, else_block, .. } => {
            collect_idents_in_expr(cond, out);
            for stmt in then_block.stmts() {
                collect_idents_in_stmt(stmt, out);
            }
            if let Some(else_block) = else_block {
                for stmt in else_block.stmts() {
                    collect_idents_in_stmt(stmt, out);
                }
            }
        }
        Stmt::Block(block) => {
            for stmt in block.stmts() {
                collect_idents_in_stmt(stmt, out);
            }
        }
    }
}

fn collect_idents_in_expr(expr: &Expr, out: &mut HashSet<String>) {
    match expr {
        Expr::Ident(name, _) => {
            out.insert(name.clone());
        }
        Expr::Path(segments, _) => {
            if let Some(first) = segments.first() {
                out.insert(first.clone());
            }
        }
        Expr::Call { callee, args, .. } => {
            collect_idents_in_expr(callee, out);
            for arg in args {
                collect_idents_in_expr(arg, out);
            }
        }
        Expr::MethodCall { receiver, args, .. } => {
            collect_idents_in_expr(receiver, out);
            for arg in args {
                collect_idents_in_expr(arg, out);
            }
        }
        Expr::Field { base, .. } => collect_idents_in_expr(base, out),
        Expr::Index { base, index } => {
            collect_idents_in_expr(base, out);
            collect_idents_in_expr(index, out);
        }
        Expr::Closure { body, .. } => collect_idents_in_closure_body(body, out),
        Expr::Unary { expr, .. } | Expr::Ref { expr } | Expr::Paren(expr) => collect_idents_in_expr(expr, out),
        Expr::Binary { lhs, rhs } => {
            collect_idents_in_expr(lhs, out);
            collect_idents_in_expr(rhs, out);
        }
        Expr::Tuple(items) | Expr::Array(items) => {
            for item in items {
                collect_idents_in_expr(item, out);
            }
        }
        Expr::Block(block) => {
            for stmt in block.stmts() {
                collect_idents_in_stmt(stmt, out);
            }
        }
        Expr::Nested(blocks) => {
            for block in blocks {
                for stmt in block.stmts() {
                    collect_idents_in_stmt(stmt, out);
                }
            }
        }
        Expr::Literal | Expr::Unknown => {}
    }
}

#[cfg(test)]
#[path = "escape_visitor_tests.rs"]
mod tests;
