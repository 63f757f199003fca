// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AST node types for the Rust-subset grammar.
//!
//! Deliberately shallow: statements and expressions the visitor doesn't
//! need a precise account of (arithmetic precedence, pattern matching
//! internals, generic arguments) collapse into [`Expr::Unknown`] or a
//! coarse [`Expr::Binary`]/[`Expr::Nested`] rather than being modeled
//! exactly. See `parser.rs` for what's actually recognized.

use crate::lexer::Pos;

#[derive(Debug, Clone)]
pub struct Block(pub Vec<Stmt>);

impl Block {
    pub fn stmts(&self) -> &[Stmt] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Let {
        name: String,
        value: Option<Expr>,
        pos: Pos,
    },
    Assign {
        target: Expr,
        value: Expr,
        pos: Pos,
    },
    Return {
        value: Option<Expr>,
        pos: Pos,
    },
    Expr(Expr),
    For {
        binding: String,
        iter: Expr,
        body: Block,
        pos: Pos,
    },
    While {
        cond: Expr,
        body: Block,
        pos: Pos,
    },
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
        pos: Pos,
    },
    Block(Block),
}

#[derive(Debug, Clone)]
pub enum ClosureBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(String, Pos),
    Path(Vec<String>, Pos),
    Literal,
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        pos: Pos,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
        pos: Pos,
    },
    Field {
        base: Box<Expr>,
        field: String,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Closure {
        params: Vec<String>,
        body: Box<ClosureBody>,
        pos: Pos,
    },
    Unary {
        op: String,
        expr: Box<Expr>,
    },
    Binary {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ref {
        expr: Box<Expr>,
    },
    Paren(Box<Expr>),
    Tuple(Vec<Expr>),
    Array(Vec<Expr>),
    /// A bare `{ ... }` block used in expression position (`unsafe { ... }`
    /// or a labeled block).
    Block(Block),
    /// A set of nested blocks reached through a construct we don't assign
    /// data-flow semantics to (`match` arms, `if`/`match` used as an
    /// expression). The visitor still walks into each block looking for
    /// concurrency constructs, it just can't tell which one a binding
    /// would have come from.
    Nested(Vec<Block>),
    Unknown,
}

impl Expr {
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Expr::Ident(_, pos)
            | Expr::Path(_, pos)
            | Expr::Call { pos, .. }
            | Expr::MethodCall { pos, .. }
            | Expr::Closure { pos, .. } => Some(*pos),
            Expr::Field { base, .. } | Expr::Index { base, .. } => base.pos(),
            Expr::Unary { expr, .. } | Expr::Ref { expr } | Expr::Paren(expr) => expr.pos(),
            Expr::Binary { lhs, .. } => lhs.pos(),
            _ => None,
        }
    }

    /// Root identifier of a call/method-call chain, e.g. `thread` in
    /// `thread::Builder::new().spawn(...)`, or `pool` in `pool.spawn(...)`.
    pub fn root_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name, _) => Some(name),
            Expr::Path(segments, _) => segments.first().map(|s| s.as_str()),
            Expr::MethodCall { receiver, .. } => receiver.root_ident(),
            Expr::Call { callee, .. } => callee.root_ident(),
            Expr::Field { base, .. } | Expr::Index { base, .. } => base.root_ident(),
            Expr::Paren(inner) | Expr::Ref { expr: inner } => inner.root_ident(),
            _ => None,
        }
    }
}
