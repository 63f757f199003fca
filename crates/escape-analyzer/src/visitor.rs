// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visitor pattern for traversing a parsed function body.
//!
//! Mirrors the `visit_*`/`walk_*` pairing used throughout this codebase's
//! shell AST walker: a `visit_*` method is called at a node and may call
//! `walk_*` to descend into children. Overriding a `visit_*` method without
//! calling its `walk_*` counterpart stops traversal at that node.

use crate::ast::{Block, ClosureBody, Expr, Stmt};

pub trait AstVisitor {
    fn visit_block(&mut self, block: &Block) {
        self.walk_block(block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.walk_stmt(stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.walk_expr(expr);
    }

    fn walk_block(&mut self, block: &Block) {
        for stmt in block.stmts() {
            self.visit_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let { value, .. } => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            Stmt::Assign { target, value, .. } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::For { iter, body, .. } => {
                self.visit_expr(iter);
                self.visit_block(body);
            }
            Stmt::While { cond, body, .. } => {
                self.visit_expr(cond);
                self.visit_block(body);
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => {
                self.visit_expr(cond);
                self.visit_block(then_block);
                if let Some(else_block) = else_block {
                    self.visit_block(else_block);
                }
            }
            Stmt::Block(block) => self.visit_block(block),
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call { callee, args, .. } => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::MethodCall { receiver, args, .. } => {
                self.visit_expr(receiver);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::Field { base, .. } => self.visit_expr(base),
            Expr::Index { base, index } => {
                self.visit_expr(base);
                self.visit_expr(index);
            }
            Expr::Closure { body, .. } => match body.as_ref() {
                ClosureBody::Expr(inner) => self.visit_expr(inner),
                ClosureBody::Block(block) => self.visit_block(block),
            },
            Expr::Unary { expr, .. } | Expr::Ref { expr } | Expr::Paren(expr) => {
                self.visit_expr(expr)
            }
            Expr::Binary { lhs, rhs } => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            Expr::Tuple(items) | Expr::Array(items) => {
                for item in items {
                    self.visit_expr(item);
                }
            }
            Expr::Block(block) => self.visit_block(block),
            Expr::Nested(blocks) => {
                for block in blocks {
                    self.visit_block(block);
                }
            }
            Expr::Ident(..) | Expr::Path(..) | Expr::Literal | Expr::Unknown => {}
        }
    }
}

#[cfg(test)]
#[path = "visitor_tests.rs"]
mod tests;
