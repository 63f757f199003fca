// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser over the token stream from `lexer`, scoped to
//! locating one named function and parsing its body. We never parse a
//! whole file's item list — the visitor only ever needs one function.

use crate::ast::{Block, ClosureBody, Expr, Stmt};
use crate::error::ParserError;
use crate::lexer::{Pos, Token, TokenKind};

const BINARY_OPS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "..", "..=", "&", "|", "^",
];

/// Find the token index of the function named `name`'s opening brace.
/// Returns `None` if no `fn <name>` is present at all.
pub fn find_function_body_start(tokens: &[Token], name: &str) -> Option<usize> {
    let mut i = 0;
    while i + 1 < tokens.len() {
        if tokens[i].is_ident("fn") && tokens[i + 1].is_ident(name) {
            let mut j = i + 2;
            // Skip generic parameter list, e.g. `fn foo<T>(...)`.
            if j < tokens.len() && tokens[j].is_punct("<") {
                let mut depth = 0i32;
                while j < tokens.len() {
                    if tokens[j].is_punct("<") {
                        depth += 1;
                    } else if tokens[j].is_punct(">") {
                        depth -= 1;
                        if depth <= 0 {
                            j += 1;
                            break;
                        }
                    }
                    j += 1;
                }
            }
            // Next must be the parameter list.
            while j < tokens.len() && !tokens[j].is_punct("(") {
                j += 1;
            }
            let mut depth = 0i32;
            while j < tokens.len() {
                if tokens[j].is_punct("(") {
                    depth += 1;
                } else if tokens[j].is_punct(")") {
                    depth -= 1;
                    if depth == 0 {
                        j += 1;
                        break;
                    }
                }
                j += 1;
            }
            // Skip return type / where-clause up to the opening brace.
            while j < tokens.len() && !tokens[j].is_punct("{") {
                j += 1;
            }
            if j < tokens.len() {
                return Some(j);
            }
        }
        i += 1;
    }
    None
}

/// Find `fn <name>`'s parameter names (skipping `self`/`&self`/`&mut self`)
/// and the index of its body's opening `{`.
pub fn locate_function(tokens: &[Token], name: &str) -> Option<(Vec<String>, usize)> {
    let mut i = 0;
    while i + 1 < tokens.len() {
        if !(tokens[i].is_ident("fn") && tokens[i + 1].is_ident(name)) {
            i += 1;
            continue;
        }
        let mut j = i + 2;
        if tokens.get(j).is_some_and(|t| t.is_punct("<")) {
            let mut depth = 0i32;
            while j < tokens.len() {
                if tokens[j].is_punct("<") {
                    depth += 1;
                } else if tokens[j].is_punct(">") {
                    depth -= 1;
                    if depth <= 0 {
                        j += 1;
                        break;
                    }
                }
                j += 1;
            }
        }
        while j < tokens.len() && !tokens[j].is_punct("(") {
            j += 1;
        }
        let params_open = j;
        if params_open >= tokens.len() {
            return None;
        }
        let mut depth = 0i32;
        let mut k = params_open;
        while k < tokens.len() {
            if tokens[k].is_punct("(") {
                depth += 1;
            } else if tokens[k].is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            k += 1;
        }
        let params_close = k;
        let params = extract_param_names(&tokens[params_open + 1..params_close]);
        let mut m = params_close + 1;
        while m < tokens.len() && !tokens[m].is_punct("{") {
            m += 1;
        }
        return if m < tokens.len() { Some((params, m)) } else { None };
    }
    None
}

fn extract_param_names(tokens: &[Token]) -> Vec<String> {
    let mut segments: Vec<Vec<&Token>> = Vec::new();
    let mut current: Vec<&Token> = Vec::new();
    let mut depth = 0i32;
    for t in tokens {
        match &t.kind {
            TokenKind::Punct(p) if p == "(" || p == "[" || p == "<" => {
                depth += 1;
                current.push(t);
            }
            TokenKind::Punct(p) if p == ")" || p == "]" || p == ">" => {
                depth -= 1;
                current.push(t);
            }
            TokenKind::Punct(p) if p == "," && depth == 0 => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(t),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    let mut names = Vec::new();
    for seg in segments {
        for t in seg {
            if let TokenKind::Ident(name) = &t.kind {
                if name == "mut" || name == "self" {
                    continue;
                }
                names.push(name.clone());
                break;
            }
        }
    }
    names
}

/// Given the index of a function body's opening `{`, find the index of its
/// matching `}` by brace-depth counting.
pub fn find_matching_brace(tokens: &[Token], open_index: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut j = open_index;
    while j < tokens.len() {
        if tokens[j].is_punct("{") {
            depth += 1;
        } else if tokens[j].is_punct("}") {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        }
        j += 1;
    }
    None
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_function_body(&mut self) -> Result<Block, ParserError> {
        self.parse_block()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_pos(&self) -> Pos {
        self.peek().map(|t| t.pos).unwrap_or(Pos { line: 0, column: 0 })
    }

    fn check_ident(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(text))
    }

    fn check_punct(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(text))
    }

    fn eat_ident(&mut self, text: &str) -> bool {
        if self.check_ident(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_ident_any(&mut self) -> Option<String> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Ident(name)) => {
                self.pos += 1;
                Some(name)
            }
            _ => None,
        }
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.check_punct(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, text: &str) -> Result<(), ParserError> {
        if self.eat_punct(text) {
            Ok(())
        } else {
            Err(ParserError::UnexpectedToken {
                expected: format!("'{text}'"),
                pos: self.peek_pos(),
            })
        }
    }

    /// Skip tokens (tracking paren/bracket/brace depth) until a punct in
    /// `stops` is seen at depth zero, without consuming it. Used to step
    /// over type ascriptions, patterns, and match-arm guards we don't
    /// model precisely.
    fn skip_until_punct_at_depth0(&mut self, stops: &[&str]) {
        let mut depth = 0i32;
        while let Some(t) = self.peek() {
            if depth == 0 {
                if let TokenKind::Punct(p) = &t.kind {
                    if stops.contains(&p.as_str()) {
                        return;
                    }
                }
            }
            match &t.kind {
                TokenKind::Punct(p) if p == "(" || p == "[" || p == "{" => depth += 1,
                TokenKind::Punct(p) if p == ")" || p == "]" || p == "}" => depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn skip_generic_args(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.peek() {
                Some(t) if t.is_punct("<") => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(t) if t.is_punct(">") => {
                    depth -= 1;
                    self.pos += 1;
                    if depth <= 0 {
                        break;
                    }
                }
                Some(_) => self.pos += 1,
                None => break,
            }
        }
    }

    fn parse_block(&mut self) -> Result<Block, ParserError> {
        self.expect_punct("{")?;
        let mut stmts = Vec::new();
        loop {
            if self.eat_punct("}") {
                break;
            }
            if self.peek().is_none() {
                return Err(ParserError::UnexpectedEof);
            }
            stmts.push(self.parse_stmt()?);
        }
        Ok(Block(stmts))
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        if self.check_ident("let") {
            return self.parse_let();
        }
        if self.check_ident("return") {
            return self.parse_return();
        }
        if self.check_ident("for") {
            return self.parse_for();
        }
        if self.check_ident("while") {
            return self.parse_while();
        }
        if self.check_ident("loop") {
            self.pos += 1;
            let body = self.parse_block()?;
            return Ok(Stmt::While {
                cond: Expr::Literal,
                body,
                pos,
            });
        }
        if self.check_ident("if") {
            return self.parse_if_stmt();
        }
        if self.check_ident("match") {
            let blocks = self.parse_match_arms()?;
            return Ok(Stmt::Expr(Expr::Nested(blocks)));
        }
        if self.check_punct("{") {
            return Ok(Stmt::Block(self.parse_block()?));
        }
        if self.eat_punct(";") {
            // Stray semicolon — an empty statement.
            return Ok(Stmt::Expr(Expr::Unknown));
        }
        self.parse_expr_stmt()
    }

    fn parse_let(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        self.eat_ident("let");
        self.eat_ident("mut");
        let name = if let Some(name) = self.eat_ident_any() {
            name
        } else {
            // Destructuring pattern (tuple/struct) — not modeled; skip it.
            self.skip_until_punct_at_depth0(&["=", ";"]);
            "_".to_string()
        };
        if self.eat_punct(":") {
            self.skip_until_punct_at_depth0(&["=", ";"]);
        }
        let value = if self.eat_punct("=") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.eat_punct(";");
        Ok(Stmt::Let { name, value, pos })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        self.eat_ident("return");
        let value = if self.check_punct(";") || self.check_punct("}") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.eat_punct(";");
        Ok(Stmt::Return { value, pos })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        self.eat_ident("for");
        let binding = if let Some(name) = self.eat_ident_any() {
            name
        } else {
            self.skip_until_punct_at_depth0(&["in"]);
            "_".to_string()
        };
        self.eat_ident("in");
        let iter = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::For { binding, iter, body, pos })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        self.eat_ident("while");
        let cond = if self.eat_ident("let") {
            self.skip_until_punct_at_depth0(&["{"]);
            Expr::Unknown
        } else {
            self.parse_expr()?
        };
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body, pos })
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        self.eat_ident("if");
        let cond = if self.eat_ident("let") {
            self.skip_until_punct_at_depth0(&["{"]);
            Expr::Unknown
        } else {
            self.parse_expr()?
        };
        let then_block = self.parse_block()?;
        let else_block = if self.eat_ident("else") {
            if self.check_ident("if") {
                let nested = self.parse_if_stmt()?;
                Some(Block(vec![nested]))
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_block,
            else_block,
            pos,
        })
    }

    fn parse_match_arms(&mut self) -> Result<Vec<Block>, ParserError> {
        self.eat_ident("match");
        let _ = self.parse_expr()?;
        self.expect_punct("{")?;
        let mut blocks = Vec::new();
        loop {
            if self.eat_punct("}") {
                break;
            }
            if self.peek().is_none() {
                return Err(ParserError::UnexpectedEof);
            }
            self.skip_until_punct_at_depth0(&["=>"]);
            if !self.eat_punct("=>") {
                break;
            }
            if self.check_punct("{") {
                blocks.push(self.parse_block()?);
                self.eat_punct(",");
            } else {
                let e = self.parse_expr()?;
                blocks.push(Block(vec![Stmt::Expr(e)]));
                self.eat_punct(",");
            }
        }
        Ok(blocks)
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParserError> {
        let pos = self.peek_pos();
        let lhs = self.parse_expr()?;
        const COMPOUND_ASSIGN: &[&str] = &["+=", "-=", "*=", "/="];
        if self.check_punct("=") {
            self.pos += 1;
            let rhs = self.parse_expr()?;
            self.eat_punct(";");
            return Ok(Stmt::Assign {
                target: lhs,
                value: rhs,
                pos,
            });
        }
        if let Some(op) = self.peek().and_then(|t| match &t.kind {
            TokenKind::Punct(p) if COMPOUND_ASSIGN.contains(&p.as_str()) => Some(p.clone()),
            _ => None,
        }) {
            let _ = op;
            self.pos += 1;
            let rhs = self.parse_expr()?;
            self.eat_punct(";");
            return Ok(Stmt::Assign {
                target: lhs.clone(),
                value: rhs,
                pos,
            });
        }
        self.eat_punct(";");
        Ok(Stmt::Expr(lhs))
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        if self.check_ident("move") || self.check_punct("|") || self.check_punct("||") {
            return self.parse_closure();
        }
        self.parse_binary()
    }

    fn parse_closure(&mut self) -> Result<Expr, ParserError> {
        let pos = self.peek_pos();
        self.eat_ident("move");
        let params = if self.eat_punct("||") {
            Vec::new()
        } else {
            self.expect_punct("|")?;
            let mut params = Vec::new();
            while !self.check_punct("|") {
                if let Some(name) = self.eat_ident_any() {
                    params.push(name);
                }
                self.skip_until_punct_at_depth0(&[",", "|"]);
                self.eat_punct(",");
            }
            self.expect_punct("|")?;
            params
        };
        if self.eat_punct("->") {
            self.skip_until_punct_at_depth0(&["{"]);
        }
        let body = if self.check_punct("{") {
            ClosureBody::Block(self.parse_block()?)
        } else {
            ClosureBody::Expr(Box::new(self.parse_expr()?))
        };
        Ok(Expr::Closure {
            params,
            body: Box::new(body),
            pos,
        })
    }

    fn parse_binary(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let is_op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Punct(p)) => BINARY_OPS.contains(&p.as_str()),
                Some(TokenKind::Ident(i)) => i == "as",
                _ => false,
            };
            if !is_op {
                break;
            }
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParserError> {
        if self.eat_punct("&") {
            self.eat_ident("mut");
            let expr = self.parse_unary()?;
            return Ok(Expr::Ref { expr: Box::new(expr) });
        }
        if self.eat_punct("*") {
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: "*".to_string(),
                expr: Box::new(expr),
            });
        }
        if self.eat_punct("!") {
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: "!".to_string(),
                expr: Box::new(expr),
            });
        }
        if self.check_punct("-") {
            self.pos += 1;
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: "-".to_string(),
                expr: Box::new(expr),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_punct(".") {
                if let Some(name) = self.eat_ident_any() {
                    if self.check_punct("(") {
                        let pos = expr.pos().unwrap_or(Pos { line: 0, column: 0 });
                        let args = self.parse_args()?;
                        expr = Expr::MethodCall {
                            receiver: Box::new(expr),
                            method: name,
                            args,
                            pos,
                        };
                    } else {
                        expr = Expr::Field {
                            base: Box::new(expr),
                            field: name,
                        };
                    }
                } else if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Literal(_))) {
                    self.pos += 1;
                    expr = Expr::Field {
                        base: Box::new(expr),
                        field: "0".to_string(),
                    };
                } else {
                    break;
                }
                continue;
            }
            if self.check_punct("(") {
                let pos = expr.pos().unwrap_or(Pos { line: 0, column: 0 });
                let args = self.parse_args()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    pos,
                };
                continue;
            }
            if self.eat_punct("[") {
                let index = self.parse_expr()?;
                self.expect_punct("]")?;
                expr = Expr::Index {
                    base: Box::new(expr),
                    index: Box::new(index),
                };
                continue;
            }
            if self.eat_punct("?") {
                continue;
            }
            break;
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParserError> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        while !self.check_punct(")") {
            args.push(self.parse_expr()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        let Some(tok) = self.peek().cloned() else {
            return Err(ParserError::UnexpectedEof);
        };
        match &tok.kind {
            TokenKind::Literal(_) => {
                self.pos += 1;
                Ok(Expr::Literal)
            }
            TokenKind::Ident(name) => match name.as_str() {
                "if" => self.parse_if_expr(),
                "match" => Ok(Expr::Nested(self.parse_match_arms()?)),
                "unsafe" => {
                    self.pos += 1;
                    if self.check_punct("{") {
                        Ok(Expr::Block(self.parse_block()?))
                    } else {
                        self.parse_primary()
                    }
                }
                _ => {
                    self.pos += 1;
                    let mut segments = vec![name.clone()];
                    let pos = tok.pos;
                    while self.eat_punct("::") {
                        if self.check_punct("<") {
                            self.skip_generic_args();
                            continue;
                        }
                        if let Some(seg) = self.eat_ident_any() {
                            segments.push(seg);
                        } else {
                            break;
                        }
                    }
                    if segments.len() == 1 {
                        Ok(Expr::Ident(segments.remove(0), pos))
                    } else {
                        Ok(Expr::Path(segments, pos))
                    }
                }
            },
            TokenKind::Punct(p) => match p.as_str() {
                "(" => {
                    self.pos += 1;
                    if self.eat_punct(")") {
                        return Ok(Expr::Tuple(Vec::new()));
                    }
                    let mut items = vec![self.parse_expr()?];
                    let mut is_tuple = false;
                    while self.eat_punct(",") {
                        is_tuple = true;
                        if self.check_punct(")") {
                            break;
                        }
                        items.push(self.parse_expr()?);
                    }
                    self.expect_punct(")")?;
                    if is_tuple {
                        Ok(Expr::Tuple(items))
                    } else {
                        Ok(Expr::Paren(Box::new(items.remove(0))))
                    }
                }
                "[" => {
                    self.pos += 1;
                    let mut items = Vec::new();
                    while !self.check_punct("]") {
                        items.push(self.parse_expr()?);
                        if !self.eat_punct(",") {
                            break;
                        }
                    }
                    self.expect_punct("]")?;
                    Ok(Expr::Array(items))
                }
                "{" => Ok(Expr::Block(self.parse_block()?)),
                "'" => {
                    // Loop/block label — skip `'label:` and re-dispatch.
                    self.pos += 1;
                    self.eat_ident_any();
                    self.eat_punct(":");
                    self.parse_primary()
                }
                _ => {
                    self.pos += 1;
                    Ok(Expr::Unknown)
                }
            },
        }
    }

    fn parse_if_expr(&mut self) -> Result<Expr, ParserError> {
        self.eat_ident("if");
        if self.eat_ident("let") {
            self.skip_until_punct_at_depth0(&["{"]);
        } else {
            let _ = self.parse_expr()?;
        }
        let then_block = self.parse_block()?;
        let mut blocks = vec![then_block];
        if self.eat_ident("else") {
            if self.check_ident("if") {
                if let Expr::Nested(more) = self.parse_if_expr()? {
                    blocks.extend(more);
                }
            } else {
                blocks.push(self.parse_block()?);
            }
        }
        Ok(Expr::Nested(blocks))
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
