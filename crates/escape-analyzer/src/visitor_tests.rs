use super::*;
use crate::lexer::tokenize;
use crate::parser::{find_function_body_start, find_matching_brace, Parser};

fn body_block(source: &str) -> Block {
    let tokens = tokenize(source);
    let start = find_function_body_start(&tokens, "f").unwrap();
    let end = find_matching_brace(&tokens, start).unwrap();
    Parser::new(&tokens[start..=end]).parse_function_body().unwrap()
}

struct CallCounter(usize);

impl AstVisitor for CallCounter {
    fn visit_expr(&mut self, expr: &Expr) {
        if matches!(expr, Expr::Call { .. } | Expr::MethodCall { .. }) {
            self.0 += 1;
        }
        self.walk_expr(expr);
    }
}

#[test]
fn counts_calls_inside_nested_closures_and_loops() {
    let source = "fn f() { for h in handles { thread::spawn(move || { work(); }); h.join(); } }";
    let block = body_block(source);
    let mut counter = CallCounter(0);
    counter.visit_block(&block);
    // spawn(...), work(), join() == 3
    assert_eq!(counter.0, 3);
}

struct StoppingVisitor(Vec<String>);

impl AstVisitor for StoppingVisitor {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::MethodCall { method, .. } = expr {
            self.0.push(method.clone());
            // Deliberately does not call walk_expr: traversal stops here.
            return;
        }
        self.walk_expr(expr);
    }
}

#[test]
fn overriding_visit_without_walk_stops_descent() {
    let source = "fn f() { a.b().c(); }";
    let block = body_block(source);
    let mut visitor = StoppingVisitor(Vec::new());
    visitor.visit_block(&block);
    // Only the outermost method call (`c`) is recorded; `b` is never
    // reached because the visitor didn't walk into the receiver.
    assert_eq!(visitor.0, vec!["c"]);
}

#[test]
fn walks_into_match_arm_blocks() {
    let source = "fn f() { match x { A => { spawn_a(); } B => { spawn_b(); } } }";
    let block = body_block(source);
    let mut counter = CallCounter(0);
    counter.visit_block(&block);
    assert_eq!(counter.0, 2);
}
