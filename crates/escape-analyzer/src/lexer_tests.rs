use super::*;
use yare::parameterized;

#[test]
fn tokenizes_a_simple_let_binding() {
    let tokens = tokenize("let x = 1;");
    let idents: Vec<&str> = tokens.iter().filter_map(|t| t.ident_text()).collect();
    assert_eq!(idents, vec!["let", "x"]);
}

#[test]
fn skips_line_comments() {
    let tokens = tokenize("let x = 1; // spawn a thread\nlet y = 2;");
    let idents: Vec<&str> = tokens.iter().filter_map(|t| t.ident_text()).collect();
    assert_eq!(idents, vec!["let", "x", "let", "y"]);
}

#[test]
fn skips_block_comments() {
    let tokens = tokenize("let /* inline */ x = 1;");
    let idents: Vec<&str> = tokens.iter().filter_map(|t| t.ident_text()).collect();
    assert_eq!(idents, vec!["let", "x"]);
}

#[parameterized(
    path_sep = { "a::b", "::" },
    arrow = { "a -> b", "->" },
    fat_arrow = { "a => b", "=>" },
    eq = { "a == b", "==" },
    neq = { "a != b", "!=" },
    and = { "a && b", "&&" },
    or = { "a || b", "||" },
)]
fn recognizes_multi_char_operators(source: &str, expected: &str) {
    let tokens = tokenize(source);
    assert!(tokens.iter().any(|t| t.is_punct(expected)), "{source:?} -> {tokens:?}");
}

#[test]
fn string_literal_preserves_contents() {
    let tokens = tokenize(r#"let s = "hello world";"#);
    let lit = tokens
        .iter()
        .find_map(|t| match &t.kind {
            TokenKind::Literal(s) => Some(s.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(lit, "hello world");
}

#[test]
fn char_literal_is_a_single_token() {
    let tokens = tokenize("let c = 'x';");
    let literal_count = tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::Literal(_)))
        .count();
    assert_eq!(literal_count, 1);
}

#[test]
fn lifetime_does_not_consume_following_tokens() {
    let tokens = tokenize("fn f<'a>(x: &'a str) {}");
    let idents: Vec<&str> = tokens.iter().filter_map(|t| t.ident_text()).collect();
    assert!(idents.contains(&"x"));
    assert!(idents.contains(&"str"));
}

#[test]
fn tracks_line_numbers_across_newlines() {
    let tokens = tokenize("let a = 1;\nlet b = 2;");
    let second_let = tokens.iter().filter(|t| t.is_ident("let")).nth(1).unwrap();
    assert_eq!(second_let.pos.line, 2);
}
