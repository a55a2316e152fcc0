//! Tests for the selector tokenizer.

use wombat_query::{Combinator, QueryError, TokenKind, tokenize};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).map(|t| t.unwrap().kind).collect()
}

fn texts(input: &str) -> Vec<String> {
    tokenize(input).map(|t| t.unwrap().text).collect()
}

fn error_offset(input: &str) -> usize {
    match tokenize(input).find_map(Result::err) {
        Some(QueryError::Syntax { offset, .. }) => offset,
        other => panic!("expected a syntax error for {input:?}, got {other:?}"),
    }
}

#[test]
fn test_tokenize_compound() {
    assert_eq!(
        kinds("div#main.a"),
        [TokenKind::Ident, TokenKind::Id, TokenKind::Class, TokenKind::Eof]
    );
    assert_eq!(texts("div#main.a"), ["div", "main", "a", ""]);
}

#[test]
fn test_whitespace_is_descendant_combinator() {
    assert_eq!(
        kinds("ul   li"),
        [
            TokenKind::Ident,
            TokenKind::Combinator(Combinator::Descendant),
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_whitespace_around_explicit_combinators_collapses() {
    assert_eq!(
        kinds("  ul >  li ~ p + a , b  "),
        [
            TokenKind::Ident,
            TokenKind::Combinator(Combinator::Child),
            TokenKind::Ident,
            TokenKind::Combinator(Combinator::SubsequentSibling),
            TokenKind::Ident,
            TokenKind::Combinator(Combinator::NextSibling),
            TokenKind::Ident,
            TokenKind::Comma,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_attribute_group_tokens() {
    assert_eq!(
        kinds("[href]"),
        [
            TokenKind::AttributeOpen,
            TokenKind::Ident,
            TokenKind::AttributeClose,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        texts(r#"[ data-x ^= "a b" i ]"#),
        ["[", "data-x", "^=", "a b", "i", "]", ""]
    );
    assert_eq!(
        kinds("[type=text]"),
        [
            TokenKind::AttributeOpen,
            TokenKind::Ident,
            TokenKind::AttributeOperator,
            TokenKind::Ident,
            TokenKind::AttributeClose,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_all_attribute_operators() {
    for op in ["=", "~=", "|=", "^=", "$=", "*=", "!="] {
        let input = format!("[a{op}b]");
        assert_eq!(texts(&input)[2], op, "operator {op}");
    }
}

#[test]
fn test_string_escapes() {
    assert_eq!(texts(r#"[title="say \"hi\""]"#)[3], r#"say "hi""#);
    assert_eq!(texts(r"[title='it\'s']")[3], "it's");
    assert_eq!(texts(r#"[path="a\\b"]"#)[3], r"a\b");
}

#[test]
fn test_identifier_escapes() {
    assert_eq!(texts(r"#a\.b")[0], "a.b");
    assert_eq!(texts(r".a\:hover")[0], "a:hover");
}

#[test]
fn test_pseudo_argument_is_raw_and_trimmed() {
    let tokens: Vec<_> = tokenize(":not( .a, :has(> b) )").map(Result::unwrap).collect();
    assert_eq!(tokens[0].kind, TokenKind::Pseudo);
    assert_eq!(tokens[0].text, "not");
    assert_eq!(tokens[1].kind, TokenKind::PseudoArg);
    assert_eq!(tokens[1].text, ".a, :has(> b)");
    assert_eq!(tokens[1].offset, 6);
}

#[test]
fn test_pseudo_element_keeps_colon() {
    assert_eq!(texts("p::before")[1], ":before");
}

#[test]
fn test_offsets_are_byte_positions() {
    let offsets: Vec<usize> = tokenize("a > .b").map(|t| t.unwrap().offset).collect();
    assert_eq!(offsets, [0, 2, 4, 6]);
}

#[test]
fn test_unterminated_bracket() {
    assert_eq!(error_offset("div[href"), 3);
    assert_eq!(error_offset("div[href=x"), 3);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(error_offset(r#"[a="open]"#), 3);
}

#[test]
fn test_unterminated_pseudo_argument() {
    assert_eq!(error_offset("li:nth-child(2n"), 12);
}

#[test]
fn test_invalid_identifier() {
    assert_eq!(error_offset("div.1x"), 4);
    assert_eq!(error_offset("a $ b"), 2);
}

#[test]
fn test_nesting_bound() {
    let deep = format!("a:is({}b{})", "(".repeat(40), ")".repeat(40));
    assert!(tokenize(&deep).any(|t| t.is_err()));
}

#[test]
fn test_stops_after_first_error() {
    let results: Vec<_> = tokenize("a [b").collect();
    assert!(results.last().unwrap().is_err());
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
}

#[test]
fn test_restartable() {
    let input = "ul.nav > li:nth-child(2n+1) a[href$='.pdf']";
    let first: Vec<_> = tokenize(input).collect();
    let second: Vec<_> = tokenize(input).collect();
    assert_eq!(first, second);
}
