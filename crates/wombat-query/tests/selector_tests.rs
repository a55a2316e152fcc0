//! Tests for selector compilation: structure, pseudo-class resolution, and
//! error reporting.

use wombat_common::warning::recorded_warnings;
use wombat_query::{
    AttrOperator, AttributeSelector, Combinator, CompoundSelector, NthExpr, PseudoArg,
    PseudoRegistry, QueryConfig, QueryError, SimpleSelector, UnknownPseudoClassPolicy, compile,
    compile_with, compile_with_registry,
};

fn compound(simple: &[SimpleSelector]) -> CompoundSelector {
    CompoundSelector {
        simple_selectors: simple.to_vec(),
    }
}

fn ty(name: &str) -> SimpleSelector {
    SimpleSelector::Type(name.to_string())
}

fn syntax_offset(result: Result<wombat_query::SelectorList, QueryError>) -> usize {
    match result {
        Err(QueryError::Syntax { offset, .. }) => offset,
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

fn syntax_reason(text: &str) -> String {
    match compile(text) {
        Err(QueryError::Syntax { reason, .. }) => reason,
        other => panic!("expected a syntax error for {text:?}, got {other:?}"),
    }
}

fn only_pseudo_arg(text: &str) -> PseudoArg {
    let list = compile(text).unwrap();
    list.selectors[0]
        .subject
        .simple_selectors
        .iter()
        .find_map(|s| match s {
            SimpleSelector::PseudoClass(p) => Some(p.argument.clone()),
            _ => None,
        })
        .unwrap()
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[test]
fn test_compound_structure() {
    let list = compile("div#main.a.b").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(
        list.selectors[0].subject.simple_selectors,
        [
            ty("div"),
            SimpleSelector::Id("main".to_string()),
            SimpleSelector::Class("a".to_string()),
            SimpleSelector::Class("b".to_string()),
        ]
    );
    assert!(list.selectors[0].is_simple());
}

#[test]
fn test_combinator_chain_is_stored_right_to_left() {
    let list = compile("div > ul li + a").unwrap();
    let selector = &list.selectors[0];
    assert_eq!(selector.subject, compound(&[ty("a")]));
    assert_eq!(
        selector.combinators,
        [
            (Combinator::NextSibling, compound(&[ty("li")])),
            (Combinator::Descendant, compound(&[ty("ul")])),
            (Combinator::Child, compound(&[ty("div")])),
        ]
    );
    assert_eq!(selector.leading, None);

    let steps: Vec<_> = selector.left_to_right().into_iter().map(|(c, _)| c).collect();
    assert_eq!(
        steps,
        [
            None,
            Some(Combinator::Child),
            Some(Combinator::Descendant),
            Some(Combinator::NextSibling)
        ]
    );
}

#[test]
fn test_selector_list_alternatives() {
    let list = compile("h1, h2 ,h3").unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list.selectors[2].subject, compound(&[ty("h3")]));
    assert_eq!(list.to_string(), "h1, h2 ,h3");
}

#[test]
fn test_leading_combinator_at_top_level() {
    let list = compile("> li, ~ p").unwrap();
    assert_eq!(list.selectors[0].leading, Some(Combinator::Child));
    assert_eq!(list.selectors[1].leading, Some(Combinator::SubsequentSibling));
}

#[test]
fn test_universal_selector() {
    let list = compile("* > *.x").unwrap();
    assert_eq!(
        list.selectors[0].subject,
        compound(&[
            SimpleSelector::Universal,
            SimpleSelector::Class("x".to_string())
        ])
    );
}

#[test]
fn test_attribute_selector_structure() {
    let list = compile(r#"[lang|="en"][href][type=text i]"#).unwrap();
    let simple = &list.selectors[0].subject.simple_selectors;
    assert_eq!(
        simple[0],
        SimpleSelector::Attribute(AttributeSelector {
            name: "lang".to_string(),
            operator: AttrOperator::DashMatch,
            value: "en".to_string(),
            case_sensitive: true,
        })
    );
    assert!(matches!(
        &simple[1],
        SimpleSelector::Attribute(a) if a.operator == AttrOperator::Exists
    ));
    assert!(matches!(
        &simple[2],
        SimpleSelector::Attribute(a) if !a.case_sensitive && a.value == "text"
    ));
}

#[test]
fn test_attribute_case_config_and_override() {
    let config = QueryConfig::default().with_case_sensitive_attributes(false);
    let list = compile_with("[a=b][c=d s]", &config).unwrap();
    let simple = &list.selectors[0].subject.simple_selectors;
    assert!(matches!(&simple[0], SimpleSelector::Attribute(a) if !a.case_sensitive));
    assert!(matches!(&simple[1], SimpleSelector::Attribute(a) if a.case_sensitive));
}

// ---------------------------------------------------------------------------
// Pseudo-class arguments
// ---------------------------------------------------------------------------

#[test]
fn test_formula_arguments() {
    assert_eq!(
        only_pseudo_arg("li:nth-child(2n+1)"),
        PseudoArg::Formula(NthExpr { a: 2, b: 1 })
    );
    assert_eq!(
        only_pseudo_arg("li:nth-child( 2n + 1 )"),
        PseudoArg::Formula(NthExpr { a: 2, b: 1 })
    );
    assert_eq!(
        only_pseudo_arg("li:nth-of-type(even)"),
        PseudoArg::Formula(NthExpr::EVEN)
    );
    assert_eq!(
        only_pseudo_arg("li:nth-last-child(-n+3)"),
        PseudoArg::Formula(NthExpr { a: -1, b: 3 })
    );
    assert_eq!(
        only_pseudo_arg("li:nth-child(5)"),
        PseudoArg::Formula(NthExpr { a: 0, b: 5 })
    );
}

#[test]
fn test_nth_expression_positions() {
    let first_three = NthExpr::parse("-n+3").unwrap();
    assert!([1, 2, 3].iter().all(|&p| first_three.matches(p)));
    assert!(!first_three.matches(4));

    let odd = NthExpr::parse("ODD").unwrap();
    assert!(odd.matches(1) && odd.matches(3) && !odd.matches(2));

    assert!(NthExpr::parse("2n1").is_none());
    assert!(NthExpr::parse("n+").is_none());
    assert!(NthExpr::parse("2n+-1").is_none());
    assert!(NthExpr::parse("3000000000n").is_none());
}

#[test]
fn test_number_and_text_arguments() {
    assert_eq!(only_pseudo_arg("li:eq(-1)"), PseudoArg::Number(-1));
    assert_eq!(only_pseudo_arg("li:gt( 2 )"), PseudoArg::Number(2));
    assert_eq!(
        only_pseudo_arg("p:contains(hello)"),
        PseudoArg::Text("hello".to_string())
    );
    assert_eq!(
        only_pseudo_arg(r#"p:contains("a, b")"#),
        PseudoArg::Text("a, b".to_string())
    );
}

#[test]
fn test_selector_arguments_compile_nested_lists() {
    let PseudoArg::Selector(inner) = only_pseudo_arg("li:not(.a, .b > c)") else {
        panic!("expected a selector argument");
    };
    assert_eq!(inner.len(), 2);
    assert_eq!(inner.selectors[1].combinators.len(), 1);
}

#[test]
fn test_has_accepts_relative_selectors() {
    let PseudoArg::Selector(inner) = only_pseudo_arg("ul:has(> li, + p)") else {
        panic!("expected a selector argument");
    };
    assert_eq!(inner.selectors[0].leading, Some(Combinator::Child));
    assert_eq!(inner.selectors[1].leading, Some(Combinator::NextSibling));
}

#[test]
fn test_pseudo_names_are_case_insensitive() {
    let list = compile("LI:First-Child").unwrap();
    assert!(matches!(
        &list.selectors[0].subject.simple_selectors[1],
        SimpleSelector::PseudoClass(p) if p.name == "first-child"
    ));
}

#[test]
fn test_positional_detection() {
    assert!(compile("li:eq(0)").unwrap().has_positional());
    assert!(compile("ul:first li").unwrap().has_positional());
    assert!(!compile("li:first-child").unwrap().has_positional());
}

// ---------------------------------------------------------------------------
// Unknown pseudo-classes
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_pseudo_class_fails_by_default() {
    assert_eq!(
        compile("a, b:frobnicate"),
        Err(QueryError::UnknownPseudoClass {
            name: "frobnicate".to_string(),
            offset: 4,
        })
    );
}

#[test]
fn test_pseudo_element_is_an_unknown_pseudo_class() {
    assert_eq!(
        compile("p::before"),
        Err(QueryError::UnknownPseudoClass {
            name: ":before".to_string(),
            offset: 1,
        })
    );
}

#[test]
fn test_unknown_pseudo_class_ignored_with_warning() {
    let config =
        QueryConfig::default().with_unknown_pseudo_class(UnknownPseudoClassPolicy::Ignore);
    let list = compile_with("a:wibble-wobble, b", &config).unwrap();
    assert_eq!(list.len(), 2);
    assert!(
        list.selectors[0]
            .subject
            .simple_selectors
            .contains(&SimpleSelector::NeverMatch)
    );
    assert!(
        recorded_warnings()
            .contains(&"[Selector] unknown pseudo-class ':wibble-wobble' never matches".to_string())
    );
}

#[test]
fn test_custom_registry_scopes_names() {
    let config = QueryConfig::default();
    let empty = PseudoRegistry::empty();
    assert!(matches!(
        compile_with_registry("li:first-child", &config, &empty),
        Err(QueryError::UnknownPseudoClass { .. })
    ));
    let builtins = PseudoRegistry::with_builtins();
    assert!(builtins.contains("NTH-CHILD"));
    assert!(compile_with_registry("li:first-child", &config, &builtins).is_ok());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_empty_selectors() {
    assert_eq!(syntax_offset(compile("")), 0);
    assert_eq!(syntax_offset(compile("   ")), 3);
    assert_eq!(syntax_offset(compile("a,")), 2);
    assert_eq!(syntax_offset(compile("a,,b")), 2);
    assert_eq!(syntax_reason("a, "), "empty selector");
}

#[test]
fn test_dangling_combinator() {
    assert_eq!(syntax_reason("a >"), "expected a selector after combinator");
    assert_eq!(syntax_reason(">"), "expected a selector after combinator");
    assert_eq!(syntax_offset(compile("a > > b")), 4);
}

#[test]
fn test_attribute_errors() {
    assert_eq!(syntax_offset(compile("[href=]")), 6);
    assert_eq!(syntax_offset(compile("[a=b x]")), 5);
    assert!(syntax_reason("[a=b x]").contains("unknown attribute flag"));
}

#[test]
fn test_argument_errors() {
    assert_eq!(syntax_reason("li:eq"), ":eq() requires an argument");
    assert_eq!(syntax_reason("li:first(1)"), ":first does not take an argument");
    assert!(syntax_reason("li:eq(x)").starts_with("expected an integer"));
    assert!(syntax_reason("li:eq(2000000000)").starts_with("expected an integer"));
    assert!(syntax_reason("li:nth-child(2n1)").starts_with("invalid An+B expression"));
    assert_eq!(syntax_offset(compile("li:nth-child(foo)")), 13);
}

#[test]
fn test_nested_errors_report_absolute_offsets() {
    assert_eq!(syntax_offset(compile("li:not(a >)")), 10);
    assert_eq!(syntax_offset(compile("li:not([x=])")), 10);
}

#[test]
fn test_leading_combinator_only_allowed_in_has() {
    assert_eq!(syntax_offset(compile("a:not(> b)")), 6);
    assert!(compile("a:is(~ b)").is_err());
    assert!(compile("a:has(~ b)").is_ok());
}

#[test]
fn test_positional_pseudo_class_rejected_in_arguments() {
    let reason = syntax_reason("li:not(:first)");
    assert!(reason.contains("positional"), "{reason}");
    assert!(compile("div:has(li:eq(0))").is_err());
}

#[test]
fn test_nesting_depth_limit() {
    let shallow = QueryConfig::default().with_max_nesting_depth(1);
    assert!(compile_with("a:not(b)", &shallow).is_ok());
    assert!(matches!(
        compile_with("a:not(:not(b))", &shallow),
        Err(QueryError::Syntax { .. })
    ));
    let deeper = QueryConfig::default().with_max_nesting_depth(2);
    assert!(compile_with("a:not(:not(b))", &deeper).is_ok());
}

#[test]
fn test_error_aborts_whole_list() {
    assert!(compile("a, b, c[").is_err());
}

#[test]
fn test_error_offset_accessor() {
    assert_eq!(compile("a > > b").unwrap_err().offset(), Some(4));
    assert_eq!(compile("p:nope").unwrap_err().offset(), Some(1));
    let dom = QueryError::Dom(wombat_dom::DomError::NoParent(wombat_dom::NodeId(3)));
    assert_eq!(dom.offset(), None);
}

#[test]
fn test_config_from_json_fills_defaults() {
    let config: QueryConfig = serde_json::from_str(r#"{ "unknown_pseudo_class": "ignore" }"#).unwrap();
    assert_eq!(config.unknown_pseudo_class, UnknownPseudoClassPolicy::Ignore);
    assert!(config.case_sensitive_attributes);
    assert_eq!(config.max_nesting_depth, QueryConfig::DEFAULT_MAX_NESTING_DEPTH);
    assert_eq!(
        "fail".parse::<UnknownPseudoClassPolicy>().unwrap(),
        UnknownPseudoClassPolicy::Fail
    );
    assert_eq!(UnknownPseudoClassPolicy::Ignore.to_string(), "ignore");
}
