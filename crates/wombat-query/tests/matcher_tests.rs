//! Tests for selector matching: combinators, backtracking, attributes,
//! positional pseudo-classes, scopes, and result ordering.

use wombat_dom::{DomTree, Fragment, NodeId};
use wombat_query::matcher::{self, compound_matches, filter_nodes, run};
use wombat_query::{
    Combinator, MatchContext, QueryConfig, QueryError, QuerySet, ResultOrder, compile,
    compile_with, select, select_within,
};

/// ```text
/// html
///   body
///     div#a.box
///       p#p1.x "one"
///       p#p2 "two"
///       span#s1
///         p#p3.x
///     div#b.box
///       ul#list
///         li#l1.item
///         li#l2.item.active
///         li#l3.item
///       a#link
/// ```
fn sample() -> DomTree {
    let p = |id: &str| Fragment::element("p").attr("id", id);
    let li = |id: &str, class: &str| Fragment::element("li").attr("id", id).attr("class", class);
    DomTree::from_fragments(&[Fragment::element("html").child(
        Fragment::element("body")
            .child(
                Fragment::element("div")
                    .attr("id", "a")
                    .attr("class", "box")
                    .child(p("p1").attr("class", "x").child(Fragment::text("one")))
                    .child(p("p2").child(Fragment::text("two")))
                    .child(
                        Fragment::element("span")
                            .attr("id", "s1")
                            .child(p("p3").attr("class", "x")),
                    ),
            )
            .child(
                Fragment::element("div")
                    .attr("id", "b")
                    .attr("class", "box")
                    .child(Fragment::element("ul").attr("id", "list").children([
                        li("l1", "item"),
                        li("l2", "item active"),
                        li("l3", "item"),
                    ]))
                    .child(
                        Fragment::element("a")
                            .attr("id", "link")
                            .attr("href", "https://example.com/doc.PDF")
                            .attr("lang", "en-US"),
                    ),
            ),
    )])
}

fn ids(tree: &DomTree, nodes: impl IntoIterator<Item = NodeId>) -> Vec<String> {
    nodes
        .into_iter()
        .map(|n| {
            tree.as_element(n)
                .and_then(|e| e.attr("id"))
                .unwrap_or("?")
                .to_string()
        })
        .collect()
}

fn select_ids(tree: &DomTree, selector: &str) -> Vec<String> {
    ids(tree, &select(tree, selector).unwrap())
}

fn by_id(tree: &DomTree, id: &str) -> NodeId {
    select(tree, format!("#{id}").as_str()).unwrap().get(0).unwrap()
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

#[test]
fn test_descendant_and_child() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "div p"), ["p1", "p2", "p3"]);
    assert_eq!(select_ids(&tree, "div > p"), ["p1", "p2"]);
    assert_eq!(select_ids(&tree, "body > * > ul > li.active"), ["l2"]);
}

#[test]
fn test_backtracking_past_nearest_ancestor() {
    let tree = sample();
    // p3's nearest ancestor is span (not a div child of body); the match
    // has to be found further up through div#a.
    assert_eq!(select_ids(&tree, "body > div p.x"), ["p1", "p3"]);
    // Only a node whose *parent* is a div qualifies as the middle compound.
    assert_eq!(select_ids(&tree, "div > * p"), ["p3"]);
    assert_eq!(select_ids(&tree, "div > span > p"), ["p3"]);
}

#[test]
fn test_sibling_combinators() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "p + p"), ["p2"]);
    assert_eq!(select_ids(&tree, "li + li"), ["l2", "l3"]);
    assert_eq!(select_ids(&tree, "#l1 ~ li"), ["l2", "l3"]);
    assert_eq!(select_ids(&tree, "p ~ span"), ["s1"]);
    assert_eq!(select_ids(&tree, "div + div"), ["b"]);
    assert!(select_ids(&tree, "#l3 ~ li").is_empty());
}

#[test]
fn test_sibling_combinators_skip_text_nodes() {
    let tree = DomTree::from_fragments(&[Fragment::element("div").children([
        Fragment::element("h1"),
        Fragment::text("\n  "),
        Fragment::comment("gap"),
        Fragment::element("p").attr("id", "after"),
    ])]);
    assert_eq!(select_ids(&tree, "h1 + p"), ["after"]);
}

#[test]
fn test_no_match_is_empty_not_error() {
    let tree = sample();
    assert!(select(&tree, "table td").unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[test]
fn test_attribute_operators() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "[href]"), ["link"]);
    assert_eq!(select_ids(&tree, "[class~=active]"), ["l2"]);
    assert_eq!(select_ids(&tree, "[lang|=en]"), ["link"]);
    assert_eq!(select_ids(&tree, "[lang|=en-US]"), ["link"]);
    assert!(select_ids(&tree, "[lang|=e]").is_empty());
    assert_eq!(select_ids(&tree, "[href^=https]"), ["link"]);
    assert_eq!(select_ids(&tree, "[href*='example.com']"), ["link"]);
    assert_eq!(select_ids(&tree, "li[id!=l1]"), ["l2", "l3"]);
    assert_eq!(select_ids(&tree, "li[title!=x]"), ["l1", "l2", "l3"]);
}

#[test]
fn test_attribute_empty_and_whitespace_values_never_match() {
    let tree = sample();
    assert!(select_ids(&tree, "[href^='']").is_empty());
    assert!(select_ids(&tree, "[href$='']").is_empty());
    assert!(select_ids(&tree, "[href*='']").is_empty());
    assert!(select_ids(&tree, "[class~='']").is_empty());
    assert!(select_ids(&tree, "[class~='item active']").is_empty());
}

#[test]
fn test_attribute_case_sensitivity() {
    let tree = sample();
    assert!(select_ids(&tree, "[href$='.pdf']").is_empty());
    assert_eq!(select_ids(&tree, "[href$='.pdf' i]"), ["link"]);

    let insensitive = QueryConfig::default().with_case_sensitive_attributes(false);
    let list = compile_with("[href$='.pdf']", &insensitive).unwrap();
    assert_eq!(ids(&tree, &select(&tree, list).unwrap()), ["link"]);

    let strict = compile_with("[href$='.pdf' s]", &insensitive).unwrap();
    assert!(select(&tree, strict).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Lists, ordering, and deduplication
// ---------------------------------------------------------------------------

#[test]
fn test_list_results_are_deduplicated_in_document_order() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "p, .x"), ["p1", "p2", "p3"]);
    assert_eq!(select_ids(&tree, ".item, #p1"), ["p1", "l1", "l2", "l3"]);
    assert_eq!(
        select_ids(&tree, "li.active, li, #list"),
        ["list", "l1", "l2", "l3"]
    );
}

#[test]
fn test_context_relative_order() {
    let tree = sample();
    let a = by_id(&tree, "a");
    let b = by_id(&tree, "b");
    let list = compile("p, li").unwrap();
    let contexts = [b, a];
    let cx = MatchContext::within(&tree, &contexts).with_order(ResultOrder::ContextRelative);
    assert_eq!(ids(&tree, run(&list, &cx).unwrap()), ["l1", "l2", "l3", "p1", "p2", "p3"]);

    let cx = MatchContext::within(&tree, &contexts);
    assert_eq!(ids(&tree, run(&list, &cx).unwrap()), ["p1", "p2", "p3", "l1", "l2", "l3"]);
}

#[test]
fn test_overlapping_contexts_yield_each_node_once() {
    let tree = sample();
    let contexts = [by_id(&tree, "a"), by_id(&tree, "s1"), NodeId::ROOT];
    let list = compile("p").unwrap();
    let found = run(&list, &MatchContext::within(&tree, &contexts)).unwrap();
    assert_eq!(ids(&tree, found), ["p1", "p2", "p3"]);
}

// ---------------------------------------------------------------------------
// Scopes and leading combinators
// ---------------------------------------------------------------------------

#[test]
fn test_context_is_not_its_own_descendant() {
    let tree = sample();
    let a = by_id(&tree, "a");
    let found = select_within(&tree, &[a], &compile("div").unwrap()).unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_whole_selector_is_scoped_to_the_context() {
    let tree = sample();
    let span = by_id(&tree, "s1");
    let outside = select_within(&tree, &[span], &compile("div p").unwrap()).unwrap();
    assert!(outside.is_empty());

    let a = by_id(&tree, "a");
    let inside = select_within(&tree, &[a], &compile("span p").unwrap()).unwrap();
    assert_eq!(ids(&tree, &inside), ["p3"]);
}

#[test]
fn test_leading_combinators_relative_to_context() {
    let tree = sample();
    let a = by_id(&tree, "a");
    let contexts = [a];
    let within = |text: &str| {
        ids(
            &tree,
            select_within(&tree, &contexts, &compile(text).unwrap()).unwrap(),
        )
    };
    assert_eq!(within("> p"), ["p1", "p2"]);
    assert_eq!(within("> span > p"), ["p3"]);
    assert_eq!(within("+ div"), ["b"]);
    assert_eq!(within("~ div li.active"), ["l2"]);
    assert!(within("+ p").is_empty());
}

#[test]
fn test_anywhere_scope_searches_whole_tree() {
    let tree = sample();
    let contexts = [by_id(&tree, "p3")];
    let list = compile("div p").unwrap();
    let found = run(&list, &MatchContext::anywhere(&tree, &contexts)).unwrap();
    assert_eq!(ids(&tree, found), ["p1", "p2", "p3"]);
}

#[test]
fn test_leading_combinator_rejected_without_context() {
    let tree = sample();
    let list = compile("> p").unwrap();
    let contexts = [NodeId::ROOT];
    assert_eq!(
        run(&list, &MatchContext::anywhere(&tree, &contexts)),
        Err(QueryError::UnsupportedCombinator {
            combinator: Combinator::Child
        })
    );
    let all = select(&tree, "p").unwrap();
    assert!(matches!(
        all.filter(&tree, "~ p"),
        Err(QueryError::UnsupportedCombinator { .. })
    ));
}

#[test]
fn test_detached_subtree() {
    let mut tree = sample();
    let detached = tree.instantiate(
        &Fragment::element("section")
            .attr("id", "loose")
            .child(Fragment::element("p").attr("id", "inner")),
    );
    let contexts = [detached];
    let found = select_within(&tree, &contexts, &compile("p").unwrap()).unwrap();
    assert_eq!(ids(&tree, &found), ["inner"]);
    // The document never sees it.
    assert_eq!(select_ids(&tree, "p").len(), 3);

    let anywhere = run(
        &compile("section > p").unwrap(),
        &MatchContext::anywhere(&tree, &contexts),
    )
    .unwrap();
    assert_eq!(ids(&tree, anywhere), ["inner"]);
}

// ---------------------------------------------------------------------------
// Positional pseudo-classes
// ---------------------------------------------------------------------------

#[test]
fn test_positional_indexing() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "li:eq(1)"), ["l2"]);
    assert_eq!(select_ids(&tree, "li:eq(-1)"), ["l3"]);
    assert!(select_ids(&tree, "li:eq(5)").is_empty());
    assert_eq!(select_ids(&tree, "li:first"), ["l1"]);
    assert_eq!(select_ids(&tree, "li:last"), ["l3"]);
    assert_eq!(select_ids(&tree, "li:gt(0)"), ["l2", "l3"]);
    assert_eq!(select_ids(&tree, "li:lt(-1)"), ["l1", "l2"]);
    assert_eq!(select_ids(&tree, "li:even"), ["l1", "l3"]);
    assert_eq!(select_ids(&tree, "li:odd"), ["l2"]);
}

#[test]
fn test_positional_out_of_range_bounds() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "li:gt(-10)"), ["l1", "l2", "l3"]);
    assert!(select_ids(&tree, "li:lt(-10)").is_empty());
    assert!(select_ids(&tree, "li:gt(2)").is_empty());
    assert_eq!(select_ids(&tree, "li:lt(99)"), ["l1", "l2", "l3"]);
}

#[test]
fn test_positional_counts_over_the_whole_result() {
    let tree = sample();
    // :first-child is per parent; :first is per result.
    assert_eq!(select_ids(&tree, "p:first-child"), ["p1", "p3"]);
    assert_eq!(select_ids(&tree, "p:first"), ["p1"]);
    assert_eq!(select_ids(&tree, "p:last"), ["p3"]);
}

#[test]
fn test_positional_in_middle_compound() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "div:eq(1) li"), ["l1", "l2", "l3"]);
    assert_eq!(select_ids(&tree, "div:first p"), ["p1", "p2", "p3"]);
    assert_eq!(select_ids(&tree, "div:last > *"), ["list", "link"]);
}

#[test]
fn test_positional_filters_apply_in_source_order() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "li:gt(0):first"), ["l2"]);
    assert_eq!(select_ids(&tree, "li:first:gt(0)"), Vec::<String>::new());
}

#[test]
fn test_positional_alternatives_are_independent() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "li:first, p:last"), ["p3", "l1"]);
}

#[test]
fn test_positional_with_multiple_contexts() {
    let tree = sample();
    let boxes = select(&tree, ".box").unwrap();
    let found = boxes.find(&tree, "*:last").unwrap();
    assert_eq!(ids(&tree, &found), ["link"]);
}

#[test]
fn test_filter_positional_uses_set_order() {
    let tree = sample();
    let items = select(&tree, "li").unwrap();
    assert_eq!(ids(&tree, &items.filter(&tree, ":eq(1)").unwrap()), ["l2"]);
    let reversed = items.reversed();
    assert_eq!(ids(&tree, &reversed.filter(&tree, ":first").unwrap()), ["l3"]);
}

// ---------------------------------------------------------------------------
// Direct matcher API
// ---------------------------------------------------------------------------

#[test]
fn test_matches_single_node() {
    let tree = sample();
    let p3 = by_id(&tree, "p3");
    assert!(matcher::matches(&compile("span > .x").unwrap(), &tree, p3).unwrap());
    assert!(!matcher::matches(&compile("div > .x").unwrap(), &tree, p3).unwrap());
}

#[test]
fn test_filter_nodes_keeps_given_order() {
    let tree = sample();
    let nodes = [by_id(&tree, "l3"), by_id(&tree, "p1"), by_id(&tree, "l1")];
    let kept = filter_nodes(&compile("li").unwrap(), &tree, &nodes).unwrap();
    assert_eq!(ids(&tree, kept), ["l3", "l1"]);
}

#[test]
fn test_compound_matches_only_elements() {
    let tree = sample();
    let list = compile("*").unwrap();
    let compound = &list.selectors[0].subject;
    assert!(!compound_matches(&tree, compound, NodeId::ROOT));
    let p1 = by_id(&tree, "p1");
    let text = tree.first_child(p1).unwrap();
    assert!(!compound_matches(&tree, compound, text));
    assert!(compound_matches(&tree, compound, p1));
}

#[test]
fn test_type_selectors_ignore_case() {
    let tree = sample();
    assert_eq!(select_ids(&tree, "LI.active"), ["l2"]);
    let set = QuerySet::root().find(&tree, "UL").unwrap();
    assert_eq!(ids(&tree, &set), ["list"]);
}
