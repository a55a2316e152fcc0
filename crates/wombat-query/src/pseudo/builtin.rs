//! Built-in pseudo-classes.
//!
//! Structural pseudo-classes per
//! [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos),
//! logical ones per [§ 4 Logical Combinations](https://www.w3.org/TR/selectors-4/#logical-combination),
//! and the positional filters jQuery adds on top.

use wombat_dom::NodeType;

use super::{ArgumentKind, FnPseudo, PseudoArg, PseudoContext, PseudoRegistry, SetPosition};

type Eval = fn(&PseudoContext<'_>, &PseudoArg) -> bool;

const NODE: &[(&str, ArgumentKind, Eval)] = &[
    ("root", ArgumentKind::None, root),
    ("first-child", ArgumentKind::None, first_child),
    ("last-child", ArgumentKind::None, last_child),
    ("only-child", ArgumentKind::None, only_child),
    ("first-of-type", ArgumentKind::None, first_of_type),
    ("last-of-type", ArgumentKind::None, last_of_type),
    ("only-of-type", ArgumentKind::None, only_of_type),
    ("nth-child", ArgumentKind::Formula, nth_child),
    ("nth-last-child", ArgumentKind::Formula, nth_last_child),
    ("nth-of-type", ArgumentKind::Formula, nth_of_type),
    ("nth-last-of-type", ArgumentKind::Formula, nth_last_of_type),
    ("empty", ArgumentKind::None, empty),
    ("parent", ArgumentKind::None, parent),
    ("contains", ArgumentKind::Text, contains),
    ("header", ArgumentKind::None, header),
    ("not", ArgumentKind::Selector, not),
    ("is", ArgumentKind::Selector, is),
    ("has", ArgumentKind::RelativeSelector, has),
    ("link", ArgumentKind::None, link),
    ("checked", ArgumentKind::None, checked),
    ("selected", ArgumentKind::None, selected),
    ("disabled", ArgumentKind::None, disabled),
    ("enabled", ArgumentKind::None, enabled),
];

const POSITIONAL: &[(&str, ArgumentKind, Eval)] = &[
    ("eq", ArgumentKind::Number, eq),
    ("gt", ArgumentKind::Number, gt),
    ("lt", ArgumentKind::Number, lt),
    ("first", ArgumentKind::None, first),
    ("last", ArgumentKind::None, last),
    ("even", ArgumentKind::None, even),
    ("odd", ArgumentKind::None, odd),
];

pub(super) fn register_all(registry: &mut PseudoRegistry) {
    for &(name, argument, eval) in NODE {
        let _ = registry.register(name, FnPseudo::node(argument, eval));
    }
    for &(name, argument, eval) in POSITIONAL {
        let _ = registry.register(name, FnPseudo::positional(argument, eval));
    }
}

// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
// "The :root pseudo-class represents an element that is the root of the document."
fn root(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some() && cx.tree().document_element() == Some(cx.node())
}

// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
fn first_child(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.siblings().is_some_and(|s| s.index == 1)
}

// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
fn last_child(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.siblings().is_some_and(|s| s.index == s.count)
}

// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
fn only_child(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.siblings().is_some_and(|s| s.count == 1)
}

// [§ 14.5.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
fn first_of_type(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.siblings().is_some_and(|s| s.type_index == 1)
}

// [§ 14.5.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
fn last_of_type(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.siblings().is_some_and(|s| s.type_index == s.type_count)
}

// [§ 14.5.3 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
fn only_of_type(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.siblings().is_some_and(|s| s.type_count == 1)
}

// [§ 14.4.4 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
fn nth_child(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    formula_at(arg, cx.siblings().map(|s| s.index))
}

// [§ 14.4.5 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
fn nth_last_child(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    formula_at(arg, cx.siblings().map(|s| s.count - s.index + 1))
}

// [§ 14.5.4 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
fn nth_of_type(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    formula_at(arg, cx.siblings().map(|s| s.type_index))
}

// [§ 14.5.5 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
fn nth_last_of_type(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    formula_at(arg, cx.siblings().map(|s| s.type_count - s.type_index + 1))
}

fn formula_at(arg: &PseudoArg, position: Option<usize>) -> bool {
    match (arg, position) {
        (PseudoArg::Formula(expr), Some(position)) => expr.matches(position),
        _ => false,
    }
}

// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
// "The :empty pseudo-class represents an element that has no children except,
// optionally, document white space characters."
fn empty(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    let tree = cx.tree();
    cx.element().is_some()
        && tree
            .children(cx.node())
            .iter()
            .all(|&c| match tree.get(c).map(|n| &n.node_type) {
                Some(NodeType::Text(t)) => t.trim().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            })
}

// jQuery's :parent, the inverse of :empty.
fn parent(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    cx.element().is_some() && !empty(cx, arg)
}

fn contains(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    match arg {
        PseudoArg::Text(needle) => cx.tree().text_content(cx.node()).contains(needle.as_str()),
        _ => false,
    }
}

fn header(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some_and(|e| {
        let tag = e.tag_name.as_bytes();
        tag.len() == 2 && tag[0].eq_ignore_ascii_case(&b'h') && (b'1'..=b'6').contains(&tag[1])
    })
}

// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
// "The negation pseudo-class, :not(), is a functional pseudo-class taking a
// selector list as an argument. It represents an element that is not
// represented by its argument."
fn not(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    match arg {
        PseudoArg::Selector(list) => cx.element().is_some() && !cx.matches(list),
        _ => false,
    }
}

// [§ 4.2 :is()](https://www.w3.org/TR/selectors-4/#matches)
fn is(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    match arg {
        PseudoArg::Selector(list) => cx.matches(list),
        _ => false,
    }
}

// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
// "The relational pseudo-class, :has(), is a functional pseudo-class taking a
// <relative-selector-list> as an argument."
fn has(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    match arg {
        PseudoArg::Selector(list) => cx.has_relative(list),
        _ => false,
    }
}

// [§ 8.1 :any-link / :link](https://www.w3.org/TR/selectors-4/#link)
fn link(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some_and(|e| {
        (e.tag_name.eq_ignore_ascii_case("a") || e.tag_name.eq_ignore_ascii_case("area"))
            && e.attrs.contains_key("href")
    })
}

// [§ 13.3.2 :checked](https://www.w3.org/TR/selectors-4/#checked)
fn checked(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some_and(|e| {
        e.attrs.contains_key("checked")
            || (e.tag_name.eq_ignore_ascii_case("option") && e.attrs.contains_key("selected"))
    })
}

fn selected(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some_and(|e| {
        e.tag_name.eq_ignore_ascii_case("option") && e.attrs.contains_key("selected")
    })
}

// [§ 13.1.1 :disabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
fn disabled(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some_and(|e| e.attrs.contains_key("disabled"))
}

fn enabled(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    cx.element().is_some_and(|e| !e.attrs.contains_key("disabled"))
}

/// Resolve a possibly negative index against the set length.
fn resolve(n: i64, len: usize) -> Option<usize> {
    if n >= 0 {
        usize::try_from(n).ok()
    } else {
        len.checked_sub(usize::try_from(n.unsigned_abs()).ok()?)
    }
}

fn with_position(cx: &PseudoContext<'_>, f: impl FnOnce(SetPosition) -> bool) -> bool {
    cx.position().is_some_and(f)
}

fn eq(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    with_position(cx, |p| match arg {
        PseudoArg::Number(n) => resolve(*n, p.len) == Some(p.index),
        _ => false,
    })
}

fn gt(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    with_position(cx, |p| match arg {
        // A negative bound before the start (`:gt(-10)` on 3 nodes) keeps everything.
        PseudoArg::Number(n) => resolve(*n, p.len).is_none_or(|bound| p.index > bound),
        _ => false,
    })
}

fn lt(cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
    with_position(cx, |p| match arg {
        PseudoArg::Number(n) => resolve(*n, p.len).is_some_and(|bound| p.index < bound),
        _ => false,
    })
}

fn first(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    with_position(cx, |p| p.index == 0)
}

fn last(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    with_position(cx, |p| p.index + 1 == p.len)
}

// jQuery counts from zero, so :even is the 1st, 3rd, 5th... node.
fn even(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    with_position(cx, |p| p.index % 2 == 0)
}

fn odd(cx: &PseudoContext<'_>, _: &PseudoArg) -> bool {
    with_position(cx, |p| p.index % 2 == 1)
}
