//! Selector matching.
//!
//! [§ 17 Calculating a selector's match](https://www.w3.org/TR/selectors-4/#match-a-complex-selector-against-an-element)
//!
//! Matching runs right-to-left: a candidate must satisfy the subject
//! compound, then some node related to it through the combinator must match
//! the rest of the chain. Every relation is explored (full backtracking) and
//! results are memoised per (compound, node), so a chain of `k` compounds over
//! `n` nodes costs at most `O(k * n)` compound evaluations plus the relation
//! walks.
//!
//! Positional pseudo-classes (`:eq`, `:first`, ...) break that purely local
//! view: they filter the document-ordered set of nodes matching the selector
//! up to and including their compound. Those sets are computed up front, left
//! to right, and later compounds chain from the survivors.

use std::collections::{HashMap, HashSet};

use wombat_dom::{DomTree, NodeId};

use crate::error::QueryError;
use crate::pseudo::{PseudoContext, SetPosition};
use crate::selector::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};

/// Where the leftmost compound of a selector may sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Related to a context node through the leading combinator (descendant
    /// when none is written).
    #[default]
    Within,
    /// Anywhere in the trees the context nodes belong to.
    Anywhere,
}

/// How a result is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrder {
    /// [§ 4.2 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    #[default]
    Document,
    /// Grouped by the first context node each result belongs to, in context
    /// order; document order within a group.
    ContextRelative,
}

/// The tree, the context nodes, and how a selector relates to them.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// The tree to search.
    pub tree: &'a DomTree,
    /// The "this" set an operation is relative to.
    pub contexts: &'a [NodeId],
    /// How the leftmost compound relates to the contexts.
    pub scope: Scope,
    /// Result ordering.
    pub order: ResultOrder,
}

const DOCUMENT: &[NodeId] = &[NodeId::ROOT];

impl<'a> MatchContext<'a> {
    /// Search the whole document.
    pub const fn document(tree: &'a DomTree) -> Self {
        Self::within(tree, DOCUMENT)
    }

    /// Search relative to `contexts`.
    pub const fn within(tree: &'a DomTree, contexts: &'a [NodeId]) -> Self {
        Self {
            tree,
            contexts,
            scope: Scope::Within,
            order: ResultOrder::Document,
        }
    }

    /// Search the trees of `contexts` without requiring any relation to them.
    pub const fn anywhere(tree: &'a DomTree, contexts: &'a [NodeId]) -> Self {
        Self {
            tree,
            contexts,
            scope: Scope::Anywhere,
            order: ResultOrder::Document,
        }
    }

    /// Builder: set the result ordering.
    #[must_use]
    pub const fn with_order(mut self, order: ResultOrder) -> Self {
        self.order = order;
        self
    }
}

/// Match `list` against the context, returning each matching node once.
///
/// # Errors
///
/// [`QueryError::UnsupportedCombinator`] when a selector starts with a
/// combinator under [`Scope::Anywhere`], where there is nothing for it to
/// relate to.
pub fn run(list: &SelectorList, cx: &MatchContext<'_>) -> Result<Vec<NodeId>, QueryError> {
    if cx.scope == Scope::Anywhere {
        reject_leading(list)?;
    }

    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    for selector in &list.selectors {
        let region = region(cx.tree, cx.contexts, cx.scope, selector.leading);
        let mut run = SelectorRun::new(cx.tree, selector, cx.scope, cx.contexts);
        for node in run.collect(&region, &region) {
            if seen.insert(node) {
                matched.push(node);
            }
        }
    }

    cx.tree.sort_document_order(&mut matched);
    if cx.order == ResultOrder::ContextRelative {
        group_by_context(cx.tree, cx.contexts, &mut matched);
    }
    Ok(matched)
}

/// Keep the members of `nodes` that match `list` themselves, in their given
/// order. Positional pseudo-classes on the subject index into `nodes`.
///
/// # Errors
///
/// [`QueryError::UnsupportedCombinator`] for a selector with a leading
/// combinator.
pub fn filter_nodes(
    list: &SelectorList,
    tree: &DomTree,
    nodes: &[NodeId],
) -> Result<Vec<NodeId>, QueryError> {
    reject_leading(list)?;
    let mut keep = HashSet::new();
    for selector in &list.selectors {
        let region = if selector.has_positional() {
            region(tree, nodes, Scope::Anywhere, None)
        } else {
            Vec::new()
        };
        let mut run = SelectorRun::new(tree, selector, Scope::Anywhere, &[]);
        keep.extend(run.collect(&region, nodes));
    }
    Ok(nodes.iter().copied().filter(|n| keep.contains(n)).collect())
}

/// Whether `node` itself matches `list`.
///
/// # Errors
///
/// As [`filter_nodes`].
pub fn matches(list: &SelectorList, tree: &DomTree, node: NodeId) -> Result<bool, QueryError> {
    filter_nodes(list, tree, &[node]).map(|kept| !kept.is_empty())
}

/// Infallible form of [`matches`] for selector arguments, which the parser
/// guarantees carry no leading combinator.
pub(crate) fn matches_node(tree: &DomTree, node: NodeId, list: &SelectorList) -> bool {
    filter_nodes(list, tree, &[node]).is_ok_and(|kept| !kept.is_empty())
}

/// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational): whether any
/// node matches the relative selector `list` anchored at `node`.
pub(crate) fn has_relative_match(tree: &DomTree, node: NodeId, list: &SelectorList) -> bool {
    let contexts = [node];
    run(list, &MatchContext::within(tree, &contexts)).is_ok_and(|found| !found.is_empty())
}

fn reject_leading(list: &SelectorList) -> Result<(), QueryError> {
    match list.selectors.iter().find_map(|s| s.leading) {
        Some(combinator) => Err(QueryError::UnsupportedCombinator { combinator }),
        None => Ok(()),
    }
}

/// Check if a compound selector matches an element, leaving positional
/// pseudo-classes to the caller.
///
/// [§ 4.2](https://www.w3.org/TR/selectors-4/#compound)
/// "A compound selector matches an element if the element matches all
/// the simple selectors in the compound selector."
pub fn compound_matches(tree: &DomTree, compound: &CompoundSelector, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    compound.simple_selectors.iter().all(|simple| match simple {
        SimpleSelector::PseudoClass(pseudo) => {
            pseudo.is_positional()
                || pseudo
                    .evaluator()
                    .matches(&PseudoContext::new(tree, node), &pseudo.argument)
        }
        other => other.matches(element),
    })
}

/// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
///
/// Find the immediately preceding element sibling (skipping text/comment nodes).
fn previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node).find(|&s| tree.is_element(s))
}

/// Document-ordered elements a selector's compounds can land on.
///
/// Descendants of the contexts; descendants of their parents when the
/// selector starts with a sibling combinator; whole trees (roots included)
/// under [`Scope::Anywhere`].
fn region(
    tree: &DomTree,
    contexts: &[NodeId],
    scope: Scope,
    leading: Option<Combinator>,
) -> Vec<NodeId> {
    let mut roots: Vec<NodeId> = match (scope, leading) {
        (Scope::Anywhere, _) => contexts.iter().map(|&c| tree.tree_root(c)).collect(),
        (Scope::Within, Some(Combinator::NextSibling | Combinator::SubsequentSibling)) => {
            contexts.iter().filter_map(|&c| tree.parent(c)).collect()
        }
        (Scope::Within, _) => contexts.to_vec(),
    };
    roots.retain(|&r| tree.contains(r));
    tree.sort_document_order(&mut roots);
    roots.dedup();

    let outermost: Vec<NodeId> = roots
        .iter()
        .copied()
        .filter(|&r| !roots.iter().any(|&other| tree.is_descendant_of(r, other)))
        .collect();

    let mut nodes = Vec::new();
    for root in outermost {
        if scope == Scope::Anywhere && tree.is_element(root) {
            nodes.push(root);
        }
        nodes.extend(tree.descendants(root).filter(|&n| tree.is_element(n)));
    }
    nodes
}

fn group_by_context(tree: &DomTree, contexts: &[NodeId], nodes: &mut [NodeId]) {
    let key = |node: NodeId| {
        contexts
            .iter()
            .position(|&c| tree.is_descendant_of(node, c))
            .or_else(|| {
                contexts.iter().position(|&c| {
                    tree.parent(c)
                        .is_some_and(|p| tree.is_descendant_of(node, p))
                })
            })
            .unwrap_or(usize::MAX)
    };
    nodes.sort_by_key(|&n| key(n));
}

/// Matching state for one complex selector.
struct SelectorRun<'a> {
    tree: &'a DomTree,
    /// Compounds left to right, with the combinator joining each to its left
    steps: Vec<(Option<Combinator>, &'a CompoundSelector)>,
    leading: Combinator,
    scope: Scope,
    contexts: HashSet<NodeId>,
    memo: HashMap<(usize, NodeId), bool>,
    /// Survivors of positional filtering, per step
    anchors: HashMap<usize, HashSet<NodeId>>,
}

impl<'a> SelectorRun<'a> {
    fn new(
        tree: &'a DomTree,
        selector: &'a ComplexSelector,
        scope: Scope,
        contexts: &[NodeId],
    ) -> Self {
        Self {
            tree,
            steps: selector.left_to_right(),
            leading: selector.leading.unwrap_or(Combinator::Descendant),
            scope,
            contexts: contexts.iter().copied().collect(),
            memo: HashMap::new(),
            anchors: HashMap::new(),
        }
    }

    /// The members of `candidates` matching the whole selector. `region` is
    /// where positional pseudo-classes of non-subject compounds collect their
    /// sets.
    fn collect(&mut self, region: &[NodeId], candidates: &[NodeId]) -> Vec<NodeId> {
        let subject = self.steps.len().saturating_sub(1);
        for index in 0..subject {
            if self.steps[index].1.has_positional() {
                let survivors = self.filter_step(index, region);
                let _ = self.anchors.insert(index, survivors.into_iter().collect());
            }
        }
        self.filter_step(subject, candidates)
    }

    /// Members of `nodes` matching the chain up to `index`, then narrowed by
    /// the positional pseudo-classes of that compound in source order.
    fn filter_step(&mut self, index: usize, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut survivors = Vec::new();
        for &node in nodes {
            if self.matches_prefix(index, node) {
                survivors.push(node);
            }
        }

        let Some(&(_, compound)) = self.steps.get(index) else {
            return survivors;
        };
        for pseudo in compound.positional() {
            let len = survivors.len();
            survivors = survivors
                .into_iter()
                .enumerate()
                .filter(|&(position, node)| {
                    let at = SetPosition {
                        index: position,
                        len,
                    };
                    let cx = PseudoContext::at_position(self.tree, node, at);
                    pseudo.evaluator().matches(&cx, &pseudo.argument)
                })
                .map(|(_, node)| node)
                .collect();
        }
        survivors
    }

    /// Memoised: does `node` match the chain up to `index`, landing step
    /// `index` on `node`?
    fn matches_at(&mut self, index: usize, node: NodeId) -> bool {
        if let Some(anchor) = self.anchors.get(&index) {
            return anchor.contains(&node);
        }
        if let Some(&known) = self.memo.get(&(index, node)) {
            return known;
        }
        let result = self.matches_prefix(index, node);
        let _ = self.memo.insert((index, node), result);
        result
    }

    /// Unmemoised form of [`Self::matches_at`] that skips the positional
    /// pseudo-classes of step `index`.
    fn matches_prefix(&mut self, index: usize, node: NodeId) -> bool {
        let Some(&(incoming, compound)) = self.steps.get(index) else {
            return false;
        };
        let result = compound_matches(self.tree, compound, node)
            && match incoming {
                None => self.anchored(node),
                Some(combinator) => self
                    .related(combinator, node)
                    .into_iter()
                    .any(|candidate| self.matches_at(index - 1, candidate)),
            };

        #[cfg(feature = "match-trace")]
        eprintln!("[MATCH] step {index} {node:?} -> {result}");

        result
    }

    /// Nodes that can stand on the left of `combinator` when `node` is on its
    /// right.
    fn related(&self, combinator: Combinator, node: NodeId) -> Vec<NodeId> {
        let tree = self.tree;
        match combinator {
            // [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
            Combinator::Descendant => tree.ancestors(node).filter(|&a| tree.is_element(a)).collect(),
            // [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
            Combinator::Child => tree
                .parent(node)
                .filter(|&p| tree.is_element(p))
                .into_iter()
                .collect(),
            // [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
            Combinator::NextSibling => previous_element_sibling(tree, node).into_iter().collect(),
            // [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
            Combinator::SubsequentSibling => tree
                .preceding_siblings(node)
                .filter(|&s| tree.is_element(s))
                .collect(),
        }
    }

    /// Whether the leftmost compound, landed on `node`, sits where the scope
    /// requires.
    fn anchored(&self, node: NodeId) -> bool {
        if self.scope == Scope::Anywhere {
            return true;
        }
        let tree = self.tree;
        let is_context = |n: NodeId| self.contexts.contains(&n);
        match self.leading {
            Combinator::Descendant => tree.ancestors(node).any(is_context),
            Combinator::Child => tree.parent(node).is_some_and(is_context),
            Combinator::NextSibling => previous_element_sibling(tree, node).is_some_and(is_context),
            Combinator::SubsequentSibling => tree.preceding_siblings(node).any(is_context),
        }
    }
}
