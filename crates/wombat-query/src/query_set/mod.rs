//! Query Sets: ordered, duplicate-free node collections with chainable
//! operations, in the manner of jQuery's wrapped sets.
//!
//! A [`QuerySet`] is a plain value. Reading operations take `&DomTree` and
//! return a new set; mutations live in [`mutation`] and take `&mut DomTree`.

use core::ops::{Bound, RangeBounds};
use std::collections::HashSet;
use std::sync::Arc;

use wombat_dom::{DomTree, NodeId};

use crate::cache::compile_cached;
use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::matcher::{self, MatchContext, ResultOrder};
use crate::selector::SelectorList;

pub mod mutation;

pub use mutation::Content;

/// Anything a selector-taking operation accepts: selector text (compiled
/// through the cache under the default configuration) or a compiled list.
pub trait IntoSelectorList {
    /// Produce the compiled list.
    ///
    /// # Errors
    ///
    /// Compilation errors for selector text.
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError>;
}

impl IntoSelectorList for &str {
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError> {
        compile_cached(self, &QueryConfig::default())
    }
}

impl IntoSelectorList for &String {
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError> {
        self.as_str().into_selector_list()
    }
}

impl IntoSelectorList for SelectorList {
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError> {
        Ok(Arc::new(self))
    }
}

impl IntoSelectorList for &SelectorList {
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError> {
        Ok(Arc::new(self.clone()))
    }
}

impl IntoSelectorList for Arc<SelectorList> {
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError> {
        Ok(self)
    }
}

impl IntoSelectorList for &Arc<SelectorList> {
    fn into_selector_list(self) -> Result<Arc<SelectorList>, QueryError> {
        Ok(Arc::clone(self))
    }
}

/// An ordered, duplicate-free list of nodes of one tree.
///
/// Sets produced by matching or traversal are in document order; [`filter`]
/// and the sub-selection operations keep whatever order their input had.
///
/// [`filter`]: QuerySet::filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    nodes: Vec<NodeId>,
}

impl QuerySet {
    /// The empty set.
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// The set holding just the document node, the usual starting point for
    /// [`find`](Self::find).
    pub fn root() -> Self {
        Self {
            nodes: vec![NodeId::ROOT],
        }
    }

    /// A set of the given nodes: unknown ids dropped, duplicates removed,
    /// sorted into document order.
    pub fn from_nodes(tree: &DomTree, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut nodes: Vec<NodeId> = nodes.into_iter().filter(|&n| tree.contains(n)).collect();
        tree.sort_document_order(&mut nodes);
        nodes.dedup();
        Self { nodes }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index`.
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Iterate over the nodes in set order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// The nodes as a slice.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Whether `node` is a member.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Consume the set, returning its nodes.
    pub fn into_vec(self) -> Vec<NodeId> {
        self.nodes
    }

    // ----- matching -----

    /// Descendants of the members matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Selector compilation errors, returned before the tree is read.
    pub fn find(&self, tree: &DomTree, selector: impl IntoSelectorList) -> Result<Self, QueryError> {
        self.find_ordered(tree, selector, ResultOrder::Document)
    }

    /// [`find`](Self::find) with an explicit result ordering.
    ///
    /// # Errors
    ///
    /// Selector compilation errors.
    pub fn find_ordered(
        &self,
        tree: &DomTree,
        selector: impl IntoSelectorList,
        order: ResultOrder,
    ) -> Result<Self, QueryError> {
        let list = selector.into_selector_list()?;
        let cx = MatchContext::within(tree, &self.nodes).with_order(order);
        Ok(Self {
            nodes: matcher::run(&list, &cx)?,
        })
    }

    /// Members that match `selector` themselves, in set order.
    ///
    /// # Errors
    ///
    /// Selector compilation errors, or a leading combinator.
    pub fn filter(&self, tree: &DomTree, selector: impl IntoSelectorList) -> Result<Self, QueryError> {
        let list = selector.into_selector_list()?;
        Ok(Self {
            nodes: matcher::filter_nodes(&list, tree, &self.nodes)?,
        })
    }

    /// Members for which `predicate` holds, in set order.
    #[must_use]
    pub fn filter_by(&self, tree: &DomTree, mut predicate: impl FnMut(&DomTree, NodeId) -> bool) -> Self {
        Self {
            nodes: self.iter().filter(|&n| predicate(tree, n)).collect(),
        }
    }

    /// Members that do not match `selector`.
    ///
    /// # Errors
    ///
    /// As [`filter`](Self::filter).
    pub fn not(&self, tree: &DomTree, selector: impl IntoSelectorList) -> Result<Self, QueryError> {
        let kept: HashSet<NodeId> = self.filter(tree, selector)?.into_vec().into_iter().collect();
        Ok(Self {
            nodes: self.iter().filter(|n| !kept.contains(n)).collect(),
        })
    }

    /// Whether any member matches `selector`.
    ///
    /// # Errors
    ///
    /// As [`filter`](Self::filter).
    pub fn is(&self, tree: &DomTree, selector: impl IntoSelectorList) -> Result<bool, QueryError> {
        Ok(!self.filter(tree, selector)?.is_empty())
    }

    /// Members with at least one descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Selector compilation errors.
    pub fn has(&self, tree: &DomTree, selector: impl IntoSelectorList) -> Result<Self, QueryError> {
        let list = selector.into_selector_list()?;
        let mut nodes = Vec::new();
        for node in self.iter() {
            let contexts = [node];
            if !matcher::run(&list, &MatchContext::within(tree, &contexts))?.is_empty() {
                nodes.push(node);
            }
        }
        Ok(Self { nodes })
    }

    // ----- sub-selection -----

    /// The member at `index`; negative indices count from the end.
    #[must_use]
    pub fn eq(&self, index: isize) -> Self {
        let resolved = if index < 0 {
            self.len().checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs())
        };
        Self {
            nodes: resolved.and_then(|i| self.get(i)).into_iter().collect(),
        }
    }

    /// The first member.
    #[must_use]
    pub fn first(&self) -> Self {
        self.eq(0)
    }

    /// The last member.
    #[must_use]
    pub fn last(&self) -> Self {
        self.eq(-1)
    }

    /// Members whose index falls in `range`, clamped to the set.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);
        Self {
            nodes: self.nodes[start..end].to_vec(),
        }
    }

    /// The members in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            nodes: self.nodes.iter().rev().copied().collect(),
        }
    }

    /// Union with `other`, in document order.
    #[must_use]
    pub fn add(&self, tree: &DomTree, other: &Self) -> Self {
        Self::from_nodes(tree, self.iter().chain(other.iter()))
    }

    // ----- traversal -----

    /// Element children of every member.
    #[must_use]
    pub fn children(&self, tree: &DomTree) -> Self {
        Self::from_nodes(tree, self.iter().flat_map(|n| tree.element_children(n)))
    }

    /// All child nodes of every member, text and comments included.
    #[must_use]
    pub fn contents(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter().flat_map(|n| tree.children(n).iter().copied()),
        )
    }

    /// The element parent of every member.
    #[must_use]
    pub fn parent(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .filter_map(|n| tree.parent(n))
                .filter(|&p| tree.is_element(p)),
        )
    }

    /// Every element ancestor of every member.
    #[must_use]
    pub fn parents(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .flat_map(|n| tree.ancestors(n))
                .filter(|&a| tree.is_element(a)),
        )
    }

    /// For each member, the nearest element among itself and its ancestors
    /// matching `selector`.
    ///
    /// # Errors
    ///
    /// As [`filter`](Self::filter).
    pub fn closest(&self, tree: &DomTree, selector: impl IntoSelectorList) -> Result<Self, QueryError> {
        let list = selector.into_selector_list()?;
        let mut found = Vec::new();
        for node in self.iter() {
            for candidate in core::iter::once(node).chain(tree.ancestors(node)) {
                if matcher::matches(&list, tree, candidate)? {
                    found.push(candidate);
                    break;
                }
            }
        }
        Ok(Self::from_nodes(tree, found))
    }

    /// Element siblings of every member, the members themselves excluded.
    #[must_use]
    pub fn siblings(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .flat_map(|n| {
                    tree.preceding_siblings(n)
                        .chain(tree.following_siblings(n))
                })
                .filter(|&s| tree.is_element(s) && !self.contains(s)),
        )
    }

    /// The next element sibling of every member.
    #[must_use]
    pub fn next(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .filter_map(|n| tree.following_siblings(n).find(|&s| tree.is_element(s))),
        )
    }

    /// The previous element sibling of every member.
    #[must_use]
    pub fn prev(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .filter_map(|n| tree.preceding_siblings(n).find(|&s| tree.is_element(s))),
        )
    }

    /// All following element siblings of every member.
    #[must_use]
    pub fn next_all(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .flat_map(|n| tree.following_siblings(n))
                .filter(|&s| tree.is_element(s)),
        )
    }

    /// All preceding element siblings of every member.
    #[must_use]
    pub fn prev_all(&self, tree: &DomTree) -> Self {
        Self::from_nodes(
            tree,
            self.iter()
                .flat_map(|n| tree.preceding_siblings(n))
                .filter(|&s| tree.is_element(s)),
        )
    }

    // ----- reads -----

    /// Value of attribute `name` on the first member.
    pub fn attr<'t>(&self, tree: &'t DomTree, name: &str) -> Option<&'t str> {
        self.get(0)
            .and_then(|n| tree.as_element(n))
            .and_then(|e| e.attr(name))
    }

    /// Concatenated text content of every member.
    pub fn text(&self, tree: &DomTree) -> String {
        self.iter().map(|n| tree.text_content(n)).collect()
    }

    /// Tag names of the element members, in set order.
    pub fn tag_names<'t>(&self, tree: &'t DomTree) -> Vec<&'t str> {
        self.iter()
            .filter_map(|n| tree.as_element(n))
            .map(|e| e.tag_name.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a QuerySet {
    type Item = NodeId;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl IntoIterator for QuerySet {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
