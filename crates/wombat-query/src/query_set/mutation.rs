//! Tree-mutating Query Set operations.
//!
//! Insertion follows jQuery's fan-out rule: when existing nodes are inserted
//! relative to several targets, the first target receives the nodes
//! themselves and every other target receives a deep clone. Fragments are
//! instantiated afresh for every target.

use wombat_dom::{DomError, DomTree, Fragment, NodeId};

use super::QuerySet;
use crate::error::QueryError;

/// Something to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// One existing node (attached or not).
    Node(NodeId),
    /// Several existing nodes, inserted in this order.
    Nodes(Vec<NodeId>),
    /// Markup to instantiate.
    Fragment(Fragment),
    /// Several pieces of markup to instantiate, in this order.
    Fragments(Vec<Fragment>),
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<NodeId>> for Content {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

impl From<&QuerySet> for Content {
    fn from(set: &QuerySet) -> Self {
        Self::Nodes(set.nodes.clone())
    }
}

impl From<Fragment> for Content {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

impl From<Vec<Fragment>> for Content {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self::Fragments(fragments)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Fragment(Fragment::text(text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Append,
    Prepend,
    Before,
    After,
}

impl QuerySet {
    /// [§ 4.2.3 append](https://dom.spec.whatwg.org/#concept-node-append)
    /// Insert `content` as the last children of every member.
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] (wrapped) when an existing node would
    /// be inserted into itself or its own descendant, or when a target
    /// cannot hold children. Every target is checked before anything moves.
    pub fn append(&self, tree: &mut DomTree, content: impl Into<Content>) -> Result<Self, QueryError> {
        self.insert(tree, content.into(), Placement::Append)
    }

    /// Insert `content` as the first children of every member.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub fn prepend(&self, tree: &mut DomTree, content: impl Into<Content>) -> Result<Self, QueryError> {
        self.insert(tree, content.into(), Placement::Prepend)
    }

    /// Insert `content` as the previous siblings of every member. Members
    /// without a parent are skipped.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub fn before(&self, tree: &mut DomTree, content: impl Into<Content>) -> Result<Self, QueryError> {
        self.insert(tree, content.into(), Placement::Before)
    }

    /// Insert `content` as the next siblings of every member. Members
    /// without a parent are skipped.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub fn after(&self, tree: &mut DomTree, content: impl Into<Content>) -> Result<Self, QueryError> {
        self.insert(tree, content.into(), Placement::After)
    }

    fn insert(&self, tree: &mut DomTree, content: Content, placement: Placement) -> Result<Self, QueryError> {
        let originals = match &content {
            Content::Node(node) => vec![*node],
            Content::Nodes(nodes) => nodes.clone(),
            Content::Fragment(_) | Content::Fragments(_) => Vec::new(),
        };
        let targets: Vec<NodeId> = self
            .iter()
            .filter(|&t| insertion_parent(tree, t, placement).is_some())
            .collect();
        // Only the first target receives the originals; every target must
        // be able to hold the content.
        for (i, &target) in targets.iter().enumerate() {
            let nodes: &[NodeId] = if i == 0 { &originals } else { &[] };
            validate(tree, target, nodes, placement)?;
        }

        for (i, &target) in targets.iter().enumerate() {
            let items = match &content {
                Content::Node(_) | Content::Nodes(_) if i == 0 => originals.clone(),
                Content::Node(_) | Content::Nodes(_) => originals
                    .iter()
                    .map(|&n| tree.deep_clone(n))
                    .collect::<Result<Vec<_>, _>>()?,
                Content::Fragment(fragment) => vec![tree.instantiate(fragment)],
                Content::Fragments(fragments) => {
                    fragments.iter().map(|f| tree.instantiate(f)).collect()
                }
            };
            place(tree, target, &items, placement)?;
        }
        Ok(self.clone())
    }

    /// Detach every member from the tree. Members inside another member stay
    /// attached to it.
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] (wrapped) for the document node.
    pub fn remove(&self, tree: &mut DomTree) -> Result<Self, QueryError> {
        if self.contains(NodeId::ROOT) {
            return Err(DomError::HierarchyRequest {
                parent: NodeId::ROOT,
                node: NodeId::ROOT,
            }
            .into());
        }
        for node in self.iter() {
            let nested = tree.ancestors(node).any(|a| self.contains(a));
            if !nested {
                let _ = tree.detach(node);
            }
        }
        Ok(self.clone())
    }

    /// Remove every child of every member.
    ///
    /// # Errors
    ///
    /// Never in practice; detaching children cannot violate the hierarchy.
    pub fn empty(&self, tree: &mut DomTree) -> Result<Self, QueryError> {
        for node in self.iter() {
            for child in tree.children(node).to_vec() {
                tree.remove_child(node, child)?;
            }
        }
        Ok(self.clone())
    }

    /// Wrap each member in a fresh instance of `wrapper`; the member lands in
    /// the wrapper's innermost first element. Parentless members are skipped.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidContent`] when `wrapper` is not an element. Every
    /// member is checked before the first wrapper is created.
    pub fn wrap(&self, tree: &mut DomTree, wrapper: &Fragment) -> Result<Self, QueryError> {
        if !matches!(wrapper, Fragment::Element { .. }) {
            return Err(QueryError::InvalidContent {
                reason: "a wrapper must be an element".to_string(),
            });
        }
        for node in self.iter() {
            if let Some(parent) = tree.parent(node) {
                tree.ensure_insertion_valid(parent, node)?;
            }
        }
        for node in self.iter() {
            let Some(parent) = tree.parent(node) else {
                continue;
            };
            let outer = tree.instantiate(wrapper);
            let mut inner = outer;
            while let Some(child) = tree.element_children(inner).next() {
                inner = child;
            }
            tree.insert_before(parent, outer, node)?;
            tree.append_child(inner, node)?;
        }
        Ok(self.clone())
    }

    /// Set attribute `name` on every element member.
    ///
    /// # Errors
    ///
    /// Tree errors for ids that no longer exist.
    pub fn set_attr(&self, tree: &mut DomTree, name: &str, value: &str) -> Result<Self, QueryError> {
        for node in self.elements(tree) {
            tree.set_attribute(node, name, value)?;
        }
        Ok(self.clone())
    }

    /// Remove attribute `name` from every element member.
    ///
    /// # Errors
    ///
    /// Tree errors for ids that no longer exist.
    pub fn remove_attr(&self, tree: &mut DomTree, name: &str) -> Result<Self, QueryError> {
        for node in self.elements(tree) {
            let _ = tree.remove_attribute(node, name)?;
        }
        Ok(self.clone())
    }

    /// Add `class` to every element member that lacks it.
    ///
    /// # Errors
    ///
    /// Tree errors for ids that no longer exist.
    pub fn add_class(&self, tree: &mut DomTree, class: &str) -> Result<Self, QueryError> {
        for node in self.elements(tree) {
            let Some(element) = tree.as_element(node) else {
                continue;
            };
            if element.has_class(class) {
                continue;
            }
            let value = match element.attr("class").map(str::trim) {
                Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
                _ => class.to_string(),
            };
            tree.set_attribute(node, "class", &value)?;
        }
        Ok(self.clone())
    }

    /// Remove `class` from every element member.
    ///
    /// # Errors
    ///
    /// Tree errors for ids that no longer exist.
    pub fn remove_class(&self, tree: &mut DomTree, class: &str) -> Result<Self, QueryError> {
        for node in self.elements(tree) {
            let Some(existing) = tree.as_element(node).and_then(|e| e.attr("class")) else {
                continue;
            };
            let value = existing
                .split_ascii_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
            tree.set_attribute(node, "class", &value)?;
        }
        Ok(self.clone())
    }

    /// Replace the children of every member with a single text node.
    ///
    /// # Errors
    ///
    /// Tree errors for ids that no longer exist.
    pub fn set_text(&self, tree: &mut DomTree, text: &str) -> Result<Self, QueryError> {
        for node in self.iter() {
            if tree.is_element(node) {
                tree.set_text_content(node, text)?;
            }
        }
        Ok(self.clone())
    }

    fn elements(&self, tree: &DomTree) -> Vec<NodeId> {
        self.iter().filter(|&n| tree.is_element(n)).collect()
    }
}

/// The node that will become the parent of inserted content.
fn insertion_parent(tree: &DomTree, target: NodeId, placement: Placement) -> Option<NodeId> {
    match placement {
        Placement::Append | Placement::Prepend => tree.contains(target).then_some(target),
        Placement::Before | Placement::After => tree.parent(target),
    }
}

/// [§ 4.2.3 Ensure pre-insertion validity](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
///
/// "If parent is not a Document, DocumentFragment, or Element node, then
/// throw a HierarchyRequestError DOMException."
fn validate(tree: &DomTree, target: NodeId, nodes: &[NodeId], placement: Placement) -> Result<(), QueryError> {
    let Some(parent) = insertion_parent(tree, target, placement) else {
        return Ok(());
    };
    if !tree.accepts_children(parent) {
        let node = nodes.first().copied().unwrap_or(parent);
        return Err(DomError::HierarchyRequest { parent, node }.into());
    }
    for &node in nodes {
        tree.ensure_insertion_valid(parent, node)?;
    }
    Ok(())
}

fn place(tree: &mut DomTree, target: NodeId, items: &[NodeId], placement: Placement) -> Result<(), QueryError> {
    match placement {
        Placement::Append => {
            for &item in items {
                tree.append_child(target, item)?;
            }
        }
        Placement::Prepend => {
            let reference = tree
                .children(target)
                .iter()
                .copied()
                .find(|child| !items.contains(child));
            for &item in items {
                match reference {
                    Some(reference) => tree.insert_before(target, item, reference)?,
                    None => tree.append_child(target, item)?,
                }
            }
        }
        Placement::Before => {
            let Some(parent) = tree.parent(target) else {
                return Ok(());
            };
            for &item in items {
                if item != target {
                    tree.insert_before(parent, item, target)?;
                }
            }
        }
        Placement::After => {
            let mut anchor = target;
            for &item in items {
                if item != anchor {
                    tree.insert_after(anchor, item)?;
                }
                anchor = item;
            }
        }
    }
    Ok(())
}
