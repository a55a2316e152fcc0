//! DOM tree implementation for the Wombat selector engine.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Node
//! identity is the index itself, so "same node" is a plain integer comparison.
//!
//! Removed nodes are never freed: they stay in the arena, detached, and can be
//! re-inserted later. This keeps every [`NodeId`] a query engine ever handed
//! out valid for the lifetime of the tree.

use std::collections::{HashMap, HashSet};

mod error;
mod fragment;

pub use error::DomError;
pub use fragment::Fragment;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// NodeId provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
/// "Each node has an associated node document... and parent (null or an element)."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    /// "An object A's next sibling is the object immediately following A
    /// in the children of A's parent."
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    /// "An object A's previous sibling is the object immediately preceding A
    /// in the children of A's parent."
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: We only store tag_name (local name) and attrs. Namespaces are not
/// modelled; selectors never look at them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with the given tag and no attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> HashSet<&str> {
        match self.attrs.get("class") {
            Some(classlist) => classlist.split_ascii_whitespace().collect(),
            None => HashSet::new(),
        }
    }

    /// Whether `class_name` is one of the element's classes.
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class_name))
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. Nodes that are allocated but never attached (or that
/// were removed) form their own detached trees inside the same arena.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    /// The Document node is always at index 0 (NodeId::ROOT).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    pub fn new() -> Self {
        DomTree {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// Build a document whose top-level children are the given fragments.
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        let mut tree = Self::new();
        for fragment in fragments {
            let id = tree.instantiate(fragment);
            tree.link_last(NodeId::ROOT, id);
        }
        tree
    }

    /// Get the root document node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Whether `id` names a node of this arena.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Get the number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// Allocate a detached element with no attributes.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Text(text.to_string()))
    }

    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Comment(text.to_string()))
    }

    /// Allocate a detached copy of `fragment` and return its root.
    pub fn instantiate(&mut self, fragment: &Fragment) -> NodeId {
        match fragment {
            Fragment::Text(text) => self.create_text(text),
            Fragment::Comment { comment } => self.create_comment(comment),
            Fragment::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.alloc(NodeType::Element(ElementData {
                    tag_name: tag.clone(),
                    attrs: attrs
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                }));
                for child in children {
                    let child_id = self.instantiate(child);
                    self.link_last(id, child_id);
                }
                id
            }
        }
    }

    /// Convert the subtree at `id` back into a [`Fragment`].
    ///
    /// Returns `None` for unknown ids and for the Document node.
    pub fn to_fragment(&self, id: NodeId) -> Option<Fragment> {
        match &self.get(id)?.node_type {
            NodeType::Document => None,
            NodeType::Text(text) => Some(Fragment::Text(text.clone())),
            NodeType::Comment(text) => Some(Fragment::Comment {
                comment: text.clone(),
            }),
            NodeType::Element(data) => Some(Fragment::Element {
                tag: data.tag_name.clone(),
                attrs: data
                    .attrs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                children: self
                    .children(id)
                    .iter()
                    .filter_map(|&c| self.to_fragment(c))
                    .collect(),
            }),
        }
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`. A child that already has
    /// a parent is moved, not shared.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_insertion_valid(parent, child)?;
        let _ = self.detach(child);
        self.link_last(parent, child);
        Ok(())
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `new_child` into `parent` immediately before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_insertion_valid(parent, new_child)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        if new_child == reference {
            return Ok(());
        }
        let _ = self.detach(new_child);
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::NotAChild {
                parent,
                child: reference,
            })?;
        self.nodes[parent.0].children.insert(index, new_child);
        self.nodes[new_child.0].parent = Some(parent);
        self.relink_siblings(parent);
        Ok(())
    }

    /// Inserts `new_child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, new_child: NodeId) -> Result<(), DomError> {
        match self.first_child(parent) {
            Some(first) if first != new_child => self.insert_before(parent, new_child, first),
            Some(_) => Ok(()),
            None => self.append_child(parent, new_child),
        }
    }

    /// Inserts `new_node` immediately after `reference` in the reference's parent.
    pub fn insert_after(&mut self, reference: NodeId, new_node: NodeId) -> Result<(), DomError> {
        let parent = self.parent(reference).ok_or(DomError::NoParent(reference))?;
        match self.next_sibling(reference) {
            Some(next) if next == new_node => Ok(()),
            Some(next) => self.insert_before(parent, new_node, next),
            None => self.append_child(parent, new_node),
        }
    }

    /// [§ 4.2.4 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Removes `child` from `parent`. The child stays in the arena, detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        let _ = self.detach(child);
        Ok(())
    }

    /// Removes `id` from its parent, if it has one. Returns the old parent.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.nodes[parent.0].children.retain(|&c| c != id);
        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        self.relink_siblings(parent);
        Some(parent)
    }

    /// Moves all children of `from` to the end of `to`'s children.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        self.ensure_exists(from)?;
        let moved = self.children(from).to_vec();
        for child in moved {
            self.append_child(to, child)?;
        }
        Ok(())
    }

    /// [§ 4.5 Clone a node](https://dom.spec.whatwg.org/#concept-node-clone)
    ///
    /// "If the clone children flag is set, then for each child child of node,
    /// in tree order: append the result of cloning child..."
    ///
    /// Allocates a detached deep copy of the subtree rooted at `id`.
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let node_type = self
            .get(id)
            .ok_or(DomError::UnknownNode(id))?
            .node_type
            .clone();
        if matches!(node_type, NodeType::Document) {
            return Err(DomError::HierarchyRequest {
                parent: id,
                node: id,
            });
        }
        let copy = self.alloc(node_type);
        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.deep_clone(child)?;
            self.link_last(copy, child_copy);
        }
        Ok(copy)
    }

    /// Whether `id` is a document or an element, the only nodes that can
    /// hold children.
    pub fn accepts_children(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| {
            matches!(n.node_type, NodeType::Document | NodeType::Element(_))
        })
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over the children of a node that are elements.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// Get the first child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    pub fn preceding_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
            forward: false,
        }
    }

    /// Iterate over following siblings (from immediately after to last child).
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.next_sibling(id),
            forward: true,
        }
    }

    /// [§ 4.2 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// "Tree order is preorder, depth-first traversal."
    ///
    /// Iterate over the descendants of `id` (excluding `id`) in tree order.
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// The topmost ancestor of `id` (the Document for attached nodes).
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Sort `nodes` into tree order.
    ///
    /// Nodes of the document come first; nodes of detached subtrees follow,
    /// grouped by subtree and ordered by the id of each subtree's root.
    pub fn sort_document_order(&self, nodes: &mut [NodeId]) {
        if nodes.len() < 2 {
            return;
        }
        let mut roots: Vec<NodeId> = nodes.iter().map(|&n| self.tree_root(n)).collect();
        roots.sort_unstable();
        roots.dedup();

        let mut position: HashMap<NodeId, usize> = HashMap::new();
        for root in roots {
            let _ = position.insert(root, position.len());
            for id in self.descendants(root) {
                let _ = position.insert(id, position.len());
            }
        }
        nodes.sort_by_key(|n| position.get(n).copied().unwrap_or(usize::MAX));
    }

    /// Check whether `id` is an element node.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Get element data if this node is an element.
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.as_text(d))
            .collect()
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.ensure_exists(id)?;
        if let Some(NodeType::Text(data)) = self.get_mut(id).map(|n| &mut n.node_type) {
            text.clone_into(data);
            return Ok(());
        }
        for child in self.children(id).to_vec() {
            let _ = self.detach(child);
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link_last(id, text_node);
        }
        Ok(())
    }

    /// Set (or overwrite) an attribute on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.as_element_mut(id).ok_or(DomError::NotAnElement(id))?;
        let _ = element.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Remove an attribute from an element, returning its old value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let element = self.as_element_mut(id).ok_or(DomError::NotAnElement(id))?;
        Ok(element.attrs.remove(name))
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }

    fn ensure_exists(&self, id: NodeId) -> Result<(), DomError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DomError::UnknownNode(id))
        }
    }

    /// [§ 4.2.3 Ensure pre-insertion validity](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// "If node is a host-including inclusive ancestor of parent, then throw a
    /// HierarchyRequestError DOMException."
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for ids outside the arena, and
    /// [`DomError::HierarchyRequest`] when `parent` cannot hold children or
    /// `node` is the document or an inclusive ancestor of `parent`.
    pub fn ensure_insertion_valid(&self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.ensure_exists(parent)?;
        self.ensure_exists(node)?;
        if !self.accepts_children(parent)
            || node == parent
            || node == NodeId::ROOT
            || self.is_descendant_of(parent, node)
        {
            return Err(DomError::HierarchyRequest { parent, node });
        }
        Ok(())
    }

    /// Attach a detached node as the last child of `parent` without checks.
    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.next_sibling = None;
        node.prev_sibling = prev_last_child;
        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// Recompute sibling links for every child of `parent`.
    fn relink_siblings(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child.0];
            node.prev_sibling = i.checked_sub(1).map(|p| children[p]);
            node.next_sibling = children.get(i + 1).copied();
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the preceding or following siblings of a node.
pub struct SiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    forward: bool,
}

impl Iterator for SiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.tree.next_sibling(id)
        } else {
            self.tree.prev_sibling(id)
        };
        Some(id)
    }
}

/// Tree-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
