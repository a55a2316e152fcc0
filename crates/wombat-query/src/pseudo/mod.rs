//! [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//!
//! Pseudo-classes are resolved by name through a [`PseudoRegistry`]. Each
//! entry is an evaluator implementing [`PseudoClass`]; the compiler captures
//! the evaluator in the compiled selector, so later registrations only affect
//! selectors compiled afterwards.

use core::cell::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use wombat_dom::{DomTree, ElementData, NodeId};

use crate::matcher;
use crate::selector::{NthExpr, SelectorList};

mod builtin;

/// The argument shape a pseudo-class accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// No parentheses allowed: `:empty`.
    None,
    /// A bounded integer: `:eq(2)`, `:gt(-1)`.
    Number,
    /// An `An+B` formula, `odd`, or `even`: `:nth-child(2n+1)`.
    Formula,
    /// Quoted or bare text: `:contains("hello")`.
    Text,
    /// A nested selector list: `:not(.a, .b)`.
    Selector,
    /// A nested selector list whose alternatives may start with a
    /// combinator relative to the node under test: `:has(> img)`.
    RelativeSelector,
}

/// When a pseudo-class is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PseudoKind {
    /// Evaluated per node, from the node and its surroundings.
    #[default]
    Node,
    /// Evaluated against a node's index in the collected, document-ordered
    /// result of the selector so far (jQuery's `:eq`, `:first`, ...).
    Positional,
}

/// A compiled pseudo-class argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoArg {
    /// No argument.
    None,
    /// A bounded integer.
    Number(i64),
    /// An `An+B` formula.
    Formula(NthExpr),
    /// Unquoted text.
    Text(String),
    /// A nested selector list.
    Selector(Arc<SelectorList>),
}

/// Position of a node within a collected result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPosition {
    /// 0-based index in the set.
    pub index: usize,
    /// Size of the set.
    pub len: usize,
}

/// A node's place among its parent's element children. All fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingInfo {
    /// Index among all element siblings.
    pub index: usize,
    /// Number of element siblings, the node included.
    pub count: usize,
    /// Index among element siblings with the same tag name.
    pub type_index: usize,
    /// Number of element siblings with the same tag name.
    pub type_count: usize,
}

/// What an evaluator sees when asked about one node.
pub struct PseudoContext<'a> {
    tree: &'a DomTree,
    node: NodeId,
    position: Option<SetPosition>,
    siblings: OnceCell<Option<SiblingInfo>>,
}

impl<'a> PseudoContext<'a> {
    /// Context for a node-level evaluation.
    pub const fn new(tree: &'a DomTree, node: NodeId) -> Self {
        Self {
            tree,
            node,
            position: None,
            siblings: OnceCell::new(),
        }
    }

    /// Context for a positional evaluation.
    pub const fn at_position(tree: &'a DomTree, node: NodeId, position: SetPosition) -> Self {
        Self {
            tree,
            node,
            position: Some(position),
            siblings: OnceCell::new(),
        }
    }

    /// The tree being matched.
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The node under test.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// The node's element data, if it is an element.
    pub fn element(&self) -> Option<&'a ElementData> {
        self.tree.as_element(self.node)
    }

    /// The node's position in the collected set; only set for positional
    /// evaluators.
    pub const fn position(&self) -> Option<SetPosition> {
        self.position
    }

    /// Sibling indices, computed on first use. `None` for nodes without a
    /// parent and for non-elements.
    pub fn siblings(&self) -> Option<SiblingInfo> {
        *self.siblings.get_or_init(|| {
            let parent = self.tree.parent(self.node)?;
            let tag = &self.element()?.tag_name;
            let mut info = SiblingInfo {
                index: 0,
                count: 0,
                type_index: 0,
                type_count: 0,
            };
            for sibling in self.tree.element_children(parent) {
                info.count += 1;
                let same_type = self
                    .tree
                    .as_element(sibling)
                    .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag));
                if same_type {
                    info.type_count += 1;
                }
                if sibling == self.node {
                    info.index = info.count;
                    info.type_index = info.type_count;
                }
            }
            Some(info)
        })
    }

    /// Whether the node itself matches `list`.
    pub fn matches(&self, list: &SelectorList) -> bool {
        matcher::matches_node(self.tree, self.node, list)
    }

    /// Whether some node related to this one matches the relative selector
    /// `list` (descendants by default, or siblings for a leading `+`/`~`).
    pub fn has_relative(&self, list: &SelectorList) -> bool {
        matcher::has_relative_match(self.tree, self.node, list)
    }
}

/// An evaluator for one pseudo-class name.
pub trait PseudoClass: Send + Sync {
    /// The argument shape the compiler should accept.
    fn argument(&self) -> ArgumentKind {
        ArgumentKind::None
    }

    /// Whether this evaluator filters per node or by set position.
    fn kind(&self) -> PseudoKind {
        PseudoKind::Node
    }

    /// Evaluate the pseudo-class.
    fn matches(&self, cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool;
}

/// Adapter turning a function or closure into a [`PseudoClass`].
pub struct FnPseudo<F> {
    argument: ArgumentKind,
    kind: PseudoKind,
    eval: F,
}

impl<F> FnPseudo<F>
where
    F: Fn(&PseudoContext<'_>, &PseudoArg) -> bool + Send + Sync,
{
    /// A node-level evaluator.
    pub const fn node(argument: ArgumentKind, eval: F) -> Self {
        Self {
            argument,
            kind: PseudoKind::Node,
            eval,
        }
    }

    /// A positional evaluator.
    pub const fn positional(argument: ArgumentKind, eval: F) -> Self {
        Self {
            argument,
            kind: PseudoKind::Positional,
            eval,
        }
    }
}

impl<F> PseudoClass for FnPseudo<F>
where
    F: Fn(&PseudoContext<'_>, &PseudoArg) -> bool + Send + Sync,
{
    fn argument(&self) -> ArgumentKind {
        self.argument
    }

    fn kind(&self) -> PseudoKind {
        self.kind
    }

    fn matches(&self, cx: &PseudoContext<'_>, arg: &PseudoArg) -> bool {
        (self.eval)(cx, arg)
    }
}

/// Name to evaluator mapping.
#[derive(Clone, Default)]
pub struct PseudoRegistry {
    entries: HashMap<String, Arc<dyn PseudoClass>>,
}

impl PseudoRegistry {
    /// A registry with no entries at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry seeded with every built-in pseudo-class.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register `evaluator` under `name` (ASCII case-insensitive), returning
    /// the evaluator it replaced.
    pub fn register(
        &mut self,
        name: &str,
        evaluator: impl PseudoClass + 'static,
    ) -> Option<Arc<dyn PseudoClass>> {
        self.entries
            .insert(name.to_ascii_lowercase(), Arc::new(evaluator))
    }

    /// Look up an evaluator by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PseudoClass>> {
        self.entries.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl core::fmt::Debug for PseudoRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

static GLOBAL: LazyLock<RwLock<PseudoRegistry>> =
    LazyLock::new(|| RwLock::new(PseudoRegistry::with_builtins()));

/// Register a pseudo-class in the process-wide registry.
///
/// Clears the compile cache while the registry is still write-locked, so
/// cached selectors cannot shadow the new definition. Selectors already
/// compiled keep their old evaluator.
pub fn register_pseudo_class(
    name: &str,
    evaluator: impl PseudoClass + 'static,
) -> Option<Arc<dyn PseudoClass>> {
    let mut registry = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    let previous = registry.register(name, evaluator);
    crate::cache::clear_cache();
    previous
}

/// Run `f` with shared access to the process-wide registry.
pub fn with_global_registry<R>(f: impl FnOnce(&PseudoRegistry) -> R) -> R {
    let registry = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}
