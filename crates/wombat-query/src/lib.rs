//! CSS selector compiler and DOM query engine for Wombat.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - Lazy, restartable token stream with byte offsets
//!   - Quoted strings and backslash escapes
//!
//! - **Selector parser** ([Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar))
//!   - Type, class, ID, universal, and attribute selectors (`=`, `~=`, `|=`, `^=`, `$=`, `*=`, `!=`)
//!   - All four combinators, plus leading combinators relative to a context
//!   - Pseudo-classes resolved through a pluggable registry
//!
//! - **Matcher**
//!   - Right-to-left matching with memoised backtracking
//!   - jQuery positional pseudo-classes (`:eq`, `:first`, `:odd`, ...)
//!
//! - **Query Sets**
//!   - Chainable find/filter/traversal over ordered, duplicate-free node sets
//!   - Tree mutation with clone-on-fan-out insertion
//!
//! # Not Implemented
//!
//! - Pseudo-elements (treated as unknown pseudo-classes)
//! - Specificity and the cascade
//! - Namespaces

/// Process-wide compile cache.
pub mod cache;
/// Compile-time configuration.
pub mod config;
/// Error types.
pub mod error;
/// Selector matching per [§ 17](https://www.w3.org/TR/selectors-4/#match-against-element).
pub mod matcher;
/// Pseudo-class registry per [§ 3.5](https://www.w3.org/TR/selectors-4/#pseudo-classes).
pub mod pseudo;
/// Query Sets and their operations.
pub mod query_set;
/// Compiled selectors per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Selector tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

pub use cache::{clear_cache, compile_cached};
pub use config::{QueryConfig, UnknownPseudoClassPolicy};
pub use error::QueryError;
pub use matcher::{MatchContext, ResultOrder, Scope};
pub use pseudo::{
    ArgumentKind, FnPseudo, PseudoArg, PseudoClass, PseudoContext, PseudoKind, PseudoRegistry,
    SetPosition, SiblingInfo, register_pseudo_class,
};
pub use query_set::{Content, IntoSelectorList, QuerySet};
pub use selector::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, NthExpr,
    PseudoSelector, SelectorList, SimpleSelector, compile, compile_with, compile_with_registry,
};
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};

use wombat_dom::{DomTree, NodeId};

/// Every node of the document matching `selector`, in document order.
///
/// # Errors
///
/// Selector compilation errors; nothing is matched when compilation fails.
pub fn select(tree: &DomTree, selector: impl IntoSelectorList) -> Result<QuerySet, QueryError> {
    QuerySet::root().find(tree, selector)
}

/// Nodes matching `selector` relative to `contexts` (descendants by default,
/// or whatever a leading combinator says), deduplicated, in document order.
///
/// # Errors
///
/// Selector compilation errors, returned before the tree is read.
pub fn select_within(
    tree: &DomTree,
    contexts: &[NodeId],
    selector: impl IntoSelectorList,
) -> Result<QuerySet, QueryError> {
    let list = selector.into_selector_list()?;
    let nodes = matcher::run(&list, &MatchContext::within(tree, contexts))?;
    Ok(QuerySet::from_nodes(tree, nodes))
}
