//! CSS Selector representation
//!
//! This module defines the compiled form of a selector list per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), plus the
//! jQuery extensions the query engine accepts (positional pseudo-classes,
//! `:contains()`, `[attr!=value]`).

use core::fmt;
use std::sync::Arc;

use wombat_dom::ElementData;

use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::pseudo::{PseudoArg, PseudoClass, PseudoKind, PseudoRegistry, with_global_registry};

mod nth;
mod parser;

pub use nth::NthExpr;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `div`, `p`, `span`, `body`, `h1`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.highlight`, `.btn`, `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ///
    /// Examples: `#main`, `#header`, `#nav-bar`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    ///
    /// Example: `*`
    Universal,

    /// A pseudo-class the registry did not know, compiled under the `ignore`
    /// policy. Never matches anything.
    NeverMatch,

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// A pseudo-class resolved through the registry.
    ///
    /// Examples: `:first-child`, `:nth-child(2n+1)`, `:contains("x")`, `:eq(0)`
    PseudoClass(PseudoSelector),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type=text]`, `[class~=active]`, `[lang|=en]`,
    /// `[href^=https]`, `[src$=".png"]`, `[data-theme*=dark]`
    Attribute(AttributeSelector),
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element on its own.
    ///
    /// Pseudo-classes need tree context and are evaluated by the matcher;
    /// here they conservatively return false.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            // Tag names compare ASCII case-insensitively, as in HTML documents.
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            Self::Class(class_name) => element.has_class(class_name),

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            // "An ID selector represents an element instance that has an identifier
            // that matches the identifier in the ID selector."
            Self::Id(id) => element.id().is_some_and(|el_id| el_id == id),

            Self::Universal => true,

            Self::NeverMatch | Self::PseudoClass(_) => false,

            Self::Attribute(attr_sel) => attr_sel.matches(element),
        }
    }
}

/// Attribute selector operators per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// `[attr]`: "Represents an element with the att attribute"
    Exists,
    /// `[attr=value]`: "whose value is exactly 'val'"
    Equals,
    /// `[attr~=value]`: "whose value is a whitespace-separated list of words,
    /// one of which is exactly 'val'"
    Includes,
    /// `[attr|=value]`: "either being exactly 'val' or beginning with 'val'
    /// immediately followed by '-'"
    DashMatch,
    /// `[attr^=value]`: "whose value begins with the prefix 'val'"
    Prefix,
    /// `[attr$=value]`: "whose value ends with the suffix 'val'"
    Suffix,
    /// `[attr*=value]`: "whose value contains at least one instance of the
    /// substring 'val'"
    Substring,
    /// `[attr!=value]`: jQuery extension: the attribute is absent or its
    /// value is not exactly 'val'.
    NotEquals,
}

impl AttrOperator {
    /// Parse the operator text produced by the tokenizer.
    pub fn from_token(text: &str) -> Option<Self> {
        Some(match text {
            "=" => Self::Equals,
            "~=" => Self::Includes,
            "|=" => Self::DashMatch,
            "^=" => Self::Prefix,
            "$=" => Self::Suffix,
            "*=" => Self::Substring,
            "!=" => Self::NotEquals,
            _ => return None,
        })
    }
}

/// A compiled attribute predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name, compared exactly.
    pub name: String,
    /// Comparison operator.
    pub operator: AttrOperator,
    /// Value to compare against; empty for [`AttrOperator::Exists`].
    pub value: String,
    /// Whether the value comparison is case-sensitive.
    pub case_sensitive: bool,
}

impl AttributeSelector {
    /// Evaluate the predicate against an element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let actual = element.attr(&self.name);
        match self.operator {
            AttrOperator::Exists => actual.is_some(),
            AttrOperator::NotEquals => actual.is_none_or(|v| !self.equal(v, &self.value)),
            _ => actual.is_some_and(|v| self.compare(v)),
        }
    }

    fn equal(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    fn compare(&self, actual: &str) -> bool {
        let (actual, expected) = if self.case_sensitive {
            (actual.to_string(), self.value.clone())
        } else {
            (actual.to_ascii_lowercase(), self.value.to_ascii_lowercase())
        };
        match self.operator {
            AttrOperator::Exists => true,
            AttrOperator::Equals => actual == expected,
            AttrOperator::NotEquals => actual != expected,
            // "If 'val' contains whitespace, it will never represent anything
            // (since the words are separated by spaces). Also if 'val' is the
            // empty string, it will never represent anything."
            AttrOperator::Includes => {
                !expected.is_empty()
                    && !expected.contains(char::is_whitespace)
                    && actual.split_ascii_whitespace().any(|w| w == expected)
            }
            AttrOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // "If 'val' is the empty string then the selector does not
            // represent anything."
            AttrOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttrOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
            AttrOperator::Substring => !expected.is_empty() && actual.contains(&expected),
        }
    }
}

/// A pseudo-class call resolved against the registry at compile time.
///
/// The evaluator is captured by `Arc`, so registering new pseudo-classes
/// later never changes the behaviour of an already compiled selector.
#[derive(Clone)]
pub struct PseudoSelector {
    /// Lowercased pseudo-class name, without the colon.
    pub name: String,
    /// The interpreted argument.
    pub argument: PseudoArg,
    evaluator: Arc<dyn PseudoClass>,
}

impl PseudoSelector {
    /// Bind a name and argument to an evaluator.
    pub fn new(name: impl Into<String>, argument: PseudoArg, evaluator: Arc<dyn PseudoClass>) -> Self {
        Self {
            name: name.into(),
            argument,
            evaluator,
        }
    }

    /// The evaluator this pseudo-class was resolved to.
    pub fn evaluator(&self) -> &dyn PseudoClass {
        self.evaluator.as_ref()
    }

    /// Whether this pseudo-class filters by position in a collected set.
    pub fn is_positional(&self) -> bool {
        self.evaluator.kind() == PseudoKind::Positional
    }
}

impl fmt::Debug for PseudoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PseudoSelector")
            .field("name", &self.name)
            .field("argument", &self.argument)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PseudoSelector {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.argument == other.argument
    }
}

impl Eq for PseudoSelector {}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Whether any predicate of this compound is positional.
    pub fn has_positional(&self) -> bool {
        self.positional().next().is_some()
    }

    /// The positional pseudo-classes of this compound, in source order.
    pub fn positional(&self) -> impl Iterator<Item = &PseudoSelector> {
        self.simple_selectors.iter().filter_map(|simple| match simple {
            SimpleSelector::PseudoClass(p) if p.is_positional() => Some(p),
            _ => None,
        })
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is
    /// a direct child of element A."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that
    /// follows element A (not necessarily immediately), where A and B share the
    /// same parent."
    SubsequentSibling,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::NextSibling => "+",
            Self::SubsequentSibling => "~",
        })
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `div.container > ul.nav li a.active`
/// This would be parsed as:
/// ```text
/// [div.container] --(Child)--> [ul.nav] --(Descendant)--> [li] --(Descendant)--> [a.active]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    /// "The elements represented by a complex selector are the elements matched
    /// by the last compound selector in the complex selector."
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the subject.
    /// Empty if this is a simple compound selector with no combinators.
    ///
    /// For `A > B C`, this would be:
    /// - subject: C
    /// - combinators: [(Descendant, B), (Child, A)]
    ///
    /// The order is right-to-left because matching is done from the subject upward.
    pub combinators: Vec<(Combinator, CompoundSelector)>,

    /// [§ 3.2 Relative selectors](https://www.w3.org/TR/selectors-4/#relative)
    /// A combinator written before the leftmost compound (`> li`), relating it
    /// to the context node. `None` means an implicit descendant relation when
    /// a context exists.
    pub leading: Option<Combinator>,
}

impl ComplexSelector {
    /// Check if this is a simple selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.combinators.is_empty()
    }

    /// The compounds from leftmost to the subject, each paired with the
    /// combinator that joins it to the compound on its left (`None` for the
    /// leftmost one).
    pub fn left_to_right(&self) -> Vec<(Option<Combinator>, &CompoundSelector)> {
        let mut steps = Vec::with_capacity(self.combinators.len() + 1);
        let mut incoming = None;
        for (combinator, compound) in self.combinators.iter().rev() {
            steps.push((incoming, compound));
            incoming = Some(*combinator);
        }
        steps.push((incoming, &self.subject));
        steps
    }

    /// Whether any compound of the chain carries a positional pseudo-class.
    pub fn has_positional(&self) -> bool {
        self.subject.has_positional() || self.combinators.iter().any(|(_, c)| c.has_positional())
    }
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the selector list."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// The alternatives, in source order.
    pub selectors: Vec<ComplexSelector>,
    source: String,
}

impl SelectorList {
    /// Assemble a list; `source` is kept for diagnostics.
    pub fn new(selectors: Vec<ComplexSelector>, source: impl Into<String>) -> Self {
        Self {
            selectors,
            source: source.into(),
        }
    }

    /// The selector text this list was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the list has no alternatives (never true for compiled lists).
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Whether any alternative uses a positional pseudo-class.
    pub fn has_positional(&self) -> bool {
        self.selectors.iter().any(ComplexSelector::has_positional)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compile selector text with the default configuration and the process-wide
/// pseudo-class registry.
///
/// # Errors
///
/// [`QueryError::Syntax`] for malformed text, and
/// [`QueryError::UnknownPseudoClass`] under the `fail` policy.
pub fn compile(text: &str) -> Result<SelectorList, QueryError> {
    compile_with(text, &QueryConfig::default())
}

/// Compile selector text with an explicit configuration and the process-wide
/// pseudo-class registry.
///
/// # Errors
///
/// As [`compile`].
pub fn compile_with(text: &str, config: &QueryConfig) -> Result<SelectorList, QueryError> {
    with_global_registry(|registry| compile_with_registry(text, config, registry))
}

/// Compile selector text against a caller-provided registry.
///
/// No partial result is ever returned: the first error aborts the whole list.
///
/// # Errors
///
/// As [`compile`], with names resolved against `registry` only.
pub fn compile_with_registry(
    text: &str,
    config: &QueryConfig,
    registry: &PseudoRegistry,
) -> Result<SelectorList, QueryError> {
    parser::Parser::new(text, config, registry).parse()
}
