//! Compile-time configuration for selector lists.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What the compiler does with a pseudo-class name the registry does not know.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnknownPseudoClassPolicy {
    /// Reject the whole selector list with
    /// [`QueryError::UnknownPseudoClass`](crate::QueryError::UnknownPseudoClass).
    #[default]
    Fail,
    /// Compile the pseudo-class to a predicate that never matches, and warn once.
    Ignore,
}

/// Options that change how selector text is compiled.
///
/// Part of the compile-cache key: the same text compiled under two
/// configurations yields two cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Policy for unknown pseudo-class names.
    pub unknown_pseudo_class: UnknownPseudoClassPolicy,
    /// Whether attribute *values* compare case-sensitively. A per-selector
    /// `i` or `s` flag (`[type="text" i]`) overrides this.
    pub case_sensitive_attributes: bool,
    /// Maximum nesting of pseudo-class arguments, counting both parentheses
    /// and selector arguments such as `:not(:has(...))`.
    pub max_nesting_depth: usize,
}

impl QueryConfig {
    /// Default nesting bound.
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

    /// Builder: set the unknown pseudo-class policy.
    #[must_use]
    pub const fn with_unknown_pseudo_class(mut self, policy: UnknownPseudoClassPolicy) -> Self {
        self.unknown_pseudo_class = policy;
        self
    }

    /// Builder: set attribute value case sensitivity.
    #[must_use]
    pub const fn with_case_sensitive_attributes(mut self, sensitive: bool) -> Self {
        self.case_sensitive_attributes = sensitive;
        self
    }

    /// Builder: set the nesting bound.
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            unknown_pseudo_class: UnknownPseudoClassPolicy::Fail,
            case_sensitive_attributes: true,
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}
