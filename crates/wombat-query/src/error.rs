//! Errors surfaced by selector compilation and query operations.

use thiserror::Error;
use wombat_dom::DomError;

use crate::selector::Combinator;

/// Everything that can go wrong between selector text and a mutated tree.
///
/// Compilation errors ([`QueryError::Syntax`], [`QueryError::UnknownPseudoClass`])
/// are always raised before any tree is read or written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed selector text.
    #[error("selector syntax error at offset {offset}: {reason}")]
    Syntax {
        /// Byte offset into the selector text.
        offset: usize,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A pseudo-class the registry does not know, under the `fail` policy.
    #[error("unknown pseudo-class ':{name}' at offset {offset}")]
    UnknownPseudoClass {
        /// The pseudo-class name as written (lowercased).
        name: String,
        /// Byte offset of the `:` that introduced it.
        offset: usize,
    },

    /// A combinator reached a code path that cannot evaluate it. Indicates a
    /// bug in the compiler rather than bad input.
    #[error("unsupported combinator {combinator:?}")]
    UnsupportedCombinator {
        /// The offending combinator.
        combinator: Combinator,
    },

    /// Content a mutation cannot use, such as a text fragment given to `wrap`.
    #[error("invalid content: {reason}")]
    InvalidContent {
        /// Why the content was refused.
        reason: String,
    },

    /// The tree refused a mutation.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl QueryError {
    /// Shorthand for a [`QueryError::Syntax`].
    pub fn syntax(offset: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset into the selector text, for compilation errors.
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } | Self::UnknownPseudoClass { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
