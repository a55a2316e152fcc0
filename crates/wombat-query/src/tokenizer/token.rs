//! Selector token types.
//!
//! A reduced version of the [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization)
//! token set, shaped for the [Selectors Level 4 grammar](https://www.w3.org/TR/selectors-4/#grammar):
//! hash and class tokens carry their names, attribute brackets are split into
//! their parts, and a pseudo-class argument is kept as one raw token so the
//! parser can interpret it according to the pseudo-class it belongs to.

use strum_macros::Display;

use crate::selector::Combinator;

/// The kind of a [`Token`]. Renders as a human-readable name for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// A type selector, attribute name, unquoted attribute value, or flag.
    #[strum(to_string = "identifier")]
    Ident,
    /// `*`
    #[strum(to_string = "'*'")]
    Universal,
    /// `#name`; the token text is the name without the `#`.
    #[strum(to_string = "id selector")]
    Id,
    /// `.name`; the token text is the name without the `.`.
    #[strum(to_string = "class selector")]
    Class,
    /// `[`
    #[strum(to_string = "'['")]
    AttributeOpen,
    /// `=`, `~=`, `|=`, `^=`, `$=`, `*=`, or `!=`.
    #[strum(to_string = "attribute operator")]
    AttributeOperator,
    /// A quoted attribute value, unescaped and without its quotes.
    #[strum(to_string = "string")]
    String,
    /// `]`
    #[strum(to_string = "']'")]
    AttributeClose,
    /// `:name`; the token text is the name without the `:`. Pseudo-elements
    /// (`::name`) keep one leading `:` in their text.
    #[strum(to_string = "pseudo-class")]
    Pseudo,
    /// The raw, trimmed text between the parentheses of `:name(...)`.
    #[strum(to_string = "pseudo-class argument")]
    PseudoArg,
    /// A combinator; whitespace runs become [`Combinator::Descendant`].
    #[strum(to_string = "combinator")]
    Combinator(Combinator),
    /// `,`
    #[strum(to_string = "','")]
    Comma,
    /// End of input. Always the last token of a successful scan.
    #[strum(to_string = "end of input")]
    Eof,
}

/// One lexical token: kind, text, and where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What sort of token this is.
    pub kind: TokenKind,
    /// The token's value (see [`TokenKind`] for what each kind stores).
    pub text: String,
    /// Byte offset of the token's first character in the selector text.
    pub offset: usize,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Whether this token can end a compound selector, so that whitespace
    /// after it is a descendant combinator.
    pub const fn ends_compound(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Ident
                | TokenKind::Universal
                | TokenKind::Id
                | TokenKind::Class
                | TokenKind::AttributeClose
                | TokenKind::Pseudo
                | TokenKind::PseudoArg
        )
    }
}
