//! Selector tokenizer module.

/// Lazy selector tokenizer implementation.
pub mod scanner;
/// Selector token types.
pub mod token;

pub(crate) use scanner::string_argument;
pub use scanner::{Tokenizer, tokenize};
pub use token::{Token, TokenKind};
