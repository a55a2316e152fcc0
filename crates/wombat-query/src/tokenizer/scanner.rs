use std::collections::VecDeque;

use super::token::{Token, TokenKind};
use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::selector::Combinator;

/// Tokenize `input` with the default nesting bound.
///
/// The returned iterator is lazy: each call to `next` scans just far enough
/// to produce the next token. It is a pure function of its input, so
/// tokenizing the same text again yields the same sequence.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Lazy selector tokenizer.
///
/// Yields `Ok(token)` until a [`TokenKind::Eof`] token has been produced, or
/// a single `Err` at the first malformed construct. After either, the
/// iterator is exhausted.
pub struct Tokenizer<'a> {
    /// The input string being tokenized
    input: &'a str,
    /// Current byte position in the input
    position: usize,
    /// Tokens scanned but not yet handed out (attribute groups scan as a unit)
    pending: VecDeque<Token>,
    /// Deepest parenthesis nesting allowed inside a pseudo-class argument
    max_depth: usize,
    /// Whether the previous top-level token can end a compound selector
    after_compound: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer with the default nesting bound.
    pub fn new(input: &'a str) -> Self {
        Self::with_max_depth(input, QueryConfig::DEFAULT_MAX_NESTING_DEPTH)
    }

    /// Create a tokenizer that rejects pseudo-class arguments whose
    /// parentheses nest deeper than `max_depth`.
    pub fn with_max_depth(input: &'a str, max_depth: usize) -> Self {
        Self {
            input,
            position: 0,
            pending: VecDeque::new(),
            max_depth,
            after_compound: false,
            finished: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consume as much whitespace as possible. Returns whether any was consumed.
    fn consume_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
        self.position != start
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, offset: usize) {
        let token = Token::new(kind, text, offset);
        self.after_compound = token.ends_compound();
        self.pending.push_back(token);
    }

    /// Scan the next top-level construct, pushing one or more tokens.
    fn scan(&mut self) -> Result<(), QueryError> {
        let whitespace_start = self.position;
        let had_whitespace = self.consume_whitespace();

        let Some(c) = self.peek() else {
            self.push(TokenKind::Eof, "", self.position);
            self.finished = true;
            return Ok(());
        };

        // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        // "A descendant combinator is whitespace that separates two compound selectors."
        // Whitespace next to an explicit combinator or a comma is just whitespace.
        if had_whitespace && self.after_compound && !matches!(c, '>' | '+' | '~' | ',') {
            self.push(
                TokenKind::Combinator(Combinator::Descendant),
                " ",
                whitespace_start,
            );
            return Ok(());
        }

        let start = self.position;
        match c {
            '>' | '+' | '~' => {
                let _ = self.consume();
                let combinator = match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                };
                self.push(TokenKind::Combinator(combinator), c.to_string(), start);
            }
            ',' => {
                let _ = self.consume();
                self.push(TokenKind::Comma, ",", start);
            }
            '*' => {
                let _ = self.consume();
                self.push(TokenKind::Universal, "*", start);
            }
            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            // "An ID selector is a hash (#, U+0023) immediately followed by the ID value"
            '#' => {
                let _ = self.consume();
                let name = self.consume_name();
                if name.is_empty() {
                    return Err(QueryError::syntax(
                        self.position,
                        "expected an identifier after '#'",
                    ));
                }
                self.push(TokenKind::Id, name, start);
            }
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            // "The class selector is given as a full stop (. U+002E) immediately
            // followed by an identifier."
            '.' => {
                let _ = self.consume();
                let name = self.consume_ident()?;
                self.push(TokenKind::Class, name, start);
            }
            '[' => self.scan_attribute()?,
            ':' => self.scan_pseudo()?,
            c if c == '-' || c == '\\' || is_ident_start(c) => {
                let name = self.consume_ident()?;
                self.push(TokenKind::Ident, name, start);
            }
            other => {
                return Err(QueryError::syntax(
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        }
        Ok(())
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Consumes an identifier that must start like a CSS ident: an ident-start
    /// code point, an escape, or `-` followed by one of those (or another `-`).
    fn consume_ident(&mut self) -> Result<String, QueryError> {
        let start = self.position;
        let starts_ident = match self.peek() {
            Some('-') => self
                .peek_at(1)
                .is_some_and(|c| c == '-' || c == '\\' || is_ident_start(c)),
            Some(c) => c == '\\' || is_ident_start(c),
            None => false,
        };
        if !starts_ident {
            return Err(QueryError::syntax(start, "expected an identifier"));
        }
        let name = self.consume_name();
        if name.is_empty() {
            return Err(QueryError::syntax(start, "expected an identifier"));
        }
        Ok(name)
    }

    /// Consume a run of ident code points and escapes; may be empty.
    ///
    /// An escape (`\` followed by any character) contributes the escaped
    /// character literally, so `a\.b` is the name `a.b`.
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('\\') if self.peek_at(1).is_some() => {
                    let _ = self.consume();
                    if let Some(escaped) = self.consume() {
                        name.push(escaped);
                    }
                }
                Some(c) if is_ident_char(c) => {
                    name.push(c);
                    let _ = self.consume();
                }
                _ => break,
            }
        }
        name
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Consumes a quoted string starting at the current quote character.
    /// A backslash escapes the character after it (in particular the
    /// matching quote and the backslash itself).
    fn consume_string(&mut self) -> Result<String, QueryError> {
        let start = self.position;
        let Some(quote) = self.consume() else {
            return Err(QueryError::syntax(start, "expected a quoted string"));
        };
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.consume() {
                    Some(escaped) => value.push(escaped),
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(QueryError::syntax(start, "unterminated string"))
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Scans a whole `[name op value flag]` group.
    fn scan_attribute(&mut self) -> Result<(), QueryError> {
        let open = self.position;
        let _ = self.consume();
        self.push(TokenKind::AttributeOpen, "[", open);
        let unterminated = || QueryError::syntax(open, "unterminated attribute selector");

        let _ = self.consume_whitespace();
        if self.peek().is_none() {
            return Err(unterminated());
        }
        let name_start = self.position;
        let name = self
            .consume_ident()
            .map_err(|_| QueryError::syntax(name_start, "expected an attribute name"))?;
        self.push(TokenKind::Ident, name, name_start);
        let _ = self.consume_whitespace();

        let op_start = self.position;
        match (self.peek(), self.peek_at(1)) {
            (None, _) => return Err(unterminated()),
            (Some(']'), _) => {
                let _ = self.consume();
                self.push(TokenKind::AttributeClose, "]", op_start);
                return Ok(());
            }
            (Some('='), _) => {
                let _ = self.consume();
                self.push(TokenKind::AttributeOperator, "=", op_start);
            }
            (Some(c @ ('~' | '|' | '^' | '$' | '*' | '!')), Some('=')) => {
                let _ = self.consume();
                let _ = self.consume();
                self.push(TokenKind::AttributeOperator, format!("{c}="), op_start);
            }
            (Some(other), _) => {
                return Err(QueryError::syntax(
                    op_start,
                    format!("expected an attribute operator or ']', found '{other}'"),
                ));
            }
        }

        let _ = self.consume_whitespace();
        let value_start = self.position;
        match self.peek() {
            None => return Err(unterminated()),
            Some('"' | '\'') => {
                let value = self.consume_string()?;
                self.push(TokenKind::String, value, value_start);
            }
            Some(_) => {
                // Unquoted values run to the next whitespace or ']'.
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    if is_whitespace(c) || c == ']' {
                        break;
                    }
                    if matches!(c, '[' | '"' | '\'') {
                        return Err(QueryError::syntax(
                            self.position,
                            format!("unexpected '{c}' in attribute value"),
                        ));
                    }
                    value.push(c);
                    let _ = self.consume();
                }
                if value.is_empty() {
                    return Err(QueryError::syntax(value_start, "expected an attribute value"));
                }
                self.push(TokenKind::Ident, value, value_start);
            }
        }

        // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
        // "[attr=value i]" / "[attr=value s]"
        let _ = self.consume_whitespace();
        if self.peek().is_some_and(is_ident_start) {
            let flag_start = self.position;
            let flag = self.consume_ident()?;
            self.push(TokenKind::Ident, flag, flag_start);
            let _ = self.consume_whitespace();
        }

        let close = self.position;
        match self.consume() {
            Some(']') => {
                self.push(TokenKind::AttributeClose, "]", close);
                Ok(())
            }
            None => Err(unterminated()),
            Some(other) => Err(QueryError::syntax(
                close,
                format!("expected ']', found '{other}'"),
            )),
        }
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Scans `:name`, `::name`, and an optional parenthesised argument.
    fn scan_pseudo(&mut self) -> Result<(), QueryError> {
        let start = self.position;
        let _ = self.consume();
        let is_pseudo_element = self.peek() == Some(':');
        if is_pseudo_element {
            let _ = self.consume();
        }
        let name = self.consume_ident()?;
        let text = if is_pseudo_element {
            format!(":{name}")
        } else {
            name
        };
        self.push(TokenKind::Pseudo, text, start);

        if self.peek() == Some('(') {
            let (argument, offset) = self.consume_pseudo_argument()?;
            self.push(TokenKind::PseudoArg, argument, offset);
        }
        Ok(())
    }

    /// Consume a balanced `( ... )` group, honouring quoted strings, and
    /// return its trimmed inner text with the offset of that text.
    fn consume_pseudo_argument(&mut self) -> Result<(String, usize), QueryError> {
        let open = self.position;
        let _ = self.consume();
        let inner_start = self.position;
        let mut depth = 1usize;

        loop {
            match self.peek() {
                None => {
                    return Err(QueryError::syntax(
                        open,
                        "unterminated pseudo-class argument",
                    ));
                }
                Some('"' | '\'') => {
                    let _ = self.consume_string()?;
                }
                Some('\\') => {
                    let _ = self.consume();
                    let _ = self.consume();
                }
                Some('(') => {
                    depth += 1;
                    if depth > self.max_depth {
                        return Err(QueryError::syntax(
                            self.position,
                            format!(
                                "pseudo-class arguments nested deeper than {}",
                                self.max_depth
                            ),
                        ));
                    }
                    let _ = self.consume();
                }
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        let raw = &self.input[inner_start..self.position];
                        let _ = self.consume();
                        let leading = raw.len() - raw.trim_start().len();
                        return Ok((raw.trim().to_string(), inner_start + leading));
                    }
                    let _ = self.consume();
                }
                Some(_) => {
                    let _ = self.consume();
                }
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(token));
        }
        if self.finished {
            return None;
        }
        match self.scan() {
            Ok(()) => self.pending.pop_front().map(Ok),
            Err(err) => {
                self.finished = true;
                self.pending.clear();
                Some(Err(err))
            }
        }
    }
}

/// Interpret a pseudo-class argument as a string.
///
/// A fully quoted argument is unescaped and unquoted; anything else is taken
/// literally. `offset` is the argument's position in the full selector text,
/// used for error reporting.
pub(crate) fn string_argument(raw: &str, offset: usize) -> Result<String, QueryError> {
    if !raw.starts_with(['"', '\'']) {
        return Ok(raw.to_string());
    }
    let mut tokenizer = Tokenizer::new(raw);
    let value = tokenizer
        .consume_string()
        .map_err(|_| QueryError::syntax(offset, "unterminated string"))?;
    if tokenizer.position != raw.len() {
        return Err(QueryError::syntax(
            offset + tokenizer.position,
            "unexpected characters after string argument",
        ));
    }
    Ok(value)
}

/// [§ 4.2 whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
