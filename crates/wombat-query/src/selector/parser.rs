//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! Turns the token stream into a [`SelectorList`]. The parser pulls tokens
//! lazily with one token of lookahead; the first error aborts the whole list.

use std::sync::Arc;

use wombat_common::warning::warn_once;

use super::nth::{MAX_MAGNITUDE, NthExpr, parse_bounded};
use super::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    PseudoSelector, SelectorList, SimpleSelector,
};
use crate::config::{QueryConfig, UnknownPseudoClassPolicy};
use crate::error::QueryError;
use crate::pseudo::{ArgumentKind, PseudoArg, PseudoKind, PseudoRegistry};
use crate::tokenizer::{Token, TokenKind, Tokenizer, string_argument};

pub(super) struct Parser<'s, 'c> {
    source: &'s str,
    tokens: Tokenizer<'s>,
    lookahead: Option<Token>,
    config: &'c QueryConfig,
    registry: &'c PseudoRegistry,
    /// Offset of `source` within the outermost selector text
    base_offset: usize,
    /// How many selector arguments enclose this parser
    depth: usize,
    /// Whether alternatives may start with a combinator
    relative: bool,
}

impl<'s, 'c> Parser<'s, 'c> {
    pub(super) fn new(source: &'s str, config: &'c QueryConfig, registry: &'c PseudoRegistry) -> Self {
        Self {
            source,
            tokens: Tokenizer::with_max_depth(source, config.max_nesting_depth),
            lookahead: None,
            config,
            registry,
            base_offset: 0,
            depth: 0,
            relative: true,
        }
    }

    /// A parser for the selector argument of a pseudo-class.
    fn nested<'n>(&self, source: &'n str, base_offset: usize, relative: bool) -> Parser<'n, 'c> {
        Parser {
            source,
            tokens: Tokenizer::with_max_depth(source, self.config.max_nesting_depth),
            lookahead: None,
            config: self.config,
            registry: self.registry,
            base_offset,
            depth: self.depth + 1,
            relative,
        }
    }

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    pub(super) fn parse(mut self) -> Result<SelectorList, QueryError> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_complex()?);
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::Eof => break,
                _ => return Err(unexpected(&token)),
            }
        }
        Ok(SelectorList::new(selectors, self.source))
    }

    fn pull(&mut self) -> Result<Token, QueryError> {
        let base = self.base_offset;
        match self.tokens.next() {
            Some(Ok(mut token)) => {
                token.offset += base;
                Ok(token)
            }
            Some(Err(err)) => Err(shift(err, base)),
            None => Ok(Token::new(TokenKind::Eof, "", base + self.source.len())),
        }
    }

    fn peek(&mut self) -> Result<&Token, QueryError> {
        if self.lookahead.is_none() {
            let token = self.pull()?;
            self.lookahead = Some(token);
        }
        self.lookahead
            .as_ref()
            .ok_or_else(|| QueryError::syntax(self.base_offset, "unexpected end of input"))
    }

    fn peek_kind(&mut self) -> Result<TokenKind, QueryError> {
        self.peek().map(|token| token.kind)
    }

    fn next_token(&mut self) -> Result<Token, QueryError> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.pull(),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, QueryError> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(QueryError::syntax(
                token.offset,
                format!("expected {kind}, found {}", token.kind),
            ))
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    fn parse_complex(&mut self) -> Result<ComplexSelector, QueryError> {
        let leading = match self.peek_kind()? {
            TokenKind::Combinator(combinator) => {
                let token = self.next_token()?;
                if !self.relative {
                    return Err(QueryError::syntax(
                        token.offset,
                        format!("'{combinator}' cannot start a selector here"),
                    ));
                }
                Some(combinator)
            }
            _ => None,
        };

        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        loop {
            let offset = self.peek()?.offset;
            let compound = self.parse_compound()?;
            if compound.simple_selectors.is_empty() {
                let reason = if compounds.is_empty() && leading.is_none() {
                    "empty selector"
                } else {
                    "expected a selector after combinator"
                };
                return Err(QueryError::syntax(offset, reason));
            }
            compounds.push(compound);

            match self.peek_kind()? {
                TokenKind::Combinator(combinator) => {
                    let _ = self.next_token()?;
                    combinators.push(combinator);
                }
                // A type selector straight after a compound starts a new one.
                TokenKind::Ident | TokenKind::Universal => combinators.push(Combinator::Descendant),
                _ => break,
            }
        }

        let subject = compounds.pop().unwrap_or_default();
        Ok(ComplexSelector {
            subject,
            combinators: combinators
                .into_iter()
                .rev()
                .zip(compounds.into_iter().rev())
                .collect(),
            leading,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// "If it contains a type selector or universal selector, that selector
    /// must come first in the sequence."
    fn parse_compound(&mut self) -> Result<CompoundSelector, QueryError> {
        let mut simple_selectors = Vec::new();
        match self.peek_kind()? {
            TokenKind::Ident => simple_selectors.push(SimpleSelector::Type(self.next_token()?.text)),
            TokenKind::Universal => {
                let _ = self.next_token()?;
                simple_selectors.push(SimpleSelector::Universal);
            }
            _ => {}
        }

        loop {
            let simple = match self.peek_kind()? {
                TokenKind::Id => SimpleSelector::Id(self.next_token()?.text),
                TokenKind::Class => SimpleSelector::Class(self.next_token()?.text),
                TokenKind::AttributeOpen => self.parse_attribute()?,
                TokenKind::Pseudo => self.parse_pseudo()?,
                _ => break,
            };
            simple_selectors.push(simple);
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self) -> Result<SimpleSelector, QueryError> {
        let _ = self.expect(TokenKind::AttributeOpen)?;
        let name = self.expect(TokenKind::Ident)?.text;
        let mut selector = AttributeSelector {
            name,
            operator: AttrOperator::Exists,
            value: String::new(),
            case_sensitive: self.config.case_sensitive_attributes,
        };

        let token = self.next_token()?;
        match token.kind {
            TokenKind::AttributeClose => return Ok(SimpleSelector::Attribute(selector)),
            TokenKind::AttributeOperator => {
                selector.operator = AttrOperator::from_token(&token.text).ok_or_else(|| {
                    QueryError::syntax(
                        token.offset,
                        format!("unknown attribute operator '{}'", token.text),
                    )
                })?;
            }
            _ => return Err(unexpected(&token)),
        }

        let value = self.next_token()?;
        if !matches!(value.kind, TokenKind::String | TokenKind::Ident) {
            return Err(unexpected(&value));
        }
        selector.value = value.text;

        let mut token = self.next_token()?;
        if token.kind == TokenKind::Ident {
            // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
            selector.case_sensitive = match token.text.to_ascii_lowercase().as_str() {
                "i" => false,
                "s" => true,
                _ => {
                    return Err(QueryError::syntax(
                        token.offset,
                        format!("unknown attribute flag '{}'", token.text),
                    ));
                }
            };
            token = self.next_token()?;
        }
        if token.kind != TokenKind::AttributeClose {
            return Err(unexpected(&token));
        }
        Ok(SimpleSelector::Attribute(selector))
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, QueryError> {
        let token = self.expect(TokenKind::Pseudo)?;
        let argument = if self.peek_kind()? == TokenKind::PseudoArg {
            Some(self.next_token()?)
        } else {
            None
        };
        let name = token.text.to_ascii_lowercase();

        let Some(evaluator) = self.registry.get(&name) else {
            return match self.config.unknown_pseudo_class {
                UnknownPseudoClassPolicy::Fail => Err(QueryError::UnknownPseudoClass {
                    name,
                    offset: token.offset,
                }),
                UnknownPseudoClassPolicy::Ignore => {
                    warn_once(
                        "Selector",
                        &format!("unknown pseudo-class ':{name}' never matches"),
                    );
                    Ok(SimpleSelector::NeverMatch)
                }
            };
        };

        if evaluator.kind() == PseudoKind::Positional && self.depth > 0 {
            return Err(QueryError::syntax(
                token.offset,
                format!("positional pseudo-class ':{name}' cannot appear inside a selector argument"),
            ));
        }
        let argument = self.parse_argument(evaluator.argument(), &name, token.offset, argument)?;
        Ok(SimpleSelector::PseudoClass(PseudoSelector::new(
            name, argument, evaluator,
        )))
    }

    fn parse_argument(
        &self,
        kind: ArgumentKind,
        name: &str,
        offset: usize,
        raw: Option<Token>,
    ) -> Result<PseudoArg, QueryError> {
        let Some(raw) = raw else {
            return if kind == ArgumentKind::None {
                Ok(PseudoArg::None)
            } else {
                Err(QueryError::syntax(
                    offset,
                    format!(":{name}() requires an argument"),
                ))
            };
        };

        match kind {
            ArgumentKind::None => Err(QueryError::syntax(
                raw.offset,
                format!(":{name} does not take an argument"),
            )),
            ArgumentKind::Number => parse_bounded(&raw.text)
                .map(PseudoArg::Number)
                .ok_or_else(|| {
                    QueryError::syntax(
                        raw.offset,
                        format!(
                            "expected an integer within ±{MAX_MAGNITUDE}, found '{}'",
                            raw.text
                        ),
                    )
                }),
            ArgumentKind::Formula => NthExpr::parse(&raw.text)
                .map(PseudoArg::Formula)
                .ok_or_else(|| {
                    QueryError::syntax(raw.offset, format!("invalid An+B expression '{}'", raw.text))
                }),
            ArgumentKind::Text => string_argument(&raw.text, raw.offset).map(PseudoArg::Text),
            ArgumentKind::Selector | ArgumentKind::RelativeSelector => {
                if self.depth + 1 > self.config.max_nesting_depth {
                    return Err(QueryError::syntax(
                        raw.offset,
                        format!(
                            "selector arguments nested deeper than {}",
                            self.config.max_nesting_depth
                        ),
                    ));
                }
                let relative = kind == ArgumentKind::RelativeSelector;
                self.nested(&raw.text, raw.offset, relative)
                    .parse()
                    .map(|list| PseudoArg::Selector(Arc::new(list)))
            }
        }
    }
}

fn unexpected(token: &Token) -> QueryError {
    QueryError::syntax(token.offset, format!("unexpected {}", token.kind))
}

/// Move a tokenizer error from argument-relative to absolute offsets.
fn shift(err: QueryError, base: usize) -> QueryError {
    match err {
        QueryError::Syntax { offset, reason } => QueryError::Syntax {
            offset: offset + base,
            reason,
        },
        other => other,
    }
}
