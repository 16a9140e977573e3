//! Parser — Recursive descent over a buffered token stream
//!
//! The whole input is lexed up front; the parser then walks the buffer with one
//! token of lookahead. Grammar:
//!
//! ```text
//! selector          := requirement ("," requirement)* | ε
//! requirement       := "!" KEY | KEY [ set-restriction | exact-restriction ]
//! set-restriction   := ("in" | "notin") "(" values ")"
//! exact-restriction := ("=" | "==" | "!=" | ">" | "<") VALUE
//! values            := ε | VALUE ("," VALUE)*
//! ```
//!
//! # Context-sensitive keywords
//!
//! `in` and `notin` are operators only right after a key. Everywhere a key or a
//! value is expected they are plain identifiers, so `in in (in, notin)` is a valid
//! selector. Every [`lookahead`](Parser::lookahead) and [`consume`](Parser::consume)
//! takes the [`ParserContext`] that decides how those two tokens decode.

use crate::lexer::{Lexer, ScannedItem, Token};
use crate::requirement::validate_key;
use crate::{Operator, Requirement, Selector, SelectorError};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Which grammar position the parser is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserContext {
    /// Right after a key: `in` / `notin` are operators.
    KeyAndOperator,
    /// Keys and values: `in` / `notin` are identifiers.
    Values,
}

/// Parse a selector string.
///
/// Requirements are sorted by key; requirements sharing a key keep their
/// order of appearance. The empty string parses to [`Selector::everything`].
///
/// # Errors
///
/// Returns the first syntax or validation error. No partial selector is
/// produced.
///
/// # Example
///
/// ```
/// let selector = labelsel::parse("x in (in), !y").unwrap();
/// assert_eq!(selector.to_string(), "x in (in),!y");
/// ```
pub fn parse(selector: &str) -> Result<Selector, SelectorError> {
    parse_to_requirements(selector).map(Selector::from_requirements)
}

/// Parse a selector string into its sorted requirement list.
///
/// For callers that post-process requirements (e.g. to push exact matches down
/// into a query) rather than match with them.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_to_requirements(selector: &str) -> Result<Vec<Requirement>, SelectorError> {
    let mut parser = Parser::new(selector);
    let mut requirements = parser.parse().inspect_err(|err| {
        tracing::debug!(selector, error = %err, "selector parse failed");
    })?;
    requirements.sort_by(|a, b| a.key().cmp(b.key()));
    Ok(requirements)
}

/// Parser state: the scanned items and a cursor into them.
struct Parser<'a> {
    items: Vec<ScannedItem<'a>>,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let items: Vec<ScannedItem<'a>> = Lexer::new(input).collect();
        tracing::trace!(tokens = items.len(), "scanned selector");
        Self { items, position: 0 }
    }

    /// The item at `index`, clamped to the trailing end-of-string item.
    fn item(&self, index: usize) -> &ScannedItem<'a> {
        let last = self.items.len() - 1;
        &self.items[index.min(last)]
    }

    /// The current token, decoded for `context`. Does not advance.
    fn lookahead(&self, context: ParserContext) -> (Token, Cow<'a, str>) {
        let item = self.item(self.position);
        (decode(item.token, context), item.literal.clone())
    }

    /// The current token, decoded for `context`. Advances past it.
    fn consume(&mut self, context: ParserContext) -> (Token, Cow<'a, str>) {
        let result = self.lookahead(context);
        self.position += 1;
        result
    }

    fn parse(&mut self) -> Result<Vec<Requirement>, SelectorError> {
        let mut requirements = Vec::new();
        loop {
            let (token, literal) = self.lookahead(ParserContext::Values);
            match token {
                Token::Identifier | Token::DoesNotExist => {
                    let requirement = self
                        .parse_requirement()
                        .map_err(|e| SelectorError::InRequirement(Box::new(e)))?;
                    requirements.push(requirement);

                    let (token, literal) = self.consume(ParserContext::Values);
                    match token {
                        Token::EndOfString => return Ok(requirements),
                        Token::Comma => {
                            let (next, next_literal) = self.lookahead(ParserContext::Values);
                            if next != Token::Identifier && next != Token::DoesNotExist {
                                return Err(unexpected(
                                    next,
                                    &next_literal,
                                    "identifier after ','",
                                ));
                            }
                        }
                        _ => return Err(unexpected(token, &literal, "',' or 'end of string'")),
                    }
                }
                Token::EndOfString => return Ok(requirements),
                _ => {
                    return Err(unexpected(
                        token,
                        &literal,
                        "!, identifier, or 'end of string'",
                    ))
                }
            }
        }
    }

    fn parse_requirement(&mut self) -> Result<Requirement, SelectorError> {
        let (key, inferred) = self.parse_key_and_infer_operator()?;
        if let Some(operator) = inferred {
            return Requirement::new(key, operator, Vec::<String>::new());
        }

        let operator = self.parse_operator()?;
        let values = if operator.is_set_based() {
            self.parse_values()?
        } else {
            self.parse_exact_value()?
        };
        Requirement::new(key, operator, values)
    }

    /// Read an optional `!` and a key.
    ///
    /// Returns the operator when it is already decided: `DoesNotExist` after a
    /// `!`, or `Exists` when the key is followed by `,` or end of input.
    fn parse_key_and_infer_operator(
        &mut self,
    ) -> Result<(String, Option<Operator>), SelectorError> {
        let mut operator = None;
        let (mut token, mut literal) = self.consume(ParserContext::Values);
        if token == Token::DoesNotExist {
            operator = Some(Operator::DoesNotExist);
            (token, literal) = self.consume(ParserContext::Values);
        }
        if token != Token::Identifier {
            return Err(unexpected(token, &literal, "identifier"));
        }
        validate_key(&literal)?;

        let (next, _) = self.lookahead(ParserContext::Values);
        if matches!(next, Token::EndOfString | Token::Comma) && operator.is_none() {
            operator = Some(Operator::Exists);
        }
        Ok((literal.into_owned(), operator))
    }

    fn parse_operator(&mut self) -> Result<Operator, SelectorError> {
        let (token, literal) = self.consume(ParserContext::KeyAndOperator);
        let operator = match token {
            Token::In => Operator::In,
            Token::Equals => Operator::Equals,
            Token::DoubleEquals => Operator::DoubleEquals,
            Token::GreaterThan => Operator::GreaterThan,
            Token::LessThan => Operator::LessThan,
            Token::NotIn => Operator::NotIn,
            Token::NotEquals => Operator::NotEquals,
            // `!` is unary and only valid before a key.
            _ => {
                return Err(unexpected(
                    token,
                    &literal,
                    "'=', '!=', '==', '>', '<', 'in', 'notin'",
                ))
            }
        };
        Ok(operator)
    }

    /// Parse a parenthesized value set. `()` is the set holding the empty string.
    fn parse_values(&mut self) -> Result<BTreeSet<String>, SelectorError> {
        let (token, literal) = self.consume(ParserContext::Values);
        if token != Token::OpenPar {
            return Err(unexpected(token, &literal, "'('"));
        }

        let (token, literal) = self.lookahead(ParserContext::Values);
        match token {
            Token::Identifier | Token::Comma => {
                let values = self.parse_identifiers_list()?;
                let (token, literal) = self.consume(ParserContext::Values);
                if token != Token::ClosedPar {
                    return Err(unexpected(token, &literal, "')'"));
                }
                Ok(values)
            }
            Token::ClosedPar => {
                self.consume(ParserContext::Values);
                Ok(BTreeSet::from([String::new()]))
            }
            _ => Err(unexpected(token, &literal, "',', ')' or identifier")),
        }
    }

    /// Parse comma-separated, possibly empty identifiers up to (not including) `)`.
    ///
    /// A leading, trailing or doubled comma contributes an empty-string value.
    fn parse_identifiers_list(&mut self) -> Result<BTreeSet<String>, SelectorError> {
        let mut values = BTreeSet::new();
        loop {
            let (token, literal) = self.consume(ParserContext::Values);
            match token {
                Token::Identifier => {
                    values.insert(literal.into_owned());
                    let (next, next_literal) = self.lookahead(ParserContext::Values);
                    match next {
                        Token::Comma => continue,
                        Token::ClosedPar => return Ok(values),
                        _ => return Err(unexpected(next, &next_literal, "',' or ')'")),
                    }
                }
                Token::Comma => {
                    // "(,"
                    if values.is_empty() {
                        values.insert(String::new());
                    }
                    let (next, _) = self.lookahead(ParserContext::Values);
                    match next {
                        // ",)"
                        Token::ClosedPar => {
                            values.insert(String::new());
                            return Ok(values);
                        }
                        // ",,"
                        Token::Comma => {
                            self.consume(ParserContext::Values);
                            values.insert(String::new());
                        }
                        _ => {}
                    }
                }
                _ => return Err(unexpected(token, &literal, "',', or identifier")),
            }
        }
    }

    /// Parse the single value of an exact-match restriction. A missing value is
    /// the empty string.
    fn parse_exact_value(&mut self) -> Result<BTreeSet<String>, SelectorError> {
        let (token, _) = self.lookahead(ParserContext::Values);
        if matches!(token, Token::EndOfString | Token::Comma) {
            return Ok(BTreeSet::from([String::new()]));
        }
        let (token, literal) = self.consume(ParserContext::Values);
        if token == Token::Identifier {
            Ok(BTreeSet::from([literal.into_owned()]))
        } else {
            Err(unexpected(token, &literal, "identifier"))
        }
    }
}

/// Keywords read in a value position are identifiers.
fn decode(token: Token, context: ParserContext) -> Token {
    match (context, token) {
        (ParserContext::Values, Token::In | Token::NotIn) => Token::Identifier,
        _ => token,
    }
}

/// Error for a token the grammar does not allow here.
fn unexpected(token: Token, literal: &str, expected: &str) -> SelectorError {
    if token == Token::Error {
        SelectorError::Lex {
            literal: literal.to_owned(),
        }
    } else {
        SelectorError::syntax(format!("found '{literal}', expected: {expected}"))
    }
}
