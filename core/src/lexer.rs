//! Lexer — Selector text into a finite token stream
//!
//! The lexer is context-free: `in` and `notin` always come out as keyword
//! tokens. Whether a keyword is really an operator or a value is decided by the
//! parser, which knows where in a requirement it is.

use std::borrow::Cow;

/// Token kinds produced by the [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Unrecognized run of operator characters; the literal carries the diagnostic.
    Error,
    /// End of input. Always the last token, emitted once.
    EndOfString,
    /// `)`
    ClosedPar,
    /// `,`
    Comma,
    /// `!`
    DoesNotExist,
    /// `==`
    DoubleEquals,
    /// `=`
    Equals,
    /// `>`
    GreaterThan,
    /// Key or value text.
    Identifier,
    /// `in`
    In,
    /// `<`
    LessThan,
    /// `!=`
    NotEquals,
    /// `notin`
    NotIn,
    /// `(`
    OpenPar,
}

/// A token and the text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedItem<'a> {
    /// The token kind.
    pub token: Token,
    /// Source text for identifiers and literals, the diagnostic for [`Token::Error`],
    /// empty for [`Token::EndOfString`].
    pub literal: Cow<'a, str>,
}

impl<'a> ScannedItem<'a> {
    fn new(token: Token, literal: impl Into<Cow<'a, str>>) -> Self {
        Self {
            token,
            literal: literal.into(),
        }
    }
}

/// Literal table for keyword and operator text. Identifiers and the two
/// synthetic tokens have no fixed spelling.
fn literal_token(literal: &str) -> Option<Token> {
    let token = match literal {
        ")" => Token::ClosedPar,
        "," => Token::Comma,
        "!" => Token::DoesNotExist,
        "==" => Token::DoubleEquals,
        "=" => Token::Equals,
        ">" => Token::GreaterThan,
        "in" => Token::In,
        "<" => Token::LessThan,
        "!=" => Token::NotEquals,
        "notin" => Token::NotIn,
        "(" => Token::OpenPar,
        _ => return None,
    };
    Some(token)
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_special_symbol(ch: u8) -> bool {
    matches!(ch, b'=' | b'!' | b'(' | b')' | b',' | b'>' | b'<')
}

/// Tokenizer for selector strings.
///
/// Works on bytes: every delimiter is ASCII, so identifier slices always fall on
/// `char` boundaries and non-ASCII text simply ends up inside an identifier.
///
/// # Example
///
/// ```
/// use labelsel::{Lexer, Token};
///
/// let tokens: Vec<Token> = Lexer::new("x != y").map(|item| item.token).collect();
/// assert_eq!(
///     tokens,
///     [Token::Identifier, Token::NotEquals, Token::Identifier, Token::EndOfString]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the full selector text.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            finished: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
    }

    /// Scan the next token. After the end of input, keeps returning
    /// [`Token::EndOfString`].
    pub fn lex(&mut self) -> ScannedItem<'a> {
        self.skip_whitespace();
        match self.peek() {
            None => ScannedItem::new(Token::EndOfString, ""),
            Some(ch) if is_special_symbol(ch) => self.scan_special_symbol(),
            Some(_) => self.scan_id_or_keyword(),
        }
    }

    /// Scan a run of non-delimiter bytes: a keyword if it spells one, else an identifier.
    fn scan_id_or_keyword(&mut self) -> ScannedItem<'a> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| !is_special_symbol(ch) && !is_whitespace(ch))
        {
            self.pos += 1;
        }
        let literal = &self.input[start..self.pos];
        match literal_token(literal) {
            Some(token) => ScannedItem::new(token, literal),
            None => ScannedItem::new(Token::Identifier, literal),
        }
    }

    /// Scan the longest operator literal at the start of a run of special symbols.
    ///
    /// Stops at the first byte that no longer extends a registered literal, so
    /// `!=(` yields `!=` and leaves `(` for the next call.
    fn scan_special_symbol(&mut self) -> ScannedItem<'a> {
        let start = self.pos;
        let mut end = start;
        let mut longest: Option<(Token, usize)> = None;

        while let Some(ch) = self.input.as_bytes().get(end).copied() {
            if !is_special_symbol(ch) {
                break;
            }
            end += 1;
            if let Some(token) = literal_token(&self.input[start..end]) {
                longest = Some((token, end));
            } else if longest.is_some() {
                break;
            }
        }

        match longest {
            Some((token, literal_end)) => {
                self.pos = literal_end;
                ScannedItem::new(token, &self.input[start..literal_end])
            }
            None => {
                self.pos = end;
                ScannedItem::new(
                    Token::Error,
                    format!(
                        "error expected: keyword found '{}'",
                        &self.input[start..end]
                    ),
                )
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ScannedItem<'a>;

    /// Yields every token up to and including [`Token::EndOfString`], then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.lex();
        if item.token == Token::EndOfString {
            self.finished = true;
        }
        Some(item)
    }
}
