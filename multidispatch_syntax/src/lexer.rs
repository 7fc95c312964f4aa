//! Lexer for annotation text
//!
//! Wraps the logos-generated lexer with one token of lookahead and
//! converts logos errors into spanned [`ParseError`]s.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// Annotation lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    /// Peeked token (for lookahead)
    peeked: Option<ParseResult<SpannedToken<'a>>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given annotation
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    /// Get the source text
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Span pointing just past the last byte of the source
    pub fn end_span(&self) -> Span {
        Span::point(self.source.len())
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&ParseResult<SpannedToken<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.next_token_internal();
        }
        self.peeked.as_ref()
    }

    /// Kind of the next token, if any (errors are left in place for `next_token`)
    pub fn peek_kind(&mut self) -> Option<Token> {
        match self.peek() {
            Some(Ok(tok)) => Some(tok.token),
            _ => None,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        self.next_token_internal()
    }

    fn next_token_internal(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        let result = self.inner.next()?;
        let range = self.inner.span();
        let span = Span::new(range.start, range.end);
        Some(match result {
            Ok(token) => Ok(SpannedToken::new(token, span, self.inner.slice())),
            Err(()) => Err(ParseError::LexerError { span }),
        })
    }
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("source", &self.source)
            .field("position", &self.inner.span().end)
            .field("peeked", &self.peeked)
            .finish()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize an annotation into a vector of tokens
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    Lexer::new(source).collect()
}
