//! Parse error types

use crate::span::Span;
use thiserror::Error;

/// Parse error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unexpected token
    #[error("unexpected token '{found}' at {span}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Unexpected end of input
    #[error("unexpected end of annotation at {span}, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// Unclosed bracket
    #[error("unclosed bracket '{bracket}' at {span}")]
    UnclosedBracket { bracket: char, span: Span },

    /// Invalid integer literal (out of range)
    #[error("invalid number literal '{literal}' at {span}")]
    InvalidNumber { literal: String, span: Span },

    /// Invalid escape sequence in a string literal
    #[error("invalid escape sequence '{sequence}' at {span}")]
    InvalidEscape { sequence: String, span: Span },

    /// Lexer error
    #[error("unrecognized character at {span}")]
    LexerError { span: Span },
}

impl ParseError {
    /// Get the span of the error
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => span,
            ParseError::UnexpectedEof { span, .. } => span,
            ParseError::UnclosedBracket { span, .. } => span,
            ParseError::InvalidNumber { span, .. } => span,
            ParseError::InvalidEscape { span, .. } => span,
            ParseError::LexerError { span } => span,
        }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    /// Create an unexpected end-of-input error
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }

    /// Format error with source context
    ///
    /// Returns the annotation followed by a caret marker under the error.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let col = span.start.min(source.len());
        let len = span.len().max(1);
        format!(
            "  | {}\n  | {}{}",
            source,
            " ".repeat(col),
            "^".repeat(len)
        )
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
