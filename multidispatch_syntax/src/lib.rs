//! multidispatch_syntax
//!
//! Lexer and parser for the type annotation language used by
//! `multidispatch` signatures.
//!
//! # Example
//!
//! ```
//! use multidispatch_syntax::{parse, TypeExprKind};
//!
//! let expr = parse("List[int]").expect("parse failed");
//! assert!(matches!(expr.kind, TypeExprKind::Apply { .. }));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{LiteralExpr, TypeExpr, TypeExprKind};
pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::Parser;
pub use span::Span;
pub use token::Token;

/// Parse an annotation into a [`TypeExpr`]
///
/// # Example
///
/// ```
/// use multidispatch_syntax::parse;
///
/// let expr = parse("int | str").unwrap();
/// assert_eq!(expr.to_string(), "int | str");
/// ```
pub fn parse(source: &str) -> ParseResult<TypeExpr> {
    parser::parse(source)
}

/// Tokenize an annotation
///
/// Returns a vector of tokens with their spans.
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    lexer::tokenize(source)
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
