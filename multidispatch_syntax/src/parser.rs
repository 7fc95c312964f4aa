//! Recursive-descent parser for annotations
//!
//! ```text
//! type    := member ('|' member)*
//! member  := '?' | NAME ('[' args ']')?
//! args    := arg (',' arg)*
//! arg     := type | '...' | INT | STRING
//! ```

use crate::ast::{LiteralExpr, TypeExpr, TypeExprKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Token;

/// Annotation parser
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse a complete annotation; trailing tokens are an error
    pub fn parse(mut self) -> ParseResult<TypeExpr> {
        let expr = self.parse_union()?;
        match self.lexer.next_token() {
            None => Ok(expr),
            Some(tok) => {
                let tok = tok?;
                Err(ParseError::unexpected_token(
                    tok.text,
                    "end of annotation",
                    tok.span,
                ))
            }
        }
    }

    fn expect_token(&mut self, expected: &str) -> ParseResult<SpannedToken<'a>> {
        match self.lexer.next_token() {
            Some(tok) => tok,
            None => Err(ParseError::unexpected_eof(expected, self.lexer.end_span())),
        }
    }

    fn parse_union(&mut self) -> ParseResult<TypeExpr> {
        let first = self.parse_member()?;
        if self.lexer.peek_kind() != Some(Token::Pipe) {
            return Ok(first);
        }

        let mut span = first.span;
        let mut members = vec![first];
        while self.lexer.peek_kind() == Some(Token::Pipe) {
            self.expect_token("'|'")?;
            let member = self.parse_member()?;
            span = span.merge(&member.span);
            members.push(member);
        }
        Ok(TypeExpr::new(TypeExprKind::Union(members), span))
    }

    fn parse_member(&mut self) -> ParseResult<TypeExpr> {
        let tok = self.expect_token("a type")?;
        match tok.token {
            Token::Question => Ok(TypeExpr::new(TypeExprKind::Wildcard, tok.span)),
            Token::Identifier => {
                if self.lexer.peek_kind() != Some(Token::LBracket) {
                    return Ok(TypeExpr::new(
                        TypeExprKind::Name(tok.text.to_string()),
                        tok.span,
                    ));
                }
                let open = self.expect_token("'['")?;
                let (args, close) = self.parse_args(open.span)?;
                Ok(TypeExpr::new(
                    TypeExprKind::Apply {
                        base: tok.text.to_string(),
                        args,
                    },
                    tok.span.merge(&close),
                ))
            }
            _ => Err(ParseError::unexpected_token(tok.text, "a type", tok.span)),
        }
    }

    /// Parse arguments after '[' up to and including the closing ']'
    fn parse_args(&mut self, open: Span) -> ParseResult<(Vec<TypeExpr>, Span)> {
        let mut args = Vec::new();
        loop {
            if self.lexer.peek().is_none() {
                return Err(ParseError::UnclosedBracket {
                    bracket: '[',
                    span: open,
                });
            }
            args.push(self.parse_arg()?);

            let Some(tok) = self.lexer.next_token() else {
                return Err(ParseError::UnclosedBracket {
                    bracket: '[',
                    span: open,
                });
            };
            let tok = tok?;
            match tok.token {
                Token::Comma => continue,
                Token::RBracket => return Ok((args, tok.span)),
                _ => {
                    return Err(ParseError::unexpected_token(
                        tok.text,
                        "',' or ']'",
                        tok.span,
                    ))
                }
            }
        }
    }

    fn parse_arg(&mut self) -> ParseResult<TypeExpr> {
        match self.lexer.peek_kind() {
            Some(Token::Ellipsis) => {
                let tok = self.expect_token("'...'")?;
                Ok(TypeExpr::new(TypeExprKind::Ellipsis, tok.span))
            }
            Some(Token::IntLiteral) => {
                let tok = self.expect_token("integer literal")?;
                let value = tok
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::InvalidNumber {
                        literal: tok.text.to_string(),
                        span: tok.span,
                    })?;
                Ok(TypeExpr::new(
                    TypeExprKind::Literal(LiteralExpr::Int(value)),
                    tok.span,
                ))
            }
            Some(Token::StringLiteral) => {
                let tok = self.expect_token("string literal")?;
                let value = unescape(tok.text, tok.span)?;
                Ok(TypeExpr::new(
                    TypeExprKind::Literal(LiteralExpr::Str(value)),
                    tok.span,
                ))
            }
            _ => self.parse_union(),
        }
    }
}

/// Strip the quotes from a string literal and resolve escapes
fn unescape(text: &str, span: Span) -> ParseResult<String> {
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                return Err(ParseError::InvalidEscape {
                    sequence: format!("\\{}", other),
                    span,
                })
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    sequence: "\\".to_string(),
                    span,
                })
            }
        }
    }
    Ok(out)
}

/// Parse an annotation
pub fn parse(source: &str) -> ParseResult<TypeExpr> {
    Parser::new(source).parse()
}
