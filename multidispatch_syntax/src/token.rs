//! Token definitions for the annotation lexer

use logos::Logos;

/// Annotation tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // ==================== Delimiters ====================
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,

    // ==================== Operators ====================
    /// Union separator (`int | str`)
    #[token("|")]
    Pipe,
    /// The wildcard type
    #[token("?")]
    Question,
    /// Homogeneous tuple marker (`Tuple[int, ...]`)
    #[token("...")]
    Ellipsis,

    // ==================== Atoms ====================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"-?[0-9]+")]
    IntLiteral,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    StringLiteral,
}

impl Token {
    /// Human readable description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::Comma => "','",
            Token::Pipe => "'|'",
            Token::Question => "'?'",
            Token::Ellipsis => "'...'",
            Token::Identifier => "identifier",
            Token::IntLiteral => "integer literal",
            Token::StringLiteral => "string literal",
        }
    }

    /// Check if this token can start a type expression
    pub fn starts_type(&self) -> bool {
        matches!(self, Token::Identifier | Token::Question)
    }

    /// Check if this token is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::IntLiteral | Token::StringLiteral)
    }
}
