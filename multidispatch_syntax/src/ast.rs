//! Annotation syntax tree
//!
//! The parser produces a [`TypeExpr`] tree that still uses surface names
//! (`int`, `Optional`, user class names). Resolving names into canonical
//! types is the job of the consumer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A parsed annotation expression with its source span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

/// Annotation expression variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExprKind {
    /// Bare name: `int`, `Any`, `Circle`
    Name(String),
    /// Subscripted name: `List[int]`, `Dict[str, int]`
    Apply { base: String, args: Vec<TypeExpr> },
    /// `a | b | c`
    Union(Vec<TypeExpr>),
    /// `?`
    Wildcard,
    /// `...` (only meaningful as the last argument of `Tuple`)
    Ellipsis,
    /// Literal value argument: `Literal[1, "a"]`
    Literal(LiteralExpr),
}

/// Literal values that may appear as annotation arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralExpr {
    Int(i64),
    Str(String),
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Name of a bare or subscripted expression
    pub fn head_name(&self) -> Option<&str> {
        match &self.kind {
            TypeExprKind::Name(name) => Some(name),
            TypeExprKind::Apply { base, .. } => Some(base),
            _ => None,
        }
    }

    /// Check if this is the `...` marker
    pub fn is_ellipsis(&self) -> bool {
        matches!(self.kind, TypeExprKind::Ellipsis)
    }
}

impl fmt::Display for LiteralExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralExpr::Int(n) => write!(f, "{}", n),
            LiteralExpr::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Name(name) => write!(f, "{}", name),
            TypeExprKind::Apply { base, args } => {
                write!(f, "{}[", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
            TypeExprKind::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            TypeExprKind::Wildcard => write!(f, "?"),
            TypeExprKind::Ellipsis => write!(f, "..."),
            TypeExprKind::Literal(lit) => write!(f, "{}", lit),
        }
    }
}
