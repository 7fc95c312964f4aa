//! Errors raised while building types from annotations.

use multidispatch_syntax::{ParseError, Span};
use thiserror::Error;

/// Type construction error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// Annotation text is not well formed
    #[error("invalid annotation: {0}")]
    Syntax(#[from] ParseError),

    /// Name is neither a builtin nor a registered class
    #[error("unknown type name '{name}' at {span}")]
    UnknownName { name: String, span: Span },

    /// Wrong number of type arguments
    #[error("'{name}' expects {expected} type argument(s), got {found}")]
    WrongArity {
        name: String,
        expected: String,
        found: usize,
    },

    /// Type arguments given to a non-generic type
    #[error("'{name}' does not take type arguments")]
    NotGeneric { name: String },

    /// New item is not within the bound of the generic being parameterized
    #[error("cannot parameterize {base} with {item}: not a subtype of {bound}")]
    InvalidParameter {
        base: String,
        item: String,
        bound: String,
    },

    /// `...` anywhere but `Tuple[T, ...]`
    #[error("'...' is only allowed as the last argument of Tuple[T, ...] (at {span})")]
    MisplacedEllipsis { span: Span },

    /// A literal value outside `Literal[...]`, or a non-literal inside it
    #[error("invalid literal argument '{found}' at {span}")]
    InvalidLiteral { found: String, span: Span },

    /// Regular expression for a string constraint failed to compile
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Result type for type construction
pub type TypeResult<T> = Result<T, TypeError>;
