use bind_value::{PathError, ValueKind};
use thiserror::Error;

/// Syntax errors inside an `@{...}` interpolation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unclosed interpolation starting at offset {0}")]
    UnclosedInterpolation(usize),

    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unclosed string literal starting at offset {0}")]
    UnclosedString(usize),

    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),

    #[error("invalid operation name {0:?}")]
    InvalidOperationName(String),

    #[error("invalid binding {text:?}: {source}")]
    InvalidBinding {
        text: String,
        #[source]
        source: PathError,
    },
}

/// Evaluation-time failures of a single operation.
///
/// These never escape evaluation; the evaluator logs them and yields
/// `Value::Null` for the failing sub-expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    #[error("operation not found: {0}")]
    NotFound(String),

    #[error("\"{operation}\" expects {expected} parameters, got {actual}")]
    Arity {
        operation: String,
        expected: String,
        actual: usize,
    },

    #[error("parameter {index} has unsupported kind {kind}")]
    InvalidParameter { index: usize, kind: ValueKind },

    #[error("OUT_OF_BOUNDS")]
    OutOfBounds,

    #[error("DIVISION_BY_ZERO")]
    DivisionByZero,

    #[error("OVERFLOW")]
    Overflow,

    #[error("{0}")]
    Other(String),
}

/// Reasons an operation registration is refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegisterError {
    #[error("invalid operation name: {0:?}")]
    InvalidName(String),
}
