use thiserror::Error;

/// Errors produced while parsing a [`Path`](crate::Path).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("path must start with an identifier at offset {0}")]
    ExpectedIdentifier(usize),

    #[error("empty segment at offset {0}")]
    EmptySegment(usize),

    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unclosed bracket at offset {0}")]
    UnclosedBracket(usize),

    #[error("invalid index at offset {0}")]
    InvalidIndex(usize),
}
