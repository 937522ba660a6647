//! The closed error taxonomy surfaced by the public codec API.

use thiserror::Error;

use crate::typesys::TypeRef;

/// A position within a text-form input, used by [`CodecError::Parse`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextPos {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for TextPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} (byte {})", self.line, self.column, self.offset)
    }
}

/// Every way a codec operation can fail.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("parse error at {pos}: {message}")]
    Parse { pos: TextPos, message: String },

    #[error("decode error at byte offset {offset}: {message}")]
    Decode { offset: usize, message: String },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("ambiguous reference: {0}")]
    AmbiguousReference(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub fn parse(pos: TextPos, message: impl Into<String>) -> Self {
        CodecError::Parse {
            pos,
            message: message.into(),
        }
    }

    pub fn decode(offset: usize, message: impl Into<String>) -> Self {
        CodecError::Decode {
            offset,
            message: message.into(),
        }
    }

    pub fn type_mismatch(expected: &TypeRef, found: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            expected: format!("{expected:?}"),
            found: found.into(),
        }
    }
}
