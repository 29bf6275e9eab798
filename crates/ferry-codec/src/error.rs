//! Codec error types.

use crate::kind::ValueKind;

/// Errors raised while encoding or decoding a boundary value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A length or count does not fit the boundary's `i32` length field.
    #[error("{what} of length {len} exceeds the boundary limit of {} bytes or items", i32::MAX)]
    TooLong { what: &'static str, len: usize },

    /// Host UTF-16 text contained an unpaired surrogate.
    #[error("unpaired UTF-16 surrogate at code unit {index}")]
    UnpairedSurrogate { index: usize },

    /// A dynamically-typed value was handed to a codec for another kind.
    #[error("expected a {expected} value, found {found}")]
    KindMismatch { expected: ValueKind, found: ValueKind },

    /// The buffer ended before the value was complete.
    #[error("read past end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// Bytes were left over after the value was decoded.
    #[error("junk data left in buffer after decoding: {count} bytes")]
    TrailingBytes { count: usize },

    /// The bytes do not form a valid value of the expected kind.
    #[error("malformed {kind} value: {detail}")]
    Malformed { kind: &'static str, detail: String },
}

impl CodecError {
    /// Malformed-value helper.
    pub fn malformed(kind: &'static str, detail: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            detail: detail.into(),
        }
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
