//! Bridge error types.

use ferry_codec::{ArithmeticError, CodecError, ValueKind};

/// Errors returned by a bridge adapter.
///
/// All variants are recoverable; none of them leaves a boundary buffer
/// unreleased.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// The local value is outside its category's representable domain.
    /// The foreign operation was not called.
    #[error("cannot encode {kind} argument: {source}")]
    EncodingFailed {
        kind: ValueKind,
        #[source]
        source: CodecError,
    },

    /// The foreign operation reported a typed failure.
    #[error("{operation} failed: {error}")]
    ForeignCallFailed {
        operation: &'static str,
        error: ArithmeticError,
    },

    /// The counterparty reported an internal failure instead of a result.
    #[error("{operation} panicked in the counterparty: {message}")]
    ForeignPanic {
        operation: &'static str,
        message: String,
    },

    /// The counterparty returned bytes that do not decode.
    #[error("{operation} returned a malformed result: {source}")]
    MalformedResult {
        operation: &'static str,
        #[source]
        source: CodecError,
    },
}

impl BridgeError {
    pub(crate) fn encoding(kind: ValueKind) -> impl FnOnce(CodecError) -> Self {
        move |source| Self::EncodingFailed { kind, source }
    }

    pub(crate) fn malformed(operation: &'static str) -> impl FnOnce(CodecError) -> Self {
        move |source| Self::MalformedResult { operation, source }
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
