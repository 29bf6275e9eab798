//! The foreign operation surface.
//!
//! The bridge never links against the counterparty directly. It is handed a
//! [`ForeignSurface`], a table of C function pointers, and [`Operation`] names
//! each entry together with the kinds it accepts and returns.

use std::fmt;

use ferry_codec::{
    ArithmeticError, ByRefRecord, CallStatus, ForeignBuffer, ForeignBytes, Point, ValueKind,
};

/// A buffer-carried operation: argument lent as bytes, result returned as an
/// owned buffer, decode failures and panics reported through the status.
pub type BufferOp = for<'a> extern "C" fn(ForeignBytes<'a>, *mut CallStatus) -> ForeignBuffer;

/// Function-pointer table of one counterparty library.
#[derive(Clone, Copy)]
pub struct ForeignSurface {
    pub bool_op: extern "C" fn(i8) -> i8,
    pub i8_op: extern "C" fn(i8) -> i8,
    pub i16_op: extern "C" fn(i16) -> i16,
    pub i32_op: extern "C" fn(i32) -> i32,
    pub i64_op: extern "C" fn(i64) -> i64,
    pub u8_op: extern "C" fn(u8) -> u8,
    pub u16_op: extern "C" fn(u16) -> u16,
    pub u32_op: extern "C" fn(u32) -> u32,
    pub u64_op: extern "C" fn(u64) -> u64,
    pub f32_op: extern "C" fn(f32) -> f32,
    pub f64_op: extern "C" fn(f64) -> f64,
    pub text_op: BufferOp,
    pub optional_op: BufferOp,
    pub sequence_op: BufferOp,
    pub mapping_op: BufferOp,
    pub record_op: extern "C" fn(*mut Point),
    pub void_op: extern "C" fn(i32),
    pub fallible_op: extern "C" fn(u64, u64, *mut CallStatus) -> u64,
    /// Releases a buffer the counterparty returned.
    pub buffer_free: extern "C" fn(ForeignBuffer),
}

impl fmt::Debug for ForeignSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignSurface")
            .field("fallible_op", &(self.fallible_op as *const ()))
            .field("buffer_free", &(self.buffer_free as *const ()))
            .finish_non_exhaustive()
    }
}

/// One foreign operation, identified independently of its function pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Optional,
    Sequence,
    Mapping,
    Record,
    Void,
    Fallible,
}

impl Operation {
    pub const ALL: [Operation; 18] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Text,
        Self::Optional,
        Self::Sequence,
        Self::Mapping,
        Self::Record,
        Self::Void,
        Self::Fallible,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool_op",
            Self::I8 => "i8_op",
            Self::I16 => "i16_op",
            Self::I32 => "i32_op",
            Self::I64 => "i64_op",
            Self::U8 => "u8_op",
            Self::U16 => "u16_op",
            Self::U32 => "u32_op",
            Self::U64 => "u64_op",
            Self::F32 => "f32_op",
            Self::F64 => "f64_op",
            Self::Text => "text_op",
            Self::Optional => "optional_op",
            Self::Sequence => "sequence_op",
            Self::Mapping => "mapping_op",
            Self::Record => "record_op",
            Self::Void => "void_op",
            Self::Fallible => "fallible_op",
        }
    }

    /// Kind of the dynamic argument accepted by `Bridge::call`.
    ///
    /// The fallible operation takes its two operands as a `sequence<u64>` of
    /// exactly two items.
    pub fn argument_kind(self) -> ValueKind {
        match self {
            Self::Bool => ValueKind::Bool,
            Self::I8 => ValueKind::i8(),
            Self::I16 => ValueKind::i16(),
            Self::I32 | Self::Void => ValueKind::i32(),
            Self::I64 => ValueKind::i64(),
            Self::U8 => ValueKind::u8(),
            Self::U16 => ValueKind::u16(),
            Self::U32 => ValueKind::u32(),
            Self::U64 => ValueKind::u64(),
            Self::F32 => ValueKind::f32(),
            Self::F64 => ValueKind::f64(),
            Self::Text => ValueKind::Text,
            Self::Optional => ValueKind::optional(ValueKind::i32()),
            Self::Sequence => ValueKind::sequence(ValueKind::Text),
            Self::Mapping => ValueKind::mapping(ValueKind::i32()),
            Self::Record => Point::kind(),
            Self::Fallible => ValueKind::sequence(ValueKind::u64()),
        }
    }

    pub fn result_kind(self) -> ValueKind {
        match self {
            Self::Void => ValueKind::Void,
            Self::Fallible => ValueKind::fallible(ValueKind::u64(), ArithmeticError::NAME),
            other => other.argument_kind(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn void_and_fallible_result_kinds() {
        assert_eq!(Operation::Void.argument_kind(), ValueKind::i32());
        assert_eq!(Operation::Void.result_kind(), ValueKind::Void);
        assert_eq!(
            Operation::Fallible.result_kind().to_string(),
            "result<u64, ArithmeticError>"
        );
        assert_eq!(Operation::Mapping.result_kind().to_string(), "map<text, i32>");
    }
}
