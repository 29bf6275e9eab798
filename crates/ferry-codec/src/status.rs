//! Call-status out-parameter and the foreign error values it carries.
//!
//! A fallible foreign operation receives a `*mut CallStatus` next to its
//! arguments. It leaves `code` at [`CallCode::Success`] and returns its
//! payload normally, or it sets [`CallCode::Error`] and stores a lowered error
//! value in `error_buf`. [`CallCode::Panic`] reports an internal failure with a
//! UTF-8 message in `error_buf`. A payload and an error are never both
//! meaningful: when `code` is non-zero the returned payload is ignored.

use serde::{Deserialize, Serialize};

use crate::buffer::{BufReader, BufWriter, ForeignBuffer};
use crate::codec::{Lift, Lower};
use crate::error::{CodecError, Result};

/// Status codes written by the callee.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCode {
    Success = 0,
    Error = 1,
    Panic = 2,
}

impl CallCode {
    /// Interpret a raw status byte. Unknown codes yield `None`.
    pub fn from_raw(raw: i8) -> Option<Self> {
        match raw {
            0 => Some(Self::Success),
            1 => Some(Self::Error),
            2 => Some(Self::Panic),
            _ => None,
        }
    }
}

/// Out-parameter filled by fallible foreign operations.
#[repr(C)]
#[derive(Debug, Default)]
pub struct CallStatus {
    pub code: i8,
    pub error_buf: ForeignBuffer,
}

impl CallStatus {
    /// A status in the pending state, before the call.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Arithmetic failure reported by the counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ArithmeticError {
    #[error("integer overflow on an operation with {a} and {b}")]
    IntegerOverflow { a: u64, b: u64 },
}

impl ArithmeticError {
    pub const NAME: &'static str = "ArithmeticError";
}

impl Lower for ArithmeticError {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        match self {
            Self::IntegerOverflow { a, b } => {
                w.put(&1i32.to_be_bytes());
                a.lower_into(w)?;
                b.lower_into(w)
            }
        }
    }
}

impl Lift for ArithmeticError {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        match i32::from_be_bytes(r.take_array()?) {
            1 => Ok(Self::IntegerOverflow {
                a: u64::lift_from(r)?,
                b: u64::lift_from(r)?,
            }),
            other => Err(CodecError::malformed(
                Self::NAME,
                format!("unknown variant index {other}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{lift_from_bytes, lower_to_vec};

    #[test]
    fn codes_are_stable() {
        assert_eq!(CallCode::Success as i8, 0);
        assert_eq!(CallCode::Error as i8, 1);
        assert_eq!(CallCode::Panic as i8, 2);
        assert_eq!(CallCode::from_raw(1), Some(CallCode::Error));
        assert_eq!(CallCode::from_raw(7), None);
    }

    #[test]
    fn new_status_is_pending_success() {
        let status = CallStatus::new();
        assert_eq!(status.code, 0);
        assert!(status.error_buf.data.is_null());
    }

    #[test]
    fn overflow_error_round_trips() {
        let err = ArithmeticError::IntegerOverflow { a: u64::MAX, b: 1 };
        let bytes = lower_to_vec(&err).unwrap();
        assert_eq!(bytes.len(), 4 + 8 + 8);
        assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
        assert_eq!(lift_from_bytes::<ArithmeticError>(&bytes).unwrap(), err);
    }

    #[test]
    fn unknown_variant_rejected() {
        let mut bytes = lower_to_vec(&ArithmeticError::IntegerOverflow { a: 1, b: 2 }).unwrap();
        bytes[3] = 9;
        assert!(matches!(
            lift_from_bytes::<ArithmeticError>(&bytes),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn display_names_operands() {
        let err = ArithmeticError::IntegerOverflow { a: 5, b: 6 };
        assert_eq!(err.to_string(), "integer overflow on an operation with 5 and 6");
    }
}
