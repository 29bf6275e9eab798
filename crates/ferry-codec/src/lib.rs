//! Type codec for the ferry value bridge.
//!
//! Defines, for every bridgeable type category, the exact layout a value takes
//! on the foreign-function boundary and who owns the memory holding it.
//!
//! ## Modules
//!
//! - [`kind`] - type categories and their wire forms
//! - [`value`] - the dynamically-typed [`Value`] sum type
//! - [`buffer`] - boundary buffers and big-endian readers/writers
//! - [`scalar`] - by-value C scalars with compile-time width checks
//! - [`codec`] - `Lower`/`Lift` for buffer-carried values
//! - [`text`] - top-level text and UTF-16 host input
//! - [`record`] - by-reference composite records
//! - [`status`] - the call-status out-parameter and foreign error values

pub mod buffer;
pub mod codec;
pub mod error;
pub mod kind;
pub mod record;
pub mod scalar;
pub mod status;
pub mod text;
pub mod value;

// Re-export key types for convenience
pub use buffer::{BufReader, BufWriter, ForeignBuffer, ForeignBytes};
pub use codec::{lift_from_bytes, lower_to_vec, Bridgeable, Lift, Lower};
pub use error::CodecError;
pub use kind::{FloatPrecision, Signedness, ValueKind, WireForm};
pub use record::{ByRefRecord, Point, RecordSlot};
pub use scalar::Scalar;
pub use status::{ArithmeticError, CallCode, CallStatus};
pub use value::Value;
