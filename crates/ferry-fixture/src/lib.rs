//! Counterparty library for the conformance suite.
//!
//! Exposes one `extern "C"` operation per bridgeable category. Each applies an
//! observable transformation so a round trip proves the value actually crossed
//! the boundary in both directions:
//!
//! | Operation | Transformation |
//! |-----------|----------------|
//! | `bool_op` | logical negation |
//! | `i8_op` .. `u64_op` | wrapping increment |
//! | `f32_op`, `f64_op` | `+ 1.0` |
//! | `text_op` | concatenate with itself |
//! | `optional_op` | increment when present, absent stays absent |
//! | `sequence_op` | concatenate with itself |
//! | `mapping_op` | insert `"zero" -> 0` |
//! | `record_op` | add 1.0 to both fields, in place |
//! | `void_op` | nothing observable |
//! | `fallible_op` | checked addition, overflow is a typed failure |
//!
//! Buffer-carried operations take a trailing `*mut CallStatus` so a payload
//! that fails to decode here is reported instead of unwinding.
//!
//! ## Modules
//!
//! - [`scaffolding`] - Status reporting, result buffers, and their release

pub mod scaffolding;

use std::collections::HashMap;

use ferry_codec::text::lift_text;
use ferry_codec::{
    lift_from_bytes, lower_to_vec, ArithmeticError, CallStatus, ForeignBuffer, ForeignBytes, Point,
};

pub use scaffolding::{ferry_fixture_buffer_free, live_buffers};
use scaffolding::{return_buffer, serve_call, CallFailure};

#[no_mangle]
pub extern "C" fn ferry_fixture_bool_op(value: i8) -> i8 {
    i8::from(value == 0)
}

macro_rules! increment_ops {
    ($($name:ident: $ty:ty;)*) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name(value: $ty) -> $ty {
                value.wrapping_add(1)
            }
        )*
    };
}

increment_ops! {
    ferry_fixture_i8_op: i8;
    ferry_fixture_i16_op: i16;
    ferry_fixture_i32_op: i32;
    ferry_fixture_i64_op: i64;
    ferry_fixture_u8_op: u8;
    ferry_fixture_u16_op: u16;
    ferry_fixture_u32_op: u32;
    ferry_fixture_u64_op: u64;
}

#[no_mangle]
pub extern "C" fn ferry_fixture_f32_op(value: f32) -> f32 {
    value + 1.0
}

#[no_mangle]
pub extern "C" fn ferry_fixture_f64_op(value: f64) -> f64 {
    value + 1.0
}

/// Decode the lent argument bytes.
///
/// # Safety
///
/// `value` must be a live view lent for the current call.
unsafe fn borrowed<'a>(value: ForeignBytes<'a>) -> Result<&'a [u8], CallFailure> {
    // SAFETY: upheld by the caller.
    Ok(unsafe { value.as_slice() }?)
}

#[no_mangle]
pub extern "C" fn ferry_fixture_text_op(
    value: ForeignBytes<'_>,
    status: *mut CallStatus,
) -> ForeignBuffer {
    serve_call(status, ForeignBuffer::empty(), || {
        // SAFETY: the view is lent for the duration of this call.
        let text = lift_text(unsafe { borrowed(value) }?)?;
        Ok(return_buffer(text.repeat(2).into_bytes())?)
    })
}

#[no_mangle]
pub extern "C" fn ferry_fixture_optional_op(
    value: ForeignBytes<'_>,
    status: *mut CallStatus,
) -> ForeignBuffer {
    serve_call(status, ForeignBuffer::empty(), || {
        // SAFETY: the view is lent for the duration of this call.
        let input: Option<i32> = lift_from_bytes(unsafe { borrowed(value) }?)?;
        let output = input.map(|v| v.wrapping_add(1));
        Ok(return_buffer(lower_to_vec(&output)?)?)
    })
}

#[no_mangle]
pub extern "C" fn ferry_fixture_sequence_op(
    value: ForeignBytes<'_>,
    status: *mut CallStatus,
) -> ForeignBuffer {
    serve_call(status, ForeignBuffer::empty(), || {
        // SAFETY: the view is lent for the duration of this call.
        let items: Vec<String> = lift_from_bytes(unsafe { borrowed(value) }?)?;
        let mut doubled = items.clone();
        doubled.extend(items);
        Ok(return_buffer(lower_to_vec(&doubled)?)?)
    })
}

#[no_mangle]
pub extern "C" fn ferry_fixture_mapping_op(
    value: ForeignBytes<'_>,
    status: *mut CallStatus,
) -> ForeignBuffer {
    serve_call(status, ForeignBuffer::empty(), || {
        // SAFETY: the view is lent for the duration of this call.
        let mut entries: HashMap<String, i32> = lift_from_bytes(unsafe { borrowed(value) }?)?;
        entries.insert("zero".to_string(), 0);
        Ok(return_buffer(lower_to_vec(&entries)?)?)
    })
}

/// Mutates the caller's record through the lent address; null is ignored.
#[no_mangle]
pub extern "C" fn ferry_fixture_record_op(point: *mut Point) {
    // SAFETY: the caller lends an exclusive, live record for this call.
    if let Some(point) = unsafe { point.as_mut() } {
        point.x += 1.0;
        point.y += 1.0;
    }
}

#[no_mangle]
pub extern "C" fn ferry_fixture_void_op(value: i32) {
    log::trace!("void_op received {value}");
}

#[no_mangle]
pub extern "C" fn ferry_fixture_fallible_op(a: u64, b: u64, status: *mut CallStatus) -> u64 {
    serve_call(status, 0, || {
        a.checked_add(b)
            .ok_or_else(|| ArithmeticError::IntegerOverflow { a, b }.into())
    })
}
