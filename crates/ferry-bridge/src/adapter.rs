//! Typed call adapters.
//!
//! Each adapter lowers its argument, crosses the boundary exactly once, and
//! lifts the result. Scalars go by value, text and collections go through a
//! lent argument view and a returned buffer, and the record goes by address.

use std::collections::HashMap;
use std::marker::PhantomData;

use ferry_codec::text::{from_utf16, lift_text, lower_text};
use ferry_codec::{
    lift_from_bytes, lower_to_vec, Bridgeable, CodecError, ForeignBytes, Lift, Lower, Point,
    RecordSlot, Scalar, Value, ValueKind,
};

use crate::channel::{ReturnedBuffer, StatusChannel};
use crate::error::{BridgeError, Result};
use crate::surface::{BufferOp, ForeignSurface, Operation};

/// Typed front-end over one [`ForeignSurface`].
///
/// The counterparty is not reentrant, so a `Bridge` is confined to the thread
/// that built it: it is neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct Bridge {
    surface: ForeignSurface,
    _single_thread: PhantomData<*const ()>,
}

macro_rules! scalar_adapters {
    ($($method:ident: $ty:ty => $op:ident;)*) => {
        $(
            pub fn $method(&self, value: $ty) -> Result<$ty> {
                self.scalar_call(Operation::$op, self.surface.$method, value)
            }
        )*
    };
}

impl Bridge {
    pub fn new(surface: ForeignSurface) -> Self {
        Self {
            surface,
            _single_thread: PhantomData,
        }
    }

    pub fn surface(&self) -> &ForeignSurface {
        &self.surface
    }

    scalar_adapters! {
        bool_op: bool => Bool;
        i8_op: i8 => I8;
        i16_op: i16 => I16;
        i32_op: i32 => I32;
        i64_op: i64 => I64;
        u8_op: u8 => U8;
        u16_op: u16 => U16;
        u32_op: u32 => U32;
        u64_op: u64 => U64;
        f32_op: f32 => F32;
        f64_op: f64 => F64;
    }

    /// Text crosses as raw UTF-8 and comes back as a fresh owned string.
    pub fn text_op(&self, value: &str) -> Result<String> {
        let bytes = lower_text(value).map_err(BridgeError::encoding(ValueKind::Text))?;
        self.buffer_call(Operation::Text, self.surface.text_op, bytes, lift_text)
    }

    /// Host UTF-16 text; an unpaired surrogate fails before the call.
    pub fn text_op_utf16(&self, units: &[u16]) -> Result<String> {
        let value = from_utf16(units).map_err(BridgeError::encoding(ValueKind::Text))?;
        self.text_op(&value)
    }

    pub fn optional_op(&self, value: Option<i32>) -> Result<Option<i32>> {
        self.lowered_call(Operation::Optional, self.surface.optional_op, &value)
    }

    pub fn sequence_op(&self, value: &[String]) -> Result<Vec<String>> {
        self.lowered_call(Operation::Sequence, self.surface.sequence_op, value)
    }

    pub fn mapping_op(&self, value: &HashMap<String, i32>) -> Result<HashMap<String, i32>> {
        self.lowered_call(Operation::Mapping, self.surface.mapping_op, value)
    }

    /// Lend `point` by address; the counterparty's changes land in place.
    ///
    /// Returns a copy of the fields as they stand after the call.
    pub fn record_op(&self, point: &mut Point) -> Point {
        let mut slot = RecordSlot::new(point);
        log::debug!("{}: lending record by address", Operation::Record);
        (self.surface.record_op)(slot.as_mut_ptr());
        slot.finish()
    }

    pub fn void_op(&self, value: i32) {
        log::debug!("{}: crossing with {value}", Operation::Void);
        (self.surface.void_op)(value);
    }

    /// Checked addition in the counterparty. Overflow comes back as
    /// [`BridgeError::ForeignCallFailed`].
    pub fn fallible_op(&self, a: u64, b: u64) -> Result<u64> {
        let operation = Operation::Fallible.name();
        let mut channel = StatusChannel::new(operation, self.surface.buffer_free);
        log::debug!("{operation}: crossing with ({a}, {b})");
        let out = (self.surface.fallible_op)(a, b, channel.status_ptr());
        channel.complete()?;
        Ok(out)
    }

    /// Dispatch a dynamically-typed argument to the adapter for `operation`.
    ///
    /// A value of the wrong kind is rejected as [`BridgeError::EncodingFailed`]
    /// without crossing the boundary.
    pub fn call(&self, operation: Operation, value: Value) -> Result<Value> {
        let expected = operation.argument_kind();
        let found = value.kind();
        if found != expected {
            return Err(BridgeError::EncodingFailed {
                kind: expected.clone(),
                source: CodecError::KindMismatch { expected, found },
            });
        }

        Ok(match operation {
            Operation::Bool => self.bool_op(argument(value)?)?.into_value(),
            Operation::I8 => self.i8_op(argument(value)?)?.into_value(),
            Operation::I16 => self.i16_op(argument(value)?)?.into_value(),
            Operation::I32 => self.i32_op(argument(value)?)?.into_value(),
            Operation::I64 => self.i64_op(argument(value)?)?.into_value(),
            Operation::U8 => self.u8_op(argument(value)?)?.into_value(),
            Operation::U16 => self.u16_op(argument(value)?)?.into_value(),
            Operation::U32 => self.u32_op(argument(value)?)?.into_value(),
            Operation::U64 => self.u64_op(argument(value)?)?.into_value(),
            Operation::F32 => self.f32_op(argument(value)?)?.into_value(),
            Operation::F64 => self.f64_op(argument(value)?)?.into_value(),
            Operation::Text => self.text_op(&argument::<String>(value)?)?.into_value(),
            Operation::Optional => self.optional_op(argument(value)?)?.into_value(),
            Operation::Sequence => self.sequence_op(&argument::<Vec<String>>(value)?)?.into_value(),
            Operation::Mapping => self.mapping_op(&argument(value)?)?.into_value(),
            Operation::Record => {
                let mut point: Point = argument(value)?;
                self.record_op(&mut point).into_value()
            }
            Operation::Void => {
                self.void_op(argument(value)?);
                Value::Void
            }
            Operation::Fallible => {
                let operands: Vec<u64> = argument(value)?;
                let [a, b] = <[u64; 2]>::try_from(operands).map_err(|operands| {
                    BridgeError::EncodingFailed {
                        kind: Operation::Fallible.argument_kind(),
                        source: CodecError::malformed(
                            "fallible arguments",
                            format!("expected 2 operands, found {}", operands.len()),
                        ),
                    }
                })?;
                self.fallible_op(a, b)?.into_value()
            }
        })
    }

    fn scalar_call<T: Scalar>(
        &self,
        operation: Operation,
        op: extern "C" fn(T::Abi) -> T::Abi,
        value: T,
    ) -> Result<T> {
        let () = T::LAYOUT_CHECK;
        log::debug!("{operation}: crossing {} byte scalar", T::WIDTH);
        T::from_abi(op(value.to_abi())).map_err(BridgeError::malformed(operation.name()))
    }

    fn lowered_call<A, R>(&self, operation: Operation, op: BufferOp, value: &A) -> Result<R>
    where
        A: Lower + ?Sized,
        R: Lift,
    {
        let bytes = lower_to_vec(value).map_err(BridgeError::encoding(operation.argument_kind()))?;
        self.buffer_call(operation, op, &bytes, lift_from_bytes)
    }

    /// Lend `arg` to a buffer-carried operation and decode what comes back.
    fn buffer_call<R>(
        &self,
        operation: Operation,
        op: BufferOp,
        arg: &[u8],
        lift: impl FnOnce(&[u8]) -> std::result::Result<R, CodecError>,
    ) -> Result<R> {
        let name = operation.name();
        let view =
            ForeignBytes::from_slice(arg).map_err(BridgeError::encoding(operation.argument_kind()))?;
        let mut channel = StatusChannel::new(name, self.surface.buffer_free);

        log::debug!("{name}: crossing with {} argument bytes", arg.len());
        let returned = ReturnedBuffer::new(op(view, channel.status_ptr()), self.surface.buffer_free);
        channel.complete()?;

        let bytes = returned.bytes().map_err(BridgeError::malformed(name))?;
        lift(bytes).map_err(|source| {
            log::warn!("{name}: result did not decode: {source}");
            BridgeError::MalformedResult {
                operation: name,
                source,
            }
        })
    }
}

/// Convert a dynamic argument into the adapter's static type.
fn argument<T: Bridgeable>(value: Value) -> Result<T> {
    T::from_value(value).map_err(BridgeError::encoding(T::kind()))
}
