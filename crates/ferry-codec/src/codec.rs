//! Encoding (`Lower`) and decoding (`Lift`) of buffer-carried values.
//!
//! One generic implementation per category: `Option<T>`, `Vec<T>` and
//! `HashMap<String, T>` work for any element that is itself bridgeable, so no
//! per-concrete-type codec is needed. Collections are materialized whole; a
//! decode always builds a fresh local value.

use std::collections::{BTreeMap, HashMap};

use crate::buffer::{BufReader, BufWriter};
use crate::error::{CodecError, Result};
use crate::kind::ValueKind;
use crate::record::{ByRefRecord, Point};
use crate::value::Value;

/// Encode a local value into its boundary byte form.
pub trait Lower {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()>;
}

/// Decode a local value from its boundary byte form.
pub trait Lift: Sized {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self>;
}

/// A statically-typed value that maps onto one [`ValueKind`].
pub trait Bridgeable: Sized {
    fn kind() -> ValueKind;

    fn into_value(self) -> Value;

    /// Convert back from the dynamic form; a value of another kind is rejected.
    fn from_value(value: Value) -> Result<Self>;
}

/// Encode `value` into a fresh byte vector.
pub fn lower_to_vec<T: Lower + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut w = BufWriter::new();
    value.lower_into(&mut w)?;
    Ok(w.finish())
}

/// Decode a `T` that must occupy all of `bytes`.
pub fn lift_from_bytes<T: Lift>(bytes: &[u8]) -> Result<T> {
    let mut r = BufReader::new(bytes);
    let value = T::lift_from(&mut r)?;
    r.finish()?;
    Ok(value)
}

fn mismatch<T: Bridgeable>(found: &Value) -> CodecError {
    CodecError::KindMismatch {
        expected: T::kind(),
        found: found.kind(),
    }
}

impl Lower for bool {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        w.put_flag(*self);
        Ok(())
    }
}

impl Lift for bool {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        r.take_flag("bool")
    }
}

impl Bridgeable for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

macro_rules! fixed_width {
    ($($ty:ident => $variant:ident, $kind:ident;)*) => {
        $(
            impl Lower for $ty {
                fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
                    w.put(&self.to_be_bytes());
                    Ok(())
                }
            }

            impl Lift for $ty {
                fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
                    Ok($ty::from_be_bytes(r.take_array()?))
                }
            }

            impl Bridgeable for $ty {
                fn kind() -> ValueKind {
                    ValueKind::$kind()
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

// Float `to_be_bytes` carries the raw bit pattern, so NaN payloads survive.
fixed_width! {
    i8 => I8, i8;
    i16 => I16, i16;
    i32 => I32, i32;
    i64 => I64, i64;
    u8 => U8, u8;
    u16 => U16, u16;
    u32 => U32, u32;
    u64 => U64, u64;
    f32 => F32, f32;
    f64 => F64, f64;
}

impl Lower for str {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        w.put_len("text", self.len())?;
        w.put(self.as_bytes());
        Ok(())
    }
}

impl Lower for String {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        self.as_str().lower_into(w)
    }
}

impl Lift for String {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        let len = r.take_len("text")?;
        let bytes = r.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CodecError::malformed("text", format!("invalid UTF-8: {e}")))
    }
}

impl Bridgeable for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Lower for Point {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        self.x.lower_into(w)?;
        self.y.lower_into(w)
    }
}

impl Lift for Point {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        Ok(Point {
            x: f64::lift_from(r)?,
            y: f64::lift_from(r)?,
        })
    }
}

impl Bridgeable for Point {
    fn kind() -> ValueKind {
        <Point as ByRefRecord>::kind()
    }

    fn into_value(self) -> Value {
        Value::Record(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Record(p) => Ok(p),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bridgeable for () {
    fn kind() -> ValueKind {
        ValueKind::Void
    }

    fn into_value(self) -> Value {
        Value::Void
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Void => Ok(()),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: Lower> Lower for Option<T> {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        match self {
            None => {
                w.put_flag(false);
                Ok(())
            }
            Some(v) => {
                w.put_flag(true);
                v.lower_into(w)
            }
        }
    }
}

impl<T: Lift> Lift for Option<T> {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        if r.take_flag("optional")? {
            Ok(Some(T::lift_from(r)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Bridgeable> Bridgeable for Option<T> {
    fn kind() -> ValueKind {
        ValueKind::optional(T::kind())
    }

    fn into_value(self) -> Value {
        Value::Optional {
            kind: T::kind(),
            value: self.map(|v| Box::new(v.into_value())),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Optional { kind, value } if kind == T::kind() => {
                value.map(|v| T::from_value(*v)).transpose()
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: Lower> Lower for [T] {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        w.put_len("sequence", self.len())?;
        for item in self {
            item.lower_into(w)?;
        }
        Ok(())
    }
}

impl<T: Lower> Lower for Vec<T> {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        self.as_slice().lower_into(w)
    }
}

impl<T: Lift> Lift for Vec<T> {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        let count = r.take_len("sequence")?;
        // Every item takes at least one byte, so the remaining length bounds
        // the allocation even when the count is hostile.
        let mut items = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            items.push(T::lift_from(r)?);
        }
        Ok(items)
    }
}

impl<T: Bridgeable> Bridgeable for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::sequence(T::kind())
    }

    fn into_value(self) -> Value {
        Value::Sequence {
            element: T::kind(),
            items: self.into_iter().map(Bridgeable::into_value).collect(),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Sequence { element, items } if element == T::kind() => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: Lower, S> Lower for HashMap<String, T, S> {
    fn lower_into(&self, w: &mut BufWriter) -> Result<()> {
        w.put_len("mapping", self.len())?;
        for (key, value) in self {
            key.lower_into(w)?;
            value.lower_into(w)?;
        }
        Ok(())
    }
}

impl<T: Lift> Lift for HashMap<String, T> {
    fn lift_from(r: &mut BufReader<'_>) -> Result<Self> {
        let count = r.take_len("mapping")?;
        let mut entries = HashMap::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            let key = String::lift_from(r)?;
            let value = T::lift_from(r)?;
            if entries.insert(key, value).is_some() {
                return Err(CodecError::malformed("mapping", "duplicate key"));
            }
        }
        Ok(entries)
    }
}

impl<T: Bridgeable> Bridgeable for HashMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::mapping(T::kind())
    }

    fn into_value(self) -> Value {
        Value::Mapping {
            value: T::kind(),
            entries: self
                .into_iter()
                .map(|(k, v)| (k, v.into_value()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mapping { value, entries } if value == T::kind() => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v)?)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian_in_buffers() {
        assert_eq!(lower_to_vec(&0x0102u16).unwrap(), vec![1, 2]);
        assert_eq!(lower_to_vec(&-2i32).unwrap(), vec![0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn text_layout_is_length_prefixed() {
        let bytes = lower_to_vec("hé").unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 3, b'h', 0xc3, 0xa9]);
        assert_eq!(lift_from_bytes::<String>(&bytes).unwrap(), "hé");
    }

    #[test]
    fn text_keeps_embedded_nul() {
        let s = "a\0b".to_string();
        let bytes = lower_to_vec(&s).unwrap();
        assert_eq!(lift_from_bytes::<String>(&bytes).unwrap(), s);
    }

    #[test]
    fn invalid_utf8_rejected() {
        let bytes = vec![0, 0, 0, 2, 0xc3, 0x28];
        assert!(matches!(
            lift_from_bytes::<String>(&bytes),
            Err(CodecError::Malformed { kind: "text", .. })
        ));
    }

    #[test]
    fn absent_optional_is_not_zero() {
        let bytes = lower_to_vec(&None::<i32>).unwrap();
        assert_eq!(bytes, vec![0]);
        assert_eq!(lift_from_bytes::<Option<i32>>(&bytes).unwrap(), None);

        let zero = lower_to_vec(&Some(0i32)).unwrap();
        assert_eq!(zero, vec![1, 0, 0, 0, 0]);
        assert_eq!(lift_from_bytes::<Option<i32>>(&zero).unwrap(), Some(0));
    }

    #[test]
    fn optional_flag_must_be_canonical() {
        assert!(matches!(
            lift_from_bytes::<Option<i32>>(&[2, 0, 0, 0, 1]),
            Err(CodecError::Malformed {
                kind: "optional",
                ..
            })
        ));
    }

    #[test]
    fn sequence_preserves_order_and_duplicates() {
        let items = vec!["one".to_string(), "two".into(), "two".into(), "three".into()];
        let bytes = lower_to_vec(&items).unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 4]);
        assert_eq!(lift_from_bytes::<Vec<String>>(&bytes).unwrap(), items);
    }

    #[test]
    fn sequence_count_larger_than_payload_fails_cleanly() {
        let bytes = vec![0x7f, 0xff, 0xff, 0xff, 1];
        assert!(matches!(
            lift_from_bytes::<Vec<bool>>(&bytes),
            Err(CodecError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn mapping_last_write_wins_before_crossing() {
        let mut map = HashMap::new();
        map.insert("one".to_string(), 1i32);
        map.insert("one".to_string(), 11);
        map.insert("two".to_string(), 2);
        let bytes = lower_to_vec(&map).unwrap();
        let back: HashMap<String, i32> = lift_from_bytes(&bytes).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back["one"], 11);
        assert_eq!(back, map);
    }

    #[test]
    fn mapping_duplicate_key_on_wire_rejected() {
        let mut w = BufWriter::new();
        w.put_len("mapping", 2).unwrap();
        "k".lower_into(&mut w).unwrap();
        1i32.lower_into(&mut w).unwrap();
        "k".lower_into(&mut w).unwrap();
        2i32.lower_into(&mut w).unwrap();
        assert!(matches!(
            lift_from_bytes::<HashMap<String, i32>>(&w.finish()),
            Err(CodecError::Malformed {
                kind: "mapping",
                ..
            })
        ));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = lower_to_vec(&7u32).unwrap();
        bytes.push(0);
        assert_eq!(
            lift_from_bytes::<u32>(&bytes),
            Err(CodecError::TrailingBytes { count: 1 })
        );
    }

    #[test]
    fn point_buffer_form() {
        let p = Point::new(1.5, -2.0);
        let bytes = lower_to_vec(&p).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(lift_from_bytes::<Point>(&bytes).unwrap(), p);
    }

    #[test]
    fn bridgeable_kind_mismatch() {
        let err = u64::from_value(Value::U32(1)).unwrap_err();
        assert_eq!(
            err,
            CodecError::KindMismatch {
                expected: ValueKind::u64(),
                found: ValueKind::u32(),
            }
        );
        let err = Option::<i32>::from_value(Value::Optional {
            kind: ValueKind::i64(),
            value: None,
        })
        .unwrap_err();
        assert!(matches!(err, CodecError::KindMismatch { .. }));
    }

    #[test]
    fn bridgeable_round_trip_through_value() {
        let items = vec!["a".to_string(), "b".to_string()];
        let value = items.clone().into_value();
        assert_eq!(value.kind(), ValueKind::sequence(ValueKind::Text));
        assert_eq!(Vec::<String>::from_value(value).unwrap(), items);

        let map: HashMap<String, i32> = [("zero".to_string(), 0)].into_iter().collect();
        let value = map.clone().into_value();
        assert_eq!(HashMap::<String, i32>::from_value(value).unwrap(), map);
    }
}
