//! The bridgeable value sum type.
//!
//! [`Value`] is the dynamically-typed form used where the category is only
//! known at runtime: harness expectations, reports, and the bridge's generic
//! dispatch. Equality compares floats by bit pattern, so a NaN that crossed
//! the boundary unchanged compares equal to itself.

use std::collections::BTreeMap;
use std::fmt;

use crate::kind::ValueKind;
use crate::record::{ByRefRecord, Point};

/// A value of any bridgeable category.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
    /// Absence keeps its payload kind so `None` is still typed.
    Optional {
        kind: ValueKind,
        value: Option<Box<Value>>,
    },
    Sequence {
        element: ValueKind,
        items: Vec<Value>,
    },
    Mapping {
        value: ValueKind,
        entries: BTreeMap<String, Value>,
    },
    Record(Point),
    Void,
}

impl Value {
    /// The category this value belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::I8(_) => ValueKind::i8(),
            Self::I16(_) => ValueKind::i16(),
            Self::I32(_) => ValueKind::i32(),
            Self::I64(_) => ValueKind::i64(),
            Self::U8(_) => ValueKind::u8(),
            Self::U16(_) => ValueKind::u16(),
            Self::U32(_) => ValueKind::u32(),
            Self::U64(_) => ValueKind::u64(),
            Self::F32(_) => ValueKind::f32(),
            Self::F64(_) => ValueKind::f64(),
            Self::Text(_) => ValueKind::Text,
            Self::Optional { kind, .. } => ValueKind::optional(kind.clone()),
            Self::Sequence { element, .. } => ValueKind::sequence(element.clone()),
            Self::Mapping { value, .. } => ValueKind::mapping(value.clone()),
            Self::Record(_) => Point::kind(),
            Self::Void => ValueKind::Void,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (
                Self::Optional { kind: ka, value: va },
                Self::Optional { kind: kb, value: vb },
            ) => ka == kb && va == vb,
            (
                Self::Sequence {
                    element: ea,
                    items: ia,
                },
                Self::Sequence {
                    element: eb,
                    items: ib,
                },
            ) => ea == eb && ia == ib,
            (
                Self::Mapping {
                    value: ka,
                    entries: ea,
                },
                Self::Mapping {
                    value: kb,
                    entries: eb,
                },
            ) => ka == kb && ea == eb,
            (Self::Record(a), Self::Record(b)) => {
                a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits()
            }
            (Self::Void, Self::Void) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v:?}"),
            Self::F64(v) => write!(f, "{v:?}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Optional { value: None, .. } => write!(f, "None"),
            Self::Optional {
                value: Some(inner), ..
            } => write!(f, "Some({inner})"),
            Self::Sequence { items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Mapping { entries, .. } => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Record(p) => write!(f, "Point {{ x: {:?}, y: {:?} }}", p.x, p.y),
            Self::Void => write!(f, "()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_compares_by_bits() {
        let nan = f32::from_bits(0x7fc0_0001);
        assert_eq!(Value::F32(nan), Value::F32(nan));
        assert_ne!(Value::F32(nan), Value::F32(f32::from_bits(0x7fc0_0002)));
        assert_ne!(Value::F64(0.0), Value::F64(-0.0));
    }

    #[test]
    fn absent_optional_differs_from_zero() {
        let absent = Value::Optional {
            kind: ValueKind::i32(),
            value: None,
        };
        let zero = Value::Optional {
            kind: ValueKind::i32(),
            value: Some(Box::new(Value::I32(0))),
        };
        assert_ne!(absent, zero);
        assert_eq!(absent.kind(), ValueKind::optional(ValueKind::i32()));
    }

    #[test]
    fn width_is_part_of_identity() {
        assert_ne!(Value::U8(1), Value::U16(1));
        assert_ne!(Value::I32(1), Value::U32(1));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Text("hi".into()).to_string(), "\"hi\"");
        assert_eq!(Value::F64(1.0).to_string(), "1.0");
        let seq = Value::Sequence {
            element: ValueKind::Text,
            items: vec![Value::Text("one".into()), Value::Text("two".into())],
        };
        assert_eq!(seq.to_string(), "[\"one\", \"two\"]");
        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), Value::I32(2));
        entries.insert("a".to_string(), Value::I32(1));
        let map = Value::Mapping {
            value: ValueKind::i32(),
            entries,
        };
        assert_eq!(map.to_string(), "{\"a\": 1, \"b\": 2}");
        assert_eq!(Value::Record(Point::new(2.0, 3.0)).to_string(), "Point { x: 2.0, y: 3.0 }");
    }
}
