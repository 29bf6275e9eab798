//! Type categories that can cross the boundary and how each one travels.
//!
//! Every bridgeable value belongs to exactly one [`ValueKind`]. The kind fixes
//! width, signedness, encoding, and ownership; [`ValueKind::wire_form`] selects
//! the transfer strategy used by the bridge adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Signedness of an integer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// IEEE 754 floating-point precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatPrecision {
    F32,
    F64,
}

/// A bridgeable type category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Logical value, one canonical byte on the wire.
    Bool,
    /// Fixed-width integer.
    Int { width: u8, signedness: Signedness },
    /// IEEE 754 float.
    Float { precision: FloatPrecision },
    /// Unicode text, UTF-8 on the wire.
    Text,
    /// Presence flag plus payload-if-present.
    Optional(Box<ValueKind>),
    /// Homogeneous ordered list.
    Sequence(Box<ValueKind>),
    /// Text-keyed mapping with values of the given kind.
    Mapping(Box<ValueKind>),
    /// Fixed-field `#[repr(C)]` record passed by address.
    Record(String),
    /// No value.
    Void,
    /// Success payload or a foreign error value.
    Fallible { ok: Box<ValueKind>, error: String },
}

/// How a value of a given kind is transferred across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireForm {
    /// Direct bit-compatible C scalar, native byte order.
    Scalar,
    /// Raw UTF-8 bytes; the buffer length is the byte count.
    Utf8Bytes,
    /// Serialized into a length-delimited buffer (big-endian fields).
    Buffer,
    /// Stable address of caller-owned storage, valid for one call.
    ByAddress,
    /// Payload returned normally, failure reported through the call status.
    StatusChannel,
    /// Nothing crosses in this direction.
    Unit,
}

impl ValueKind {
    pub fn i8() -> Self {
        Self::int(8, Signedness::Signed)
    }

    pub fn i16() -> Self {
        Self::int(16, Signedness::Signed)
    }

    pub fn i32() -> Self {
        Self::int(32, Signedness::Signed)
    }

    pub fn i64() -> Self {
        Self::int(64, Signedness::Signed)
    }

    pub fn u8() -> Self {
        Self::int(8, Signedness::Unsigned)
    }

    pub fn u16() -> Self {
        Self::int(16, Signedness::Unsigned)
    }

    pub fn u32() -> Self {
        Self::int(32, Signedness::Unsigned)
    }

    pub fn u64() -> Self {
        Self::int(64, Signedness::Unsigned)
    }

    pub fn f32() -> Self {
        Self::Float {
            precision: FloatPrecision::F32,
        }
    }

    pub fn f64() -> Self {
        Self::Float {
            precision: FloatPrecision::F64,
        }
    }

    fn int(width: u8, signedness: Signedness) -> Self {
        Self::Int { width, signedness }
    }

    pub fn optional(inner: ValueKind) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn sequence(element: ValueKind) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn mapping(value: ValueKind) -> Self {
        Self::Mapping(Box::new(value))
    }

    pub fn fallible(ok: ValueKind, error: impl Into<String>) -> Self {
        Self::Fallible {
            ok: Box::new(ok),
            error: error.into(),
        }
    }

    /// Select the transfer strategy for a top-level argument or result.
    pub fn wire_form(&self) -> WireForm {
        match self {
            Self::Bool | Self::Int { .. } | Self::Float { .. } => WireForm::Scalar,
            Self::Text => WireForm::Utf8Bytes,
            Self::Optional(_) | Self::Sequence(_) | Self::Mapping(_) => WireForm::Buffer,
            Self::Record(_) => WireForm::ByAddress,
            Self::Fallible { .. } => WireForm::StatusChannel,
            Self::Void => WireForm::Unit,
        }
    }

    /// The C type a top-level value of this kind occupies in a foreign signature.
    pub fn c_type(&self) -> String {
        match self {
            Self::Bool => "int8_t".to_string(),
            Self::Int { width, signedness } => match signedness {
                Signedness::Signed => format!("int{width}_t"),
                Signedness::Unsigned => format!("uint{width}_t"),
            },
            Self::Float { precision } => match precision {
                FloatPrecision::F32 => "float".to_string(),
                FloatPrecision::F64 => "double".to_string(),
            },
            Self::Text | Self::Optional(_) | Self::Sequence(_) | Self::Mapping(_) => {
                "ForeignBytes (argument) / ForeignBuffer (result)".to_string()
            }
            Self::Record(name) => format!("struct {name}*"),
            Self::Void => "void".to_string(),
            Self::Fallible { ok, .. } => format!("{} + CallStatus*", ok.c_type()),
        }
    }

    /// The layout a value of this kind takes when nested inside a buffer.
    pub fn buffer_layout(&self) -> String {
        match self {
            Self::Bool => "1 byte, 0 or 1".to_string(),
            Self::Int { width, signedness } => {
                let repr = match signedness {
                    Signedness::Signed => "two's-complement",
                    Signedness::Unsigned => "unsigned",
                };
                format!("{} bytes big-endian {repr}", width / 8)
            }
            Self::Float { precision } => {
                let bytes = match precision {
                    FloatPrecision::F32 => 4,
                    FloatPrecision::F64 => 8,
                };
                format!("{bytes} bytes big-endian IEEE 754 bit pattern")
            }
            Self::Text => "i32 big-endian byte length + UTF-8 bytes".to_string(),
            Self::Optional(inner) => format!(
                "i8 flag (0 absent, 1 present) + [{}] if present",
                inner.buffer_layout()
            ),
            Self::Sequence(element) => format!(
                "i32 big-endian count + items of [{}]",
                element.buffer_layout()
            ),
            Self::Mapping(value) => format!(
                "i32 big-endian count + (key [{}], value [{}]) pairs",
                ValueKind::Text.buffer_layout(),
                value.buffer_layout()
            ),
            Self::Record(_) => "fields in declaration order, each in buffer form".to_string(),
            Self::Void => "nothing".to_string(),
            Self::Fallible { ok, error } => format!(
                "status code 0 + [{}] | status code 1 + {error} buffer | status code 2 + panic message",
                ok.buffer_layout()
            ),
        }
    }

    /// Human-readable contract for `ferry describe`.
    pub fn describe(&self) -> String {
        let transfer = match self.wire_form() {
            WireForm::Scalar => "by value as a C scalar, native byte order",
            WireForm::Utf8Bytes => {
                "UTF-8 bytes; caller lends a read-only view, callee returns an owned buffer"
            }
            WireForm::Buffer => {
                "serialized whole into a buffer; caller lends the argument, callee returns an owned buffer"
            }
            WireForm::ByAddress => "by address of caller-owned storage, valid for one call",
            WireForm::StatusChannel => "payload by value, failure through the CallStatus out-parameter",
            WireForm::Unit => "no value crosses",
        };
        format!(
            "{self}\n  c type:       {}\n  transfer:     {transfer}\n  buffer form:  {}\n",
            self.c_type(),
            self.buffer_layout()
        )
    }

    /// Parse a kind name such as `u64`, `text`, `optional<i32>`, or
    /// `map<text, i32>`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        let simple = match lower.as_str() {
            "bool" => Some(Self::Bool),
            "i8" => Some(Self::i8()),
            "i16" => Some(Self::i16()),
            "i32" => Some(Self::i32()),
            "i64" => Some(Self::i64()),
            "u8" => Some(Self::u8()),
            "u16" => Some(Self::u16()),
            "u32" => Some(Self::u32()),
            "u64" => Some(Self::u64()),
            "f32" => Some(Self::f32()),
            "f64" => Some(Self::f64()),
            "text" | "string" => Some(Self::Text),
            "void" => Some(Self::Void),
            "point" | "record" => Some(Self::Record("Point".to_string())),
            _ => None,
        };
        if simple.is_some() {
            return simple;
        }

        let (head, args) = split_generic(s)?;
        match head.to_ascii_lowercase().as_str() {
            "optional" | "option" => Some(Self::optional(Self::parse(args)?)),
            "sequence" | "vec" => Some(Self::sequence(Self::parse(args)?)),
            "map" | "mapping" => {
                let (key, value) = split_top_level_comma(args)?;
                if Self::parse(key)? != Self::Text {
                    return None;
                }
                Some(Self::mapping(Self::parse(value)?))
            }
            "result" | "fallible" => {
                let (ok, error) = split_top_level_comma(args)?;
                Some(Self::fallible(Self::parse(ok)?, error.trim()))
            }
            _ => None,
        }
    }
}

/// Split `head<args>` into its parts.
fn split_generic(s: &str) -> Option<(&str, &str)> {
    let open = s.find('<')?;
    let inner = s.strip_suffix('>')?;
    Some((&s[..open], &inner[open + 1..]))
}

/// Split `a, b` at the first comma that is not nested inside angle brackets.
fn split_top_level_comma(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int { width, signedness } => match signedness {
                Signedness::Signed => write!(f, "i{width}"),
                Signedness::Unsigned => write!(f, "u{width}"),
            },
            Self::Float { precision } => match precision {
                FloatPrecision::F32 => write!(f, "f32"),
                FloatPrecision::F64 => write!(f, "f64"),
            },
            Self::Text => write!(f, "text"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Sequence(element) => write!(f, "sequence<{element}>"),
            Self::Mapping(value) => write!(f, "map<text, {value}>"),
            Self::Record(name) => write!(f, "{name}"),
            Self::Void => write!(f, "void"),
            Self::Fallible { ok, error } => write!(f, "result<{ok}, {error}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_selection() {
        assert_eq!(ValueKind::Bool.wire_form(), WireForm::Scalar);
        assert_eq!(ValueKind::u64().wire_form(), WireForm::Scalar);
        assert_eq!(ValueKind::f32().wire_form(), WireForm::Scalar);
        assert_eq!(ValueKind::Text.wire_form(), WireForm::Utf8Bytes);
        assert_eq!(
            ValueKind::optional(ValueKind::i32()).wire_form(),
            WireForm::Buffer
        );
        assert_eq!(
            ValueKind::Record("Point".into()).wire_form(),
            WireForm::ByAddress
        );
        assert_eq!(ValueKind::Void.wire_form(), WireForm::Unit);
        assert_eq!(
            ValueKind::fallible(ValueKind::u64(), "ArithmeticError").wire_form(),
            WireForm::StatusChannel
        );
    }

    #[test]
    fn c_types_for_scalars() {
        assert_eq!(ValueKind::Bool.c_type(), "int8_t");
        assert_eq!(ValueKind::i16().c_type(), "int16_t");
        assert_eq!(ValueKind::u64().c_type(), "uint64_t");
        assert_eq!(ValueKind::f32().c_type(), "float");
        assert_eq!(ValueKind::f64().c_type(), "double");
        assert_eq!(ValueKind::Record("Point".into()).c_type(), "struct Point*");
    }

    #[test]
    fn display_names() {
        assert_eq!(ValueKind::u8().to_string(), "u8");
        assert_eq!(ValueKind::i64().to_string(), "i64");
        assert_eq!(
            ValueKind::optional(ValueKind::i32()).to_string(),
            "optional<i32>"
        );
        assert_eq!(
            ValueKind::mapping(ValueKind::i32()).to_string(),
            "map<text, i32>"
        );
        assert_eq!(
            ValueKind::fallible(ValueKind::u64(), "ArithmeticError").to_string(),
            "result<u64, ArithmeticError>"
        );
    }

    #[test]
    fn parse_round_trips_display() {
        let kinds = [
            ValueKind::Bool,
            ValueKind::i8(),
            ValueKind::u32(),
            ValueKind::f64(),
            ValueKind::Text,
            ValueKind::Void,
            ValueKind::optional(ValueKind::i32()),
            ValueKind::sequence(ValueKind::Text),
            ValueKind::mapping(ValueKind::i32()),
            ValueKind::sequence(ValueKind::optional(ValueKind::u8())),
            ValueKind::fallible(ValueKind::u64(), "ArithmeticError"),
        ];
        for kind in kinds {
            assert_eq!(ValueKind::parse(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_non_text_keys() {
        assert_eq!(ValueKind::parse("i128"), None);
        assert_eq!(ValueKind::parse("map<i32, i32>"), None);
        assert_eq!(ValueKind::parse("optional<i32"), None);
        assert_eq!(ValueKind::parse("sequence<>"), None);
    }

    #[test]
    fn describe_mentions_layout() {
        let text = ValueKind::sequence(ValueKind::Text).describe();
        assert!(text.contains("sequence<text>"));
        assert!(text.contains("i32 big-endian count"));
        assert!(ValueKind::u16().describe().contains("2 bytes big-endian unsigned"));
    }
}
