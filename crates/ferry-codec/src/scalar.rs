//! By-value C scalars.
//!
//! Integers and floats cross as their own C type, so encoding is an identity
//! reinterpretation. Booleans cross as one canonical `int8_t`. The declared
//! width of every scalar is checked against the size of its C type when the
//! adapter using it is compiled.

use crate::error::{CodecError, Result};
use crate::kind::ValueKind;

/// A value passed by value as a C scalar.
pub trait Scalar: Copy {
    /// The C type on the wire.
    type Abi: Copy;

    /// Declared width in bytes.
    const WIDTH: usize;

    /// Fails compilation when the declared width and the C type disagree.
    /// Adapters reference it with `let () = T::LAYOUT_CHECK;`.
    const LAYOUT_CHECK: () = assert!(
        std::mem::size_of::<Self::Abi>() == Self::WIDTH,
        "declared scalar width does not match its boundary type"
    );

    fn kind() -> ValueKind;

    fn to_abi(self) -> Self::Abi;

    /// Decode a scalar received from the boundary.
    fn from_abi(abi: Self::Abi) -> Result<Self>;
}

impl Scalar for bool {
    type Abi = i8;
    const WIDTH: usize = 1;

    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn to_abi(self) -> i8 {
        i8::from(self)
    }

    fn from_abi(abi: i8) -> Result<Self> {
        match abi {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(
                "bool",
                format!("expected 0 or 1, found {other}"),
            )),
        }
    }
}

macro_rules! identity_scalar {
    ($($ty:ty => $width:expr, $kind:ident;)*) => {
        $(
            impl Scalar for $ty {
                type Abi = $ty;
                const WIDTH: usize = $width;

                fn kind() -> ValueKind {
                    ValueKind::$kind()
                }

                fn to_abi(self) -> $ty {
                    self
                }

                fn from_abi(abi: $ty) -> Result<Self> {
                    Ok(abi)
                }
            }
        )*
    };
}

identity_scalar! {
    i8 => 1, i8;
    i16 => 2, i16;
    i32 => 4, i32;
    i64 => 8, i64;
    u8 => 1, u8;
    u16 => 2, u16;
    u32 => 4, u32;
    u64 => 8, u64;
    f32 => 4, f32;
    f64 => 8, f64;
}
