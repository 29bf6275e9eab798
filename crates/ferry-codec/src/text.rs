//! Top-level text.
//!
//! A text argument or result travels as raw UTF-8 bytes whose count is the
//! buffer length, with no terminator, so embedded NUL characters survive.
//! Text nested inside another value uses the length-prefixed form in
//! [`crate::codec`].

use crate::buffer::wire_len;
use crate::error::{CodecError, Result};

/// The bytes of `text` as they cross the boundary.
pub fn lower_text(text: &str) -> Result<&[u8]> {
    wire_len("text", text.len())?;
    Ok(text.as_bytes())
}

/// Rebuild text from boundary bytes.
pub fn lift_text(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CodecError::malformed("text", format!("invalid UTF-8: {e}")))
}

/// Convert host UTF-16 code units (as held by JVM or Cocoa strings) into text.
///
/// The boundary carries Unicode scalar values only, so an unpaired surrogate
/// cannot be encoded.
pub fn from_utf16(units: &[u16]) -> Result<String> {
    let mut out = String::with_capacity(units.len());
    let mut index = 0usize;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                out.push(c);
                index += c.len_utf16();
            }
            Err(_) => return Err(CodecError::UnpairedSurrogate { index }),
        }
    }
    Ok(out)
}
