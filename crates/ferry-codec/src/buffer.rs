//! Boundary buffers and the big-endian reader/writer used to fill them.
//!
//! Ownership rule: an argument is lent to the callee as a read-only
//! [`ForeignBytes`] view whose storage stays with the caller; a result is
//! returned as a [`ForeignBuffer`] allocated by the callee, and only the
//! callee's release entry point may free it.

use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr;

use crate::error::{CodecError, Result};

/// A byte buffer allocated on one side of the boundary and handed to the other.
///
/// The buffer carries no destructor: the receiving side must hand it back to
/// the allocating side's release function exactly once.
#[repr(C)]
#[derive(Debug)]
pub struct ForeignBuffer {
    pub capacity: i32,
    pub len: i32,
    pub data: *mut u8,
}

impl ForeignBuffer {
    /// A buffer with no storage.
    pub fn empty() -> Self {
        Self {
            capacity: 0,
            len: 0,
            data: ptr::null_mut(),
        }
    }

    /// Take ownership of `bytes` and expose them as a raw buffer.
    ///
    /// Must be paired with [`ForeignBuffer::destroy_into_vec`] on the same side.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        let capacity = i32::try_from(bytes.capacity()).map_err(|_| CodecError::TooLong {
            what: "buffer",
            len: bytes.capacity(),
        })?;
        let len = i32::try_from(bytes.len()).map_err(|_| CodecError::TooLong {
            what: "buffer",
            len: bytes.len(),
        })?;
        let mut bytes = ManuallyDrop::new(bytes);
        Ok(Self {
            capacity,
            len,
            data: bytes.as_mut_ptr(),
        })
    }

    /// Reclaim the allocation made by [`ForeignBuffer::from_vec`].
    ///
    /// # Safety
    ///
    /// `self` must have been produced by `from_vec` in this same library and
    /// not yet destroyed; its fields must be unmodified.
    pub unsafe fn destroy_into_vec(self) -> Vec<u8> {
        if self.data.is_null() {
            return Vec::new();
        }
        // SAFETY: the caller guarantees these are the raw parts of a live Vec.
        unsafe { Vec::from_raw_parts(self.data, self.len as usize, self.capacity as usize) }
    }

    /// View the initialized bytes.
    ///
    /// # Safety
    ///
    /// `self.data` must point to at least `self.len` initialized bytes that
    /// stay alive and unmodified for the returned lifetime.
    pub unsafe fn as_bytes(&self) -> Result<&[u8]> {
        let len = checked_len(self.len)?;
        if self.data.is_null() {
            return if len == 0 {
                Ok(&[])
            } else {
                Err(CodecError::malformed("buffer", "null data with non-zero length"))
            };
        }
        if self.capacity < self.len {
            return Err(CodecError::malformed("buffer", "length exceeds capacity"));
        }
        // SAFETY: upheld by the caller.
        Ok(unsafe { std::slice::from_raw_parts(self.data, len) })
    }
}

impl Default for ForeignBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

/// A read-only view of caller-owned bytes, lent to the callee for one call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ForeignBytes<'a> {
    pub len: i32,
    pub data: *const u8,
    _borrow: PhantomData<&'a [u8]>,
}

impl<'a> ForeignBytes<'a> {
    /// Lend `bytes` across the boundary.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self> {
        let len = i32::try_from(bytes.len()).map_err(|_| CodecError::TooLong {
            what: "argument",
            len: bytes.len(),
        })?;
        Ok(Self {
            len,
            data: bytes.as_ptr(),
            _borrow: PhantomData,
        })
    }

    /// View the lent bytes on the receiving side.
    ///
    /// # Safety
    ///
    /// The view must have been built by [`ForeignBytes::from_slice`] (or an
    /// equivalent foreign constructor) and the call it was lent for must
    /// still be in progress.
    pub unsafe fn as_slice(&self) -> Result<&'a [u8]> {
        let len = checked_len(self.len)?;
        if self.data.is_null() {
            return if len == 0 {
                Ok(&[])
            } else {
                Err(CodecError::malformed("argument", "null data with non-zero length"))
            };
        }
        // SAFETY: upheld by the caller.
        Ok(unsafe { std::slice::from_raw_parts(self.data, len) })
    }
}

fn checked_len(len: i32) -> Result<usize> {
    usize::try_from(len).map_err(|_| CodecError::malformed("buffer", format!("negative length {len}")))
}

/// Convert a host length into the boundary's `i32` length field.
pub fn wire_len(what: &'static str, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| CodecError::TooLong { what, len })
}

/// Appends big-endian fields to a growing byte vector.
#[derive(Debug, Default)]
pub struct BufWriter {
    bytes: Vec<u8>,
}

impl BufWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(cap),
        }
    }

    /// Append raw bytes.
    pub fn put(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Append an `i32` big-endian length or count.
    pub fn put_len(&mut self, what: &'static str, len: usize) -> Result<()> {
        let len = wire_len(what, len)?;
        self.put(&len.to_be_bytes());
        Ok(())
    }

    /// Append a one-byte presence or boolean flag.
    pub fn put_flag(&mut self, flag: bool) {
        self.bytes.push(u8::from(flag));
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads big-endian fields from a byte slice, tracking the offset.
#[derive(Debug)]
pub struct BufReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> BufReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Take the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::UnexpectedEnd {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    /// Take the next `N` bytes as an array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read an `i32` big-endian length or count; negative values are malformed.
    pub fn take_len(&mut self, what: &'static str) -> Result<usize> {
        let raw = i32::from_be_bytes(self.take_array()?);
        usize::try_from(raw)
            .map_err(|_| CodecError::malformed(what, format!("negative length {raw}")))
    }

    /// Read a one-byte flag that must be exactly 0 or 1.
    pub fn take_flag(&mut self, what: &'static str) -> Result<bool> {
        match self.take_array::<1>()?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(
                what,
                format!("flag byte must be 0 or 1, found {other}"),
            )),
        }
    }

    /// Require that every byte has been consumed.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(CodecError::TrailingBytes { count }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_round_trip_through_raw_parts() {
        let buf = ForeignBuffer::from_vec(vec![1, 2, 3]).unwrap();
        assert_eq!(buf.len, 3);
        assert_eq!(unsafe { buf.as_bytes() }.unwrap(), &[1, 2, 3]);
        let back = unsafe { buf.destroy_into_vec() };
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn empty_buffer_views_as_empty() {
        let buf = ForeignBuffer::empty();
        assert!(unsafe { buf.as_bytes() }.unwrap().is_empty());
        assert!(unsafe { buf.destroy_into_vec() }.is_empty());
    }

    #[test]
    fn negative_length_is_malformed() {
        let buf = ForeignBuffer {
            capacity: 0,
            len: -4,
            data: ptr::null_mut(),
        };
        assert!(matches!(
            unsafe { buf.as_bytes() },
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn bytes_view_borrows_caller_storage() {
        let owned = b"hello".to_vec();
        let view = ForeignBytes::from_slice(&owned).unwrap();
        assert_eq!(view.len, 5);
        assert_eq!(view.data, owned.as_ptr());
        assert_eq!(unsafe { view.as_slice() }.unwrap(), b"hello");
    }

    #[test]
    fn reader_rejects_short_input() {
        let mut r = BufReader::new(&[0, 0, 1]);
        assert_eq!(
            r.take_array::<4>(),
            Err(CodecError::UnexpectedEnd {
                needed: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn reader_rejects_negative_len() {
        let negative = (-1i32).to_be_bytes();
        let mut r = BufReader::new(&negative);
        assert!(matches!(
            r.take_len("sequence"),
            Err(CodecError::Malformed { kind: "sequence", .. })
        ));
    }

    #[test]
    fn reader_reports_trailing_bytes() {
        let mut r = BufReader::new(&[1, 2, 3]);
        r.take(1).unwrap();
        assert_eq!(r.finish(), Err(CodecError::TrailingBytes { count: 2 }));
    }

    #[test]
    fn writer_emits_big_endian_lengths() {
        let mut w = BufWriter::new();
        w.put_len("text", 258).unwrap();
        w.put_flag(true);
        assert_eq!(w.finish(), vec![0, 0, 1, 2, 1]);
    }

    #[test]
    fn oversized_length_rejected() {
        let mut w = BufWriter::new();
        let too_long = i32::MAX as usize + 1;
        assert_eq!(
            w.put_len("sequence", too_long),
            Err(CodecError::TooLong {
                what: "sequence",
                len: too_long
            })
        );
    }
}
