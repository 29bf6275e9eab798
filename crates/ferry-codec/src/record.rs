//! Composite records passed by reference.
//!
//! A record is never copied on the way in: [`RecordSlot`] holds an exclusive
//! borrow of caller-owned storage and exposes its address for exactly one
//! call. The callee may mutate the fields through that address while the call
//! runs. After return the slot copies the fields out and the borrow ends, so
//! the foreign side cannot keep a usable alias.

use serde::{Deserialize, Serialize};

use crate::kind::ValueKind;

/// A fixed-field record that may be lent to foreign code by address.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` with only FFI-safe fields, so the
/// foreign side sees the same layout.
pub unsafe trait ByRefRecord: Copy {
    /// Record name used in [`ValueKind::Record`].
    const NAME: &'static str;

    fn kind() -> ValueKind {
        ValueKind::Record(Self::NAME.to_string())
    }
}

/// Two-dimensional point, the reference composite record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// SAFETY: `Point` is `#[repr(C)]` with two `f64` fields.
unsafe impl ByRefRecord for Point {
    const NAME: &'static str = "Point";
}

/// Caller-owned record storage lent to the boundary for one call.
#[derive(Debug)]
pub struct RecordSlot<'a, R: ByRefRecord> {
    record: &'a mut R,
}

impl<'a, R: ByRefRecord> RecordSlot<'a, R> {
    pub fn new(record: &'a mut R) -> Self {
        Self { record }
    }

    /// Stable address of the record for the duration of the call.
    pub fn as_mut_ptr(&mut self) -> *mut R {
        &mut *self.record as *mut R
    }

    /// Copy the (possibly mutated) fields out and release the slot.
    pub fn finish(self) -> R {
        *self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_address_is_caller_storage() {
        let mut p = Point::new(1.0, 2.0);
        let expected = std::ptr::addr_of_mut!(p);
        let mut slot = RecordSlot::new(&mut p);
        assert_eq!(slot.as_mut_ptr(), expected);
    }

    #[test]
    fn mutation_through_slot_is_visible_after_finish() {
        let mut p = Point::new(1.0, 2.0);
        let mut slot = RecordSlot::new(&mut p);
        let ptr = slot.as_mut_ptr();
        // SAFETY: `ptr` comes from a live exclusive borrow held by `slot`.
        unsafe {
            (*ptr).x += 1.0;
        }
        let copy = slot.finish();
        assert_eq!(copy, Point::new(2.0, 2.0));
        assert_eq!(p, Point::new(2.0, 2.0));
    }

    #[test]
    fn record_kind_uses_name() {
        assert_eq!(Point::kind(), ValueKind::Record("Point".into()));
    }
}
