//! Every buffer the counterparty allocates is released before the adapter
//! returns, on success, failure, and malformed-argument paths alike.

use std::collections::HashMap;

use ferry_bridge::{Bridge, ForeignSurface};
use ferry_codec::{CallStatus, ForeignBuffer, ForeignBytes};
use ferry_fixture as fx;

extern "C" fn truncating_text_op(arg: ForeignBytes<'_>, status: *mut CallStatus) -> ForeignBuffer {
    // Forward a view that claims more bytes than a valid UTF-8 string holds.
    let bytes = unsafe { arg.as_slice() }.unwrap_or(&[]);
    let cut = ForeignBytes::from_slice(&bytes[..bytes.len().saturating_sub(1)]).unwrap_or(arg);
    fx::ferry_fixture_text_op(cut, status)
}

#[test]
fn adapters_release_every_buffer() {
    let bridge = Bridge::new(ForeignSurface {
        bool_op: fx::ferry_fixture_bool_op,
        i8_op: fx::ferry_fixture_i8_op,
        i16_op: fx::ferry_fixture_i16_op,
        i32_op: fx::ferry_fixture_i32_op,
        i64_op: fx::ferry_fixture_i64_op,
        u8_op: fx::ferry_fixture_u8_op,
        u16_op: fx::ferry_fixture_u16_op,
        u32_op: fx::ferry_fixture_u32_op,
        u64_op: fx::ferry_fixture_u64_op,
        f32_op: fx::ferry_fixture_f32_op,
        f64_op: fx::ferry_fixture_f64_op,
        text_op: truncating_text_op,
        optional_op: fx::ferry_fixture_optional_op,
        sequence_op: fx::ferry_fixture_sequence_op,
        mapping_op: fx::ferry_fixture_mapping_op,
        record_op: fx::ferry_fixture_record_op,
        void_op: fx::ferry_fixture_void_op,
        fallible_op: fx::ferry_fixture_fallible_op,
        buffer_free: fx::ferry_fixture_buffer_free,
    });
    let baseline = fx::live_buffers();

    bridge.optional_op(Some(1)).unwrap();
    bridge.optional_op(None).unwrap();
    bridge.sequence_op(&["a".to_string(), "b".to_string()]).unwrap();
    bridge.mapping_op(&HashMap::new()).unwrap();
    bridge.fallible_op(1, 2).unwrap();
    bridge.fallible_op(u64::MAX, 1).unwrap_err();
    // Cutting the last byte of "é" leaves invalid UTF-8: the fixture reports a
    // panic status with a message buffer.
    bridge.text_op("é").unwrap_err();
    assert_eq!(bridge.text_op("ab").unwrap(), "aa");

    assert_eq!(fx::live_buffers(), baseline);
}
