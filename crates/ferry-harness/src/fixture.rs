//! The foreign surface of the bundled counterparty library.

use ferry_bridge::ForeignSurface;
use ferry_fixture as fx;

/// Function table pointing at the `ferry_fixture_*` entry points.
pub fn fixture_surface() -> ForeignSurface {
    ForeignSurface {
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
        text_op: fx::ferry_fixture_text_op,
        optional_op: fx::ferry_fixture_optional_op,
        sequence_op: fx::ferry_fixture_sequence_op,
        mapping_op: fx::ferry_fixture_mapping_op,
        record_op: fx::ferry_fixture_record_op,
        void_op: fx::ferry_fixture_void_op,
        fallible_op: fx::ferry_fixture_fallible_op,
        buffer_free: fx::ferry_fixture_buffer_free,
    }
}

/// Result buffers the counterparty has handed out and not yet had back.
pub fn outstanding_buffers() -> i64 {
    fx::live_buffers()
}
