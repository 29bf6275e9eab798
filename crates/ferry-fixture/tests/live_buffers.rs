//! Every result buffer the fixture hands out is accounted for until released.

use ferry_codec::{lower_to_vec, CallStatus, ForeignBytes};
use ferry_fixture::{
    ferry_fixture_buffer_free, ferry_fixture_fallible_op, ferry_fixture_sequence_op, live_buffers,
};

#[test]
fn results_and_error_buffers_are_counted_until_freed() {
    let baseline = live_buffers();

    let arg = lower_to_vec(&vec!["a".to_string(), "b".to_string()]).unwrap();
    let mut status = CallStatus::new();
    let first = ferry_fixture_sequence_op(ForeignBytes::from_slice(&arg).unwrap(), &mut status);
    let second = ferry_fixture_sequence_op(ForeignBytes::from_slice(&arg).unwrap(), &mut status);
    assert_eq!(live_buffers(), baseline + 2);

    ferry_fixture_fallible_op(u64::MAX, u64::MAX, &mut status);
    assert_eq!(live_buffers(), baseline + 3);

    ferry_fixture_buffer_free(first);
    ferry_fixture_buffer_free(second);
    ferry_fixture_buffer_free(std::mem::take(&mut status.error_buf));
    assert_eq!(live_buffers(), baseline);
}
