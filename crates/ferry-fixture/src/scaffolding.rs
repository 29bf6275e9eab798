//! Callee-side half of the boundary contract.
//!
//! Result buffers are allocated here and must come back through
//! [`ferry_fixture_buffer_free`]. Every buffer handed out is counted so tests
//! can prove that the caller released all of them.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicI64, Ordering};

use ferry_codec::{lower_to_vec, ArithmeticError, CallCode, CallStatus, CodecError, ForeignBuffer};

static LIVE_BUFFERS: AtomicI64 = AtomicI64::new(0);

/// Number of result buffers handed out and not yet released.
pub fn live_buffers() -> i64 {
    LIVE_BUFFERS.load(Ordering::SeqCst)
}

/// Why a served call did not produce a payload.
#[derive(Debug)]
pub(crate) enum CallFailure {
    /// Typed failure, reported with [`CallCode::Error`].
    Arithmetic(ArithmeticError),
    /// Anything else, reported with [`CallCode::Panic`].
    Internal(String),
}

impl From<ArithmeticError> for CallFailure {
    fn from(e: ArithmeticError) -> Self {
        Self::Arithmetic(e)
    }
}

impl From<CodecError> for CallFailure {
    fn from(e: CodecError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Hand `bytes` to the caller as an owned result buffer.
pub(crate) fn return_buffer(bytes: Vec<u8>) -> Result<ForeignBuffer, CodecError> {
    let buf = ForeignBuffer::from_vec(bytes)?;
    LIVE_BUFFERS.fetch_add(1, Ordering::SeqCst);
    Ok(buf)
}

/// Release a buffer previously returned by this library.
#[no_mangle]
pub extern "C" fn ferry_fixture_buffer_free(buf: ForeignBuffer) {
    if buf.data.is_null() {
        return;
    }
    LIVE_BUFFERS.fetch_sub(1, Ordering::SeqCst);
    log::trace!("released result buffer of {} bytes", buf.len);
    // SAFETY: non-null buffers reaching this function were created by
    // `return_buffer` and ownership came back with the call.
    drop(unsafe { buf.destroy_into_vec() });
}

/// Run `body`, translating its failure (or panic) into `status`.
///
/// `fallback` is returned whenever the status is non-zero; the caller ignores
/// it. A panic never unwinds across the `extern "C"` frame.
pub(crate) fn serve_call<R, F>(status: *mut CallStatus, fallback: R, body: F) -> R
where
    F: FnOnce() -> Result<R, CallFailure>,
{
    let failure = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => return value,
        Ok(Err(failure)) => failure,
        Err(payload) => CallFailure::Internal(panic_message(payload.as_ref())),
    };

    // SAFETY: the caller passes either null or a valid, exclusive status.
    let Some(status) = (unsafe { status.as_mut() }) else {
        log::warn!("call failed with no status to report through: {failure:?}");
        return fallback;
    };

    let (code, bytes) = match failure {
        CallFailure::Arithmetic(e) => match lower_to_vec(&e) {
            Ok(bytes) => (CallCode::Error, bytes),
            Err(lower_err) => (CallCode::Panic, lower_err.to_string().into_bytes()),
        },
        CallFailure::Internal(message) => (CallCode::Panic, message.into_bytes()),
    };
    status.code = code as i8;
    status.error_buf = return_buffer(bytes).unwrap_or_default();
    fallback
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
