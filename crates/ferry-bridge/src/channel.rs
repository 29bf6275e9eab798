//! The result/error channel.
//!
//! A status-reporting call moves through [`CallState`]: it starts
//! `Pending`, the counterparty writes a code into the [`CallStatus`]
//! out-parameter, and [`StatusChannel::complete`] turns that code into
//! `Succeeded`, `Failed`, or `Panicked`. Every buffer the counterparty hands
//! back, payload or error, is held by a [`ReturnedBuffer`] guard and released
//! through the counterparty's own free entry point on every exit path.

use std::mem;

use ferry_codec::{lift_from_bytes, ArithmeticError, CallCode, CallStatus, CodecError, ForeignBuffer};

use crate::error::{BridgeError, Result};

/// Where a status-reporting call stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Pending,
    Succeeded,
    Failed,
    Panicked,
}

/// A buffer returned by the counterparty, freed on drop.
pub struct ReturnedBuffer {
    buf: ForeignBuffer,
    free: extern "C" fn(ForeignBuffer),
}

impl ReturnedBuffer {
    pub fn new(buf: ForeignBuffer, free: extern "C" fn(ForeignBuffer)) -> Self {
        Self { buf, free }
    }

    /// View the returned bytes.
    pub fn bytes(&self) -> std::result::Result<&[u8], CodecError> {
        // SAFETY: the buffer came from the counterparty for this call and is
        // not released until `self` drops.
        unsafe { self.buf.as_bytes() }
    }
}

impl Drop for ReturnedBuffer {
    fn drop(&mut self) {
        if self.buf.data.is_null() {
            return;
        }
        log::trace!("releasing {} byte result buffer", self.buf.len);
        (self.free)(mem::take(&mut self.buf));
    }
}

/// The status out-parameter of one call and the state derived from it.
pub struct StatusChannel {
    operation: &'static str,
    status: CallStatus,
    state: CallState,
    free: extern "C" fn(ForeignBuffer),
}

impl StatusChannel {
    pub fn new(operation: &'static str, free: extern "C" fn(ForeignBuffer)) -> Self {
        Self {
            operation,
            status: CallStatus::new(),
            state: CallState::Pending,
            free,
        }
    }

    /// Address handed to the counterparty as the trailing out-parameter.
    pub fn status_ptr(&mut self) -> *mut CallStatus {
        &mut self.status
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    /// Interpret the status written by the counterparty.
    ///
    /// The error buffer, if any, is released before this returns.
    pub fn complete(&mut self) -> Result<()> {
        let operation = self.operation;
        let error_buf = ReturnedBuffer::new(mem::take(&mut self.status.error_buf), self.free);
        let code = self.status.code;

        match CallCode::from_raw(code) {
            Some(CallCode::Success) => {
                self.state = CallState::Succeeded;
                Ok(())
            }
            Some(CallCode::Error) => {
                self.state = CallState::Failed;
                let bytes = error_buf.bytes().map_err(BridgeError::malformed(operation))?;
                let error = lift_from_bytes::<ArithmeticError>(bytes)
                    .map_err(BridgeError::malformed(operation))?;
                log::debug!("{operation} reported {error}");
                Err(BridgeError::ForeignCallFailed { operation, error })
            }
            Some(CallCode::Panic) => {
                self.state = CallState::Panicked;
                let bytes = error_buf.bytes().map_err(BridgeError::malformed(operation))?;
                let message = String::from_utf8_lossy(bytes).into_owned();
                log::warn!("{operation} panicked in the counterparty: {message}");
                Err(BridgeError::ForeignPanic { operation, message })
            }
            None => {
                log::warn!("{operation} wrote unknown status code {code}");
                Err(BridgeError::MalformedResult {
                    operation,
                    source: CodecError::malformed("call status", format!("unknown code {code}")),
                })
            }
        }
    }
}

impl Drop for StatusChannel {
    fn drop(&mut self) {
        // A channel dropped without `complete` may still own an error buffer.
        drop(ReturnedBuffer::new(mem::take(&mut self.status.error_buf), self.free));
    }
}
