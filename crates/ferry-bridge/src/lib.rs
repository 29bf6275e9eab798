//! Value bridge over a foreign operation surface.
//!
//! Wraps a table of C function pointers in one typed adapter per bridgeable
//! category, and reconstructs foreign failures into local results.
//!
//! ## Modules
//!
//! - [`surface`] - The function-pointer table and operation names
//! - [`adapter`] - Typed call adapters and dynamic dispatch
//! - [`channel`] - Call-status state machine and returned-buffer release

pub mod adapter;
pub mod channel;
pub mod error;
pub mod surface;

pub use adapter::Bridge;
pub use channel::{CallState, ReturnedBuffer, StatusChannel};
pub use error::BridgeError;
pub use surface::{BufferOp, ForeignSurface, Operation};
