//! CLI command implementations.

pub mod describe;
pub mod list;
pub mod run;
