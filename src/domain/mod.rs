//! Domain types shared by the numeric helpers and the transform machine.
//!
//! This module defines:
//!
//! - dataset samples (`Point`) and titled point sequences (`Dataset`)
//! - the runtime stack value of the transform machine (`Value`)

pub mod types;

pub use types::*;
