//! Dataset storage seen by the transform machine.
//!
//! The machine only needs a handful of operations on the session's datasets;
//! they are captured by [`DatasetProvider`]. [`DataStore`] is a plain in-memory
//! implementation for embedders without storage of their own.

pub mod store;

pub use store::*;
