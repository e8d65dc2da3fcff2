//! Numeric helpers for dataset transformations: clamped interpolation,
//! same-x merging and iterative background estimation.

pub mod background;
pub mod interp;
pub mod merge;

pub use background::*;
pub use interp::*;
pub use merge::*;
