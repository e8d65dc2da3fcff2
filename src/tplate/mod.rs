//! Function-type templates and their registry.
//!
//! Responsibilities:
//!
//! - template data and formatting (`template`)
//! - expression trees of formula-defined templates (`optree`)
//! - the builtin function table (`builtin`)
//! - keyword argument reordering (`args`)
//! - the session registry (`registry`)

pub mod args;
pub mod builtin;
pub mod optree;
pub mod registry;
pub mod template;

pub use args::*;
pub use builtin::*;
pub use optree::*;
pub use registry::*;
pub use template::*;
