//! `curvekit` library crate.
//!
//! Building blocks of a curve-fitting session:
//!
//! - function-type templates and the registry that owns them (`tplate`)
//! - keyword argument reordering for template calls (`tplate::args`)
//! - the stack machine behind dataset transformations such as
//!   `@0 = @1 + @2` or `@+ = shirley_bg(@0)` (`vm`)
//!
//! Parsing formulas and expressions is left to the embedder; this crate
//! consumes parsed bodies and compiled programs.

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod tplate;
pub mod vm;

pub use config::Settings;
pub use error::{Error, Result};
