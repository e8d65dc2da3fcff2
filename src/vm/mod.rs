//! Bytecode and the stack machine that runs dataset transformations.
//!
//! Responsibilities:
//!
//! - opcode set shared with the expression compiler (`opcode`)
//! - compiled programs and their constant pools (`program`)
//! - the fixed-capacity value stack (`stack`)
//! - `@n = expr` execution against a dataset provider (`transform`)

pub mod opcode;
pub mod program;
pub mod stack;
pub mod transform;

pub use opcode::*;
pub use program::*;
pub use stack::*;
pub use transform::*;
