//! Crate-wide error type.
//!
//! Every error is fatal to the operation that raised it (one transform, one
//! template definition) and leaves registry and dataset state untouched.
//! Embedding binaries can map errors to process exit codes via
//! [`Error::exit_code`].

use thiserror::Error;

/// Canonical result for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Scalar/series mismatch in an arithmetic or set opcode.
    #[error("{0}")]
    Type(String),

    /// Opcode outside the dataset-transformation subset.
    #[error("op {0} is not allowed in dataset transformations.")]
    UnsupportedOpcode(String),

    #[error("stack overflow (more than {0} values)")]
    StackOverflow(usize),

    #[error("dataset @{0} not found")]
    NoSuchDataset(usize),

    #[error("function type `{0}' is already defined")]
    DuplicateName(String),

    #[error("function type `{0}' is not defined")]
    NotFound(String),

    #[error("function type `{name}' is used by `{used_by}'")]
    InUse { name: String, used_by: String },

    #[error("function type `{0}' cannot refer to itself")]
    RecursiveDefinition(String),

    #[error("invalid definition of `{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("function type `{name}' requires {expected} argument(s), got {got}")]
    ArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("function type `{tplate}' has no parameter `{arg}'")]
    UnknownArgument { tplate: String, arg: String },

    #[error("parameter `{arg}' of `{tplate}' given more than once")]
    DuplicateArgument { tplate: String, arg: String },

    #[error("missing value for parameter `{arg}' of `{tplate}'")]
    MissingArgument { tplate: String, arg: String },

    #[error("invalid settings: {0}")]
    Config(String),

    /// Implementation bug (compiler/VM contract mismatch, stack imbalance).
    #[error("internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    pub(crate) fn invalid_definition(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidDefinition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Exit code for a front-end that terminates on this error.
    ///
    /// - `2`: bad settings
    /// - `3`: template definition or argument binding rejected
    /// - `4`: transformation failed on its input
    /// - `70`: internal error
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::DuplicateName(_)
            | Error::NotFound(_)
            | Error::InUse { .. }
            | Error::RecursiveDefinition(_)
            | Error::InvalidDefinition { .. }
            | Error::ArgumentCount { .. }
            | Error::UnknownArgument { .. }
            | Error::DuplicateArgument { .. }
            | Error::MissingArgument { .. } => 3,
            Error::Type(_) | Error::StackOverflow(_) | Error::NoSuchDataset(_) => 4,
            Error::UnsupportedOpcode(_) | Error::Invariant(_) => 70,
        }
    }

    /// True for errors that signal a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        self.exit_code() == 70
    }
}
