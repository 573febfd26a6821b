//! Error types for the Tablefold compiler

use thiserror::Error;

/// Allocation compiler errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Call site the allocation compiler does not know how to lower
    ///
    /// **Triggered by:** Unknown intrinsic name, or an argument count outside `1..=arity`
    /// **Example:** `table.create()`, `table.allocate(1, 2, 3)`, `table.resize(4)`
    /// **Prevention:** The frontend validates intrinsic signatures before compiling
    #[error("Unsupported call site `{name}` with {arity} argument(s): {reason}")]
    UnsupportedCallSite {
        /// Intrinsic name as written at the call site
        name: String,
        /// Number of arguments supplied
        arity: usize,
        /// Why the call site was rejected
        reason: String,
    },

    /// Negative size constant
    ///
    /// **Triggered by:** A constant size argument below zero
    /// **Example:** `table.allocate(-1, 5)`
    #[error("Invalid constant {value} for argument {position} of `{name}`: sizes must be non-negative")]
    InvalidConstant {
        /// Intrinsic name
        name: String,
        /// Zero-based argument position
        position: usize,
        /// Offending value
        value: i64,
    },

    /// No slot left to materialize constants into
    ///
    /// **Triggered by:** A generic call whose own slots reach the last slot number
    /// **Example:** `t = table.create(1 << 30)` with `t` in slot `u32::MAX`
    #[error("No scratch slot left above r{highest} for `{name}`")]
    OutOfSlots {
        /// Intrinsic name
        name: String,
        /// Highest slot the call site keeps live
        highest: u32,
    },

    /// Compiler configuration rejected
    #[error("Invalid compile options: {0}")]
    InvalidOptions(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that stops the current call site (or unit) from compiling
    Fatal,
    /// Error the driver may work around
    Recoverable,
}

impl CompileError {
    /// Create an unsupported call site error
    pub fn unsupported(name: impl Into<String>, arity: usize, reason: impl Into<String>) -> Self {
        CompileError::UnsupportedCallSite {
            name: name.into(),
            arity,
            reason: reason.into(),
        }
    }

    /// Create an options error with a message
    pub fn options(msg: impl Into<String>) -> Self {
        CompileError::InvalidOptions(msg.into())
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            CompileError::UnsupportedCallSite { .. } => ErrorSeverity::Fatal,
            CompileError::InvalidConstant { .. } => ErrorSeverity::Fatal,
            CompileError::OutOfSlots { .. } => ErrorSeverity::Fatal,
            CompileError::InvalidOptions(_) => ErrorSeverity::Recoverable,
        }
    }
}

/// Result type for Tablefold operations
pub type Result<T> = std::result::Result<T, CompileError>;
