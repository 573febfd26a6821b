//! # Tablefold - Constant-Folding Table Allocation
//!
//! Compiles calls to the preallocating table constructors `create(n)` and
//! `allocate(n, h)` into bytecode-level instructions. When every size is a
//! compile-time constant that fits the instruction's immediate field, the call
//! becomes a single `newtable` with size hints; otherwise it stays a generic
//! intrinsic call.
//!
//! ## Quick Start
//!
//! ```rust
//! use tablefold::compiler::ir::{ArgumentDescriptor, CallSite, InstructionStream, Slot};
//! use tablefold::compiler::{AllocationCompiler, EmittedInstruction};
//!
//! # fn main() -> tablefold::Result<()> {
//! let site = CallSite::create(vec![ArgumentDescriptor::ConstantInt(100)], Slot(0));
//! let mut out = InstructionStream::new();
//! let instr = AllocationCompiler::default().compile(&site, &mut out)?;
//!
//! assert_eq!(
//!     instr,
//!     EmittedInstruction::PreallocateDirect { dst: Slot(0), array_size: 100, hash_size: 0 }
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Frontend → CallSite → ConstantResolver → AllocationCompiler → InstructionStream → Emitter
//! ```
//!
//! ### Main Components
//!
//! - [`compiler::AllocationCompiler`] - Per-call-site lowering decision and emission
//! - [`compiler::ConstantResolver`] - Constant propagation verdicts for argument slots
//! - [`compiler::Compiler`] - Driver over whole units, error policy, parallel units
//! - [`CompileError`] - Rejected call sites and options
//!
//! ## Error Handling
//!
//! ```rust
//! use tablefold::compiler::ir::{ArgumentDescriptor, CallSite, InstructionStream, Slot};
//! use tablefold::compiler::AllocationCompiler;
//! use tablefold::CompileError;
//!
//! let site = CallSite::allocate(
//!     vec![ArgumentDescriptor::ConstantInt(-1), ArgumentDescriptor::ConstantInt(5)],
//!     Slot(0),
//! );
//! let mut out = InstructionStream::new();
//! let err = AllocationCompiler::default().compile(&site, &mut out).unwrap_err();
//! assert!(matches!(err, CompileError::InvalidConstant { value: -1, .. }));
//! assert!(out.is_empty());
//! ```
//!
//! ## License
//!
//! Licensed under the [MIT License](https://opensource.org/licenses/MIT).

/// Version of the Tablefold compiler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compiler;
pub mod error;

// Re-export main types
pub use compiler::{
    AllocationCompiler, CallSite, CompileOptions, CompileResult, Compiler, ConstantResolver,
    ConstantTable, EmittedInstruction, InstructionStream,
};
pub use error::{CompileError, ErrorSeverity, Result};
