//! # Intermediate Representation for table allocation
//!
//! Call sites flow in from the frontend, instructions flow out to the bytecode
//! emitter.
//!
//! ## Module Structure
//!
//! ```text
//! ir/
//! ├── mod.rs          # This file - module definition and re-exports
//! ├── callsite.rs     # Intrinsic, ArgumentDescriptor, CallSite
//! ├── instruction.rs  # Slot, EmittedInstruction, Instruction
//! └── program.rs      # InstructionStream (code, constant pool, scratch slots)
//! ```
//!
//! ## Key Types
//!
//! - [`CallSite`] - One `create`/`allocate` call, immutable once parsed
//! - [`EmittedInstruction`] - `PreallocateDirect` or `CallIntrinsic`, one per call site
//! - [`InstructionStream`] - Caller-owned output sequence

mod callsite;
mod instruction;
mod program;

pub use callsite::{ArgumentDescriptor, CallSite, Intrinsic};
pub use instruction::{EmittedInstruction, Instruction, Slot};
pub use program::InstructionStream;
