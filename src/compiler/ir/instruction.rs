//! IR instruction definitions

use super::callsite::Intrinsic;

/// Abstract register/variable slot (mapped to a physical register by the emitter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub u32);

impl Slot {
    /// Creates a new slot with the given ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Instruction produced for exactly one call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedInstruction {
    /// Construct a table with preallocated array and hash parts: dst = newtable(array, hash)
    ///
    /// Both sizes are immediates and never exceed the configured bound.
    PreallocateDirect {
        /// Slot receiving the new table
        dst: Slot,
        /// Array part size
        array_size: u32,
        /// Hash part size
        hash_size: u32,
    },
    /// Generic intrinsic call: dst = intrinsic(args...)
    CallIntrinsic {
        /// Slot receiving the new table
        dst: Slot,
        /// Called intrinsic
        intrinsic: Intrinsic,
        /// Argument slots in source order
        args: Vec<Slot>,
    },
}

impl EmittedInstruction {
    /// Destination slot of the instruction
    pub fn dst(&self) -> Slot {
        match self {
            EmittedInstruction::PreallocateDirect { dst, .. }
            | EmittedInstruction::CallIntrinsic { dst, .. } => *dst,
        }
    }

    /// True for the single-instruction fast path
    pub fn is_direct(&self) -> bool {
        matches!(self, EmittedInstruction::PreallocateDirect { .. })
    }
}

/// Entry of an instruction stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Load a constant from the constant pool: dst = constants[index]
    LoadConstant {
        /// Scratch slot receiving the value
        dst: Slot,
        /// Index into the stream's constant pool
        index: usize,
    },
    /// Allocation instruction for a call site
    Emitted(EmittedInstruction),
}

impl From<EmittedInstruction> for Instruction {
    fn from(instr: EmittedInstruction) -> Self {
        Instruction::Emitted(instr)
    }
}
