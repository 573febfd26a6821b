//! Instruction stream owned by the caller of the allocation compiler

use super::instruction::{Instruction, Slot};

/// Output sequence for compiled call sites
///
/// Holds the instructions in emission order, a deduplicated constant pool for
/// values materialized into slots, and the lowest slot usable as scratch.
/// Scratch slots are only held for the duration of one call site, and the
/// compiler never hands out one at or below a slot the call site uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionStream {
    /// All instructions in emission order
    pub instructions: Vec<Instruction>,
    /// Constant pool referenced by `LoadConstant`
    pub constants: Vec<i64>,
    free_slot: Option<u32>,
}

impl InstructionStream {
    /// Create an empty stream whose scratch slots start at slot 0
    pub fn new() -> Self {
        Self::with_scratch_base(0)
    }

    /// Create an empty stream whose scratch slots start at `base`
    ///
    /// `base` should be above every slot the caller keeps live across call sites.
    pub fn with_scratch_base(base: u32) -> Self {
        Self {
            instructions: Vec::new(),
            constants: Vec::new(),
            free_slot: Some(base),
        }
    }

    /// Create an empty stream whose scratch slots start just above `highest`
    ///
    /// When `highest` is the last slot there is no scratch space at all.
    pub fn above(highest: Slot) -> Self {
        Self {
            instructions: Vec::new(),
            constants: Vec::new(),
            free_slot: highest.0.checked_add(1),
        }
    }

    /// Lowest scratch slot, or `None` when every slot may be live
    pub fn scratch_base(&self) -> Option<Slot> {
        self.free_slot.map(Slot)
    }

    /// First of `count` consecutive scratch slots starting at or above `floor`
    ///
    /// Returns `None` when the window would run past the last slot.
    pub fn scratch_window(&self, floor: u32, count: u32) -> Option<Slot> {
        let start = self.free_slot?.max(floor);
        start.checked_add(count.saturating_sub(1))?;
        Some(Slot(start))
    }

    /// Append an instruction
    pub fn push(&mut self, instr: impl Into<Instruction>) {
        self.instructions.push(instr.into());
    }

    /// Index of `value` in the constant pool, adding it if absent
    pub fn intern_constant(&mut self, value: i64) -> usize {
        if let Some(index) = self.constants.iter().position(|&c| c == value) {
            return index;
        }
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True when nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl Default for InstructionStream {
    fn default() -> Self {
        Self::new()
    }
}
