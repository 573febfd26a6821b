//! # Constant-folding allocation compiler
//!
//! Lowers calls to the preallocating table constructors:
//!
//! ```text
//! create(100)        → r0 = newtable array=100 hash=0
//! allocate(16, 32)   → r0 = newtable array=16 hash=32
//! allocate(r1, r2)   → r0 = call allocate(r1, r2)
//! create(16777216)   → r9 = const[0]; r0 = call create(r9)
//! ```
//!
//! The direct form is only chosen when every size slot is a constant that fits
//! the immediate field. There is no mixed immediate/register encoding, so one
//! dynamic or oversized argument sends the whole call site down the generic path.

use super::ir::{
    ArgumentDescriptor, CallSite, EmittedInstruction, Instruction, InstructionStream, Intrinsic,
    Slot,
};
use crate::error::{CompileError, Result};

/// Largest size encodable in a 24-bit immediate
pub const DEFAULT_MAX_IMMEDIATE: u32 = (1 << 24) - 1;

/// Lowering decision for one call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationPlan {
    /// Single preallocating construction instruction
    Direct {
        /// Array part size
        array_size: u32,
        /// Hash part size
        hash_size: u32,
    },
    /// Generic call; one operand per declared size slot, trailing defaults filled in
    Generic {
        /// Called intrinsic
        intrinsic: Intrinsic,
        /// Operands in source order
        operands: Vec<ArgumentDescriptor>,
    },
}

/// Compiles `create`/`allocate` call sites into allocation instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationCompiler {
    max_immediate: u32,
    fold_constants: bool,
}

impl AllocationCompiler {
    /// Create a compiler with the given immediate bound
    pub fn new(max_immediate: u32) -> Self {
        Self {
            max_immediate,
            fold_constants: true,
        }
    }

    /// Enable or disable the direct form (disabled lowers every call generically)
    pub fn with_folding(mut self, enabled: bool) -> Self {
        self.fold_constants = enabled;
        self
    }

    /// Largest size emitted as an immediate
    pub fn max_immediate(&self) -> u32 {
        self.max_immediate
    }

    /// Decide how a call site is lowered, without emitting anything
    pub fn plan(&self, site: &CallSite) -> Result<AllocationPlan> {
        let intrinsic = Intrinsic::from_name(&site.intrinsic_name).ok_or_else(|| {
            CompileError::unsupported(
                &site.intrinsic_name,
                site.arguments.len(),
                "not a preallocating intrinsic",
            )
        })?;

        let supplied = site.arguments.len();
        if supplied == 0 || supplied > intrinsic.arity() {
            return Err(CompileError::unsupported(
                intrinsic.name(),
                supplied,
                format!("expected 1 to {} argument(s)", intrinsic.arity()),
            ));
        }

        for (position, arg) in site.arguments.iter().enumerate() {
            if let Some(value) = arg.constant().filter(|v| *v < 0) {
                return Err(CompileError::InvalidConstant {
                    name: intrinsic.name().to_string(),
                    position,
                    value,
                });
            }
        }

        // Missing trailing sizes are constant 0
        let operands: Vec<ArgumentDescriptor> = (0..intrinsic.arity())
            .map(|i| {
                site.arguments
                    .get(i)
                    .copied()
                    .unwrap_or(ArgumentDescriptor::ConstantInt(0))
            })
            .collect();

        if self.fold_constants {
            let immediates: Option<Vec<u32>> =
                operands.iter().map(|arg| self.immediate(arg)).collect();
            if let Some(sizes) = immediates {
                return Ok(AllocationPlan::Direct {
                    array_size: sizes[0],
                    hash_size: sizes.get(1).copied().unwrap_or(0),
                });
            }
        }

        Ok(AllocationPlan::Generic {
            intrinsic,
            operands,
        })
    }

    /// Compile one call site, appending to `out`
    ///
    /// On error nothing is appended. On the generic path every constant operand
    /// is materialized into a scratch slot first. Scratch slots start above both
    /// the stream's scratch base and every slot the call site uses, and are free
    /// again once the call is emitted.
    pub fn compile(
        &self,
        site: &CallSite,
        out: &mut InstructionStream,
    ) -> Result<EmittedInstruction> {
        let plan = match self.plan(site) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::debug!("Rejected call site `{}`: {}", site.intrinsic_name, err);
                return Err(err);
            }
        };

        let instr = match plan {
            AllocationPlan::Direct {
                array_size,
                hash_size,
            } => {
                tracing::trace!(
                    "r{} = newtable array={} hash={}",
                    site.destination.0,
                    array_size,
                    hash_size
                );
                EmittedInstruction::PreallocateDirect {
                    dst: site.destination,
                    array_size,
                    hash_size,
                }
            }
            AllocationPlan::Generic {
                intrinsic,
                operands,
            } => {
                tracing::debug!(
                    "Generic call for `{}` into r{}: {:?}",
                    intrinsic,
                    site.destination.0,
                    operands
                );
                let first = self.scratch_for(site, intrinsic, &operands, out)?;
                let mut next = first.map_or(0, |slot| slot.0);
                let mut args: Vec<Slot> = Vec::with_capacity(operands.len());
                for operand in operands {
                    match operand {
                        ArgumentDescriptor::Dynamic(slot) => args.push(slot),
                        ArgumentDescriptor::ConstantInt(value) => {
                            let index = out.intern_constant(value);
                            let dst = Slot(next);
                            out.push(Instruction::LoadConstant { dst, index });
                            args.push(dst);
                            next = next.wrapping_add(1);
                        }
                    }
                }
                EmittedInstruction::CallIntrinsic {
                    dst: site.destination,
                    intrinsic,
                    args,
                }
            }
        };

        out.push(instr.clone());
        Ok(instr)
    }

    /// First scratch slot for the constant operands, above every slot the site uses
    fn scratch_for(
        &self,
        site: &CallSite,
        intrinsic: Intrinsic,
        operands: &[ArgumentDescriptor],
        out: &InstructionStream,
    ) -> Result<Option<Slot>> {
        let count = operands.iter().filter(|arg| arg.constant().is_some()).count() as u32;
        if count == 0 {
            return Ok(None);
        }

        let highest = operands
            .iter()
            .filter_map(|arg| match arg {
                ArgumentDescriptor::Dynamic(slot) => Some(slot.0),
                ArgumentDescriptor::ConstantInt(_) => None,
            })
            .fold(site.destination.0, u32::max);

        highest
            .checked_add(1)
            .and_then(|floor| out.scratch_window(floor, count))
            .map(Some)
            .ok_or_else(|| CompileError::OutOfSlots {
                name: intrinsic.name().to_string(),
                highest,
            })
    }

    fn immediate(&self, arg: &ArgumentDescriptor) -> Option<u32> {
        match *arg {
            ArgumentDescriptor::ConstantInt(value) => u32::try_from(value)
                .ok()
                .filter(|v| *v <= self.max_immediate),
            ArgumentDescriptor::Dynamic(_) => None,
        }
    }
}

impl Default for AllocationCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMMEDIATE)
    }
}
