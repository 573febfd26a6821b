//! # Tablefold Compiler - table constructor calls to allocation instructions
//!
//! This module lowers calls to `create`/`allocate` into instruction streams for
//! the bytecode emitter.
//!
//! ## Architecture
//!
//! ```text
//! CallSite → Resolve constants → Plan (direct | generic) → InstructionStream
//! ```
//!
//! ## Usage
//!
//! ```
//! use tablefold::compiler::{CompileOptions, Compiler, ConstantTable};
//! use tablefold::compiler::ir::{ArgumentDescriptor, CallSite, Slot};
//!
//! let sites = vec![CallSite::allocate(
//!     vec![ArgumentDescriptor::ConstantInt(16), ArgumentDescriptor::ConstantInt(32)],
//!     Slot(0),
//! )];
//! let compiler = Compiler::new(CompileOptions::default());
//! let result = compiler.compile_sites(&sites, &ConstantTable::new())?;
//! assert_eq!(result.stats.direct, 1);
//! # Ok::<(), tablefold::CompileError>(())
//! ```

pub mod allocation;
pub mod constants;
pub mod debug;
pub mod ir;

pub use allocation::{AllocationCompiler, AllocationPlan, DEFAULT_MAX_IMMEDIATE};
pub use constants::{ConstantResolver, ConstantTable};
pub use debug::{dump_stream, format_instruction};
pub use ir::{
    ArgumentDescriptor, CallSite, EmittedInstruction, Instruction, InstructionStream, Intrinsic,
    Slot,
};

use crate::{CompileError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// What the driver does when a call site fails to compile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failing call site
    #[default]
    Abort,
    /// Record a diagnostic and continue with the next call site
    Collect,
}

/// Compilation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Largest size the target instruction can carry as an immediate
    pub max_immediate: u32,
    /// Emit the direct form for constant sizes (false lowers every call generically)
    pub fold_constants: bool,
    /// Failure handling for individual call sites
    pub error_policy: ErrorPolicy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_immediate: DEFAULT_MAX_IMMEDIATE,
            fold_constants: true,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

impl CompileOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: CompileOptions = serde_json::from_str(json)
            .map_err(|e| CompileError::options(format!("Failed to parse options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Reject options no target could encode
    pub fn validate(&self) -> Result<()> {
        if self.max_immediate == 0 {
            return Err(CompileError::options("max_immediate must be at least 1"));
        }
        Ok(())
    }
}

/// Call site that failed under [`ErrorPolicy::Collect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position of the call site in the input
    pub site_index: usize,
    /// Why it failed
    pub error: CompileError,
}

/// Counts of lowering outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    /// Call sites lowered to a single preallocating instruction
    pub direct: usize,
    /// Call sites lowered to a generic call
    pub generic: usize,
    /// Call sites rejected with a diagnostic
    pub rejected: usize,
}

/// Compilation result with metadata
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Emitted instructions and constant pool
    pub stream: InstructionStream,
    /// Failures recorded under [`ErrorPolicy::Collect`]
    pub diagnostics: Vec<Diagnostic>,
    /// Outcome counts
    pub stats: CompileStats,
}

/// Driver running the allocation compiler over call sites in source order
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Create a new compiler with options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Options this compiler was created with
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one unit of call sites into a fresh stream
    ///
    /// Arguments are resolved against `resolver` first. Scratch slots start
    /// above the highest slot any call site references.
    pub fn compile_sites<R>(&self, sites: &[CallSite], resolver: &R) -> Result<CompileResult>
    where
        R: ConstantResolver + ?Sized,
    {
        self.options.validate()?;

        let allocator = AllocationCompiler::new(self.options.max_immediate)
            .with_folding(self.options.fold_constants);
        let mut stream = match highest_slot(sites) {
            Some(highest) => InstructionStream::above(highest),
            None => InstructionStream::new(),
        };
        let mut diagnostics = Vec::new();
        let mut stats = CompileStats::default();

        for (site_index, site) in sites.iter().enumerate() {
            let site = site.resolved(resolver);
            match allocator.compile(&site, &mut stream) {
                Ok(instr) if instr.is_direct() => stats.direct += 1,
                Ok(_) => stats.generic += 1,
                Err(error) => match self.options.error_policy {
                    ErrorPolicy::Abort => return Err(error),
                    ErrorPolicy::Collect => {
                        tracing::warn!("Call site {} skipped: {}", site_index, error);
                        stats.rejected += 1;
                        diagnostics.push(Diagnostic { site_index, error });
                    }
                },
            }
        }

        tracing::debug!(
            "Compiled {} call sites: {} direct, {} generic, {} rejected",
            sites.len(),
            stats.direct,
            stats.generic,
            stats.rejected
        );

        Ok(CompileResult {
            stream,
            diagnostics,
            stats,
        })
    }

    /// Compile independent units in parallel, one stream per unit
    ///
    /// The resolver is shared read-only; results come back in input order.
    pub fn compile_units<R>(
        &self,
        units: &[Vec<CallSite>],
        resolver: &R,
    ) -> Vec<Result<CompileResult>>
    where
        R: ConstantResolver + Sync + ?Sized,
    {
        units
            .par_iter()
            .map(|sites| self.compile_sites(sites, resolver))
            .collect()
    }
}

fn highest_slot(sites: &[CallSite]) -> Option<Slot> {
    sites
        .iter()
        .flat_map(|site| {
            let dynamic = site.arguments.iter().filter_map(|arg| match arg {
                ArgumentDescriptor::Dynamic(slot) => Some(slot.0),
                ArgumentDescriptor::ConstantInt(_) => None,
            });
            std::iter::once(site.destination.0).chain(dynamic)
        })
        .max()
        .map(Slot)
}
