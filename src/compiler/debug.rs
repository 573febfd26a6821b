//! Debug utilities for allocation compilation
//!
//! Human-readable listings of instruction streams.

use super::ir::{EmittedInstruction, Instruction, InstructionStream};

/// Render an instruction stream, one numbered line per instruction
pub fn dump_stream(stream: &InstructionStream) -> String {
    let mut out = String::new();
    for (i, instr) in stream.instructions.iter().enumerate() {
        out.push_str(&format!(
            "{:04}: {}\n",
            i,
            format_instruction(instr, &stream.constants)
        ));
    }
    out
}

/// Format a single instruction
///
/// `constants` is the owning stream's constant pool; loads show the pooled value.
pub fn format_instruction(instr: &Instruction, constants: &[i64]) -> String {
    match instr {
        Instruction::LoadConstant { dst, index } => match constants.get(*index) {
            Some(value) => format!("r{} = const[{}] ; {}", dst.0, index, value),
            None => format!("r{} = const[{}] ; <missing>", dst.0, index),
        },
        Instruction::Emitted(EmittedInstruction::PreallocateDirect {
            dst,
            array_size,
            hash_size,
        }) => format!(
            "r{} = newtable array={} hash={}",
            dst.0, array_size, hash_size
        ),
        Instruction::Emitted(EmittedInstruction::CallIntrinsic {
            dst,
            intrinsic,
            args,
        }) => {
            let args_str: Vec<String> = args.iter().map(|r| format!("r{}", r.0)).collect();
            format!("r{} = call {}({})", dst.0, intrinsic, args_str.join(", "))
        }
    }
}
