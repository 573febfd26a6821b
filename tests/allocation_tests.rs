//! End-to-end tests for allocation lowering through the public API

use tablefold::compiler::ir::ArgumentDescriptor::{ConstantInt, Dynamic};
use tablefold::compiler::ir::{Instruction, Intrinsic, Slot};
use tablefold::compiler::{dump_stream, ErrorPolicy};
use tablefold::{
    AllocationCompiler, CallSite, CompileError, CompileOptions, Compiler, ConstantTable,
    EmittedInstruction, InstructionStream,
};

fn compile_one(site: &CallSite) -> Result<EmittedInstruction, CompileError> {
    let mut out = InstructionStream::with_scratch_base(100);
    AllocationCompiler::default().compile(site, &mut out)
}

// ====================
// Scenarios
// ====================

#[test]
fn test_create_with_literal_size() {
    let result = compile_one(&CallSite::create(vec![ConstantInt(100)], Slot(0))).unwrap();
    assert_eq!(
        result,
        EmittedInstruction::PreallocateDirect {
            dst: Slot(0),
            array_size: 100,
            hash_size: 0
        }
    );
}

#[test]
fn test_allocate_with_literal_sizes() {
    let result = compile_one(&CallSite::allocate(
        vec![ConstantInt(16), ConstantInt(32)],
        Slot(0),
    ))
    .unwrap();
    assert_eq!(
        result,
        EmittedInstruction::PreallocateDirect {
            dst: Slot(0),
            array_size: 16,
            hash_size: 32
        }
    );
}

#[test]
fn test_allocate_with_runtime_sizes() {
    let result = compile_one(&CallSite::allocate(
        vec![Dynamic(Slot(1)), Dynamic(Slot(2))],
        Slot(0),
    ))
    .unwrap();
    assert_eq!(
        result,
        EmittedInstruction::CallIntrinsic {
            dst: Slot(0),
            intrinsic: Intrinsic::Allocate,
            args: vec![Slot(1), Slot(2)]
        }
    );
}

#[test]
fn test_allocate_with_negative_size() {
    let err = compile_one(&CallSite::allocate(
        vec![ConstantInt(-1), ConstantInt(5)],
        Slot(0),
    ))
    .unwrap_err();
    assert!(matches!(err, CompileError::InvalidConstant { value: -1, .. }));
}

#[test]
fn test_create_one_over_immediate_bound() {
    let mut out = InstructionStream::with_scratch_base(100);
    let result = AllocationCompiler::default()
        .compile(
            &CallSite::create(vec![ConstantInt(16_777_216)], Slot(0)),
            &mut out,
        )
        .unwrap();
    assert_eq!(
        result,
        EmittedInstruction::CallIntrinsic {
            dst: Slot(0),
            intrinsic: Intrinsic::Create,
            args: vec![Slot(100)]
        }
    );
    assert_eq!(
        out.instructions,
        vec![
            Instruction::LoadConstant {
                dst: Slot(100),
                index: 0
            },
            Instruction::Emitted(result),
        ]
    );
    assert_eq!(out.constants, vec![16_777_216]);
}

// ====================
// Driver
// ====================

#[test]
fn test_named_constants_fold_through_resolver() {
    // local N = 64; local t = table.allocate(N, 8)
    let mut constants = ConstantTable::new();
    constants.bind(Slot(1), 64);

    let sites = vec![CallSite::allocate(
        vec![Dynamic(Slot(1)), ConstantInt(8)],
        Slot(0),
    )];
    let compiler = Compiler::new(CompileOptions::default());
    let result = compiler.compile_sites(&sites, &constants).unwrap();

    assert_eq!(result.stats.direct, 1);
    assert_eq!(
        result.stream.instructions,
        vec![Instruction::Emitted(EmittedInstruction::PreallocateDirect {
            dst: Slot(0),
            array_size: 64,
            hash_size: 8
        })]
    );
}

#[test]
fn test_unit_listing() {
    let sites = vec![
        CallSite::create(vec![ConstantInt(10)], Slot(0)),
        CallSite::allocate(vec![Dynamic(Slot(2)), ConstantInt(4)], Slot(1)),
        CallSite::create(vec![ConstantInt(1 << 25)], Slot(3)),
    ];
    let compiler = Compiler::new(CompileOptions::default());
    let result = compiler.compile_sites(&sites, &ConstantTable::new()).unwrap();

    assert_eq!(
        dump_stream(&result.stream),
        "0000: r0 = newtable array=10 hash=0\n\
         0001: r4 = const[0] ; 4\n\
         0002: r1 = call allocate(r2, r4)\n\
         0003: r4 = const[1] ; 33554432\n\
         0004: r3 = call create(r4)\n"
    );
    assert_eq!(result.stats.direct, 1);
    assert_eq!(result.stats.generic, 2);
}

#[test]
fn test_small_immediate_bound_from_config() {
    let options = CompileOptions::from_json(r#"{"max_immediate": 255}"#).unwrap();
    let sites = vec![
        CallSite::create(vec![ConstantInt(255)], Slot(0)),
        CallSite::create(vec![ConstantInt(256)], Slot(1)),
    ];
    let result = Compiler::new(options)
        .compile_sites(&sites, &ConstantTable::new())
        .unwrap();
    assert_eq!(result.stats.direct, 1);
    assert_eq!(result.stats.generic, 1);
}

#[test]
fn test_collect_policy_reports_every_bad_site() {
    let options = CompileOptions {
        error_policy: ErrorPolicy::Collect,
        ..CompileOptions::default()
    };
    let sites = vec![
        CallSite::create(vec![], Slot(0)),
        CallSite::allocate(vec![ConstantInt(2), ConstantInt(2)], Slot(1)),
        CallSite::allocate(vec![ConstantInt(-4)], Slot(2)),
    ];
    let result = Compiler::new(options)
        .compile_sites(&sites, &ConstantTable::new())
        .unwrap();

    let indices: Vec<usize> = result.diagnostics.iter().map(|d| d.site_index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert!(matches!(
        result.diagnostics[0].error,
        CompileError::UnsupportedCallSite { .. }
    ));
    assert_eq!(result.stream.len(), 1);
}

#[test]
fn test_parallel_units_match_sequential() {
    let constants: ConstantTable = [(Slot(9), 12)].into_iter().collect();
    let units: Vec<Vec<CallSite>> = (0..16)
        .map(|n| {
            vec![
                CallSite::allocate(vec![ConstantInt(n), Dynamic(Slot(9))], Slot(0)),
                CallSite::create(vec![Dynamic(Slot(5))], Slot(1)),
            ]
        })
        .collect();

    let compiler = Compiler::new(CompileOptions::default());
    let parallel = compiler.compile_units(&units, &constants);

    assert_eq!(parallel.len(), units.len());
    for (unit, result) in units.iter().zip(parallel) {
        let sequential = compiler.compile_sites(unit, &constants).unwrap();
        let result = result.unwrap();
        assert_eq!(result.stream, sequential.stream);
        assert_eq!(result.stats, sequential.stats);
    }
}
