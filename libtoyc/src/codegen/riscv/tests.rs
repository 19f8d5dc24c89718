// Copyright 2025-2026 Neil Henderson

use super::*;
use crate::compiler_driver::Driver;
use crate::ir::{TacBinaryOp, TacInstruction, TacOperand, TacProgram};
use crate::parser::AstType;
use super::regalloc::RegAllocStrategy;

/// Compiles source text down to ToyTac IR.
fn compile_to_ir(source: &str) -> TacProgram {
    let mut driver = Driver::for_testing();
    let tokens = crate::lexer::lex_source(&mut driver, source);
    let ast_root = crate::parser::parse_to_ast(&mut driver, tokens);
    let symbols = crate::sema::analyze(&mut driver, &ast_root);
    assert!(!driver.has_error_diagnostics(), "unexpected diagnostics for: {source}");
    crate::ir::generate(&ast_root, &symbols)
}

/// Compiles source text to assembly with the given allocation strategy.
fn compile_to_asm(source: &str, strategy: RegAllocStrategy) -> String {
    generate_assembly(&compile_to_ir(source), strategy)
}

fn instruction_lines(assembly: &str) -> Vec<&str> {
    assembly.lines().filter(|line| line.starts_with('\t')).map(|line| line.trim()).collect()
}

#[test]
fn emits_global_label_and_epilogue() {
    let assembly = compile_to_asm("int main() { return 0; }", RegAllocStrategy::Naive);

    assert!(assembly.contains(".text"));
    assert!(assembly.contains(".global main"));
    assert!(assembly.lines().any(|line| line == "main:"));
    assert!(assembly.lines().any(|line| line == "main_epilogue:"));
    assert!(assembly.contains("\tret"));
}

#[test]
fn frame_adjustment_is_sixteen_byte_aligned_and_symmetric() {
    let assembly = compile_to_asm("int main() { int a = 1; int b = 2; return a + b; }", RegAllocStrategy::Naive);
    let lines = instruction_lines(&assembly);

    let allocate = lines
        .iter()
        .find_map(|line| line.strip_prefix("addi sp, sp, -"))
        .expect("prologue adjusts sp");
    let frame_size: i32 = allocate.parse().expect("numeric frame size");
    assert_eq!(frame_size % 16, 0);

    let release = format!("addi sp, sp, {frame_size}");
    assert!(lines.contains(&release.as_str()), "epilogue must release the same frame");
}

#[test]
fn prologue_saves_and_epilogue_restores_ra_and_fp() {
    let assembly = compile_to_asm("int main() { return 0; }", RegAllocStrategy::Naive);
    let lines = instruction_lines(&assembly);

    let saves_ra = lines.iter().any(|line| line.starts_with("sw ra,"));
    let restores_ra = lines.iter().any(|line| line.starts_with("lw ra,"));
    let saves_fp = lines.iter().any(|line| line.starts_with("sw fp,"));
    let restores_fp = lines.iter().any(|line| line.starts_with("lw fp,"));

    assert!(saves_ra && restores_ra && saves_fp && restores_fp);
}

#[test]
fn return_value_lands_in_a0() {
    let assembly = compile_to_asm("int main() { return 7; }", RegAllocStrategy::Naive);
    assert!(assembly.contains("\tli a0, 7"));
    assert!(assembly.contains("\tj main_epilogue"));
}

#[test]
fn call_places_arguments_in_arg_registers() {
    let assembly = compile_to_asm(
        "int add(int a, int b) { return a + b; }
         int main() { return add(1, 2); }",
        RegAllocStrategy::Naive,
    );

    assert!(assembly.contains("\tli a0, 1"));
    assert!(assembly.contains("\tli a1, 2"));
    assert!(assembly.contains("\tcall add"));
}

#[test]
fn ninth_and_later_arguments_spill_to_the_outgoing_area() {
    let assembly = compile_to_asm(
        "int wide(int a, int b, int c, int d, int e, int f, int g, int h, int i, int j) { return a + j; }
         int main() { return wide(1, 2, 3, 4, 5, 6, 7, 8, 9, 10); }",
        RegAllocStrategy::Naive,
    );

    assert!(assembly.contains("\tsw t0, 0(sp)"));
    assert!(assembly.contains("\tsw t0, 4(sp)"));
    assert!(assembly.contains("\tcall wide"));

    // The callee reads its ninth and tenth parameters from positive fp offsets.
    assert!(assembly.contains("\tlw t0, 0(fp)"));
    assert!(assembly.contains("\tlw t0, 4(fp)"));
}

#[test]
fn comparison_lowering_uses_slt_and_xori() {
    let assembly = compile_to_asm(
        "int f(int a, int b) { return a <= b; }
         int main() { return f(1, 2); }",
        RegAllocStrategy::Naive,
    );

    assert!(assembly.contains("\tslt t0, t2, t1"));
    assert!(assembly.contains("\txori t0, t0, 1"));
}

#[test]
fn equality_lowering_uses_xor_and_seqz() {
    let assembly = compile_to_asm(
        "int f(int a, int b) { return a == b; }
         int main() { return f(1, 2); }",
        RegAllocStrategy::Naive,
    );

    assert!(assembly.contains("\txor t0, t1, t2"));
    assert!(assembly.contains("\tseqz t0, t0"));
}

#[test]
fn branch_lowering_uses_bnez() {
    let assembly = compile_to_asm("int main() { int x = 1; if (x) { return 1; } return 0; }", RegAllocStrategy::Naive);
    assert!(instruction_lines(&assembly).iter().any(|line| line.starts_with("bnez t0, ")));
}

#[test]
fn and_or_opcodes_lower_without_branches() {
    // The translator always short-circuits, so exercise the opcodes with hand-built IR.
    let program = TacProgram(vec![
        TacInstruction::FunctionBegin { name: "f".to_string(), return_type: AstType::Int, params: vec![] },
        TacInstruction::Binary {
            op: TacBinaryOp::And,
            dst: TacOperand::Temp("%t0".to_string()),
            lhs: TacOperand::Constant(2),
            rhs: TacOperand::Constant(3),
        },
        TacInstruction::Binary {
            op: TacBinaryOp::Or,
            dst: TacOperand::Temp("%t1".to_string()),
            lhs: TacOperand::Temp("%t0".to_string()),
            rhs: TacOperand::Constant(0),
        },
        TacInstruction::Return { value: Some(TacOperand::Temp("%t1".to_string())) },
        TacInstruction::FunctionEnd { name: "f".to_string() },
    ]);

    let assembly = generate_assembly(&program, RegAllocStrategy::Naive);

    assert!(assembly.contains("\tand t0, t1, t2"));
    assert!(assembly.contains("\tor t0, t1, t2"));
    assert!(assembly.contains("\tsnez"));
    assert!(!assembly.contains("\tbeq "));
}

#[test]
fn allocated_variables_use_callee_saved_registers() {
    let source = "int main() { int a = 1; int b = 2; int c = 0; c = a + b; return c; }";
    let assembly = compile_to_asm(source, RegAllocStrategy::LinearScan);
    let lines = instruction_lines(&assembly);

    // Some variable landed in s1, and the prologue/epilogue preserve it.
    assert!(lines.iter().any(|line| line.contains("s1")));
    assert!(lines.iter().any(|line| line.starts_with("sw s1,")));
    assert!(lines.iter().any(|line| line.starts_with("lw s1,")));
}

#[test]
fn caller_saved_allocation_is_saved_around_calls() {
    // Thirteen values live across the call force the allocator past s1..s11 and into t3/t4,
    // which must be saved before the call and restored after it.
    let source = "int f() { return 1; }
                  int main() {
                      int a = 1; int b = 2; int c = 3; int d = 4; int e = 5; int g = 6;
                      int h = 7; int i = 8; int j = 9; int k = 10; int l = 11; int m = 12;
                      int r = f();
                      return a + b + c + d + e + g + h + i + j + k + l + m + r;
                  }";

    let assembly = compile_to_asm(source, RegAllocStrategy::LinearScan);
    let lines = instruction_lines(&assembly);

    let save = lines.iter().position(|l| l.starts_with("sw t3,")).expect("t3 is saved");
    let call = lines.iter().position(|l| *l == "call f").expect("the call survives");
    let restore = lines.iter().position(|l| l.starts_with("lw t3,")).expect("t3 is restored");

    assert!(save < call && call < restore, "t3 must be saved before the call and restored after it");
}

#[test]
fn every_saved_callee_register_is_restored() {
    let source = "int f(int a, int b, int c, int d) {
                      int e = a + b;
                      int g = c + d;
                      return e * g;
                  }
                  int main() { return f(1, 2, 3, 4); }";

    for strategy in [RegAllocStrategy::LinearScan, RegAllocStrategy::GraphColor] {
        let assembly = compile_to_asm(source, strategy);
        let lines = instruction_lines(&assembly);

        for index in 1..=11 {
            let register = format!("s{index}");
            let saved = lines.iter().filter(|l| l.starts_with(&format!("sw {register},"))).count();
            let restored = lines.iter().filter(|l| l.starts_with(&format!("lw {register},"))).count();
            assert_eq!(saved, restored, "{register} saved {saved} times but restored {restored} times");
        }
    }
}

#[test]
fn all_strategies_accept_the_same_program() {
    let source = "int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); }
                  int main() { return fact(5); }";

    for strategy in [RegAllocStrategy::Naive, RegAllocStrategy::LinearScan, RegAllocStrategy::GraphColor] {
        let assembly = compile_to_asm(source, strategy);
        assert!(assembly.contains("fact:"), "strategy {strategy} lost the fact function");
        assert!(assembly.contains("\tcall fact"));
        assert!(assembly.contains("main_epilogue:"));
    }
}

#[test]
fn generated_assembly_is_peephole_stable() {
    let source = "int main() { int s = 0; int i = 0; while (i < 10) { s = s + i; i = i + 1; } return s; }";
    let assembly = compile_to_asm(source, RegAllocStrategy::Naive);

    let mut lines: Vec<String> = assembly.lines().map(str::to_string).collect();
    let before = lines.clone();
    peephole::run(&mut lines);

    assert_eq!(lines, before, "the emitted text must already be a peephole fixed point");
}

#[test]
fn no_store_is_immediately_reloaded() {
    let source = "int main() { int a = 1; int b = a; return b; }";
    let assembly = compile_to_asm(source, RegAllocStrategy::Naive);
    let lines = instruction_lines(&assembly);

    for window in lines.windows(2) {
        if let (Some(store), Some(load)) = (window[0].strip_prefix("sw "), window[1].strip_prefix("lw ")) {
            assert_ne!(store, load, "store and reload of the same slot survived the peephole pass");
        }
    }
}
