// Copyright 2025 Neil Henderson, Blue Tarp Media.

//! Integration tests for well-formed programs, including the end-to-end scenario programs.

use crate::support::{compile, compile_expect_asm, compile_optimized_expect_asm};

#[test]
fn constant_expression_program() {
    // Computes 1 + 2 * 3 = 7.
    let assembly = compile_expect_asm("int main() { return 1 + 2 * 3; }");
    assert!(assembly.contains(".global main"));
    assert!(assembly.contains("main_epilogue:"));
}

#[test]
fn constant_expression_folds_when_optimized() {
    // With the optimizers on, main reduces to loading 7 into a0.
    let assembly = compile_optimized_expect_asm("int main() { return 1 + 2 * 3; }");
    assert!(assembly.contains("\tli a0, 7"));
}

#[test]
fn recursive_factorial_program() {
    let source = "int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); }
                  int main() { return fact(5); }";

    let assembly = compile_expect_asm(source);
    assert!(assembly.contains("fact:"));
    assert!(assembly.contains("\tcall fact"));

    // The same program also compiles with the optimizers enabled; the recursive callee must
    // survive (it cannot be inlined).
    let optimized = compile_optimized_expect_asm(source);
    assert!(optimized.contains("fact:"));
}

#[test]
fn while_loop_sum_program() {
    // Sums 0..9 into s = 45.
    let source = "int main() { int s = 0; int i = 0; while (i < 10) { s = s + i; i = i + 1; } return s; }";

    let assembly = compile_expect_asm(source);
    assert!(assembly.contains("\tbnez"));
    assert!(assembly.contains("\tj main_epilogue"));

    let _ = compile_optimized_expect_asm(source);
}

#[test]
fn guarded_division_by_variable_compiles() {
    // The divisor is a variable holding zero: the constant check does not see through it, so the
    // program compiles, and at run time the comparison against the RV32 div result fails and
    // main returns 0.
    let source = "int main() { int a = 0; int b = 0; if (a == 0 && 1 / a == 1) b = 1; return b; }";

    let driver = compile(source);
    assert!(!driver.has_error_diagnostics(), "the guarded division must not be a compile-time error");

    // The documented choice holds with the optimizers enabled as well: propagation is barred
    // from the right operand of '&&'.
    let _ = compile_optimized_expect_asm(source);
}

#[test]
fn shadowed_variable_program() {
    // The inner x = 3 is discarded with its scope; main returns 7.
    let source = "int main() { int x = 7; { int x = 3; } return x; }";
    let driver = compile(source);
    assert!(!driver.has_error_diagnostics());
}

#[test]
fn loop_with_break_program() {
    // Increments i until the break fires at 3.
    let source = "int main() { int i = 0; while (1) { if (i == 3) break; i = i + 1; } return i; }";
    let assembly = compile_expect_asm(source);
    assert!(assembly.contains("\tj main_epilogue"));

    let _ = compile_optimized_expect_asm(source);
}

#[test]
fn nested_calls_and_arguments() {
    let source = "int add(int a, int b) { return a + b; }
                  int twice(int x) { return add(x, x); }
                  int main() { return twice(add(1, 2)); }";

    let assembly = compile_expect_asm(source);
    assert!(assembly.contains("\tcall add"));
    assert!(assembly.contains("\tcall twice"));
}

#[test]
fn void_function_call_program() {
    let source = "void noop() { return; }
                  int main() { noop(); return 0; }";

    let assembly = compile_expect_asm(source);
    assert!(assembly.contains("\tcall noop"));
    assert!(assembly.contains("noop:"));
}

#[test]
fn comments_and_whitespace_are_tolerated() {
    let source = "// leading comment
                  int main() { /* block
                  comment */ return 0; }";
    let driver = compile(source);
    assert!(!driver.has_error_diagnostics());
}

#[test]
fn deeply_nested_blocks_compile() {
    let source = "int main() { { { { { return 42; } } } } }";
    let driver = compile(source);
    assert!(!driver.has_error_diagnostics());
}

#[test]
fn program_from_stdin_shape_is_irrelevant() {
    // No trailing newline, tabs as separators.
    let driver = compile("int main(){return 0;}");
    assert!(!driver.has_error_diagnostics());
}
