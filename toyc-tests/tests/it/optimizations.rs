// Copyright 2025-2026 Neil Henderson

//! Integration tests for the optimizing pipeline (-opt).

use crate::support::{compile_expect_asm, compile_optimized_expect_asm};

#[test]
fn optimized_output_is_no_longer_than_naive_output() {
    let source = "int main() {
                      int a = 2;
                      int b = 3;
                      int c = a * b + a * b;
                      return c + 0;
                  }";

    let naive = compile_expect_asm(source);
    let optimized = compile_optimized_expect_asm(source);

    assert!(optimized.lines().count() <= naive.lines().count());
}

#[test]
fn fully_constant_program_folds_to_a_load() {
    let assembly = compile_optimized_expect_asm(
        "int main() {
             int a = 6;
             int b = 7;
             return a * b;
         }",
    );
    assert!(assembly.contains("\tli a0, 42"));
}

#[test]
fn dead_branch_code_is_dropped() {
    let assembly = compile_optimized_expect_asm(
        "int main() {
             if (0) { return 111222; }
             return 0;
         }",
    );
    assert!(!assembly.contains("111222"));
}

#[test]
fn never_executing_loop_is_dropped() {
    let assembly = compile_optimized_expect_asm(
        "int main() {
             int x = 0;
             while (0) { x = 333444; }
             return x;
         }",
    );
    assert!(!assembly.contains("333444"));
}

#[test]
fn small_helper_is_inlined_away() {
    let assembly = compile_optimized_expect_asm(
        "int sq(int x) { return x * x; }
         int main() { return sq(5); }",
    );

    assert!(!assembly.contains("call sq"));
    assert!(assembly.contains("\tli a0, 25"));
}

#[test]
fn side_effecting_calls_are_preserved() {
    let assembly = compile_optimized_expect_asm(
        "int count(int n) { int i = 0; while (i < n) { i = i + 1; } return i; }
         int main() { count(10); return 0; }",
    );
    assert!(assembly.contains("\tcall count"));
}

#[test]
fn short_circuit_survives_optimization() {
    // f() returns 0, so g() must not run; the branch structure has to survive.
    let source = "int f() { int x = 0; while (x < 3) { x = x + 1; } return 0; }
                  int g() { int x = 0; while (x < 3) { x = x + 1; } return 1; }
                  int main() { return f() && g(); }";

    let assembly = compile_optimized_expect_asm(source);
    assert!(assembly.contains("\tcall f"));
    assert!(assembly.contains("\tcall g"));
    assert!(assembly.contains("\tbnez"));
}

#[test]
fn optimization_preserves_the_abi_shell() {
    let source = "int main() { int s = 0; int i = 0; while (i < 10) { s = s + i; i = i + 1; } return s; }";
    let assembly = compile_optimized_expect_asm(source);

    assert!(assembly.contains(".global main"));
    assert!(assembly.contains("main_epilogue:"));
    assert!(assembly.contains("\tret"));
}
