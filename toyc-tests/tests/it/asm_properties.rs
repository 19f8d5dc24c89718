// Copyright 2025-2026 Neil Henderson

//! Integration tests for ABI-level properties of the emitted assembly.

use libtoyc::codegen::RegAllocStrategy;

use crate::support::{compile_expect_asm, compile_with_strategy_expect_asm};

const STRATEGIES: [RegAllocStrategy; 3] =
    [RegAllocStrategy::Naive, RegAllocStrategy::LinearScan, RegAllocStrategy::GraphColor];

fn instruction_lines(assembly: &str) -> Vec<&str> {
    assembly.lines().filter(|line| line.starts_with('\t')).map(str::trim).collect()
}

/// Extracts the instruction lines of one function, from its label to its `ret`.
fn function_lines<'a>(assembly: &'a str, name: &str) -> Vec<&'a str> {
    let mut lines = Vec::new();
    let mut inside = false;

    for line in assembly.lines() {
        if line == format!("{name}:") {
            inside = true;
            continue;
        }
        if inside {
            if line.starts_with('\t') {
                lines.push(line.trim());
                if line.trim() == "ret" {
                    break;
                }
            }
        }
    }

    lines
}

#[test]
fn stack_pointer_is_restored_by_every_function() {
    let source = "int helper(int a, int b) { int c = a * b; return c + 1; }
                  int main() { return helper(3, 4); }";

    for strategy in STRATEGIES {
        let assembly = compile_with_strategy_expect_asm(source, strategy);

        for name in ["helper", "main"] {
            let lines = function_lines(&assembly, name);

            let allocated: i32 = lines
                .iter()
                .find_map(|line| line.strip_prefix("addi sp, sp, -"))
                .and_then(|n| n.parse().ok())
                .expect("prologue allocates a frame");

            let release = format!("addi sp, sp, {allocated}");
            assert!(lines.contains(&release.as_str()), "{name} must release its {allocated}-byte frame");
            assert_eq!(allocated % 16, 0, "{name} frame must be 16-byte aligned");
        }
    }
}

#[test]
fn return_address_round_trips_through_the_frame() {
    let source = "int main() { return 0; }";

    for strategy in STRATEGIES {
        let assembly = compile_with_strategy_expect_asm(source, strategy);
        let lines = instruction_lines(&assembly);

        let save = lines.iter().find(|l| l.starts_with("sw ra, ")).expect("ra is saved");
        let slot = save.strip_prefix("sw ra, ").unwrap();
        let restore = format!("lw ra, {slot}");
        assert!(lines.contains(&restore.as_str()), "ra must be restored from the same slot");
    }
}

#[test]
fn callee_saved_registers_balance_in_every_function() {
    let source = "int mix(int a, int b, int c) {
                      int x = a + b;
                      int y = b + c;
                      int z = x * y;
                      return z - a;
                  }
                  int main() { return mix(1, 2, 3); }";

    for strategy in STRATEGIES {
        let assembly = compile_with_strategy_expect_asm(source, strategy);

        for name in ["mix", "main"] {
            let lines = function_lines(&assembly, name);
            for index in 1..=11 {
                let register = format!("s{index}");
                let saves = lines.iter().filter(|l| l.starts_with(&format!("sw {register},"))).count();
                let restores = lines.iter().filter(|l| l.starts_with(&format!("lw {register},"))).count();
                assert_eq!(saves, restores, "{name}: {register} save/restore imbalance under {strategy}");
            }
        }
    }
}

#[test]
fn every_function_has_exactly_one_epilogue_label() {
    let source = "int f(int n) { if (n < 0) return 0; if (n > 100) return 100; return n; }
                  int main() { return f(55); }";

    let assembly = compile_expect_asm(source);

    for name in ["f", "main"] {
        let label = format!("{name}_epilogue:");
        let count = assembly.lines().filter(|line| *line == label).count();
        assert_eq!(count, 1, "{name} must have a single epilogue label");
    }

    // Each of f's three returns routes through the shared epilogue.
    let f_lines = function_lines(&assembly, "f");
    let jumps = f_lines.iter().filter(|l| **l == "j f_epilogue").count();
    assert_eq!(jumps, 3);
}

#[test]
fn branch_targets_exist() {
    let source = "int main() {
                      int i = 0;
                      int s = 0;
                      while (i < 5) {
                          if (i % 2) { s = s + i; } else { s = s - i; }
                          i = i + 1;
                      }
                      return s;
                  }";

    let assembly = compile_expect_asm(source);

    let labels: Vec<&str> =
        assembly.lines().filter_map(|line| line.strip_suffix(':')).collect();

    for line in instruction_lines(&assembly) {
        let target = if let Some(rest) = line.strip_prefix("j ") {
            Some(rest)
        } else if let Some(rest) = line.strip_prefix("bnez ") {
            rest.split(',').nth(1).map(str::trim)
        } else {
            None
        };

        if let Some(target) = target
            && target != "main_epilogue"
        {
            assert!(labels.contains(&target), "jump to undefined label '{target}'");
        }
    }
}

#[test]
fn zero_register_is_never_written() {
    let source = "int main() { int x = 0; return x - 0; }";

    for strategy in STRATEGIES {
        let assembly = compile_with_strategy_expect_asm(source, strategy);
        for line in instruction_lines(&assembly) {
            for prefix in ["li zero", "mv zero", "lw zero", "add zero", "sub zero"] {
                assert!(!line.starts_with(prefix), "writes the zero register: {line}");
            }
        }
    }
}
