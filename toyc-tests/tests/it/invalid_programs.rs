// Copyright 2025 Neil Henderson, Blue Tarp Media.

//! Integration tests that expect the compiler to generate error diagnostics when compiling
//! ill-formed source programs.

use libtoyc::compiler_driver::{DriverError, ErrorKind};

use crate::support::compile;

/// Compiles the given source and verifies that it fails with the expected error kind.
fn compile_and_expect_error(source: &str, expected: ErrorKind) {
    let mut driver = libtoyc::compiler_driver::Driver::for_testing();
    let result = driver.compile_source(source);

    assert_eq!(result, Err(DriverError::CompilerFailed), "expected compilation to fail for: {source}");
    assert!(driver.has_error_diagnostics());
    assert!(
        driver.has_error(expected),
        "expected {expected:?}; recorded: {:?}",
        driver.errors().iter().map(|e| e.render()).collect::<Vec<_>>()
    );
}

#[test]
fn program_without_main() {
    compile_and_expect_error("int helper() { return 1; }", ErrorKind::NoMainFunction);
}

#[test]
fn main_with_wrong_signature() {
    compile_and_expect_error("void main() { return; }", ErrorKind::InvalidMainSignature);
    compile_and_expect_error("int main(int argc) { return argc; }", ErrorKind::InvalidMainSignature);
}

#[test]
fn undefined_variable() {
    compile_and_expect_error("int main() { return missing; }", ErrorKind::UndefinedVariable);
}

#[test]
fn undefined_function() {
    compile_and_expect_error("int main() { return missing(); }", ErrorKind::UndefinedFunction);
}

#[test]
fn redefined_variable_in_same_scope() {
    compile_and_expect_error("int main() { int x = 1; int x = 2; return x; }", ErrorKind::RedefinedVariable);
}

#[test]
fn redefined_function() {
    compile_and_expect_error(
        "int f() { return 1; } int f() { return 2; } int main() { return f(); }",
        ErrorKind::RedefinedFunction,
    );
}

#[test]
fn redefined_parameter() {
    compile_and_expect_error(
        "int f(int a, int a) { return a; } int main() { return f(1, 2); }",
        ErrorKind::RedefinedParameter,
    );
}

#[test]
fn wrong_argument_count() {
    compile_and_expect_error(
        "int f(int a) { return a; } int main() { return f(); }",
        ErrorKind::ArgumentCountMismatch,
    );
}

#[test]
fn void_call_used_as_a_value() {
    compile_and_expect_error(
        "void noop() { return; } int main() { int x = noop(); return x; }",
        ErrorKind::TypeMismatch,
    );
}

#[test]
fn break_outside_loop() {
    compile_and_expect_error("int main() { break; return 0; }", ErrorKind::BreakOutsideLoop);
}

#[test]
fn continue_outside_loop() {
    compile_and_expect_error("int main() { continue; return 0; }", ErrorKind::ContinueOutsideLoop);
}

#[test]
fn missing_return_on_a_path() {
    compile_and_expect_error("int main() { int x = 1; if (x) { return 1; } }", ErrorKind::MissingReturn);
}

#[test]
fn missing_return_with_loop_only() {
    // A while never satisfies the conservative return-path analysis.
    compile_and_expect_error("int main() { while (1) { return 0; } }", ErrorKind::MissingReturn);
}

#[test]
fn void_function_returning_a_value() {
    compile_and_expect_error(
        "void f() { return 1; } int main() { f(); return 0; }",
        ErrorKind::VoidReturnWithValue,
    );
}

#[test]
fn int_function_returning_nothing() {
    compile_and_expect_error("int main() { return; }", ErrorKind::NonVoidReturnWithoutValue);
}

#[test]
fn constant_division_by_zero() {
    compile_and_expect_error("int main() { return 1 / 0; }", ErrorKind::DivisionByZero);
    compile_and_expect_error("int main() { return 5 % (2 - 2); }", ErrorKind::DivisionByZero);
}

#[test]
fn syntax_error_reports_and_fails() {
    compile_and_expect_error("int main() { return 0 }", ErrorKind::Syntax);
    compile_and_expect_error("int main() { int x; return 0; }", ErrorKind::Syntax);
}

#[test]
fn no_assembly_is_produced_on_failure() {
    let driver = compile("int main() { return missing; }");
    assert!(driver.assembly().is_none());
}

#[test]
fn multiple_errors_are_all_reported() {
    let driver = compile(
        "int main() {
             int a = missing_one;
             int b = missing_two;
             return a + b;
         }",
    );
    assert!(driver.error_count() >= 2);
}
