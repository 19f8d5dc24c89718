// Copyright 2025 Neil Henderson, Blue Tarp Media.

//! Integration tests for warning diagnostics.

use libtoyc::compiler_driver::WarningKind;
use libtoyc::compiler_driver::options::DriverOptions;

use crate::support::{compile, compile_with_options};

#[test]
fn unused_variable_warns_but_compiles() {
    let driver = compile("int main() { int unused = 1; return 0; }");
    assert!(!driver.has_error_diagnostics());
    assert!(driver.has_warning(WarningKind::UnusedVariable));
    assert!(driver.assembly().is_some());
}

#[test]
fn unused_function_warns() {
    let driver = compile(
        "int helper() { return 1; }
         int main() { return 0; }",
    );
    assert!(driver.has_warning(WarningKind::UnusedFunction));
}

#[test]
fn used_function_does_not_warn() {
    let driver = compile(
        "int helper() { return 1; }
         int main() { return helper(); }",
    );
    assert!(!driver.has_warning(WarningKind::UnusedFunction));
}

#[test]
fn constant_condition_warns_about_unreachable_branch() {
    let driver = compile("int main() { if (1) { return 1; } else { return 2; } }");
    assert!(driver.has_warning(WarningKind::UnreachableBranch));

    let driver = compile("int main() { if (0) { return 1; } return 2; }");
    assert!(driver.has_warning(WarningKind::UnreachableBranch));
}

#[test]
fn never_executing_loop_warns() {
    let driver = compile("int main() { while (0) { } return 0; }");
    assert!(driver.has_warning(WarningKind::LoopNeverExecutes));
}

#[test]
fn warning_rendering_includes_the_flag_name() {
    let driver = compile("int main() { int unused = 1; return 0; }");
    let rendered: Vec<String> = driver.warnings().iter().map(|w| w.render()).collect();
    assert!(rendered.iter().any(|line| line.starts_with("Warning:") && line.contains("[-Wunused-variable]")));
}

#[test]
fn disabled_warning_is_suppressed() {
    let mut options = DriverOptions::default();
    options.disabled_warnings.insert(WarningKind::UnusedVariable);

    let driver = compile_with_options("int main() { int unused = 1; return 0; }", options);
    assert!(!driver.has_warning(WarningKind::UnusedVariable));
    assert!(!driver.has_error_diagnostics());
}

#[test]
fn warnings_as_errors_blocks_compilation() {
    let options = DriverOptions { warnings_as_errors: true, ..DriverOptions::default() };

    let driver = compile_with_options("int main() { int unused = 1; return 0; }", options);
    assert!(driver.has_error_diagnostics());
    assert!(driver.assembly().is_none());
}

#[test]
fn warnings_never_block_by_default() {
    let driver = compile(
        "int helper() { return 1; }
         int main() { int unused = 1; while (0) { } if (1) { return 1; } else { return 2; } }",
    );
    assert!(!driver.has_error_diagnostics());
    assert!(driver.warning_count() >= 3);
    assert!(driver.assembly().is_some());
}
