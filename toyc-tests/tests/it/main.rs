// Copyright 2025-2026 Neil Henderson

//! Integration tests that run whole ToyC programs through the compiler pipeline in-process and
//! assert on the diagnostics and on the emitted assembly text.

mod asm_properties;
mod invalid_programs;
mod optimizations;
mod valid_programs;
mod warnings;

mod support {
    use libtoyc::codegen::RegAllocStrategy;
    use libtoyc::compiler_driver::Driver;
    use libtoyc::compiler_driver::options::DriverOptions;

    /// Compiles the source with the given options and returns the driver.
    pub fn compile_with_options(source: &str, options: DriverOptions) -> Driver {
        let mut driver = Driver::for_testing_with_options(options);
        let _ = driver.compile_source(source);
        driver
    }

    /// Compiles the source with default options.
    pub fn compile(source: &str) -> Driver {
        compile_with_options(source, DriverOptions::default())
    }

    /// Compiles the source with default options and asserts success, returning the assembly.
    pub fn compile_expect_asm(source: &str) -> String {
        let driver = compile(source);
        if driver.has_error_diagnostics() {
            driver.print_diagnostics();
            panic!("compilation unexpectedly failed");
        }
        driver.assembly().expect("assembly was generated").to_string()
    }

    /// Compiles with the optimizers enabled and asserts success, returning the assembly.
    pub fn compile_optimized_expect_asm(source: &str) -> String {
        let options = DriverOptions { optimize: true, ..DriverOptions::default() };
        let driver = compile_with_options(source, options);
        if driver.has_error_diagnostics() {
            driver.print_diagnostics();
            panic!("optimized compilation unexpectedly failed");
        }
        driver.assembly().expect("assembly was generated").to_string()
    }

    /// Compiles with the given register allocation strategy and asserts success.
    pub fn compile_with_strategy_expect_asm(source: &str, strategy: RegAllocStrategy) -> String {
        let options = DriverOptions { reg_alloc: strategy, ..DriverOptions::default() };
        let driver = compile_with_options(source, options);
        if driver.has_error_diagnostics() {
            driver.print_diagnostics();
            panic!("compilation unexpectedly failed for strategy {strategy}");
        }
        driver.assembly().expect("assembly was generated").to_string()
    }
}
