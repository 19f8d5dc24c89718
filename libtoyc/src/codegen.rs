// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `codegen` module translates ToyTac IR into RV32 assembly text.

pub mod riscv;

use crate::compiler_driver::Driver;
use crate::ir::TacProgram;

pub use riscv::regalloc::RegAllocStrategy;
pub use riscv::generate_assembly;

/// Generates RV32 assembly for the program and stores it on the driver.
pub fn generate(driver: &mut Driver, program: &TacProgram) {
    let assembly = riscv::generate_assembly(program, driver.options().reg_alloc);
    driver.set_assembly(assembly);
}
