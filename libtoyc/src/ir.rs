// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `ir` module defines the "ToyTac" three-address intermediate representation, the
//! translation from the AST into it, and the IR-level optimizer.

mod basic_blocks;
mod label_maker;
pub mod optimizer;
pub mod printer;
mod toytac;
mod translator;


use crate::codegen;
use crate::compiler_driver::Driver;
use crate::parser::AstRoot;
use crate::sema::SymbolTable;

pub use basic_blocks::{BasicBlock, split_into_blocks};
pub use label_maker::LabelMaker;
pub use toytac::{TacBinaryOp, TacInstruction, TacOperand, TacProgram, TacUnaryOp};
pub use translator::generate;

/// Translates the AST into ToyTac IR and passes it to the code generation stage.
pub fn translate(driver: &mut Driver, ast_root: AstRoot, symbols: SymbolTable) {
    let program = translator::generate(&ast_root, &symbols);

    tracing::debug!(instructions = program.0.len(), "ir generator finished");

    if driver.options().print_ir {
        printer::print(&program, &mut std::io::stderr());
        return;
    }

    // The IR optimizer runs only when optimization is enabled.
    let program = if driver.options().optimize { optimizer::optimize(program) } else { program };

    codegen::generate(driver, &program);
}
