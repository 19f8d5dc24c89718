// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `sema` module performs semantic analysis of the AST: scoped symbol resolution, type and
//! return-path checking, and control-flow validation. It then passes the AST (optionally
//! optimized) and the symbol table to the IR generation stage.

pub mod constant_eval;
pub mod return_paths;
pub mod symbol_table;

mod analyzer;


use crate::compiler_driver::Driver;
use crate::ir;
use crate::optimizer;
use crate::parser::AstRoot;

pub use symbol_table::{FunctionSymbol, ScopeId, Symbol, SymbolKind, SymbolTable};

/// Performs semantic analysis of the AST and passes the results to the IR generation stage.
pub fn semantic_analysis(driver: &mut Driver, ast_root: AstRoot) {
    let symbols = analyze(driver, &ast_root);

    tracing::debug!(errors = driver.error_count(), warnings = driver.warning_count(), "sema finished");

    // Don't proceed to the next stage if we've emitted errors, or if the user only wants to run
    // up to semantic analysis.
    if driver.has_error_diagnostics() || driver.options().validate {
        return;
    }

    // The AST optimizer runs only when explicitly enabled.
    let ast_root = if driver.options().optimize { optimizer::optimize(ast_root) } else { ast_root };

    ir::translate(driver, ast_root, symbols);
}

/// Runs the two semantic analysis passes over the AST and returns the populated symbol table.
///
/// Pass 1 registers every top-level function (so call sites may refer to later-defined
/// functions) and validates `main`. Pass 2 walks each function body.
pub fn analyze(driver: &mut Driver, ast_root: &AstRoot) -> SymbolTable {
    let mut symbols = SymbolTable::new();

    analyzer::register_functions(ast_root, &mut symbols, driver);
    analyzer::analyze_functions(ast_root, &mut symbols, driver);

    symbols
}
