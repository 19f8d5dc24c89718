// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `parser` module performs recursive-descent parsing of the token stream into an AST, and then
//! passes the AST to the semantic analysis stage.

mod abstract_syntax_tree;
pub mod expr;
mod recursive_descent;
mod token_stream;


use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::core::SourceLocation;
use crate::sema;

pub use abstract_syntax_tree::{
    AstBinaryOp, AstExpression, AstExpressionKind, AstFunction, AstParam, AstRoot, AstStatement, AstStatementKind,
    AstType, AstUnaryOp,
};
pub use token_stream::TokenStream;

/// An error returned by a parsing function after it has added an error diagnostic to the driver.
///
/// The original design raised an exception for parser synchronization; here the parsing functions
/// return this unit error and the callers synchronize on statement and function boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseError;

/// The result of a parsing function.
pub type ParseResult<T> = Result<T, ParseError>;

/// The parser owns the token stream which the parsing functions consume.
pub struct Parser {
    pub token_stream: TokenStream,
}

/// Parses the token stream into an AST and passes it to the semantic analysis stage.
pub fn parse(driver: &mut Driver, tokens: Vec<crate::lexer::Token>) {
    let mut parser = Parser { token_stream: TokenStream::new(tokens) };

    let ast_root = recursive_descent::parse_translation_unit(&mut parser, driver);

    tracing::debug!(functions = ast_root.0.len(), "parser finished");

    // Don't proceed to the next stage if we've emitted errors, or if the user only wants to run
    // the lexer and parser.
    if driver.has_error_diagnostics() || driver.options().parse {
        return;
    }

    sema::semantic_analysis(driver, ast_root);
}

/// Parses the token stream into an AST without running any later stage. Used by unit tests.
pub fn parse_to_ast(driver: &mut Driver, tokens: Vec<crate::lexer::Token>) -> AstRoot {
    let mut parser = Parser { token_stream: TokenStream::new(tokens) };
    recursive_descent::parse_translation_unit(&mut parser, driver)
}

/// Adds a syntax error diagnostic to the driver.
pub(crate) fn add_error(driver: &mut Driver, message: &str, loc: SourceLocation) {
    driver.add_diagnostic(Diagnostic::syntax_error(message.to_string(), loc));
}
