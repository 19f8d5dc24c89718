// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `analyzer` module walks the AST and performs the semantic checks.

use crate::compiler_driver::diagnostics::Diagnostic;
use crate::compiler_driver::{Driver, ErrorKind, WarningKind};
use crate::core::SourceLocation;
use crate::parser::{
    AstBinaryOp, AstExpression, AstExpressionKind, AstFunction, AstRoot, AstStatement, AstStatementKind, AstType,
};

use super::constant_eval;
use super::return_paths;
use super::symbol_table::{FunctionSymbol, Symbol, SymbolKind, SymbolTable};

/// Pass 1: registers every top-level function in the global scope, so call sites may refer to
/// later-defined functions, and validates the `main` function's signature.
pub fn register_functions(ast_root: &AstRoot, symbols: &mut SymbolTable, driver: &mut Driver) {
    for function in &ast_root.0 {
        let function_symbol = FunctionSymbol {
            return_type: function.return_type,
            param_count: function.params.len(),
            declared_at: function.loc,
            used: false,
        };

        if symbols.add_function(&function.name, function_symbol).is_err() {
            driver.add_diagnostic(Diagnostic::error_at_location(
                ErrorKind::RedefinedFunction,
                format!("Duplicate function name '{}'", function.name),
                function.loc,
            ));
        }
    }

    check_main_function(ast_root, driver);
}

/// Requires a function named `main` with return type `int` and zero parameters.
fn check_main_function(ast_root: &AstRoot, driver: &mut Driver) {
    let Some(main) = ast_root.0.iter().find(|f| f.name == "main") else {
        driver.add_diagnostic(Diagnostic::error(
            ErrorKind::NoMainFunction,
            "Program must have a main function".to_string(),
        ));
        return;
    };

    if main.return_type != AstType::Int {
        driver.add_diagnostic(Diagnostic::error_at_location(
            ErrorKind::InvalidMainSignature,
            "main function must return int".to_string(),
            main.loc,
        ));
    }

    if !main.params.is_empty() {
        driver.add_diagnostic(Diagnostic::error_at_location(
            ErrorKind::InvalidMainSignature,
            "main function cannot have parameters".to_string(),
            main.loc,
        ));
    }
}

/// Pass 2: walks every function body and performs the scoped checks.
pub fn analyze_functions(ast_root: &AstRoot, symbols: &mut SymbolTable, driver: &mut Driver) {
    for function in &ast_root.0 {
        let mut analyzer = Analyzer {
            symbols: &mut *symbols,
            driver: &mut *driver,
            loop_depth: 0,
            return_type: function.return_type,
        };
        analyzer.analyze_function(function);
    }

    // Warn about functions that are never called. `main` is the entry point and exempt.
    for (name, loc) in symbols.unused_functions() {
        driver.add_diagnostic(Diagnostic::warning_at_location(
            WarningKind::UnusedFunction,
            format!("Function '{name}' defined but never used"),
            loc,
        ));
    }
}

/// Walks one function with the scope and loop-depth state the checks need.
struct Analyzer<'a> {
    symbols: &'a mut SymbolTable,
    driver: &'a mut Driver,
    loop_depth: usize,
    return_type: AstType,
}

impl Analyzer<'_> {
    fn analyze_function(&mut self, function: &AstFunction) {
        self.symbols.enter_scope();

        for (index, param) in function.params.iter().enumerate() {
            let symbol = Symbol { kind: SymbolKind::Parameter(index), declared_at: param.loc, used: false };
            if self.symbols.declare(&param.name, symbol).is_err() {
                self.error(
                    ErrorKind::RedefinedParameter,
                    format!("Parameter '{}' already declared", param.name),
                    param.loc,
                );
            }
        }

        self.analyze_block(&function.body);
        self.emit_unused_variable_warnings();

        if function.return_type == AstType::Int && !return_paths::all_paths_return(&function.body) {
            self.error(
                ErrorKind::MissingReturn,
                format!("Function '{}' has no return statement on some path", function.name),
                function.loc,
            );
        }
    }

    /// Analyzes the statements of an already-entered scope.
    fn analyze_block(&mut self, statements: &[AstStatement]) {
        for statement in statements {
            self.analyze_statement(statement);
        }
    }

    fn analyze_statement(&mut self, statement: &AstStatement) {
        match &statement.kind {
            AstStatementKind::Null => {}

            AstStatementKind::Expression(expression) => {
                self.check_expression(expression);
            }

            AstStatementKind::Compound(statements) => {
                self.symbols.enter_scope();
                self.analyze_block(statements);
                self.emit_unused_variable_warnings();
            }

            AstStatementKind::VarDecl { name, init } => {
                // The initializer is checked before the name is declared, so 'int x = x;'
                // resolves against an outer binding.
                let init_type = self.check_expression(init);
                if init_type != AstType::Int {
                    self.error(
                        ErrorKind::TypeMismatch,
                        "Cannot initialize int variable with non-integer expression".to_string(),
                        statement.loc,
                    );
                }

                let symbol = Symbol { kind: SymbolKind::Variable, declared_at: statement.loc, used: false };
                if self.symbols.declare(name, symbol).is_err() {
                    self.error(
                        ErrorKind::RedefinedVariable,
                        format!("Variable '{name}' already declared in current scope"),
                        statement.loc,
                    );
                }
            }

            AstStatementKind::Assign { name, value } => {
                if self.symbols.resolve_and_mark_used(name).is_none() {
                    self.error(ErrorKind::UndefinedVariable, format!("Undefined variable: {name}"), statement.loc);
                }

                let value_type = self.check_expression(value);
                if value_type != AstType::Int {
                    self.error(
                        ErrorKind::TypeMismatch,
                        format!("Type mismatch in assignment to '{name}'"),
                        statement.loc,
                    );
                }
            }

            AstStatementKind::If { condition, then_stmt, else_stmt } => {
                self.check_condition(condition, "If");

                if let Some(value) = constant_eval::evaluate_constant(condition) {
                    if value != 0 {
                        if else_stmt.is_some() {
                            self.warning(
                                WarningKind::UnreachableBranch,
                                "This else branch will never execute (condition always true)".to_string(),
                                statement.loc,
                            );
                        }
                    } else {
                        self.warning(
                            WarningKind::UnreachableBranch,
                            "This if branch will never execute (condition always false)".to_string(),
                            statement.loc,
                        );
                    }
                }

                self.analyze_statement(then_stmt);
                if let Some(else_stmt) = else_stmt {
                    self.analyze_statement(else_stmt);
                }
            }

            AstStatementKind::While { condition, body } => {
                self.check_condition(condition, "While");

                if constant_eval::evaluate_constant(condition) == Some(0) {
                    self.warning(
                        WarningKind::LoopNeverExecutes,
                        "This while loop will never execute (condition always false)".to_string(),
                        statement.loc,
                    );
                }

                self.loop_depth += 1;
                self.analyze_statement(body);
                self.loop_depth -= 1;
            }

            AstStatementKind::Break => {
                if self.loop_depth == 0 {
                    self.error(
                        ErrorKind::BreakOutsideLoop,
                        "Break statement must be inside loop".to_string(),
                        statement.loc,
                    );
                }
            }

            AstStatementKind::Continue => {
                if self.loop_depth == 0 {
                    self.error(
                        ErrorKind::ContinueOutsideLoop,
                        "Continue statement must be inside loop".to_string(),
                        statement.loc,
                    );
                }
            }

            AstStatementKind::Return(value) => self.analyze_return(value.as_ref(), statement.loc),
        }
    }

    fn analyze_return(&mut self, value: Option<&AstExpression>, loc: SourceLocation) {
        match (self.return_type, value) {
            (AstType::Void, Some(_)) => {
                self.error(
                    ErrorKind::VoidReturnWithValue,
                    "Function with return type 'void' cannot return a value".to_string(),
                    loc,
                );
            }

            (AstType::Int, None) => {
                self.error(
                    ErrorKind::NonVoidReturnWithoutValue,
                    "Function with return type 'int' must return a value".to_string(),
                    loc,
                );
            }

            (AstType::Int, Some(value)) => {
                let value_type = self.check_expression(value);
                if value_type != AstType::Int {
                    self.error(
                        ErrorKind::TypeMismatch,
                        "Return type mismatch: expected 'int' value".to_string(),
                        loc,
                    );
                }
            }

            (AstType::Void, None) => {}
        }
    }

    /// Checks an expression and returns its type.
    ///
    /// Every ToyC value is an 'int'; the only way to produce 'void' is to call a void function.
    /// An unresolved identifier recovers as 'int' so the walk can report further issues.
    fn check_expression(&mut self, expression: &AstExpression) -> AstType {
        match &expression.kind {
            AstExpressionKind::IntegerLiteral(_) => AstType::Int,

            AstExpressionKind::Identifier(name) => {
                if self.symbols.resolve_and_mark_used(name).is_none() {
                    self.error(ErrorKind::UndefinedVariable, format!("Undefined variable: {name}"), expression.loc);
                }
                AstType::Int
            }

            AstExpressionKind::Unary { op, operand } => {
                let operand_type = self.check_expression(operand);
                if operand_type != AstType::Int {
                    self.error(
                        ErrorKind::TypeMismatch,
                        format!("Unary operator '{op}' requires int operand"),
                        expression.loc,
                    );
                }
                AstType::Int
            }

            AstExpressionKind::Binary { op, lhs, rhs } => {
                let lhs_type = self.check_expression(lhs);
                let rhs_type = self.check_expression(rhs);

                if lhs_type != AstType::Int || rhs_type != AstType::Int {
                    self.error(
                        ErrorKind::TypeMismatch,
                        format!("Binary operator '{op}' requires int operands"),
                        expression.loc,
                    );
                }

                // A constant-zero divisor is a compile-time error. The evaluator only combines
                // literals; variable values are never consulted here.
                if matches!(op, AstBinaryOp::Divide | AstBinaryOp::Remainder)
                    && is_constant_zero(rhs)
                {
                    self.error(ErrorKind::DivisionByZero, "Division by zero".to_string(), expression.loc);
                }

                AstType::Int
            }

            AstExpressionKind::FunctionCall { callee, args } => self.check_call(callee, args, expression.loc),
        }
    }

    fn check_call(&mut self, callee: &str, args: &[AstExpression], loc: SourceLocation) -> AstType {
        let Some(function) = self.symbols.get_function(callee).cloned() else {
            self.error(ErrorKind::UndefinedFunction, format!("Undefined function: {callee}"), loc);
            // Recover by checking the arguments anyway, assuming an int result.
            for arg in args {
                self.check_expression(arg);
            }
            return AstType::Int;
        };

        self.symbols.mark_function_used(callee);

        if args.len() != function.param_count {
            self.error(
                ErrorKind::ArgumentCountMismatch,
                format!(
                    "Function '{callee}' expects {} argument(s) but {} were provided",
                    function.param_count,
                    args.len()
                ),
                loc,
            );
        }

        for (index, arg) in args.iter().enumerate() {
            let arg_type = self.check_expression(arg);
            if arg_type != AstType::Int {
                self.error(
                    ErrorKind::TypeMismatch,
                    format!("Function '{callee}' argument {} must be int", index + 1),
                    arg.loc,
                );
            }
        }

        function.return_type
    }

    fn check_condition(&mut self, condition: &AstExpression, construct: &str) {
        let condition_type = self.check_expression(condition);
        if condition_type != AstType::Int {
            self.error(
                ErrorKind::TypeMismatch,
                format!("{construct} condition must be integer (used as boolean)"),
                condition.loc,
            );
        }
    }

    /// Exits the current scope and emits unused-variable warnings for it.
    fn emit_unused_variable_warnings(&mut self) {
        for (name, loc) in self.symbols.exit_scope() {
            self.driver.add_diagnostic(Diagnostic::warning_at_location(
                WarningKind::UnusedVariable,
                format!("Variable '{name}' declared but never used"),
                loc,
            ));
        }
    }

    fn error(&mut self, kind: ErrorKind, message: String, loc: SourceLocation) {
        self.driver.add_diagnostic(Diagnostic::error_at_location(kind, message, loc));
    }

    fn warning(&mut self, kind: WarningKind, message: String, loc: SourceLocation) {
        self.driver.add_diagnostic(Diagnostic::warning_at_location(kind, message, loc));
    }
}

/// Does the expression constant-fold to zero using only literal values?
fn is_constant_zero(expression: &AstExpression) -> bool {
    constant_eval::evaluate_constant(expression) == Some(0)
}
