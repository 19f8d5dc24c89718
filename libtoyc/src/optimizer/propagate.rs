// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `propagate` module performs block-scoped constant propagation: references to variables
//! whose value is currently a known constant are rewritten to that constant, and the folding
//! pass then runs again over the result.

use std::collections::HashMap;

use crate::parser::{AstExpression, AstExpressionKind, AstFunction, AstStatement, AstStatementKind, AstBinaryOp};

use super::RewriteCounter;

/// Propagates known constants through the function body.
pub fn propagate_function(function: &mut AstFunction, counter: &mut RewriteCounter) {
    let mut propagator = Propagator { scopes: Vec::new(), counter };

    // Parameters are never constants; register them so assignments resolve to this scope.
    propagator.scopes.push(HashMap::new());
    for param in &function.params {
        propagator.set_known(&param.name, None);
    }

    for statement in &mut function.body {
        propagator.statement(statement);
    }
}

/// The known-constant table: one map per open scope, innermost last. `None` records a variable
/// whose value is known to be non-constant, shadowing any outer knowledge.
struct Propagator<'a> {
    scopes: Vec<HashMap<String, Option<i32>>>,
    counter: &'a mut RewriteCounter,
}

impl Propagator<'_> {
    fn statement(&mut self, statement: &mut AstStatement) {
        match &mut statement.kind {
            AstStatementKind::Expression(expression) => self.substitute(expression),

            AstStatementKind::VarDecl { name, init } => {
                self.substitute(init);
                let value = init.as_int_literal();
                self.declare(name, value);
            }

            AstStatementKind::Assign { name, value } => {
                self.substitute(value);
                let constant = value.as_int_literal();
                self.assign(name, constant);
            }

            AstStatementKind::Compound(statements) => {
                self.scopes.push(HashMap::new());
                for statement in statements {
                    self.statement(statement);
                }
                self.scopes.pop();
            }

            AstStatementKind::If { condition, then_stmt, else_stmt } => {
                self.substitute(condition);

                // Each branch starts from the current knowledge but must not leak its own
                // updates past the join: afterwards, anything either branch assigned is unknown.
                let snapshot = self.scopes.clone();
                self.statement(then_stmt);
                self.scopes = snapshot.clone();

                if let Some(else_stmt) = else_stmt {
                    self.statement(else_stmt);
                    self.scopes = snapshot;
                }

                let mut assigned = Vec::new();
                collect_assigned_names(then_stmt, &mut assigned);
                if let Some(else_stmt) = else_stmt {
                    collect_assigned_names(else_stmt, &mut assigned);
                }
                for name in assigned {
                    self.invalidate(&name);
                }
            }

            AstStatementKind::While { condition, body } => {
                // Loop entry invalidates everything the body writes, before the condition or the
                // body are analyzed: both run again on later iterations.
                let mut assigned = Vec::new();
                collect_assigned_names(body, &mut assigned);
                for name in &assigned {
                    self.invalidate(name);
                }

                self.substitute(condition);
                self.statement(body);

                // Re-invalidate: the body walk may have recorded constants from its last
                // statements that do not hold after an arbitrary iteration count.
                for name in &assigned {
                    self.invalidate(name);
                }
            }

            AstStatementKind::Return(Some(value)) => self.substitute(value),

            AstStatementKind::Null
            | AstStatementKind::Break
            | AstStatementKind::Continue
            | AstStatementKind::Return(None) => {}
        }
    }

    /// Rewrites known-constant variable references inside the expression.
    ///
    /// The right operand of '&&' and '||' is left alone: the guard on the left may exist
    /// precisely to protect it (e.g. a zero divisor), and later simplification of the guard must
    /// not expose a substituted trap.
    fn substitute(&mut self, expression: &mut AstExpression) {
        match &mut expression.kind {
            AstExpressionKind::Identifier(name) => {
                if let Some(value) = self.lookup(name) {
                    *expression = AstExpression::new_int_literal(value);
                    self.counter.record();
                }
            }

            AstExpressionKind::Unary { operand, .. } => self.substitute(operand),

            AstExpressionKind::Binary { op: AstBinaryOp::LogicalAnd | AstBinaryOp::LogicalOr, lhs, .. } => {
                self.substitute(lhs);
            }

            AstExpressionKind::Binary { op, lhs, rhs } => {
                self.substitute(lhs);

                // Never substitute a known zero into a divisor: the folding pass refuses to touch
                // a zero-divisor expression, and the division-by-zero diagnosis belongs to the
                // semantic stage, which has already run.
                let zero_divisor = matches!(op, AstBinaryOp::Divide | AstBinaryOp::Remainder)
                    && matches!(&rhs.kind, AstExpressionKind::Identifier(name) if self.lookup(name) == Some(0));
                if !zero_divisor {
                    self.substitute(rhs);
                }
            }

            AstExpressionKind::FunctionCall { args, .. } => {
                for arg in args {
                    self.substitute(arg);
                }
            }

            AstExpressionKind::IntegerLiteral(_) => {}
        }
    }

    /// The known constant value of a variable, if any.
    fn lookup(&self, name: &str) -> Option<i32> {
        for scope in self.scopes.iter().rev() {
            if let Some(entry) = scope.get(name) {
                return *entry;
            }
        }
        None
    }

    /// Declares a variable in the innermost scope with an optionally-known value.
    fn declare(&mut self, name: &str, value: Option<i32>) {
        self.set_known(name, value);
    }

    fn set_known(&mut self, name: &str, value: Option<i32>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Records an assignment to a variable declared in some enclosing scope.
    fn assign(&mut self, name: &str, value: Option<i32>) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(entry) = scope.get_mut(name) {
                *entry = value;
                return;
            }
        }
        // The name was declared outside the propagation root (only possible for parameters,
        // which are pre-registered), so there is no knowledge to update.
    }

    /// Marks a variable's value as unknown wherever it is currently tracked.
    fn invalidate(&mut self, name: &str) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(entry) = scope.get_mut(name) {
                *entry = None;
                return;
            }
        }
    }
}

/// Collects the names assigned anywhere inside the statement, including nested blocks and loops.
///
/// Variable declarations are not collected: a declaration introduces a fresh binding scoped to
/// its own block, which cannot invalidate outer knowledge.
fn collect_assigned_names(statement: &AstStatement, assigned: &mut Vec<String>) {
    match &statement.kind {
        AstStatementKind::Assign { name, .. } => assigned.push(name.clone()),

        AstStatementKind::Compound(statements) => {
            for statement in statements {
                collect_assigned_names(statement, assigned);
            }
        }

        AstStatementKind::If { then_stmt, else_stmt, .. } => {
            collect_assigned_names(then_stmt, assigned);
            if let Some(else_stmt) = else_stmt {
                collect_assigned_names(else_stmt, assigned);
            }
        }

        AstStatementKind::While { body, .. } => collect_assigned_names(body, assigned),

        _ => {}
    }
}
