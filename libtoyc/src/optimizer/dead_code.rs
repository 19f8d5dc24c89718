// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `dead_code` module folds branches with constant conditions and removes statements that
//! can never execute or can never be observed.

use crate::parser::{AstFunction, AstStatement, AstStatementKind};

use super::RewriteCounter;

/// Eliminates dead code in the function body.
pub fn eliminate_in_function(function: &mut AstFunction, counter: &mut RewriteCounter) {
    for statement in &mut function.body {
        eliminate_in_statement(statement, counter);
    }
    eliminate_in_block(&mut function.body, counter);
}

fn eliminate_in_statement(statement: &mut AstStatement, counter: &mut RewriteCounter) {
    // Recurse first so that branch folding sees already-cleaned children.
    match &mut statement.kind {
        AstStatementKind::Compound(statements) => {
            for statement in statements.iter_mut() {
                eliminate_in_statement(statement, counter);
            }
            eliminate_in_block(statements, counter);
        }

        AstStatementKind::If { then_stmt, else_stmt, .. } => {
            eliminate_in_statement(then_stmt, counter);
            if let Some(else_stmt) = else_stmt {
                eliminate_in_statement(else_stmt, counter);
            }
        }

        AstStatementKind::While { body, .. } => eliminate_in_statement(body, counter),

        _ => {}
    }

    if let Some(replacement) = fold_branch(statement) {
        *statement = replacement;
        counter.record();
    }
}

/// Folds an `if` or `while` whose condition is an integer literal.
///
/// Only literal conditions fold here; the propagation pass is responsible for reducing richer
/// conditions down to literals first.
fn fold_branch(statement: &mut AstStatement) -> Option<AstStatement> {
    match &mut statement.kind {
        AstStatementKind::If { condition, then_stmt, else_stmt } => {
            let value = condition.as_int_literal()?;
            if value != 0 {
                Some(std::mem::replace(then_stmt, Box::new(AstStatement::new_null())).as_ref().clone())
            } else {
                match else_stmt.take() {
                    Some(else_stmt) => Some(*else_stmt),
                    None => Some(AstStatement::new_null()),
                }
            }
        }

        AstStatementKind::While { condition, .. } => {
            // Only a never-executing loop folds away; 'while(1)' stays as written.
            if condition.as_int_literal()? == 0 { Some(AstStatement::new_null()) } else { None }
        }

        _ => None,
    }
}

/// Removes unreachable and effect-free statements from a block.
///
/// Statements after a `return`, `break` or `continue` in the same block are unreachable, and an
/// expression statement whose expression contains no call has no observable effect.
fn eliminate_in_block(statements: &mut Vec<AstStatement>, counter: &mut RewriteCounter) {
    if let Some(terminator) = statements.iter().position(is_jump)
        && terminator + 1 < statements.len()
    {
        let removed = statements.len() - terminator - 1;
        statements.truncate(terminator + 1);
        for _ in 0..removed {
            counter.record();
        }
    }

    let before = statements.len();
    statements.retain(|statement| match &statement.kind {
        AstStatementKind::Expression(expression) => expression.contains_call(),
        _ => true,
    });
    for _ in 0..(before - statements.len()) {
        counter.record();
    }
}

fn is_jump(statement: &AstStatement) -> bool {
    matches!(
        statement.kind,
        AstStatementKind::Return(_) | AstStatementKind::Break | AstStatementKind::Continue
    )
}
