// Copyright 2025-2026 Neil Henderson
//
//! The `hoist` module performs best-effort loop-invariant code motion at the AST level.
//!
//! Only a narrow class of assignments is hoisted out of a `while` body: the right-hand side must
//! be pure and loop-invariant, and the left-hand side must be written by no other statement in
//! the loop and not appear in the loop condition. Purity here excludes division and remainder,
//! since hoisting ahead of a zero-iteration loop must not introduce an expression that could
//! trap.

use std::collections::HashMap;

use crate::parser::{AstExpression, AstExpressionKind, AstBinaryOp, AstFunction, AstStatement, AstStatementKind};

use super::RewriteCounter;

/// Hoists loop-invariant assignments in the function body.
pub fn hoist_in_function(function: &mut AstFunction, counter: &mut RewriteCounter) {
    hoist_in_block(&mut function.body, counter);
}

/// Hoists loop-invariant assignments out of any `while` statement directly inside the block,
/// then recurses into nested statements.
pub fn hoist_in_block(statements: &mut Vec<AstStatement>, counter: &mut RewriteCounter) {
    let mut index = 0;
    while index < statements.len() {
        let hoisted = match &mut statements[index].kind {
            AstStatementKind::While { condition, body } => hoist_from_while(condition, body, counter),
            _ => Vec::new(),
        };

        let count = hoisted.len();
        for (offset, assignment) in hoisted.into_iter().enumerate() {
            statements.insert(index + offset, assignment);
        }
        index += count + 1;
    }

    for statement in statements {
        match &mut statement.kind {
            AstStatementKind::Compound(inner) => hoist_in_block(inner, counter),
            AstStatementKind::If { then_stmt, else_stmt, .. } => {
                hoist_in_nested(then_stmt, counter);
                if let Some(else_stmt) = else_stmt {
                    hoist_in_nested(else_stmt, counter);
                }
            }
            AstStatementKind::While { body, .. } => hoist_in_nested(body, counter),
            _ => {}
        }
    }
}

fn hoist_in_nested(statement: &mut AstStatement, counter: &mut RewriteCounter) {
    if let AstStatementKind::Compound(inner) = &mut statement.kind {
        hoist_in_block(inner, counter);
    }
}

/// Removes the hoistable assignments from the loop body and returns them in their original order.
fn hoist_from_while(
    condition: &AstExpression,
    body: &mut AstStatement,
    counter: &mut RewriteCounter,
) -> Vec<AstStatement> {
    let AstStatementKind::Compound(body_statements) = &mut body.kind else {
        return Vec::new();
    };

    // Count every write in the loop, including nested ones.
    let mut write_counts = HashMap::new();
    for statement in body_statements.iter() {
        count_writes(statement, &mut write_counts);
    }

    let written: Vec<String> = write_counts.keys().cloned().collect();

    let mut hoistable_indices = Vec::new();
    for (index, statement) in body_statements.iter().enumerate() {
        let AstStatementKind::Assign { name, value } = &statement.kind else {
            continue;
        };

        let single_writer = write_counts.get(name).copied() == Some(1);
        let invariant_rhs = is_pure_and_invariant(value, &written);
        let absent_from_condition = !references_variable(condition, name);

        if single_writer && invariant_rhs && absent_from_condition {
            hoistable_indices.push(index);
        }
    }

    let mut hoisted = Vec::new();
    for index in hoistable_indices.into_iter().rev() {
        hoisted.insert(0, body_statements.remove(index));
        counter.record();
    }

    hoisted
}

/// Counts assignments per variable name, recursing into nested statements.
fn count_writes(statement: &AstStatement, counts: &mut HashMap<String, usize>) {
    match &statement.kind {
        AstStatementKind::Assign { name, .. } => *counts.entry(name.clone()).or_insert(0) += 1,
        // A declaration writes its own fresh binding, but that binding shadows the outer name
        // for the rest of its block, so treat the name as written twice to stay conservative.
        AstStatementKind::VarDecl { name, .. } => *counts.entry(name.clone()).or_insert(0) += 2,
        AstStatementKind::Compound(inner) => {
            for statement in inner {
                count_writes(statement, counts);
            }
        }
        AstStatementKind::If { then_stmt, else_stmt, .. } => {
            count_writes(then_stmt, counts);
            if let Some(else_stmt) = else_stmt {
                count_writes(else_stmt, counts);
            }
        }
        AstStatementKind::While { body, .. } => count_writes(body, counts),
        _ => {}
    }
}

/// Is the expression safe to evaluate ahead of the loop, and independent of everything the loop
/// writes?
fn is_pure_and_invariant(expression: &AstExpression, written: &[String]) -> bool {
    match &expression.kind {
        AstExpressionKind::IntegerLiteral(_) => true,

        AstExpressionKind::Identifier(name) => !written.contains(name),

        AstExpressionKind::FunctionCall { .. } => false,

        AstExpressionKind::Unary { operand, .. } => is_pure_and_invariant(operand, written),

        AstExpressionKind::Binary { op, lhs, rhs } => {
            // Division and remainder could trap when the loop runs zero times.
            if matches!(op, AstBinaryOp::Divide | AstBinaryOp::Remainder) {
                return false;
            }
            is_pure_and_invariant(lhs, written) && is_pure_and_invariant(rhs, written)
        }
    }
}

/// Does the expression reference the given variable?
fn references_variable(expression: &AstExpression, name: &str) -> bool {
    match &expression.kind {
        AstExpressionKind::IntegerLiteral(_) => false,
        AstExpressionKind::Identifier(id) => id == name,
        AstExpressionKind::FunctionCall { args, .. } => args.iter().any(|arg| references_variable(arg, name)),
        AstExpressionKind::Unary { operand, .. } => references_variable(operand, name),
        AstExpressionKind::Binary { lhs, rhs, .. } => {
            references_variable(lhs, name) || references_variable(rhs, name)
        }
    }
}
