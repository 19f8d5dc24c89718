// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `fold` module performs constant folding and algebraic simplification of expressions.

use crate::parser::{AstBinaryOp, AstExpression, AstExpressionKind, AstFunction, AstStatement, AstStatementKind, AstUnaryOp};
use crate::sema::constant_eval;

use super::RewriteCounter;

/// Simplifies every expression in the function body.
pub fn simplify_function(function: &mut AstFunction, counter: &mut RewriteCounter) {
    for statement in &mut function.body {
        simplify_statement(statement, counter);
    }
}

/// Simplifies every expression in the statement tree.
pub fn simplify_statement(statement: &mut AstStatement, counter: &mut RewriteCounter) {
    match &mut statement.kind {
        AstStatementKind::Expression(expression) => simplify_expression(expression, counter),

        AstStatementKind::VarDecl { init, .. } => simplify_expression(init, counter),

        AstStatementKind::Assign { value, .. } => simplify_expression(value, counter),

        AstStatementKind::Compound(statements) => {
            for statement in statements {
                simplify_statement(statement, counter);
            }
        }

        AstStatementKind::If { condition, then_stmt, else_stmt } => {
            simplify_expression(condition, counter);
            simplify_statement(then_stmt, counter);
            if let Some(else_stmt) = else_stmt {
                simplify_statement(else_stmt, counter);
            }
        }

        AstStatementKind::While { condition, body } => {
            simplify_expression(condition, counter);
            simplify_statement(body, counter);
        }

        AstStatementKind::Return(Some(value)) => simplify_expression(value, counter),

        AstStatementKind::Null
        | AstStatementKind::Break
        | AstStatementKind::Continue
        | AstStatementKind::Return(None) => {}
    }
}

/// Simplifies an expression bottom-up, installing the rewritten node in place.
pub fn simplify_expression(expression: &mut AstExpression, counter: &mut RewriteCounter) {
    match &mut expression.kind {
        AstExpressionKind::Unary { operand, .. } => simplify_expression(operand, counter),

        AstExpressionKind::Binary { lhs, rhs, .. } => {
            simplify_expression(lhs, counter);
            simplify_expression(rhs, counter);
        }

        AstExpressionKind::FunctionCall { args, .. } => {
            for arg in args {
                simplify_expression(arg, counter);
            }
        }

        AstExpressionKind::IntegerLiteral(_) | AstExpressionKind::Identifier(_) => {}
    }

    if let Some(replacement) = rewrite(expression) {
        *expression = replacement;
        counter.record();
    }
}

/// Returns the simplified replacement for the expression, or `None` when no rule applies.
fn rewrite(expression: &AstExpression) -> Option<AstExpression> {
    match &expression.kind {
        AstExpressionKind::Unary { op, operand } => rewrite_unary(*op, operand),
        AstExpressionKind::Binary { op, lhs, rhs } => rewrite_binary(*op, lhs, rhs),
        _ => None,
    }
}

fn rewrite_unary(op: AstUnaryOp, operand: &AstExpression) -> Option<AstExpression> {
    // Constant folding
    if let Some(value) = operand.as_int_literal() {
        return Some(AstExpression::new_int_literal(constant_eval::evaluate_unary(op, value)));
    }

    match (op, &operand.kind) {
        // '+x' carries no operation of its own.
        (AstUnaryOp::Plus, _) => Some(operand.clone()),

        // '--x' (nested negation, not a decrement) cancels out.
        (AstUnaryOp::Negate, AstExpressionKind::Unary { op: AstUnaryOp::Negate, operand: inner }) => {
            Some((**inner).clone())
        }

        // '!!x' normalizes to 'x != 0'.
        (AstUnaryOp::LogicalNot, AstExpressionKind::Unary { op: AstUnaryOp::LogicalNot, operand: inner }) => {
            Some(binary(AstBinaryOp::NotEqualTo, (**inner).clone(), AstExpression::new_int_literal(0)))
        }

        // '!(a == b)' becomes 'a != b', and likewise for the other five comparisons.
        (AstUnaryOp::LogicalNot, AstExpressionKind::Binary { op: inner_op, lhs, rhs }) => {
            let negated = inner_op.negated_comparison()?;
            Some(binary(negated, (**lhs).clone(), (**rhs).clone()))
        }

        _ => None,
    }
}

fn rewrite_binary(op: AstBinaryOp, lhs: &AstExpression, rhs: &AstExpression) -> Option<AstExpression> {
    // Constant folding. A zero divisor refuses to evaluate, preserving the expression for the
    // semantic analyzer's division-by-zero diagnosis.
    if let (Some(left), Some(right)) = (lhs.as_int_literal(), rhs.as_int_literal()) {
        let value = constant_eval::evaluate_binary(op, left, right)?;
        return Some(AstExpression::new_int_literal(value));
    }

    // Algebraic simplification. A rewrite that would discard an evaluated operand only fires
    // when that operand contains no call.
    let left_const = lhs.as_int_literal();
    let right_const = rhs.as_int_literal();

    match op {
        AstBinaryOp::Add => {
            if right_const == Some(0) {
                return Some(lhs.clone());
            }
            if left_const == Some(0) {
                return Some(rhs.clone());
            }
        }

        AstBinaryOp::Subtract => {
            if right_const == Some(0) {
                return Some(lhs.clone());
            }
            if left_const == Some(0) {
                return Some(unary(AstUnaryOp::Negate, rhs.clone()));
            }
        }

        AstBinaryOp::Multiply => {
            if right_const == Some(1) {
                return Some(lhs.clone());
            }
            if left_const == Some(1) {
                return Some(rhs.clone());
            }
            if right_const == Some(0) && !lhs.contains_call() {
                return Some(AstExpression::new_int_literal(0));
            }
            if left_const == Some(0) && !rhs.contains_call() {
                return Some(AstExpression::new_int_literal(0));
            }
        }

        AstBinaryOp::Divide => {
            if right_const == Some(1) {
                return Some(lhs.clone());
            }
        }

        AstBinaryOp::Remainder => {
            if right_const == Some(1) && !lhs.contains_call() {
                return Some(AstExpression::new_int_literal(0));
            }
        }

        AstBinaryOp::LogicalAnd => {
            // '0 && x' never evaluates x, so discarding it is always safe.
            if left_const == Some(0) {
                return Some(AstExpression::new_int_literal(0));
            }
            if right_const == Some(0) && !lhs.contains_call() {
                return Some(AstExpression::new_int_literal(0));
            }
            // 'x && 1' keeps the normalization to {0,1}: the result is 'x != 0', not x itself.
            if right_const.is_some_and(|v| v != 0) {
                return Some(normalize_to_bool(lhs.clone()));
            }
            if left_const.is_some_and(|v| v != 0) {
                return Some(normalize_to_bool(rhs.clone()));
            }
        }

        AstBinaryOp::LogicalOr => {
            if left_const.is_some_and(|v| v != 0) {
                return Some(AstExpression::new_int_literal(1));
            }
            if right_const.is_some_and(|v| v != 0) && !lhs.contains_call() {
                return Some(AstExpression::new_int_literal(1));
            }
            if right_const == Some(0) {
                return Some(normalize_to_bool(lhs.clone()));
            }
            if left_const == Some(0) {
                return Some(normalize_to_bool(rhs.clone()));
            }
        }

        _ => {}
    }

    // Comparisons of a variable against itself have a known result. Restricted to plain
    // identifiers: anything containing a call must be evaluated, and a literal pair was already
    // folded above.
    if op.is_comparison()
        && let (AstExpressionKind::Identifier(left_name), AstExpressionKind::Identifier(right_name)) =
            (&lhs.kind, &rhs.kind)
        && left_name == right_name
    {
        let value = match op {
            AstBinaryOp::EqualTo | AstBinaryOp::LessThanOrEqualTo | AstBinaryOp::GreaterThanOrEqualTo => 1,
            _ => 0,
        };
        return Some(AstExpression::new_int_literal(value));
    }

    None
}

/// Rewraps an expression as `expr != 0`, unless it is already a comparison or logical operator
/// whose result is known to be 0 or 1.
fn normalize_to_bool(expression: AstExpression) -> AstExpression {
    let already_boolean = matches!(
        &expression.kind,
        AstExpressionKind::Binary { op, .. }
            if op.is_comparison() || matches!(op, AstBinaryOp::LogicalAnd | AstBinaryOp::LogicalOr)
    ) || matches!(&expression.kind, AstExpressionKind::Unary { op: AstUnaryOp::LogicalNot, .. });

    if already_boolean {
        expression
    } else {
        binary(AstBinaryOp::NotEqualTo, expression, AstExpression::new_int_literal(0))
    }
}

fn binary(op: AstBinaryOp, lhs: AstExpression, rhs: AstExpression) -> AstExpression {
    AstExpression::new(
        crate::core::SourceLocation::none(),
        AstExpressionKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
    )
}

fn unary(op: AstUnaryOp, operand: AstExpression) -> AstExpression {
    AstExpression::new(crate::core::SourceLocation::none(), AstExpressionKind::Unary { op, operand: Box::new(operand) })
}
