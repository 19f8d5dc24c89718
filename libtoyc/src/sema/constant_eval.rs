// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `constant_eval` module evaluates constant expressions.

use crate::parser::{AstBinaryOp, AstExpression, AstExpressionKind, AstUnaryOp};

/// Evaluates an expression built only from integer literals and operators.
///
/// Returns `None` when the expression references a variable or a function call, or when a
/// division or remainder has a zero divisor: a trapping expression must never be folded away.
/// Arithmetic uses two's-complement wraparound; comparisons and the logical operators produce
/// 0 or 1.
pub fn evaluate_constant(expr: &AstExpression) -> Option<i32> {
    match &expr.kind {
        AstExpressionKind::IntegerLiteral(value) => Some(*value),

        AstExpressionKind::Identifier(_) | AstExpressionKind::FunctionCall { .. } => None,

        AstExpressionKind::Unary { op, operand } => {
            let value = evaluate_constant(operand)?;
            Some(evaluate_unary(*op, value))
        }

        AstExpressionKind::Binary { op, lhs, rhs } => {
            let left = evaluate_constant(lhs)?;
            let right = evaluate_constant(rhs)?;
            evaluate_binary(*op, left, right)
        }
    }
}

/// Applies a unary operator to a constant value.
pub fn evaluate_unary(op: AstUnaryOp, value: i32) -> i32 {
    match op {
        AstUnaryOp::Plus => value,
        AstUnaryOp::Negate => value.wrapping_neg(),
        AstUnaryOp::LogicalNot => {
            if value == 0 {
                1
            } else {
                0
            }
        }
    }
}

/// Applies a binary operator to two constant values.
///
/// Returns `None` for a division or remainder by zero.
pub fn evaluate_binary(op: AstBinaryOp, left: i32, right: i32) -> Option<i32> {
    let result = match op {
        AstBinaryOp::Add => left.wrapping_add(right),
        AstBinaryOp::Subtract => left.wrapping_sub(right),
        AstBinaryOp::Multiply => left.wrapping_mul(right),
        AstBinaryOp::Divide => {
            if right == 0 {
                return None;
            }
            left.wrapping_div(right)
        }
        AstBinaryOp::Remainder => {
            if right == 0 {
                return None;
            }
            left.wrapping_rem(right)
        }
        AstBinaryOp::LessThan => (left < right) as i32,
        AstBinaryOp::GreaterThan => (left > right) as i32,
        AstBinaryOp::LessThanOrEqualTo => (left <= right) as i32,
        AstBinaryOp::GreaterThanOrEqualTo => (left >= right) as i32,
        AstBinaryOp::EqualTo => (left == right) as i32,
        AstBinaryOp::NotEqualTo => (left != right) as i32,
        AstBinaryOp::LogicalAnd => (left != 0 && right != 0) as i32,
        AstBinaryOp::LogicalOr => (left != 0 || right != 0) as i32,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstExpression;

    fn binary(op: AstBinaryOp, left: AstExpression, right: AstExpression) -> AstExpression {
        AstExpression::new(
            crate::core::SourceLocation::none(),
            AstExpressionKind::Binary { op, lhs: Box::new(left), rhs: Box::new(right) },
        )
    }

    #[test]
    fn arithmetic_wraps() {
        let expr = binary(AstBinaryOp::Add, AstExpression::new_int_literal(i32::MAX), AstExpression::new_int_literal(1));
        assert_eq!(evaluate_constant(&expr), Some(i32::MIN));
    }

    #[test]
    fn division_by_zero_is_not_evaluated() {
        let expr = binary(AstBinaryOp::Divide, AstExpression::new_int_literal(1), AstExpression::new_int_literal(0));
        assert_eq!(evaluate_constant(&expr), None);

        let expr = binary(AstBinaryOp::Remainder, AstExpression::new_int_literal(1), AstExpression::new_int_literal(0));
        assert_eq!(evaluate_constant(&expr), None);
    }

    #[test]
    fn int_min_division_wraps() {
        let expr = binary(
            AstBinaryOp::Divide,
            AstExpression::new_int_literal(i32::MIN),
            AstExpression::new_int_literal(-1),
        );
        assert_eq!(evaluate_constant(&expr), Some(i32::MIN));
    }

    #[test]
    fn comparisons_produce_zero_or_one() {
        let expr = binary(AstBinaryOp::LessThan, AstExpression::new_int_literal(1), AstExpression::new_int_literal(2));
        assert_eq!(evaluate_constant(&expr), Some(1));

        let expr = binary(AstBinaryOp::EqualTo, AstExpression::new_int_literal(1), AstExpression::new_int_literal(2));
        assert_eq!(evaluate_constant(&expr), Some(0));
    }

    #[test]
    fn logical_operators_normalize() {
        let expr =
            binary(AstBinaryOp::LogicalAnd, AstExpression::new_int_literal(7), AstExpression::new_int_literal(-3));
        assert_eq!(evaluate_constant(&expr), Some(1));

        let expr = binary(AstBinaryOp::LogicalOr, AstExpression::new_int_literal(0), AstExpression::new_int_literal(0));
        assert_eq!(evaluate_constant(&expr), Some(0));
    }

    #[test]
    fn variables_are_not_constants() {
        let var = AstExpression::new(
            crate::core::SourceLocation::none(),
            AstExpressionKind::Identifier("x".to_string()),
        );
        let expr = binary(AstBinaryOp::Add, var, AstExpression::new_int_literal(1));
        assert_eq!(evaluate_constant(&expr), None);
    }
}
