// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `const_fold` module folds instructions whose operands are all constants.

use crate::ir::{TacInstruction, TacOperand};

/// Folds constant operations and constant branches in the function body.
///
/// A `Binary` or `Unary` whose operands are constants becomes a `Copy` of the result; a division
/// or remainder by a constant zero is left untouched. A conditional branch on a constant becomes
/// an unconditional `Goto` or disappears.
pub fn run(body: &mut Vec<TacInstruction>) -> usize {
    let mut rewrites = 0;

    for instruction in body.iter_mut() {
        match instruction {
            TacInstruction::Binary { op, dst, lhs, rhs } => {
                if let (Some(left), Some(right)) = (lhs.as_constant(), rhs.as_constant())
                    && let Some(value) = op.evaluate(left, right)
                {
                    *instruction =
                        TacInstruction::Copy { dst: dst.clone(), src: TacOperand::Constant(value) };
                    rewrites += 1;
                }
            }

            TacInstruction::Unary { op, dst, src } => {
                if let Some(value) = src.as_constant() {
                    *instruction =
                        TacInstruction::Copy { dst: dst.clone(), src: TacOperand::Constant(op.evaluate(value)) };
                    rewrites += 1;
                }
            }

            _ => {}
        }
    }

    // Constant branches: taken branches become gotos, never-taken branches disappear.
    let mut folded = Vec::with_capacity(body.len());
    for instruction in body.drain(..) {
        match &instruction {
            TacInstruction::IfTrueGoto { condition, target } => match condition.as_constant() {
                Some(0) => {
                    rewrites += 1;
                }
                Some(_) => {
                    folded.push(TacInstruction::Goto { target: target.clone() });
                    rewrites += 1;
                }
                None => folded.push(instruction),
            },
            _ => folded.push(instruction),
        }
    }
    *body = folded;

    rewrites
}
