// Copyright 2025-2026 Neil Henderson
//
//! The `cse` module eliminates common subexpressions within a basic block.

use crate::ir::{TacBinaryOp, TacInstruction, TacOperand, TacUnaryOp};

/// One available expression: the operation, its rendered operands, and the temp holding it.
struct Available {
    key: ExprKey,
    dst: TacOperand,
}

/// The value-numbering key for a pure operation. Operand rendering comes from the operand's
/// `Display`, which is unambiguous across constants, variables and temps; commutative operators
/// normalize their operand order.
#[derive(PartialEq, Eq)]
enum ExprKey {
    Binary(TacBinaryOp, String, String),
    Unary(TacUnaryOp, String),
}

/// Eliminates duplicated pure operations in each block and returns the number of replacements.
pub fn run(body: &mut Vec<TacInstruction>) -> usize {
    let mut available: Vec<Available> = Vec::new();
    let mut rewrites = 0;

    for instruction in body.iter_mut() {
        if matches!(instruction, TacInstruction::Label { .. }) {
            available.clear();
            continue;
        }

        // Re-use a previously computed value when the same pure expression appears again.
        if let Some((key, dst)) = expression_key(instruction) {
            if let Some(entry) = available.iter().find(|entry| entry.key == key) {
                *instruction = TacInstruction::Copy { dst, src: entry.dst.clone() };
                rewrites += 1;
            } else if dst.is_temp() {
                available.push(Available { key, dst });
            }
        }

        // A definition invalidates every available expression that mentions the defined name.
        for name in instruction.defined_names() {
            let name = name.to_string();
            available.retain(|entry| {
                entry.dst.name() != Some(name.as_str()) && !key_mentions(&entry.key, &name)
            });
        }

        if instruction.is_control_transfer() {
            available.clear();
        }
    }

    rewrites
}

/// The value-numbering key and destination of a pure `Binary` or `Unary`, or `None` for
/// anything else.
fn expression_key(instruction: &TacInstruction) -> Option<(ExprKey, TacOperand)> {
    match instruction {
        TacInstruction::Binary { op, dst, lhs, rhs } => {
            let mut left = lhs.to_string();
            let mut right = rhs.to_string();
            if op.is_commutative() && left > right {
                std::mem::swap(&mut left, &mut right);
            }
            Some((ExprKey::Binary(*op, left, right), dst.clone()))
        }
        TacInstruction::Unary { op, dst, src } => Some((ExprKey::Unary(*op, src.to_string()), dst.clone())),
        _ => None,
    }
}

/// Does the key mention the given storage name as an operand?
fn key_mentions(key: &ExprKey, name: &str) -> bool {
    match key {
        ExprKey::Binary(_, left, right) => left == name || right == name,
        ExprKey::Unary(_, operand) => operand == name,
    }
}
