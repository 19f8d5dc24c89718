// Copyright 2025-2026 Neil Henderson
//
//! The `const_prop` module propagates constants across basic blocks.
//!
//! A name is constant at a block entry only when every predecessor agrees on its value. The
//! block maps are computed iteratively to a fixed point, optimistically ignoring predecessors
//! that have not produced a map yet, and a final pass rewrites the uses.

use std::collections::HashMap;

use crate::ir::{TacInstruction, TacOperand, split_into_blocks};

type ConstMap = HashMap<String, i32>;

/// Propagates constants through the function body and returns the number of rewritten uses.
pub fn run(body: &mut Vec<TacInstruction>) -> usize {
    let blocks = split_into_blocks(body);
    if blocks.is_empty() {
        return 0;
    }

    // Iterate the per-block output maps to a fixed point.
    let mut outs: Vec<Option<ConstMap>> = vec![None; blocks.len()];
    let mut changed = true;
    let mut iterations = 0;
    while changed && iterations < blocks.len() * 8 + 8 {
        changed = false;
        iterations += 1;

        for block in &blocks {
            let entry = entry_map(block.id, &blocks[block.id].predecessors, &outs);
            let exit = transfer(&entry, &body[block.range.clone()]);

            if outs[block.id].as_ref() != Some(&exit) {
                outs[block.id] = Some(exit);
                changed = true;
            }
        }
    }

    // Rewrite uses with the converged entry maps.
    let mut rewrites = 0;
    for block in &blocks {
        let mut known = entry_map(block.id, &block.predecessors, &outs);
        for index in block.range.clone() {
            rewrites += substitute_uses(&mut body[index], &known);
            apply(&mut known, &body[index]);
        }
    }

    rewrites
}

/// The constants known at block entry: the agreement of all predecessor exits. The entry block
/// starts with nothing known.
fn entry_map(block_id: usize, predecessors: &[usize], outs: &[Option<ConstMap>]) -> ConstMap {
    if block_id == 0 {
        return ConstMap::new();
    }

    let mut computed = predecessors.iter().filter_map(|&p| outs[p].as_ref());

    let Some(first) = computed.next() else {
        return ConstMap::new();
    };

    let mut merged = first.clone();
    for out in computed {
        merged.retain(|name, value| out.get(name) == Some(value));
    }
    merged
}

/// Applies a block's instructions to a constant map without rewriting anything.
fn transfer(entry: &ConstMap, instructions: &[TacInstruction]) -> ConstMap {
    let mut known = entry.clone();
    for instruction in instructions {
        apply(&mut known, instruction);
    }
    known
}

/// Updates the constant map with one instruction's effect.
fn apply(known: &mut ConstMap, instruction: &TacInstruction) {
    match instruction {
        TacInstruction::Copy { dst, src } => {
            update(known, dst, resolve(src, known));
        }

        TacInstruction::Binary { op, dst, lhs, rhs } => {
            let value = match (resolve(lhs, known), resolve(rhs, known)) {
                (Some(left), Some(right)) => op.evaluate(left, right),
                _ => None,
            };
            update(known, dst, value);
        }

        TacInstruction::Unary { op, dst, src } => {
            update(known, dst, resolve(src, known).map(|v| op.evaluate(v)));
        }

        TacInstruction::Call { dst: Some(dst), .. } => update(known, dst, None),

        _ => {}
    }
}

fn update(known: &mut ConstMap, dst: &TacOperand, value: Option<i32>) {
    let Some(name) = dst.name() else {
        return;
    };
    match value {
        Some(value) => {
            known.insert(name.to_string(), value);
        }
        None => {
            known.remove(name);
        }
    }
}

fn resolve(operand: &TacOperand, known: &ConstMap) -> Option<i32> {
    match operand {
        TacOperand::Constant(value) => Some(*value),
        TacOperand::Variable(name) | TacOperand::Temp(name) => known.get(name).copied(),
        TacOperand::Label(_) => None,
    }
}

/// Replaces known-constant uses in one instruction. Definitions are left alone.
fn substitute_uses(instruction: &mut TacInstruction, known: &ConstMap) -> usize {
    let mut rewrites = 0;

    let mut replace = |operand: &mut TacOperand| {
        if let Some(name) = operand.name()
            && let Some(&value) = known.get(name)
        {
            *operand = TacOperand::Constant(value);
            rewrites += 1;
        }
    };

    match instruction {
        TacInstruction::Binary { lhs, rhs, .. } => {
            replace(lhs);
            replace(rhs);
        }
        TacInstruction::Unary { src, .. } => replace(src),
        TacInstruction::Copy { src, .. } => replace(src),
        TacInstruction::IfTrueGoto { condition, .. } => replace(condition),
        TacInstruction::Param { value } => replace(value),
        TacInstruction::Return { value: Some(value) } => replace(value),
        _ => {}
    }

    rewrites
}
