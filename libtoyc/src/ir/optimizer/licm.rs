// Copyright 2025-2026 Neil Henderson
//
//! The `licm` module moves loop-invariant computations out of loops.
//!
//! A loop is recognized from its label structure: a label `L` together with the last backward
//! jump to `L` bounds the loop span. The hoist point immediately before `L` acts as the
//! preheader: every external entry falls through into the loop header, while jumps to `L` from
//! inside the span (loop-back and `continue`) skip the hoisted instructions, which is exactly
//! the preheader behavior. A loop whose header is jumped to from outside its span is skipped.

use std::collections::HashSet;

use crate::ir::{TacBinaryOp, TacInstruction};

/// Hoists loop-invariant instructions in the function body and returns the number moved.
pub fn run(body: &mut Vec<TacInstruction>) -> usize {
    let mut hoisted_total = 0;

    // Hoisting shifts indices, so handle one loop per iteration and re-scan.
    loop {
        let Some(moved) = hoist_one_loop(body) else {
            break;
        };
        hoisted_total += moved;
    }

    hoisted_total
}

/// Finds the first loop with hoistable instructions, hoists them, and returns how many moved.
/// Returns `None` when no loop has anything left to hoist.
fn hoist_one_loop(body: &mut Vec<TacInstruction>) -> Option<usize> {
    for header_index in 0..body.len() {
        let header = match &body[header_index] {
            TacInstruction::Label { name } => name.clone(),
            _ => continue,
        };

        // The last backward jump to this label closes the loop span.
        let Some(back_edge) = last_jump_to(body, &header, header_index) else {
            continue;
        };

        // A jump to the header from outside the span would bypass the hoist point.
        if jumped_to_outside(body, &header, header_index, back_edge) {
            continue;
        }

        let hoistable = collect_hoistable(&body[header_index..=back_edge]);
        if hoistable.is_empty() {
            continue;
        }

        // Remove from the span (back to front), then insert before the header in order.
        let mut moved = Vec::new();
        for offset in hoistable.iter().rev() {
            moved.insert(0, body.remove(header_index + offset));
        }
        for (position, instruction) in moved.into_iter().enumerate() {
            body.insert(header_index + position, instruction);
        }

        return Some(hoistable.len());
    }

    None
}

/// The index of the last `Goto`/`IfTrueGoto` to `label` after `from`, or `None` if there is no
/// backward jump to it.
fn last_jump_to(body: &[TacInstruction], label: &str, from: usize) -> Option<usize> {
    body.iter()
        .enumerate()
        .skip(from + 1)
        .filter(|(_, instruction)| jump_target(instruction) == Some(label))
        .map(|(index, _)| index)
        .last()
}

/// Is `label` the target of any jump outside the `span_start..=span_end` range?
fn jumped_to_outside(body: &[TacInstruction], label: &str, span_start: usize, span_end: usize) -> bool {
    body.iter()
        .enumerate()
        .filter(|(index, _)| *index < span_start || *index > span_end)
        .any(|(_, instruction)| jump_target(instruction) == Some(label))
}

fn jump_target(instruction: &TacInstruction) -> Option<&str> {
    match instruction {
        TacInstruction::Goto { target } | TacInstruction::IfTrueGoto { target, .. } => Some(target),
        _ => None,
    }
}

/// Offsets (within the loop span) of instructions that can move to the preheader.
///
/// An instruction is invariant when it is pure, every operand is a constant or defined outside
/// the loop, and its destination is a temp defined exactly once in the loop. Temps are
/// defined-before-use by construction, so a single in-loop definition with invariant operands
/// computes the same value on every iteration. Division and remainder stay put: the preheader
/// runs even when the loop body never does.
fn collect_hoistable(span: &[TacInstruction]) -> Vec<usize> {
    let mut defined_in_loop: HashSet<&str> = HashSet::new();
    let mut definition_counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();

    for instruction in span {
        for name in instruction.defined_names() {
            defined_in_loop.insert(name);
            *definition_counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut hoistable = Vec::new();

    for (offset, instruction) in span.iter().enumerate() {
        let (dst, operands_invariant) = match instruction {
            TacInstruction::Binary { op, dst, lhs, rhs } => {
                if matches!(op, TacBinaryOp::Div | TacBinaryOp::Rem) {
                    continue;
                }
                let invariant = [lhs, rhs]
                    .iter()
                    .all(|operand| operand.name().is_none_or(|name| !defined_in_loop.contains(name)));
                (dst, invariant)
            }
            TacInstruction::Unary { dst, src, .. } | TacInstruction::Copy { dst, src } => {
                (dst, src.name().is_none_or(|name| !defined_in_loop.contains(name)))
            }
            _ => continue,
        };

        if !operands_invariant || !dst.is_temp() {
            continue;
        }

        let Some(dst_name) = dst.name() else {
            continue;
        };

        if definition_counts.get(dst_name).copied() == Some(1) {
            hoistable.push(offset);
        }
    }

    hoistable
}
