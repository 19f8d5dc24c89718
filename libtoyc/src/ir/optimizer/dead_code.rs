// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `dead_code` module removes pure instructions whose result is never read.

use std::collections::HashSet;

use crate::ir::TacInstruction;

/// Removes dead definitions from the function body and returns the number removed.
///
/// An instruction dies when its defined name has no use anywhere downstream in the function and
/// the instruction has no side effects. A `Call` always has side effects and is never removed,
/// even when its destination is dead. Removing one definition can kill the uses feeding it, so
/// the sweep repeats until nothing changes.
pub fn run(body: &mut Vec<TacInstruction>) -> usize {
    let mut removed_total = 0;

    loop {
        let used: HashSet<String> =
            body.iter().flat_map(|i| i.used_names().into_iter().map(str::to_string)).collect();

        let before = body.len();
        body.retain(|instruction| match instruction {
            TacInstruction::Binary { dst, .. }
            | TacInstruction::Unary { dst, .. }
            | TacInstruction::Copy { dst, .. } => {
                dst.name().is_none_or(|name| used.contains(name))
            }
            _ => true,
        });

        let removed = before - body.len();
        removed_total += removed;
        if removed == 0 {
            break;
        }
    }

    removed_total
}
