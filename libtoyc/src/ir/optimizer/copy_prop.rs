// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `copy_prop` module forwards copies within a basic block.
//!
//! `Copy(a, b)` with a variable or temp source makes `a` an alias of `b`; later uses of `a`
//! read `b` directly until either name is redefined. Aliases never survive a block boundary.

use std::collections::HashMap;

use crate::ir::{TacInstruction, TacOperand};

/// Forwards copies through the function body and returns the number of rewritten uses.
pub fn run(body: &mut Vec<TacInstruction>) -> usize {
    let mut aliases: HashMap<String, TacOperand> = HashMap::new();
    let mut rewrites = 0;

    for instruction in body.iter_mut() {
        // Block boundary: labels start a new block.
        if matches!(instruction, TacInstruction::Label { .. }) {
            aliases.clear();
            continue;
        }

        rewrites += substitute_uses(instruction, &aliases);

        // A definition kills the aliases that mention the defined name.
        let defined: Vec<String> = instruction.defined_names().iter().map(|s| s.to_string()).collect();
        for name in &defined {
            aliases.retain(|dst, src| dst != name && src.name() != Some(name));
        }

        if let TacInstruction::Copy { dst, src } = instruction
            && let Some(dst_name) = dst.name()
            && src.name().is_some_and(|src_name| src_name != dst_name)
        {
            aliases.insert(dst_name.to_string(), src.clone());
        }

        // Block boundary: control transfers end the block.
        if instruction.is_control_transfer() {
            aliases.clear();
        }
    }

    rewrites
}

/// Replaces aliased uses in one instruction, following alias chains.
fn substitute_uses(instruction: &mut TacInstruction, aliases: &HashMap<String, TacOperand>) -> usize {
    let mut rewrites = 0;

    let mut replace = |operand: &mut TacOperand| {
        let mut hops = 0;
        while let Some(name) = operand.name() {
            let Some(source) = aliases.get(name) else {
                break;
            };
            *operand = source.clone();
            rewrites += 1;

            // Alias chains are short; the bound only guards against a pathological cycle.
            hops += 1;
            if hops > 8 {
                break;
            }
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
