// Copyright 2025-2026 Neil Henderson
//
//! The `basic_blocks` module reconstructs basic blocks and the control-flow graph from a
//! function's linear instruction span.

use std::collections::HashMap;

use super::TacInstruction;

/// A basic block: a maximal straight-line run of instructions.
///
/// The `range` indexes into the instruction slice the block was split from.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: usize,
    pub range: std::ops::Range<usize>,
    /// The label the block starts with, if any.
    pub label: Option<String>,
    pub successors: Vec<usize>,
    pub predecessors: Vec<usize>,
}

/// Splits a function body (the instructions between `FunctionBegin` and `FunctionEnd`) into
/// basic blocks and wires up the control-flow graph.
///
/// Block leaders are the first instruction, every label, and every instruction following a
/// control transfer.
pub fn split_into_blocks(instructions: &[TacInstruction]) -> Vec<BasicBlock> {
    if instructions.is_empty() {
        return Vec::new();
    }

    let mut leaders = vec![0];
    for (index, instruction) in instructions.iter().enumerate() {
        match instruction {
            TacInstruction::Label { .. } => leaders.push(index),
            _ if instruction.is_control_transfer() && index + 1 < instructions.len() => leaders.push(index + 1),
            _ => {}
        }
    }
    leaders.sort_unstable();
    leaders.dedup();

    let mut blocks: Vec<BasicBlock> = Vec::new();
    for (block_id, window) in leaders.windows(2).enumerate() {
        blocks.push(make_block(block_id, window[0]..window[1], instructions));
    }
    let last_leader = *leaders.last().unwrap_or(&0);
    blocks.push(make_block(blocks.len(), last_leader..instructions.len(), instructions));

    // Map labels to their blocks.
    let label_blocks: HashMap<&str, usize> = blocks
        .iter()
        .filter_map(|block| block.label.as_deref().map(|label| (label, block.id)))
        .collect();

    // Successor edges.
    let mut edges = Vec::new();
    for block in &blocks {
        let Some(last) = block.range.clone().last().map(|i| &instructions[i]) else {
            continue;
        };

        match last {
            TacInstruction::Goto { target } => {
                if let Some(&target_block) = label_blocks.get(target.as_str()) {
                    edges.push((block.id, target_block));
                }
            }
            TacInstruction::IfTrueGoto { target, .. } => {
                if let Some(&target_block) = label_blocks.get(target.as_str()) {
                    edges.push((block.id, target_block));
                }
                if block.id + 1 < blocks.len() {
                    edges.push((block.id, block.id + 1));
                }
            }
            TacInstruction::Return { .. } => {}
            _ => {
                if block.id + 1 < blocks.len() {
                    edges.push((block.id, block.id + 1));
                }
            }
        }
    }

    for (from, to) in edges {
        blocks[from].successors.push(to);
        blocks[to].predecessors.push(from);
    }

    blocks
}

fn make_block(id: usize, range: std::ops::Range<usize>, instructions: &[TacInstruction]) -> BasicBlock {
    let label = match instructions.get(range.start) {
        Some(TacInstruction::Label { name }) => Some(name.clone()),
        _ => None,
    };
    BasicBlock { id, range, label, successors: Vec::new(), predecessors: Vec::new() }
}
