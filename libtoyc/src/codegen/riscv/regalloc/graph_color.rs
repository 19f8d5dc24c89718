// Copyright 2025-2026 Neil Henderson
//
//! The `graph_color` module implements graph-coloring register allocation.

use std::collections::{HashMap, HashSet};

use crate::ir::TacInstruction;

use super::super::registers::Register;
use super::live_intervals;

/// Allocates registers by coloring the interference graph.
///
/// Two variables interfere when their live intervals overlap. The graph is simplified by
/// repeatedly removing the node of minimum degree; nodes are then colored in reverse removal
/// order with the lowest-indexed register unused by their already-colored neighbors. A node with
/// no available color is left uncolored and its variable stays on the stack.
pub fn allocate(body: &[TacInstruction]) -> HashMap<String, Register> {
    let graph = build_interference_graph(body);
    if graph.is_empty() {
        return HashMap::new();
    }

    let order = simplify(&graph);
    color(&order, &graph)
}

/// Builds the interference graph from live-interval overlap.
fn build_interference_graph(body: &[TacInstruction]) -> HashMap<String, HashSet<String>> {
    let intervals = live_intervals(body);

    let mut graph: HashMap<String, HashSet<String>> = HashMap::new();
    for interval in &intervals {
        graph.entry(interval.name.clone()).or_default();
    }

    for (index, first) in intervals.iter().enumerate() {
        for second in &intervals[index + 1..] {
            let overlap_start = first.start.max(second.start);
            let overlap_end = first.end.min(second.end);

            if overlap_start <= overlap_end {
                graph.get_mut(&first.name).map(|n| n.insert(second.name.clone()));
                graph.get_mut(&second.name).map(|n| n.insert(first.name.clone()));
            }
        }
    }

    graph
}

/// Removes nodes of minimum degree one at a time and returns them in reverse removal order, so
/// the least-constrained nodes color last.
fn simplify(graph: &HashMap<String, HashSet<String>>) -> Vec<String> {
    let mut work_graph = graph.clone();
    let mut removal_order = Vec::with_capacity(graph.len());

    while !work_graph.is_empty() {
        let node = work_graph
            .iter()
            .min_by_key(|(name, neighbors)| (neighbors.len(), name.clone()))
            .map(|(name, _)| name.clone())
            .unwrap_or_default();

        for neighbors in work_graph.values_mut() {
            neighbors.remove(&node);
        }
        work_graph.remove(&node);

        removal_order.push(node);
    }

    removal_order.reverse();
    removal_order
}

/// Colors the nodes in the given order against the original graph.
fn color(order: &[String], graph: &HashMap<String, HashSet<String>>) -> HashMap<String, Register> {
    let mut allocation: HashMap<String, Register> = HashMap::new();

    for node in order {
        let Some(neighbors) = graph.get(node) else {
            continue;
        };

        let neighbor_registers: HashSet<Register> =
            neighbors.iter().filter_map(|neighbor| allocation.get(neighbor).copied()).collect();

        let available =
            Register::ALLOCATABLE.iter().find(|register| !neighbor_registers.contains(register)).copied();

        if let Some(register) = available {
            allocation.insert(node.clone(), register);
        }
    }

    allocation
}
