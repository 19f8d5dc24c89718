// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `regalloc` module selects registers for source variables.
//!
//! Three strategies exist: naive (everything stays on the stack), linear scan over live
//! intervals, and graph coloring over an interference graph. The allocators assign source
//! variables only; temps follow the per-instruction scratch discipline regardless of strategy.

mod graph_color;
mod linear_scan;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::ir::TacInstruction;

use super::registers::Register;

/// The register allocation strategy, selected on the command line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RegAllocStrategy {
    Naive,
    LinearScan,
    GraphColor,
}

impl fmt::Display for RegAllocStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegAllocStrategy::Naive => write!(f, "naive"),
            RegAllocStrategy::LinearScan => write!(f, "linear-scan"),
            RegAllocStrategy::GraphColor => write!(f, "graph-color"),
        }
    }
}

impl FromStr for RegAllocStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(RegAllocStrategy::Naive),
            "linear-scan" => Ok(RegAllocStrategy::LinearScan),
            "graph-color" => Ok(RegAllocStrategy::GraphColor),
            other => Err(format!("Unknown register allocation strategy: {other}")),
        }
    }
}

/// Allocates registers for the function body and returns the variable-to-register map.
/// Variables absent from the map live on the stack.
pub fn allocate(strategy: RegAllocStrategy, body: &[TacInstruction]) -> HashMap<String, Register> {
    match strategy {
        RegAllocStrategy::Naive => HashMap::new(),
        RegAllocStrategy::LinearScan => linear_scan::allocate(body),
        RegAllocStrategy::GraphColor => graph_color::allocate(body),
    }
}

/// A live interval: the range `[first definition or use, last use or definition]` of a variable
/// over the linearized instruction span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveInterval {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Computes the live interval of every source variable in the body.
///
/// Temps are excluded: they are defined once and consumed shortly after, and stay in the scratch
/// registers.
pub fn live_intervals(body: &[TacInstruction]) -> Vec<LiveInterval> {
    let mut intervals: HashMap<String, LiveInterval> = HashMap::new();
    let mut order = Vec::new();

    for (index, instruction) in body.iter().enumerate() {
        for name in instruction.defined_names().into_iter().chain(instruction.used_names()) {
            if name.starts_with('%') {
                continue;
            }

            match intervals.get_mut(name) {
                Some(interval) => interval.end = index,
                None => {
                    order.push(name.to_string());
                    intervals
                        .insert(name.to_string(), LiveInterval { name: name.to_string(), start: index, end: index });
                }
            }
        }
    }

    // First-appearance order keeps the allocators deterministic.
    order.into_iter().map(|name| intervals[&name].clone()).collect()
}
