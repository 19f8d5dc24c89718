// Copyright 2025-2026 Neil Henderson
//
//! The `linear_scan` module implements linear-scan register allocation.

use std::collections::HashMap;

use crate::ir::TacInstruction;

use super::super::registers::Register;
use super::{LiveInterval, live_intervals};

/// Allocates registers by a single scan over the live intervals sorted by start.
///
/// Intervals that have ended free their register; when no register is free, the active interval
/// with the latest end spills so the shorter one can have its register.
pub fn allocate(body: &[TacInstruction]) -> HashMap<String, Register> {
    let mut intervals = live_intervals(body);
    intervals.sort_by_key(|interval| interval.start);

    let mut free: Vec<Register> = Register::ALLOCATABLE.iter().rev().copied().collect();
    let mut active: Vec<(LiveInterval, Register)> = Vec::new();
    let mut allocation = HashMap::new();

    for interval in intervals {
        // Expire intervals that ended before this one starts.
        let mut index = 0;
        while index < active.len() {
            if active[index].0.end < interval.start {
                let (_, register) = active.remove(index);
                free.push(register);
            } else {
                index += 1;
            }
        }

        if let Some(register) = free.pop() {
            allocation.insert(interval.name.clone(), register);
            active.push((interval, register));
            continue;
        }

        // No free register: spill whichever of the active intervals and this one ends last.
        let Some(victim_index) = active
            .iter()
            .enumerate()
            .max_by_key(|(_, (active_interval, _))| active_interval.end)
            .map(|(index, _)| index)
        else {
            continue;
        };

        if active[victim_index].0.end > interval.end {
            let (victim, register) = active.remove(victim_index);
            allocation.remove(&victim.name);
            allocation.insert(interval.name.clone(), register);
            active.push((interval, register));
        }
        // Otherwise the new interval ends last and is the one that stays on the stack.
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{TacBinaryOp, TacOperand};

    fn var(name: &str) -> TacOperand {
        TacOperand::Variable(name.to_string())
    }

    #[test]
    fn disjoint_intervals_share_registers() {
        // a dies before b is born, so they may share the first register.
        let body = vec![
            TacInstruction::Copy { dst: var("a"), src: TacOperand::Constant(1) },
            TacInstruction::Return { value: Some(var("a")) },
            TacInstruction::Copy { dst: var("b"), src: TacOperand::Constant(2) },
            TacInstruction::Return { value: Some(var("b")) },
        ];

        let allocation = allocate(&body);
        assert_eq!(allocation["a"], allocation["b"]);
    }

    #[test]
    fn overlapping_intervals_get_distinct_registers() {
        let body = vec![
            TacInstruction::Copy { dst: var("a"), src: TacOperand::Constant(1) },
            TacInstruction::Copy { dst: var("b"), src: TacOperand::Constant(2) },
            TacInstruction::Binary { op: TacBinaryOp::Add, dst: var("c"), lhs: var("a"), rhs: var("b") },
            TacInstruction::Return { value: Some(var("c")) },
        ];

        let allocation = allocate(&body);
        assert_ne!(allocation["a"], allocation["b"]);
    }

    #[test]
    fn spills_when_pressure_exceeds_the_pool() {
        // Fifteen variables all live at once: at least two must stay on the stack.
        let mut body = Vec::new();
        let names: Vec<String> = (0..15).map(|i| format!("v{i}")).collect();
        for name in &names {
            body.push(TacInstruction::Copy { dst: var(name), src: TacOperand::Constant(0) });
        }
        for name in &names {
            body.push(TacInstruction::Param { value: var(name) });
        }

        let allocation = allocate(&body);
        assert!(allocation.len() <= Register::ALLOCATABLE.len());

        // No register is handed to two simultaneously-live variables.
        let mut seen = std::collections::HashSet::new();
        for register in allocation.values() {
            assert!(seen.insert(*register), "register {register} assigned twice");
        }
    }
}
