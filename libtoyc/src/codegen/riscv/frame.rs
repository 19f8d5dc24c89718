// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `frame` module computes the per-function stack frame layout.
//!
//! The frame grows downward from the frame pointer:
//!
//! ```text
//! high addr
//!   [ caller-passed stack args ]    <- positive offsets from fp
//!   fp ------------------------
//!   [ saved ra ]                    <- fp - 4
//!   [ saved old fp ]                <- fp - 8
//!   [ saved callee-saved regs ]     <- fp - 12, fp - 16, ...
//!   [ caller-saved save slots ]     <- used around calls
//!   [ local vars / temps ]
//!   [ outgoing stack args ]         <- 0(sp), 4(sp), ...
//!   sp ------------------------
//! low addr
//! ```

use std::collections::HashMap;

use crate::ICE;
use crate::ir::TacInstruction;

use super::registers::Register;

/// The computed layout of one function's stack frame.
#[derive(Debug)]
pub struct FrameLayout {
    slot_offsets: HashMap<String, i32>,
    saved_registers: Vec<(Register, i32)>,
    caller_saved_slots: Vec<(Register, i32)>,
    /// The full frame size in bytes, 16-byte aligned.
    pub frame_size: i32,
}

impl FrameLayout {
    /// Builds the layout by pre-scanning the function body.
    ///
    /// Every variable and temp that is not register-allocated receives a 4-byte slot, in order
    /// of first appearance. The outgoing-argument area is sized for the largest call in the
    /// body. The frame size is `saved registers + locals + outgoing + 8` rounded up to 16.
    pub fn build(
        body: &[TacInstruction],
        params: &[String],
        allocation: &HashMap<String, Register>,
    ) -> Self {
        let has_calls = body.iter().any(|instruction| matches!(instruction, TacInstruction::Call { .. }));

        // Allocated callee-saved registers get prologue/epilogue save slots just below the saved
        // ra/fp pair. Allocated caller-saved registers get slots used around calls instead, and
        // only when the body calls at all.
        let mut allocated: Vec<Register> = allocation.values().copied().collect();
        allocated.sort_by_key(|register| register.to_string());
        allocated.dedup();

        let mut saved_registers = Vec::new();
        let mut caller_saved_slots = Vec::new();
        let mut next_offset = -12;
        for register in allocated {
            if register.is_callee_saved() {
                saved_registers.push((register, next_offset));
            } else if has_calls {
                caller_saved_slots.push((register, next_offset));
            } else {
                continue;
            }
            next_offset -= 4;
        }

        // Stack slots, parameters first so their prologue stores land in a stable place.
        let mut slot_offsets = HashMap::new();
        let mut slot_count = 0;

        let mut assign_slot = |name: &str, slot_offsets: &mut HashMap<String, i32>, next_offset: &mut i32| {
            if allocation.contains_key(name) || slot_offsets.contains_key(name) {
                return 0;
            }
            slot_offsets.insert(name.to_string(), *next_offset);
            *next_offset -= 4;
            1
        };

        for param in params {
            slot_count += assign_slot(param, &mut slot_offsets, &mut next_offset);
        }

        for instruction in body {
            for name in instruction.defined_names().into_iter().chain(instruction.used_names()) {
                slot_count += assign_slot(name, &mut slot_offsets, &mut next_offset);
            }
        }

        // Outgoing stack arguments for calls with more than 8 arguments.
        let outgoing = body
            .iter()
            .filter_map(|instruction| match instruction {
                TacInstruction::Call { arg_count, .. } => Some(arg_count.saturating_sub(8) as i32 * 4),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        let save_slot_count = (saved_registers.len() + caller_saved_slots.len()) as i32;
        let raw_size = 8 + save_slot_count * 4 + slot_count * 4 + outgoing;
        let frame_size = (raw_size + 15) & !15;

        Self { slot_offsets, saved_registers, caller_saved_slots, frame_size }
    }

    /// The fp-relative offset of a spilled variable or temp.
    pub fn offset_of(&self, name: &str) -> i32 {
        match self.slot_offsets.get(name) {
            Some(&offset) => offset,
            None => ICE!("Codegen: no stack slot assigned for '{name}'"),
        }
    }

    /// The callee-saved registers this function must preserve, with their save slots.
    pub fn saved_registers(&self) -> &[(Register, i32)] {
        &self.saved_registers
    }

    /// The allocated caller-saved registers, with the slots they are saved to around each call.
    pub fn caller_saved_slots(&self) -> &[(Register, i32)] {
        &self.caller_saved_slots
    }
}
