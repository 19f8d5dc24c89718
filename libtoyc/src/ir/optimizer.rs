// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `optimizer` module rewrites the ToyTac IR: constant folding and propagation, copy
//! propagation, common-subexpression elimination, loop-invariant code motion, dead-code
//! elimination and selective inlining.

mod const_fold;
mod const_prop;
mod copy_prop;
mod cse;
mod dead_code;
mod inline;
mod licm;

use crate::ir::{TacInstruction, TacProgram};

// Two rounds let the scalar passes clean up what inlining and LICM expose; in practice the
// second round converges.
const ROUNDS: usize = 2;

/// Optimizes the program and returns it.
pub fn optimize(program: TacProgram) -> TacProgram {
    let mut program = inline::inline_functions(program);

    let mut total_rewrites = 0;
    for _ in 0..ROUNDS {
        let mut rewrites = 0;

        for_each_function_body(&mut program, |body| {
            rewrites += const_fold::run(body);
            rewrites += const_prop::run(body);
            rewrites += copy_prop::run(body);
            rewrites += cse::run(body);
            rewrites += licm::run(body);
            rewrites += dead_code::run(body);
        });

        total_rewrites += rewrites;
        if rewrites == 0 {
            break;
        }
    }

    tracing::debug!(rewrites = total_rewrites, "ir optimizer finished");

    // Inlining can leave a callee with no remaining call sites.
    super::translator::prune_unused_functions(program)
}

/// Applies `f` to each function body (the instructions between `FunctionBegin` and
/// `FunctionEnd`), rebuilding the program around the rewritten bodies.
fn for_each_function_body(program: &mut TacProgram, mut f: impl FnMut(&mut Vec<TacInstruction>)) {
    let spans = program.function_spans();
    let mut rebuilt = Vec::with_capacity(program.0.len());

    for (_, range) in spans {
        rebuilt.push(program.0[range.start].clone());

        let mut body: Vec<TacInstruction> = program.0[range.start + 1..range.end - 1].to_vec();
        f(&mut body);
        rebuilt.append(&mut body);

        rebuilt.push(program.0[range.end - 1].clone());
    }

    program.0 = rebuilt;
}
