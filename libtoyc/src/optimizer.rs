// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `optimizer` module rewrites the AST: constant folding, algebraic simplification, constant
//! propagation, dead-branch folding, dead-code elimination and best-effort loop-invariant
//! hoisting. It runs only when optimization is enabled on the command line.

mod dead_code;
mod fold;
mod hoist;
mod propagate;

#[cfg(test)]
mod tests;

use crate::parser::AstRoot;

/// Counts the rewrites installed by the optimizer, for diagnostics and fixed-point detection.
#[derive(Debug, Default)]
pub struct RewriteCounter {
    rewrites: usize,
}

impl RewriteCounter {
    /// Records one installed rewrite.
    pub fn record(&mut self) {
        self.rewrites += 1;
    }

    /// The number of rewrites recorded so far.
    pub fn count(&self) -> usize {
        self.rewrites
    }
}

// A safety net for the fixed-point loop. Each full pass either installs rewrites that strictly
// shrink or constant-fold the tree, so in practice the loop converges long before this.
const MAX_PASSES: usize = 64;

/// Optimizes the AST to a fixed point and returns it.
pub fn optimize(mut ast_root: AstRoot) -> AstRoot {
    let mut total_rewrites = 0;
    let mut passes = 0;

    loop {
        let mut counter = RewriteCounter::default();

        for function in &mut ast_root.0 {
            fold::simplify_function(function, &mut counter);
            propagate::propagate_function(function, &mut counter);
            dead_code::eliminate_in_function(function, &mut counter);
            hoist::hoist_in_function(function, &mut counter);
        }

        passes += 1;
        total_rewrites += counter.count();

        if counter.count() == 0 || passes >= MAX_PASSES {
            break;
        }
    }

    tracing::debug!(rewrites = total_rewrites, passes, "ast optimizer finished");

    ast_root
}
