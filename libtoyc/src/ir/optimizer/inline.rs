// Copyright 2025-2026 Neil Henderson
//
//! The `inline` module replaces calls to small functions with their bodies.
//!
//! A function is inlined when its body is short, contains no loops (no backward jumps), and
//! cannot reach itself through the call graph. Each inlining site renames the callee's
//! variables, temps and labels with a unique suffix, binds the arguments to the renamed
//! parameters with copies, and turns returns into a copy plus a jump to a fresh join label.

use std::collections::{HashMap, HashSet};

use crate::ir::{TacInstruction, TacOperand, TacProgram};

/// Bodies longer than this stay out of line.
const MAX_INLINE_BODY_LEN: usize = 12;

// Inlining exposes further candidates inside the inlined code; a few sweeps settle it. The cap
// also bounds growth for call chains of small functions.
const MAX_SWEEPS: usize = 4;

struct Callee {
    params: Vec<String>,
    body: Vec<TacInstruction>,
}

/// Inlines eligible call sites throughout the program.
pub fn inline_functions(program: TacProgram) -> TacProgram {
    let mut program = program;
    let mut next_site = 0usize;

    for _ in 0..MAX_SWEEPS {
        let candidates = collect_candidates(&program);
        if candidates.is_empty() {
            return program;
        }

        let mut rewritten = Vec::with_capacity(program.0.len());
        let mut inlined_any = false;

        let mut index = 0;
        while index < program.0.len() {
            let instruction = &program.0[index];

            if let TacInstruction::Call { dst, callee, arg_count } = instruction
                && let Some(target) = candidates.get(callee.as_str())
                && params_precede(&rewritten, *arg_count)
            {
                // Pop this call's Param instructions off the output; they hold the argument
                // operands in order.
                let args: Vec<TacOperand> = rewritten
                    .drain(rewritten.len() - arg_count..)
                    .map(|param| match param {
                        TacInstruction::Param { value } => value,
                        _ => unreachable!("params_precede checked the window"),
                    })
                    .collect();

                expand_site(&mut rewritten, target, args, dst.clone(), next_site);
                next_site += 1;
                inlined_any = true;
            } else {
                rewritten.push(instruction.clone());
            }

            index += 1;
        }

        program = TacProgram(rewritten);
        if !inlined_any {
            break;
        }
    }

    program
}

/// Do the last `count` emitted instructions form this call's Param window?
fn params_precede(emitted: &[TacInstruction], count: usize) -> bool {
    emitted.len() >= count
        && emitted[emitted.len() - count..].iter().all(|i| matches!(i, TacInstruction::Param { .. }))
}

/// The functions eligible for inlining, keyed by name.
fn collect_candidates(program: &TacProgram) -> HashMap<String, Callee> {
    let spans = program.function_spans();

    // Direct call edges, for the transitive self-recursion check.
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, range) in &spans {
        let callees = program.0[range.clone()]
            .iter()
            .filter_map(|instruction| match instruction {
                TacInstruction::Call { callee, .. } => Some(callee.as_str()),
                _ => None,
            })
            .collect();
        edges.insert(name, callees);
    }

    let mut candidates = HashMap::new();

    for (name, range) in &spans {
        if name == "main" {
            continue;
        }

        let body: Vec<TacInstruction> = program.0[range.start + 1..range.end - 1].to_vec();

        if body.len() > MAX_INLINE_BODY_LEN || contains_loop(&body) || reaches_itself(name, &edges) {
            continue;
        }

        let TacInstruction::FunctionBegin { params, .. } = &program.0[range.start] else {
            continue;
        };

        candidates.insert(name.clone(), Callee { params: params.clone(), body });
    }

    candidates
}

/// Does the body contain a backward jump (a loop)?
fn contains_loop(body: &[TacInstruction]) -> bool {
    let mut label_positions = HashMap::new();
    for (index, instruction) in body.iter().enumerate() {
        if let TacInstruction::Label { name } = instruction {
            label_positions.insert(name.as_str(), index);
        }
    }

    body.iter().enumerate().any(|(index, instruction)| {
        let target = match instruction {
            TacInstruction::Goto { target } | TacInstruction::IfTrueGoto { target, .. } => target.as_str(),
            _ => return false,
        };
        label_positions.get(target).is_some_and(|&position| position < index)
    })
}

/// Can the function reach itself through the call graph?
fn reaches_itself(name: &str, edges: &HashMap<&str, Vec<&str>>) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = edges.get(name).map(|v| v.clone()).unwrap_or_default();

    while let Some(current) = stack.pop() {
        if current == name {
            return true;
        }
        if visited.insert(current) {
            stack.extend(edges.get(current).into_iter().flatten());
        }
    }

    false
}

/// Emits the inlined body of one call site.
fn expand_site(
    out: &mut Vec<TacInstruction>,
    callee: &Callee,
    args: Vec<TacOperand>,
    dst: Option<TacOperand>,
    site: usize,
) {
    let suffix = format!("_inl{site}");
    let join_label = format!("Linl{site}_end");

    // Bind arguments to the renamed parameters.
    for (param, arg) in callee.params.iter().zip(args) {
        out.push(TacInstruction::Copy { dst: TacOperand::Variable(format!("{param}{suffix}")), src: arg });
    }

    for instruction in &callee.body {
        match instruction {
            TacInstruction::Return { value } => {
                if let (Some(dst), Some(value)) = (&dst, value) {
                    out.push(TacInstruction::Copy { dst: dst.clone(), src: rename_operand(value, &suffix) });
                }
                out.push(TacInstruction::Goto { target: join_label.clone() });
            }
            _ => out.push(rename_instruction(instruction, &suffix)),
        }
    }

    out.push(TacInstruction::Label { name: join_label });
}

fn rename_operand(operand: &TacOperand, suffix: &str) -> TacOperand {
    match operand {
        TacOperand::Variable(name) => TacOperand::Variable(format!("{name}{suffix}")),
        TacOperand::Temp(name) => TacOperand::Temp(format!("{name}{suffix}")),
        TacOperand::Constant(_) | TacOperand::Label(_) => operand.clone(),
    }
}

fn rename_instruction(instruction: &TacInstruction, suffix: &str) -> TacInstruction {
    match instruction {
        TacInstruction::Binary { op, dst, lhs, rhs } => TacInstruction::Binary {
            op: *op,
            dst: rename_operand(dst, suffix),
            lhs: rename_operand(lhs, suffix),
            rhs: rename_operand(rhs, suffix),
        },
        TacInstruction::Unary { op, dst, src } => TacInstruction::Unary {
            op: *op,
            dst: rename_operand(dst, suffix),
            src: rename_operand(src, suffix),
        },
        TacInstruction::Copy { dst, src } => {
            TacInstruction::Copy { dst: rename_operand(dst, suffix), src: rename_operand(src, suffix) }
        }
        TacInstruction::Goto { target } => TacInstruction::Goto { target: format!("{target}{suffix}") },
        TacInstruction::IfTrueGoto { condition, target } => TacInstruction::IfTrueGoto {
            condition: rename_operand(condition, suffix),
            target: format!("{target}{suffix}"),
        },
        TacInstruction::Param { value } => TacInstruction::Param { value: rename_operand(value, suffix) },
        TacInstruction::Call { dst, callee, arg_count } => TacInstruction::Call {
            dst: dst.as_ref().map(|d| rename_operand(d, suffix)),
            callee: callee.clone(),
            arg_count: *arg_count,
        },
        TacInstruction::Label { name } => TacInstruction::Label { name: format!("{name}{suffix}") },
        TacInstruction::Return { .. }
        | TacInstruction::FunctionBegin { .. }
        | TacInstruction::FunctionEnd { .. } => instruction.clone(),
    }
}
