// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `peephole` module cleans up the emitted assembly text, line by line.
//!
//! Three patterns run to a fixed point, so the pass is idempotent:
//! - `mv rX, rX` disappears;
//! - `li rT, 0` followed by `beq`/`bne` against `rT` fuses into `beqz`/`bnez`;
//! - a load that immediately re-reads the slot just stored into the same register disappears.

/// Applies the peephole patterns to the emitted lines until nothing changes.
pub fn run(lines: &mut Vec<String>) {
    loop {
        let mut changed = false;

        changed |= remove_redundant_moves(lines);
        changed |= fuse_zero_compares(lines);
        changed |= collapse_store_load_pairs(lines);

        if !changed {
            break;
        }
    }
}

/// Removes `mv rX, rX`.
fn remove_redundant_moves(lines: &mut Vec<String>) -> bool {
    let before = lines.len();

    lines.retain(|line| {
        let Some(("mv", operands)) = split_instruction(line) else {
            return true;
        };
        match operands.as_slice() {
            [dst, src] => dst != src,
            _ => true,
        }
    });

    lines.len() != before
}

/// Fuses `li rT, 0` + `beq rA, rT, L` into `beqz rA, L`, and the `bne`/`bnez` analog.
///
/// The loaded register must be one of the two compared; the surviving operand keeps its place.
fn fuse_zero_compares(lines: &mut Vec<String>) -> bool {
    let mut changed = false;
    let mut index = 0;

    while index + 1 < lines.len() {
        let fused = fuse_pair(&lines[index], &lines[index + 1]);

        if let Some(replacement) = fused {
            lines[index] = replacement;
            lines.remove(index + 1);
            changed = true;
        } else {
            index += 1;
        }
    }

    changed
}

fn fuse_pair(first: &str, second: &str) -> Option<String> {
    let ("li", li_operands) = split_instruction(first)? else {
        return None;
    };
    let [zero_reg, value] = li_operands.as_slice() else {
        return None;
    };
    if *value != "0" {
        return None;
    }

    let (branch, branch_operands) = split_instruction(second)?;
    let z_branch = match branch {
        "beq" => "beqz",
        "bne" => "bnez",
        _ => return None,
    };
    let [first_reg, second_reg, label] = branch_operands.as_slice() else {
        return None;
    };

    if second_reg == zero_reg {
        Some(format!("\t{z_branch} {first_reg}, {label}"))
    } else if first_reg == zero_reg {
        Some(format!("\t{z_branch} {second_reg}, {label}"))
    } else {
        None
    }
}

/// Collapses `sw rX, k(fp)` immediately followed by `lw rX, k(fp)` to the store alone: the value
/// is still in the register.
fn collapse_store_load_pairs(lines: &mut Vec<String>) -> bool {
    let mut changed = false;
    let mut index = 0;

    while index + 1 < lines.len() {
        let collapsible = matches!(
            (split_instruction(&lines[index]), split_instruction(&lines[index + 1])),
            (Some(("sw", store)), Some(("lw", load)))
                if store.len() == 2 && load.len() == 2
                    && store[0] == load[0]
                    && store[1] == load[1]
                    && store[1].ends_with("(fp)")
        );

        if collapsible {
            lines.remove(index + 1);
            changed = true;
        } else {
            index += 1;
        }
    }

    changed
}

/// Splits an instruction line into its mnemonic and comma-separated operands.
///
/// Returns `None` for labels, directives, comments and blank lines.
fn split_instruction(line: &str) -> Option<(&str, Vec<&str>)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('.') || trimmed.ends_with(':') {
        return None;
    }

    let (mnemonic, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((mnemonic, rest)) => (mnemonic, rest),
        None => (trimmed, ""),
    };

    let operands = rest.split(',').map(str::trim).filter(|operand| !operand.is_empty()).collect();
    Some((mnemonic, operands))
}
