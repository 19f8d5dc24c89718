// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `printer` module prints a ToyTac program in a human-readable layout.

use std::io::Write;

use super::{TacInstruction, TacProgram};

/// Writes the program to the given stream, one instruction per line.
///
/// Labels and function delimiters sit flush left; other instructions are indented.
pub fn print(program: &TacProgram, out: &mut impl Write) {
    for instruction in &program.0 {
        let result = match instruction {
            TacInstruction::Label { .. }
            | TacInstruction::FunctionBegin { .. }
            | TacInstruction::FunctionEnd { .. } => writeln!(out, "{instruction}"),
            _ => writeln!(out, "    {instruction}"),
        };

        if result.is_err() {
            return;
        }
    }
}

/// Renders the program to a string. Used by tests and the `--print-ir` dump.
pub fn render(program: &TacProgram) -> String {
    let mut buffer = Vec::new();
    print(program, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}
