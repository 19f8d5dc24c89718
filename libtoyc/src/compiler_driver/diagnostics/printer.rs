// Copyright 2025-2026 Neil Henderson
//
//! The `printer` module prints diagnostics to an output stream.

use std::io::Write;

use super::Diagnostic;

/// Prints diagnostics in the user-visible single-line format.
pub struct Printer<W: Write> {
    buffer: W,
}

impl<W: Write> Printer<W> {
    /// Creates a printer writing into the given buffer.
    pub fn new(buffer: W) -> Self {
        Self { buffer }
    }

    /// Prints all diagnostics, with any errors printed first before any warnings.
    ///
    /// Within each group the diagnostics are printed in the order they were recorded, which is
    /// source order for a single pass.
    pub fn print_diagnostics(&mut self, errors: &[Diagnostic], warnings: &[Diagnostic]) {
        for error in errors {
            _ = writeln!(self.buffer, "{}", error.render());
        }
        for warning in warnings {
            _ = writeln!(self.buffer, "{}", warning.render());
        }
    }
}
