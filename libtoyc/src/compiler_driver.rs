// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `compiler_driver` module defines the functions and types which orchestrate the different compilation stages.

pub mod args;
pub mod options;

pub mod diagnostics;
mod driver;

pub use diagnostics::warning_kind::WarningKind;
pub use diagnostics::{Diagnostic, DiagnosticKind, ErrorKind};
pub use driver::Driver;
pub use options::DriverOptions;

/// An error returned by the compiler driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The pipeline produced one or more error diagnostics.
    CompilerFailed,
    /// The source could not be read or the output could not be written.
    IoFailed,
}

/// Compiles the given source text into RV32 assembly.
///
/// This kicks off the compiler pipeline and each stage subsequently calls the next, or returns.
/// Diagnostics are recorded on the `Driver` itself, and not returned as errors in the `Result<>` type.
/// On success the assembly text is stored on the driver.
pub(crate) fn compile(driver: &mut Driver, source: &str) -> Result<(), DriverError> {
    crate::lexer::lex(driver, source)?;

    if driver.has_error_diagnostics() {
        return Err(DriverError::CompilerFailed);
    }

    Ok(())
}
