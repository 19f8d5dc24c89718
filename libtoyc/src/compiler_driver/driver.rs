// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `driver` module defines `Driver`, which is the ToyC compiler driver type.

use std::collections::HashSet;
use std::io::{Read, Write};

use super::diagnostics::{Diagnostic, DiagnosticKind, ErrorKind, printer::Printer};
use super::options::DriverOptions;
use super::{DriverError, WarningKind};

use crate::ICE;

/// The ToyC compiler driver.
pub struct Driver {
    // The path to the source '.tc' file, or None to read the program from stdin.
    pub source_filename: Option<String>,

    // Options that control the driver.
    options: DriverOptions,

    // Diagnostics emitted by the compiler driver
    diagnostics_enabled: bool,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,

    // Rendered messages already reported, used to suppress duplicate diagnostics.
    reported: HashSet<String>,

    // The generated assembly, stored by the codegen stage.
    assembly: Option<String>,
}

impl Driver {
    /// Creates a new compiler driver configured to compile the given source file, or stdin when no
    /// file is given.
    pub fn new(source_filename: Option<&str>, options: DriverOptions) -> Self {
        Self {
            source_filename: source_filename.map(str::to_string),
            options,
            diagnostics_enabled: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            reported: HashSet::new(),
            assembly: None,
        }
    }

    /// Creates a new compiler driver for tests, with default options and no source filename.
    pub fn for_testing() -> Self {
        Self::new(None, DriverOptions::default())
    }

    /// Creates a new compiler driver for tests with the given options.
    pub fn for_testing_with_options(options: DriverOptions) -> Self {
        Self::new(None, options)
    }

    /// Runs the compiler pipeline: reads the source, compiles it, and writes the assembly to
    /// stdout or to the configured output file.
    pub fn run(&mut self) -> Result<(), DriverError> {
        let source = self.read_source()?;

        self.compile_source(&source)?;

        // Stage-stop options produce no assembly.
        if self.options.lex || self.options.parse || self.options.validate || self.options.print_ir {
            return Ok(());
        }

        let Some(assembly) = self.assembly.take() else {
            ICE!("Compilation succeeded but no assembly was generated");
        };

        match self.options.output_file.clone() {
            Some(filename) => {
                if let Err(e) = std::fs::write(&filename, assembly) {
                    eprintln!("Error: Cannot write '{filename}': {e}");
                    return Err(DriverError::IoFailed);
                }
            }
            None => {
                print!("{assembly}");
                _ = std::io::stdout().flush();
            }
        }

        Ok(())
    }

    /// Runs the compiler pipeline on the given source text without any file or stdout I/O.
    ///
    /// The assembly, if any, is available afterwards via [Driver::assembly].
    pub fn compile_source(&mut self, source: &str) -> Result<(), DriverError> {
        super::compile(self, source)
    }

    /// Reads the source program from the configured file, or from stdin.
    fn read_source(&mut self) -> Result<String, DriverError> {
        match &self.source_filename {
            Some(filename) => std::fs::read_to_string(filename).map_err(|e| {
                eprintln!("Error: Cannot open file {filename}: {e}");
                DriverError::IoFailed
            }),
            None => {
                let mut source = String::new();
                std::io::stdin().read_to_string(&mut source).map_err(|e| {
                    eprintln!("Error: Cannot read source from stdin: {e}");
                    DriverError::IoFailed
                })?;
                Ok(source)
            }
        }
    }

    /// The compiler driver's options.
    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Are diagnostics enabled?
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics_enabled
    }

    /// Sets whether diagnostics are enabled.
    pub fn set_diagnostics_enabled(&mut self, enabled: bool) {
        self.diagnostics_enabled = enabled;
    }

    /// Adds a diagnostic (error or warning).
    ///
    /// Duplicate diagnostics with an identical rendered message and location are suppressed.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics_enabled {
            return;
        }

        if !self.reported.insert(diagnostic.render()) {
            return;
        }

        match diagnostic.kind() {
            DiagnosticKind::Error(_) => self.errors.push(diagnostic),

            DiagnosticKind::Warning(warning_kind) => {
                if self.options.is_warning_enabled(warning_kind) {
                    if self.options.warnings_as_errors {
                        self.errors.push(diagnostic.convert_to_error());
                    } else {
                        self.warnings.push(diagnostic);
                    }
                }
            }
        }
    }

    /// Are there any error diagnostics?
    pub fn has_error_diagnostics(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Is there an error diagnostic of the given kind?
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind() == DiagnosticKind::Error(kind))
    }

    /// Is there a warning diagnostic of the given kind?
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind() == DiagnosticKind::Warning(kind))
    }

    /// The number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// The recorded error diagnostics.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// The recorded warning diagnostics.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Stores the generated assembly. Called by the codegen stage.
    pub fn set_assembly(&mut self, assembly: String) {
        self.assembly = Some(assembly);
    }

    /// The generated assembly, when the pipeline has run to completion.
    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    /// Prints all diagnostics to `stderr`, with any errors printed first before any warnings.
    pub fn print_diagnostics(&self) {
        self.print_diagnostics_to_buffer(std::io::stderr());
    }

    /// Prints all diagnostics to the given `buffer`, with any errors printed first before any warnings.
    ///
    /// You probably want `print_diagnostics` instead of this function, unless you deliberately want to print
    /// diagnostics into a buffer.
    pub fn print_diagnostics_to_buffer(&self, buffer: impl Write) {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return;
        }

        let mut printer = Printer::new(buffer);
        printer.print_diagnostics(&self.errors, &self.warnings);
    }
}
