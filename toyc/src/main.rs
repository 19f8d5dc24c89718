// Copyright 2025-2026 Neil Henderson

//! main entry point for the ToyC compiler executable.

use std::process::ExitCode;

use libtoyc::compiler_driver::args::{ParsedArgs, Parser};
use libtoyc::compiler_driver::{Driver, DriverError};

fn main() -> ExitCode {
    // Pass-level tracing goes to stderr, controlled by the TOYC_LOG environment variable
    // (e.g. TOYC_LOG=debug). Diagnostics and assembly output are unaffected.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TOYC_LOG"))
        .with_writer(std::io::stderr)
        .init();

    // Parse the command-line arguments into the compiler driver's options.
    let (source_file, driver_options) = match Parser::parse_command_line_args() {
        ParsedArgs::Run(source_file, driver_options) => (source_file, driver_options),
        ParsedArgs::Exit => return ExitCode::SUCCESS,
        ParsedArgs::Invalid => return ExitCode::FAILURE,
    };

    // Run the compiler driver's pipeline.
    let mut driver = Driver::new(source_file.as_deref(), driver_options);
    let driver_result = driver.run();

    // If any error diagnostics were emitted, print them and update our exit code.
    // Warnings are also printed but do not effect the exit code.
    match driver_result {
        Ok(()) => {
            debug_assert!(!driver.has_error_diagnostics());
            driver.print_diagnostics();
            ExitCode::SUCCESS
        }
        Err(DriverError::CompilerFailed) => {
            driver.print_diagnostics();
            ExitCode::FAILURE
        }
        Err(DriverError::IoFailed) => ExitCode::FAILURE,
    }
}
