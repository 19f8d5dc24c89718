// Copyright 2025-2026 Neil Henderson
//
//! The `args` module defines the command-line argument parser.
//! Although crates like `clap` are excellent, we have a design goal to minimize dependencies on third-party crates
//! and so ToyC uses a custom argument parser.

use std::iter::Peekable;
use std::str::FromStr;

use crate::codegen::RegAllocStrategy;

use super::{DriverOptions, WarningKind};

/// The result of parsing the command-line arguments.
pub enum ParsedArgs {
    /// Run the compiler on the given source file (or stdin when `None`).
    Run(Option<String>, DriverOptions),

    /// Help or version information was printed; exit successfully.
    Exit,

    /// The arguments were invalid; an error has been printed to stderr.
    Invalid,
}

/// The command-line argument parser.
pub struct Parser {
    tokens: Peekable<std::vec::IntoIter<String>>,
    options: DriverOptions,
    source_file: Option<String>,
}

impl Parser {
    /// Parses the process command-line arguments into the compiler driver options.
    pub fn parse_command_line_args() -> ParsedArgs {
        let mut args = std::env::args().collect::<Vec<String>>();
        if !args.is_empty() {
            args.remove(0); // Skip program name
        }
        Self::parse_args(args)
    }

    /// Parses the given arguments (without the program name) into the compiler driver options.
    pub fn parse_args(args: Vec<String>) -> ParsedArgs {
        let mut parser =
            Parser { tokens: args.into_iter().peekable(), options: DriverOptions::default(), source_file: None };

        while let Some(token) = parser.take_next() {
            match token.as_str() {
                "-h" | "--help" => {
                    print_help();
                    return ParsedArgs::Exit;
                }

                "-V" | "--version" => {
                    print_version();
                    return ParsedArgs::Exit;
                }

                "-opt" | "-O1" => parser.options.optimize = true,
                "-O0" => parser.options.optimize = false,

                "-mreg-alloc" => {
                    let Some(value) = parser.take_next() else {
                        eprintln!("error: '-mreg-alloc' requires a value: naive, linear-scan or graph-color");
                        return ParsedArgs::Invalid;
                    };
                    match RegAllocStrategy::from_str(&value) {
                        Ok(strategy) => parser.options.reg_alloc = strategy,
                        Err(_) => {
                            eprintln!("error: Unknown register allocation strategy '{value}'");
                            return ParsedArgs::Invalid;
                        }
                    }
                }

                "-o" => {
                    let Some(value) = parser.take_next() else {
                        eprintln!("error: '-o' requires an output filename");
                        return ParsedArgs::Invalid;
                    };
                    parser.options.output_file = Some(value);
                }

                "--lex" => parser.options.lex = true,
                "--parse" => parser.options.parse = true,
                "--validate" => parser.options.validate = true,
                "--print-ir" => parser.options.print_ir = true,

                "-W" => parser.options.warnings_enabled = true,
                "-Werror" => parser.options.warnings_as_errors = true,
                "-w" => parser.options.warnings_enabled = false,

                other if other.starts_with("-Wno-") => {
                    let name = &other["-Wno-".len()..];
                    match WarningKind::from_str(name) {
                        Ok(kind) => {
                            parser.options.disabled_warnings.insert(kind);
                        }
                        Err(_) => {
                            eprintln!("error: Unknown warning '{name}'. Known warnings:");
                            for known in WarningKind::all_strings() {
                                eprintln!("    {known}");
                            }
                            return ParsedArgs::Invalid;
                        }
                    }
                }

                other if other.starts_with('-') => {
                    eprintln!("error: Unknown option '{other}'");
                    return ParsedArgs::Invalid;
                }

                // Must be the positional source file argument
                _ => {
                    if parser.source_file.is_some() {
                        eprintln!("error: Only one source file may be specified");
                        return ParsedArgs::Invalid;
                    }
                    parser.source_file = Some(token);
                }
            }
        }

        ParsedArgs::Run(parser.source_file, parser.options)
    }

    /// Takes the next token from the stream and returns it.
    fn take_next(&mut self) -> Option<String> {
        self.tokens.next()
    }
}

fn print_help() {
    println!("ToyC compiler");
    println!();
    println!("Usage: toyc [options] [input_file]");
    println!();
    println!("Reads a ToyC program from input_file (or from stdin when omitted) and writes");
    println!("RV32 assembly to stdout. Diagnostics are written to stderr.");
    println!();
    println!("Options:");
    println!("    -opt, -O1              Enable the AST and IR optimizers (default off)");
    println!("    -O0                    Disable the optimizers");
    println!("    -mreg-alloc <strategy> Register allocation: naive, linear-scan, graph-color");
    println!("    -o <file>              Write assembly to <file> instead of stdout");
    println!("    --lex                  Run the lexer and stop");
    println!("    --parse                Run the lexer and parser and stop");
    println!("    --validate             Run up to semantic analysis and stop");
    println!("    --print-ir             Dump the IR to stderr and stop");
    println!("    -W                     Enable warnings (default)");
    println!("    -w                     Disable all warnings");
    println!("    -Wno-<warning>         Disable a specific warning");
    println!("    -Werror                Treat warnings as errors");
    println!("    -h, --help             Print this help");
    println!("    -V, --version          Print the compiler version");
}

fn print_version() {
    println!("toyc {}", env!("CARGO_PKG_VERSION"));
}
