// Copyright 2025-2026 Neil Henderson
//
//! The `diagnostics` module defines errors and warnings emitted by the compiler driver.

pub mod printer;
pub mod warning_kind;

use crate::core::SourceLocation;

use self::warning_kind::WarningKind;

/// The kind of error diagnostic, per the compiler's error taxonomy.
///
/// The kind selects the printed prefix ("Syntax error", "Semantic error", ...) and lets tests
/// assert on the class of failure rather than on message text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    Syntax,
    UndefinedVariable,
    UndefinedFunction,
    RedefinedVariable,
    RedefinedFunction,
    RedefinedParameter,
    TypeMismatch,
    ArgumentCountMismatch,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    MissingReturn,
    VoidReturnWithValue,
    NonVoidReturnWithoutValue,
    DivisionByZero,
    NoMainFunction,
    InvalidMainSignature,
    /// A warning promoted by '-Werror'.
    PromotedWarning,
    Io,
}

impl ErrorKind {
    /// The printed prefix for this kind of error.
    pub fn prefix(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "Syntax error",
            ErrorKind::Io => "Error",
            _ => "Semantic error",
        }
    }
}

/// The kind of diagnostic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticKind {
    Error(ErrorKind),
    Warning(WarningKind),
}

/// A diagnostic emitted by the compiler.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    location: SourceLocation,
}

impl Diagnostic {
    /// Creates an error diagnostic with the given error message and no source location.
    pub fn error(kind: ErrorKind, message: String) -> Self {
        Self { kind: DiagnosticKind::Error(kind), message, location: SourceLocation::none() }
    }

    /// Creates an error diagnostic with the given error message and source code location.
    pub fn error_at_location(kind: ErrorKind, message: String, loc: SourceLocation) -> Self {
        Self { kind: DiagnosticKind::Error(kind), message, location: loc }
    }

    /// Creates a syntax error diagnostic at the given source code location.
    pub fn syntax_error(message: String, loc: SourceLocation) -> Self {
        Self::error_at_location(ErrorKind::Syntax, message, loc)
    }

    /// Creates a new warning diagnostic with the given message and source code location.
    pub fn warning_at_location(kind: WarningKind, message: String, loc: SourceLocation) -> Self {
        let message = format!("{message} [-W{kind}]");
        Self { kind: DiagnosticKind::Warning(kind), message, location: loc }
    }

    /// Consumes the diagnostic and returns an equivalent with its kind set to an error.
    ///
    /// Used when warnings are promoted to errors with '-Werror'.
    pub fn convert_to_error(self) -> Self {
        Self { kind: DiagnosticKind::Error(ErrorKind::PromotedWarning), ..self }
    }

    /// The kind of diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// The diagnostic message, without prefix or location.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source location the diagnostic points at.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Renders the diagnostic the way it is shown to the user.
    ///
    /// `<prefix>: <message> at line <l>, column <c>` with the location omitted when there is none.
    pub fn render(&self) -> String {
        let prefix = match self.kind {
            DiagnosticKind::Error(kind) => kind.prefix(),
            DiagnosticKind::Warning(_) => "Warning",
        };

        if self.location.is_some() {
            format!("{prefix}: {} at {}", self.message, self.location)
        } else {
            format!("{prefix}: {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_with_location() {
        let diag = Diagnostic::error_at_location(
            ErrorKind::UndefinedVariable,
            "Undefined variable: x".to_string(),
            SourceLocation::new(2, 5),
        );
        assert_eq!(diag.render(), "Semantic error: Undefined variable: x at line 2, column 5");
    }

    #[test]
    fn render_warning_carries_flag_name() {
        let diag = Diagnostic::warning_at_location(
            WarningKind::UnusedVariable,
            "Variable 'x' declared but never used".to_string(),
            SourceLocation::new(4, 9),
        );
        assert_eq!(
            diag.render(),
            "Warning: Variable 'x' declared but never used [-Wunused-variable] at line 4, column 9"
        );
    }

    #[test]
    fn render_without_location() {
        let diag = Diagnostic::error(ErrorKind::NoMainFunction, "Program must have a main function".to_string());
        assert_eq!(diag.render(), "Semantic error: Program must have a main function");
    }
}
