// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `asm_writer` module collects the emitted assembly as lines of text.

/// Collects assembly output. Instructions and directives are indented with a tab; labels,
/// sections and comments sit flush left, matching the GNU assembler layout.
#[derive(Debug, Default)]
pub struct AsmWriter {
    lines: Vec<String>,
}

impl AsmWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one instruction.
    pub fn instruction(&mut self, text: String) {
        self.lines.push(format!("\t{text}"));
    }

    /// Emits a label definition.
    pub fn label(&mut self, name: &str) {
        self.lines.push(format!("{name}:"));
    }

    /// Emits an assembler directive such as `.global`.
    pub fn directive(&mut self, text: String) {
        self.lines.push(format!("\t{text}"));
    }

    /// Emits a section directive.
    pub fn section(&mut self, name: &str) {
        self.lines.push(name.to_string());
    }

    /// Emits a comment line.
    pub fn comment(&mut self, text: &str) {
        self.lines.push(format!("# {text}"));
    }

    /// Emits a blank separator line.
    pub fn blank_line(&mut self) {
        self.lines.push(String::new());
    }

    /// Consumes the writer and returns the collected lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
