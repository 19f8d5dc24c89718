// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `lexer` module handles the lexical analysis of the source code and then
//! passes the results (a vector of tokens) to the parser.

mod tokens;


use crate::compiler_driver;
use crate::compiler_driver::DriverError;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::core::SourceLocation;
use crate::parser;

pub use tokens::{KEYWORDS, Token, TokenType, is_keyword};

/// Performs lexical analysis of the source text and generates a stream of tokens, and then passes
/// ownership of the token stream to the parser stage.
pub fn lex(driver: &mut compiler_driver::Driver, source: &str) -> Result<(), DriverError> {
    let tokens = lex_source(driver, source);

    tracing::debug!(tokens = tokens.len(), "lexer finished");

    // Don't proceed to the next stage if we've emitted errors, or if the user only wants to run the lexer.
    if driver.has_error_diagnostics() || driver.options().lex {
        return Ok(());
    }

    parser::parse(driver, tokens);

    Ok(())
}

/// Performs lexical analysis on the given source text and returns the tokens.
pub fn lex_source(driver: &mut compiler_driver::Driver, source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next_token() {
        match result {
            Ok(token) => tokens.push(token),
            Err(LexError { message, location }) => {
                driver.add_diagnostic(Diagnostic::syntax_error(message, location));
            }
        }
    }

    tokens
}

/// An error produced while scanning the source text.
struct LexError {
    message: String,
    location: SourceLocation,
}

/// The lexer scans the source text one character at a time, tracking the 1-based line and column.
struct Lexer<'src> {
    chars: std::iter::Peekable<std::str::Chars<'src>>,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self { chars: source.chars().peekable(), line: 1, column: 1 }
    }

    /// Returns the next token, or `None` at the end of the source text.
    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_whitespace_and_comments()?;

        let location = SourceLocation::new(self.line, self.column);
        let ch = self.advance()?;

        let token_type = match ch {
            '(' => TokenType::OpenParen,
            ')' => TokenType::CloseParen,
            '{' => TokenType::OpenBrace,
            '}' => TokenType::CloseBrace,
            ';' => TokenType::Semicolon,
            ',' => TokenType::Comma,
            '+' => TokenType::Plus,
            '-' => TokenType::Minus,
            '*' => TokenType::Multiply,
            '/' => TokenType::Divide,
            '%' => TokenType::Remainder,

            '=' => {
                if self.advance_if('=') { TokenType::EqualTo } else { TokenType::Assignment }
            }
            '!' => {
                if self.advance_if('=') { TokenType::NotEqualTo } else { TokenType::LogicalNot }
            }
            '<' => {
                if self.advance_if('=') { TokenType::LessThanOrEqualTo } else { TokenType::LessThan }
            }
            '>' => {
                if self.advance_if('=') { TokenType::GreaterThanOrEqualTo } else { TokenType::GreaterThan }
            }

            '&' => {
                if self.advance_if('&') {
                    TokenType::LogicalAnd
                } else {
                    return Some(Err(LexError { message: "Expected '&&'".to_string(), location }));
                }
            }
            '|' => {
                if self.advance_if('|') {
                    TokenType::LogicalOr
                } else {
                    return Some(Err(LexError { message: "Expected '||'".to_string(), location }));
                }
            }

            c if c.is_ascii_digit() => return Some(self.lex_integer_literal(c, location)),

            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut identifier = String::new();
                identifier.push(c);
                while let Some(&next) = self.chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        identifier.push(next);
                        self.advance();
                    } else {
                        break;
                    }
                }
                TokenType::Identifier(identifier)
            }

            c => {
                return Some(Err(LexError { message: format!("Unexpected character '{c}'"), location }));
            }
        };

        Some(Ok(Token::new(token_type, location)))
    }

    /// Scans a decimal integer literal. The first digit has already been consumed.
    fn lex_integer_literal(&mut self, first: char, location: SourceLocation) -> Result<Token, LexError> {
        let mut literal = String::new();
        literal.push(first);

        while let Some(&next) = self.chars.peek() {
            if next.is_ascii_digit() {
                literal.push(next);
                self.advance();
            } else {
                break;
            }
        }

        // An identifier may not start immediately after a literal, e.g. '123abc'.
        if let Some(&next) = self.chars.peek()
            && (next.is_ascii_alphabetic() || next == '_')
        {
            return Err(LexError { message: format!("Invalid integer literal '{literal}{next}...'"), location });
        }

        // The literal is non-negative in the syntax. Values up to 2^32-1 are accepted and wrap into
        // `i32` so that '-2147483648' (unary minus applied to 2147483648) evaluates correctly.
        let Ok(wide) = literal.parse::<u32>() else {
            return Err(LexError { message: format!("Integer literal '{literal}' is too large"), location });
        };
        let value = wide as i32;

        Ok(Token::new(TokenType::IntegerLiteral { literal, value }, location))
    }

    /// Skips over whitespace, `// line` comments and `/* block */` comments.
    ///
    /// Returns `None` when the end of the source text is reached. An unterminated block comment
    /// also returns `None`; the parser reports the resulting premature end of input.
    fn skip_whitespace_and_comments(&mut self) -> Option<()> {
        loop {
            let &ch = self.chars.peek()?;

            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            if ch == '/' {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                match lookahead.peek() {
                    Some('/') => {
                        while let Some(&c) = self.chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                        continue;
                    }
                    Some('*') => {
                        self.advance(); // '/'
                        self.advance(); // '*'
                        let mut previous = ' ';
                        loop {
                            let c = self.advance()?;
                            if previous == '*' && c == '/' {
                                break;
                            }
                            previous = c;
                        }
                        continue;
                    }
                    _ => return Some(()),
                }
            }

            return Some(());
        }
    }

    /// Consumes the next character, updating the line and column counters.
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes the next character only if it matches `expected`.
    fn advance_if(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}
