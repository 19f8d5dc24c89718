// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `token_stream` module provides a stateful [TokenStream] which allows the parent parser module to consume and
//! peek at tokens in the stream.

use crate::core::SourceLocation;
use crate::lexer;

/// A token stream is a list of tokens produced by the lexer which can be iterated over.
pub struct TokenStream {
    tokens: Vec<lexer::Token>,
    cursor: usize,
}

impl TokenStream {
    /// Creates a new token stream.
    pub fn new(tokens: Vec<lexer::Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Returns the next token in the stream and advances, or None if at the end of the stream.
    pub fn take_token(&mut self) -> Option<&lexer::Token> {
        if self.cursor >= self.tokens.len() {
            return None;
        }
        let token = Some(&self.tokens[self.cursor]);
        self.cursor += 1;
        token
    }

    /// Peeks at the next token in the stream and, if it has the expected type, returns the token
    /// and advances.
    /// Returns None if at the end of the stream.
    pub fn take_token_if_expected(&mut self, expected_type: lexer::TokenType) -> Option<&lexer::Token> {
        let peek_next_token = self.peek_next_token()?;

        if peek_next_token.token_type == expected_type { self.take_token() } else { None }
    }

    /// Peeks at the next token in the stream without advancing past it.
    pub fn peek_next_token(&self) -> Option<&lexer::Token> {
        if self.cursor >= self.tokens.len() {
            return None;
        }
        Some(&self.tokens[self.cursor])
    }

    /// Peeks at the token after the next one without advancing.
    pub fn peek_second_token(&self) -> Option<&lexer::Token> {
        self.tokens.get(self.cursor + 1)
    }

    /// Peeks at the next token in the stream and returns whether its type matches the given type.
    ///
    /// Returns false if the stream has no more tokens.
    pub fn next_token_has_type(&self, token_type: lexer::TokenType) -> bool {
        matches!(self.peek_next_token(), Some(token) if token.token_type == token_type)
    }

    /// Is the stream exhausted?
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// The source location of the next token, or of the last token when the stream is exhausted.
    ///
    /// Used to position "unexpected end of input" diagnostics.
    pub fn current_location(&self) -> SourceLocation {
        if let Some(token) = self.peek_next_token() {
            token.location
        } else {
            self.tokens.last().map_or(SourceLocation::none(), |t| t.location)
        }
    }
}
