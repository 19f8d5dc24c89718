// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The tokens module defines the tokens that the lexer produces.

use crate::core::SourceLocation;

use std::fmt;

/// Types of tokens produced by lexical analysis.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenType {
    // Single character tokens
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Comma,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    Assignment,
    LogicalNot,
    LessThan,
    GreaterThan,

    // Multi-character tokens
    LogicalAnd,
    LogicalOr,
    EqualTo,
    NotEqualTo,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,

    // Identifiers (which may be keywords such as 'int' or 'while')
    Identifier(String),

    // Integer literals
    //      ToyC literals are decimal and non-negative in the syntax; a leading '-' is a unary operator.
    IntegerLiteral { literal: String, value: i32 },
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::OpenParen => write!(f, "("),
            TokenType::CloseParen => write!(f, ")"),
            TokenType::OpenBrace => write!(f, "{{"),
            TokenType::CloseBrace => write!(f, "}}"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Comma => write!(f, ","),
            TokenType::Plus => write!(f, "+"),
            TokenType::Minus => write!(f, "-"),
            TokenType::Multiply => write!(f, "*"),
            TokenType::Divide => write!(f, "/"),
            TokenType::Remainder => write!(f, "%"),
            TokenType::Assignment => write!(f, "="),
            TokenType::LogicalNot => write!(f, "!"),
            TokenType::LessThan => write!(f, "<"),
            TokenType::GreaterThan => write!(f, ">"),
            TokenType::LogicalAnd => write!(f, "&&"),
            TokenType::LogicalOr => write!(f, "||"),
            TokenType::EqualTo => write!(f, "=="),
            TokenType::NotEqualTo => write!(f, "!="),
            TokenType::LessThanOrEqualTo => write!(f, "<="),
            TokenType::GreaterThanOrEqualTo => write!(f, ">="),
            TokenType::Identifier(name) => write!(f, "{name}"),
            TokenType::IntegerLiteral { literal, .. } => write!(f, "{literal}"),
        }
    }
}

/// A token produced by lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub location: SourceLocation,
}

impl Token {
    /// Creates a new token.
    pub fn new(token_type: TokenType, location: SourceLocation) -> Self {
        Self { token_type, location }
    }

    /// Does the token have the given type?
    pub fn has_type(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

/// The ToyC reserved keywords.
pub const KEYWORDS: [&str; 8] = ["int", "void", "if", "else", "while", "break", "continue", "return"];

/// Is the given identifier a reserved keyword?
pub fn is_keyword(identifier: &str) -> bool {
    KEYWORDS.contains(&identifier)
}
