// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The unary_ops module defines some helper functions for parsing unary operations.

use crate::ICE;
use crate::lexer;
use crate::parser::AstUnaryOp;

/// Is the token a prefix unary operator?
pub fn is_unary_operator(token_type: &lexer::TokenType) -> bool {
    matches!(token_type, lexer::TokenType::Plus | lexer::TokenType::Minus | lexer::TokenType::LogicalNot)
}

/// Parses a token and produces an AST unary operator.
pub fn parse_unary_operator(token_type: &lexer::TokenType) -> AstUnaryOp {
    match token_type {
        lexer::TokenType::Plus => AstUnaryOp::Plus,
        lexer::TokenType::Minus => AstUnaryOp::Negate,
        lexer::TokenType::LogicalNot => AstUnaryOp::LogicalNot,
        _ => ICE!("Parser: Token is not a unary operator"),
    }
}
