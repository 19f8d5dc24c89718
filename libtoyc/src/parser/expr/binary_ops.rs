// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The binary_ops module defines some helper functions for parsing binary operations.

use crate::ICE;
use crate::lexer;
use crate::parser::AstBinaryOp;

/// Is the token a binary operator?
#[rustfmt::skip]
pub fn is_binary_operator(token_type: &lexer::TokenType) -> bool {
    matches!(token_type,
        lexer::TokenType::Plus                    |
        lexer::TokenType::Minus                   |
        lexer::TokenType::Multiply                |
        lexer::TokenType::Divide                  |
        lexer::TokenType::Remainder               |
        lexer::TokenType::LogicalAnd              |
        lexer::TokenType::LogicalOr               |
        lexer::TokenType::EqualTo                 |
        lexer::TokenType::NotEqualTo              |
        lexer::TokenType::LessThan                |
        lexer::TokenType::GreaterThan             |
        lexer::TokenType::LessThanOrEqualTo       |
        lexer::TokenType::GreaterThanOrEqualTo
    )
}

/// Parses a token and produces an AST binary operator.
#[rustfmt::skip]
pub fn parse_binary_operator(token_type: &lexer::TokenType) -> AstBinaryOp {
    match token_type {
        lexer::TokenType::Plus                   => AstBinaryOp::Add,
        lexer::TokenType::Minus                  => AstBinaryOp::Subtract,
        lexer::TokenType::Multiply               => AstBinaryOp::Multiply,
        lexer::TokenType::Divide                 => AstBinaryOp::Divide,
        lexer::TokenType::Remainder              => AstBinaryOp::Remainder,
        lexer::TokenType::LogicalAnd             => AstBinaryOp::LogicalAnd,
        lexer::TokenType::LogicalOr              => AstBinaryOp::LogicalOr,
        lexer::TokenType::EqualTo                => AstBinaryOp::EqualTo,
        lexer::TokenType::NotEqualTo             => AstBinaryOp::NotEqualTo,
        lexer::TokenType::LessThan               => AstBinaryOp::LessThan,
        lexer::TokenType::GreaterThan            => AstBinaryOp::GreaterThan,
        lexer::TokenType::LessThanOrEqualTo      => AstBinaryOp::LessThanOrEqualTo,
        lexer::TokenType::GreaterThanOrEqualTo   => AstBinaryOp::GreaterThanOrEqualTo,
        _ => { ICE!("Parser: Token is not a binary operator") },
    }
}

/// Returns the precedence integer value for the given binary operator.
#[rustfmt::skip]
pub fn binary_operator_precedence(token_type: &lexer::TokenType) -> i32 {
    match token_type {
        lexer::TokenType::Multiply              => 60,
        lexer::TokenType::Divide                => 60,
        lexer::TokenType::Remainder             => 60,

        lexer::TokenType::Plus                  => 50,
        lexer::TokenType::Minus                 => 50,

        lexer::TokenType::LessThan              => 40,
        lexer::TokenType::LessThanOrEqualTo     => 40,
        lexer::TokenType::GreaterThan           => 40,
        lexer::TokenType::GreaterThanOrEqualTo  => 40,

        lexer::TokenType::EqualTo               => 30,
        lexer::TokenType::NotEqualTo            => 30,

        lexer::TokenType::LogicalAnd            => 20,
        lexer::TokenType::LogicalOr             => 10,

        _ => { ICE!("Parser: Token has no binary operator precedence") },
    }
}
