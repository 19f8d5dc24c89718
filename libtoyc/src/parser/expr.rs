// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `expr` module parses expressions with precedence climbing.

pub mod binary_ops;
pub mod unary_ops;

use crate::compiler_driver::Driver;
use crate::lexer;

use super::{AstExpression, AstExpressionKind, ParseError, ParseResult, Parser, add_error};

/// Parses a full expression (the lowest precedence level).
pub fn parse_expression(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstExpression> {
    parse_binary_expression(parser, driver, 0)
}

/// Parses a binary expression via precedence climbing.
///
/// All ToyC binary operators are left-associative, so the right-hand side is parsed at
/// `precedence + 1`.
fn parse_binary_expression(parser: &mut Parser, driver: &mut Driver, min_precedence: i32) -> ParseResult<AstExpression> {
    let mut lhs = parse_unary_expression(parser, driver)?;

    while let Some(token) = parser.token_stream.peek_next_token() {
        let token_type = token.token_type.clone();
        if !binary_ops::is_binary_operator(&token_type) {
            break;
        }

        let precedence = binary_ops::binary_operator_precedence(&token_type);
        if precedence < min_precedence {
            break;
        }

        let op_loc = token.location;
        parser.token_stream.take_token();

        let op = binary_ops::parse_binary_operator(&token_type);
        let rhs = parse_binary_expression(parser, driver, precedence + 1)?;

        lhs = AstExpression::new(op_loc, AstExpressionKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) });
    }

    Ok(lhs)
}

/// Parses a unary expression: zero or more prefix operators followed by a primary expression.
fn parse_unary_expression(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstExpression> {
    if let Some(token) = parser.token_stream.peek_next_token()
        && unary_ops::is_unary_operator(&token.token_type)
    {
        let op_loc = token.location;
        let token_type = token.token_type.clone();
        parser.token_stream.take_token();

        let op = unary_ops::parse_unary_operator(&token_type);
        let operand = parse_unary_expression(parser, driver)?;

        return Ok(AstExpression::new(op_loc, AstExpressionKind::Unary { op, operand: Box::new(operand) }));
    }

    parse_primary_expression(parser, driver)
}

/// Parses a primary expression: a literal, an identifier, a function call, or a parenthesized
/// expression.
fn parse_primary_expression(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstExpression> {
    let Some(token) = parser.token_stream.peek_next_token() else {
        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected expression but found end of input", loc);
        return Err(ParseError);
    };

    let loc = token.location;

    match token.token_type.clone() {
        lexer::TokenType::IntegerLiteral { value, .. } => {
            parser.token_stream.take_token();
            Ok(AstExpression::new(loc, AstExpressionKind::IntegerLiteral(value)))
        }

        lexer::TokenType::Identifier(name) => {
            if lexer::is_keyword(&name) {
                add_error(driver, &format!("Unexpected keyword '{name}' in expression"), loc);
                return Err(ParseError);
            }

            parser.token_stream.take_token();

            // An identifier followed by '(' is a function call.
            if parser.token_stream.next_token_has_type(lexer::TokenType::OpenParen) {
                let args = parse_call_arguments(parser, driver)?;
                return Ok(AstExpression::new(loc, AstExpressionKind::FunctionCall { callee: name, args }));
            }

            Ok(AstExpression::new(loc, AstExpressionKind::Identifier(name)))
        }

        lexer::TokenType::OpenParen => {
            parser.token_stream.take_token();
            let inner = parse_expression(parser, driver)?;

            if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseParen).is_none() {
                let loc = parser.token_stream.current_location();
                add_error(driver, "Expected ')' to close parenthesized expression", loc);
                return Err(ParseError);
            }

            Ok(inner)
        }

        other => {
            add_error(driver, &format!("Expected expression but found '{other}'"), loc);
            Err(ParseError)
        }
    }
}

/// Parses the parenthesized, comma-separated argument list of a function call.
///
/// The opening '(' has not been consumed yet.
fn parse_call_arguments(parser: &mut Parser, driver: &mut Driver) -> ParseResult<Vec<AstExpression>> {
    parser.token_stream.take_token(); // '('

    let mut args = Vec::new();

    if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseParen).is_some() {
        return Ok(args);
    }

    loop {
        args.push(parse_expression(parser, driver)?);

        if parser.token_stream.take_token_if_expected(lexer::TokenType::Comma).is_some() {
            continue;
        }

        if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseParen).is_some() {
            return Ok(args);
        }

        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected ',' or ')' in function call argument list", loc);
        return Err(ParseError);
    }
}
