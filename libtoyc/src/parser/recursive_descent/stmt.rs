// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `stmt` module defines the various parsing functions for ToyC statements.

use crate::compiler_driver::Driver;
use crate::lexer;
use crate::parser::expr;

use super::super::{AstExpression, AstStatement, AstStatementKind, ParseError, ParseResult, Parser, add_error};

/// Parses a statement.
///
/// ```markdown
/// <statement> ::= <null_stmt> | <block> | <var_decl> | <assign_stmt> | <if_stmt> | <while_stmt>
///               | <break_stmt> | <continue_stmt> | <return_stmt> | <expr_stmt>
/// ```
pub fn parse_statement(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstStatement> {
    let Some(token) = parser.token_stream.peek_next_token() else {
        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected statement but found end of input", loc);
        return Err(ParseError);
    };

    let loc = token.location;
    let token_type = token.token_type.clone();

    match &token_type {
        // Null statement
        lexer::TokenType::Semicolon => {
            parser.token_stream.take_token();
            Ok(AstStatement::new(loc, AstStatementKind::Null))
        }

        // Compound statement
        lexer::TokenType::OpenBrace => {
            let block = parse_block(parser, driver)?;
            Ok(AstStatement::new(loc, AstStatementKind::Compound(block)))
        }

        lexer::TokenType::Identifier(id) if lexer::is_keyword(id) => match id.as_str() {
            "int" => parse_var_decl_statement(parser, driver),
            "if" => parse_if_statement(parser, driver),
            "else" => {
                // 'else' is handled by `parse_if_statement`, so if we encounter one here
                // then it's an invalid clause without a parent 'if'.
                add_error(driver, "Mismatched 'else' clause", loc);
                parser.token_stream.take_token();
                Err(ParseError)
            }
            "while" => parse_while_statement(parser, driver),
            "break" => {
                parser.token_stream.take_token();
                expect_semicolon(parser, driver, "'break'")?;
                Ok(AstStatement::new(loc, AstStatementKind::Break))
            }
            "continue" => {
                parser.token_stream.take_token();
                expect_semicolon(parser, driver, "'continue'")?;
                Ok(AstStatement::new(loc, AstStatementKind::Continue))
            }
            "return" => parse_return_statement(parser, driver),
            other => {
                add_error(driver, &format!("Unexpected keyword '{other}'"), loc);
                Err(ParseError)
            }
        },

        // Assignment statement: an identifier followed by '='.
        lexer::TokenType::Identifier(_)
            if matches!(
                parser.token_stream.peek_second_token(),
                Some(t) if t.has_type(lexer::TokenType::Assignment)
            ) =>
        {
            parse_assign_statement(parser, driver)
        }

        // Expression statement
        _ => {
            let expression = expr::parse_expression(parser, driver)?;
            expect_semicolon(parser, driver, "expression")?;
            Ok(AstStatement::new(loc, AstStatementKind::Expression(expression)))
        }
    }
}

/// Parses a brace-enclosed block of statements.
///
/// A statement that fails to parse synchronizes to the next ';' or '}' so that the remaining
/// statements can still be parsed and diagnosed.
pub fn parse_block(parser: &mut Parser, driver: &mut Driver) -> ParseResult<Vec<AstStatement>> {
    if parser.token_stream.take_token_if_expected(lexer::TokenType::OpenBrace).is_none() {
        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected '{'", loc);
        return Err(ParseError);
    }

    let mut statements = Vec::new();

    loop {
        if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseBrace).is_some() {
            return Ok(statements);
        }

        if parser.token_stream.at_end() {
            let loc = parser.token_stream.current_location();
            add_error(driver, "Expected '}' before end of input", loc);
            return Err(ParseError);
        }

        match parse_statement(parser, driver) {
            Ok(statement) => statements.push(statement),
            Err(ParseError) => synchronize_to_statement(parser),
        }
    }
}

/// Parses a variable declaration: `int <identifier> = <expression> ;`.
///
/// The initializer is mandatory in ToyC.
fn parse_var_decl_statement(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstStatement> {
    let loc = parser.token_stream.current_location();
    parser.token_stream.take_token(); // 'int'

    let name = parse_declared_name(parser, driver)?;

    if parser.token_stream.take_token_if_expected(lexer::TokenType::Assignment).is_none() {
        let loc = parser.token_stream.current_location();
        add_error(driver, &format!("Variable '{name}' must be initialized when declared"), loc);
        return Err(ParseError);
    }

    let init = expr::parse_expression(parser, driver)?;
    expect_semicolon(parser, driver, "declaration")?;

    Ok(AstStatement::new(loc, AstStatementKind::VarDecl { name, init }))
}

/// Parses an assignment statement: `<identifier> = <expression> ;`.
fn parse_assign_statement(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstStatement> {
    let loc = parser.token_stream.current_location();
    let name = parse_declared_name(parser, driver)?;

    parser.token_stream.take_token(); // '='

    let value = expr::parse_expression(parser, driver)?;
    expect_semicolon(parser, driver, "assignment")?;

    Ok(AstStatement::new(loc, AstStatementKind::Assign { name, value }))
}

/// Parses an if statement with an optional else clause.
fn parse_if_statement(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstStatement> {
    let loc = parser.token_stream.current_location();
    parser.token_stream.take_token(); // 'if'

    let condition = parse_parenthesized_condition(parser, driver, "if")?;
    let then_stmt = Box::new(parse_statement(parser, driver)?);

    let mut else_stmt = None;
    if let Some(token) = parser.token_stream.peek_next_token()
        && token.has_type(lexer::TokenType::Identifier("else".to_string()))
    {
        parser.token_stream.take_token();
        else_stmt = Some(Box::new(parse_statement(parser, driver)?));
    }

    Ok(AstStatement::new(loc, AstStatementKind::If { condition, then_stmt, else_stmt }))
}

/// Parses a while statement.
fn parse_while_statement(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstStatement> {
    let loc = parser.token_stream.current_location();
    parser.token_stream.take_token(); // 'while'

    let condition = parse_parenthesized_condition(parser, driver, "while")?;
    let body = Box::new(parse_statement(parser, driver)?);

    Ok(AstStatement::new(loc, AstStatementKind::While { condition, body }))
}

/// Parses a return statement with an optional value.
fn parse_return_statement(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstStatement> {
    let loc = parser.token_stream.current_location();
    parser.token_stream.take_token(); // 'return'

    if parser.token_stream.take_token_if_expected(lexer::TokenType::Semicolon).is_some() {
        return Ok(AstStatement::new(loc, AstStatementKind::Return(None)));
    }

    let value = expr::parse_expression(parser, driver)?;
    expect_semicolon(parser, driver, "'return'")?;

    Ok(AstStatement::new(loc, AstStatementKind::Return(Some(value))))
}

/// Parses the `( <expression> )` condition of an if or while statement.
fn parse_parenthesized_condition(
    parser: &mut Parser,
    driver: &mut Driver,
    construct: &str,
) -> ParseResult<AstExpression> {
    if parser.token_stream.take_token_if_expected(lexer::TokenType::OpenParen).is_none() {
        let loc = parser.token_stream.current_location();
        add_error(driver, &format!("Expected '(' after '{construct}'"), loc);
        return Err(ParseError);
    }

    let condition = expr::parse_expression(parser, driver)?;

    if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseParen).is_none() {
        let loc = parser.token_stream.current_location();
        add_error(driver, &format!("Expected ')' after '{construct}' condition"), loc);
        return Err(ParseError);
    }

    Ok(condition)
}

/// Parses a non-keyword identifier naming a variable.
fn parse_declared_name(parser: &mut Parser, driver: &mut Driver) -> ParseResult<String> {
    let Some(token) = parser.token_stream.peek_next_token() else {
        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected identifier but found end of input", loc);
        return Err(ParseError);
    };

    let loc = token.location;
    let token_type = token.token_type.clone();

    match token_type {
        lexer::TokenType::Identifier(name) if !lexer::is_keyword(&name) => {
            parser.token_stream.take_token();
            Ok(name)
        }
        other => {
            add_error(driver, &format!("Expected identifier but found '{other}'"), loc);
            Err(ParseError)
        }
    }
}

/// Consumes the ';' terminating a statement, or emits an error.
fn expect_semicolon(parser: &mut Parser, driver: &mut Driver, after: &str) -> ParseResult<()> {
    if parser.token_stream.take_token_if_expected(lexer::TokenType::Semicolon).is_none() {
        let loc = parser.token_stream.current_location();
        add_error(driver, &format!("Expected ';' at end of {after}"), loc);
        return Err(ParseError);
    }
    Ok(())
}

/// Skips tokens up to and including the next ';', or stops before a '}' so the enclosing block
/// can close normally.
fn synchronize_to_statement(parser: &mut Parser) {
    while let Some(token) = parser.token_stream.peek_next_token() {
        match token.token_type {
            lexer::TokenType::Semicolon => {
                parser.token_stream.take_token();
                return;
            }
            lexer::TokenType::CloseBrace => return,
            _ => {
                parser.token_stream.take_token();
            }
        }
    }
}
