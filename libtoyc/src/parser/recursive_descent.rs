// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `recursive_descent` module defines the parsing functions for the top-level translation unit
//! and function definitions.

mod stmt;

use crate::compiler_driver::Driver;
use crate::lexer;

use super::{AstFunction, AstParam, AstRoot, AstType, ParseError, ParseResult, Parser, add_error};

/// Parses the translation unit: a sequence of function definitions.
pub fn parse_translation_unit(parser: &mut Parser, driver: &mut Driver) -> AstRoot {
    let mut functions = Vec::new();

    while !parser.token_stream.at_end() {
        match parse_function_definition(parser, driver) {
            Ok(function) => functions.push(function),
            Err(ParseError) => synchronize_to_function(parser),
        }
    }

    AstRoot(functions)
}

/// Parses a function definition:
///
/// ```markdown
/// <func_def>   ::= ("int" | "void") <identifier> "(" <param_list>? ")" <block>
/// <param_list> ::= "int" <identifier> ("," "int" <identifier>)*
/// ```
fn parse_function_definition(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstFunction> {
    let return_type = parse_return_type(parser, driver)?;

    let (name, loc) = parse_identifier(parser, driver, "function name")?;

    if parser.token_stream.take_token_if_expected(lexer::TokenType::OpenParen).is_none() {
        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected '(' after function name", loc);
        return Err(ParseError);
    }

    let params = parse_parameter_list(parser, driver)?;

    let body = stmt::parse_block(parser, driver)?;

    Ok(AstFunction { return_type, name, params, body, loc })
}

/// Parses the 'int' or 'void' return type of a function definition.
fn parse_return_type(parser: &mut Parser, driver: &mut Driver) -> ParseResult<AstType> {
    let Some(token) = parser.token_stream.peek_next_token() else {
        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected function definition but found end of input", loc);
        return Err(ParseError);
    };

    let loc = token.location;
    let token_type = token.token_type.clone();

    match &token_type {
        lexer::TokenType::Identifier(id) if id == "int" => {
            parser.token_stream.take_token();
            Ok(AstType::Int)
        }
        lexer::TokenType::Identifier(id) if id == "void" => {
            parser.token_stream.take_token();
            Ok(AstType::Void)
        }
        other => {
            add_error(driver, &format!("Expected 'int' or 'void' return type but found '{other}'"), loc);
            Err(ParseError)
        }
    }
}

/// Parses the parameter list of a function definition. The opening '(' has been consumed.
fn parse_parameter_list(parser: &mut Parser, driver: &mut Driver) -> ParseResult<Vec<AstParam>> {
    let mut params = Vec::new();

    if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseParen).is_some() {
        return Ok(params);
    }

    loop {
        // Every ToyC parameter is declared as 'int <identifier>'.
        if parser.token_stream.take_token_if_expected(lexer::TokenType::Identifier("int".to_string())).is_none() {
            let loc = parser.token_stream.current_location();
            add_error(driver, "Expected 'int' parameter type", loc);
            return Err(ParseError);
        }

        let (name, loc) = parse_identifier(parser, driver, "parameter name")?;
        params.push(AstParam { name, loc });

        if parser.token_stream.take_token_if_expected(lexer::TokenType::Comma).is_some() {
            continue;
        }

        if parser.token_stream.take_token_if_expected(lexer::TokenType::CloseParen).is_some() {
            return Ok(params);
        }

        let loc = parser.token_stream.current_location();
        add_error(driver, "Expected ',' or ')' in parameter list", loc);
        return Err(ParseError);
    }
}

/// Parses a non-keyword identifier and returns its name and location.
fn parse_identifier(
    parser: &mut Parser,
    driver: &mut Driver,
    what: &str,
) -> ParseResult<(String, crate::core::SourceLocation)> {
    let Some(token) = parser.token_stream.peek_next_token() else {
        let loc = parser.token_stream.current_location();
        add_error(driver, &format!("Expected {what} but found end of input"), loc);
        return Err(ParseError);
    };

    let loc = token.location;
    let token_type = token.token_type.clone();

    match token_type {
        lexer::TokenType::Identifier(name) if !lexer::is_keyword(&name) => {
            parser.token_stream.take_token();
            Ok((name, loc))
        }
        other => {
            add_error(driver, &format!("Expected {what} but found '{other}'"), loc);
            Err(ParseError)
        }
    }
}

/// Skips tokens after a failed function definition so that parsing can resume at the next one.
///
/// The synchronization set is a 'int' or 'void' return type at the start of a plausible function
/// header. A closing brace is also consumed so that we don't re-enter the same broken body.
fn synchronize_to_function(parser: &mut Parser) {
    loop {
        let Some(token) = parser.token_stream.peek_next_token() else {
            return;
        };
        let token_type = token.token_type.clone();

        match &token_type {
            lexer::TokenType::Identifier(id) if (id == "int" || id == "void") && looks_like_function_header(parser) => {
                return;
            }
            lexer::TokenType::CloseBrace => {
                parser.token_stream.take_token();
                return;
            }
            _ => {
                parser.token_stream.take_token();
            }
        }
    }
}

/// Does the stream look like it is positioned at a function header ('int'/'void' then a name)?
fn looks_like_function_header(parser: &Parser) -> bool {
    matches!(
        parser.token_stream.peek_second_token(),
        Some(token) if matches!(&token.token_type, lexer::TokenType::Identifier(name) if !lexer::is_keyword(name))
    )
}
