// Copyright 2025-2026 Neil Henderson
//
//! The `abstract_syntax_tree` module defines the AST produced by the parser.

use std::fmt;

use crate::core::SourceLocation;

/// The ToyC data types. `Void` is only valid as a function return type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AstType {
    Int,
    Void,
}

impl fmt::Display for AstType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstType::Int => write!(f, "int"),
            AstType::Void => write!(f, "void"),
        }
    }
}

/// Unary operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AstUnaryOp {
    Plus,
    Negate,
    LogicalNot,
}

impl fmt::Display for AstUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstUnaryOp::Plus => write!(f, "+"),
            AstUnaryOp::Negate => write!(f, "-"),
            AstUnaryOp::LogicalNot => write!(f, "!"),
        }
    }
}

/// Binary operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AstBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    LessThan,
    GreaterThan,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
    EqualTo,
    NotEqualTo,
    LogicalAnd,
    LogicalOr,
}

impl fmt::Display for AstBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstBinaryOp::Add => write!(f, "+"),
            AstBinaryOp::Subtract => write!(f, "-"),
            AstBinaryOp::Multiply => write!(f, "*"),
            AstBinaryOp::Divide => write!(f, "/"),
            AstBinaryOp::Remainder => write!(f, "%"),
            AstBinaryOp::LessThan => write!(f, "<"),
            AstBinaryOp::GreaterThan => write!(f, ">"),
            AstBinaryOp::LessThanOrEqualTo => write!(f, "<="),
            AstBinaryOp::GreaterThanOrEqualTo => write!(f, ">="),
            AstBinaryOp::EqualTo => write!(f, "=="),
            AstBinaryOp::NotEqualTo => write!(f, "!="),
            AstBinaryOp::LogicalAnd => write!(f, "&&"),
            AstBinaryOp::LogicalOr => write!(f, "||"),
        }
    }
}

impl AstBinaryOp {
    /// Is this one of the six comparison operators?
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            AstBinaryOp::LessThan
                | AstBinaryOp::GreaterThan
                | AstBinaryOp::LessThanOrEqualTo
                | AstBinaryOp::GreaterThanOrEqualTo
                | AstBinaryOp::EqualTo
                | AstBinaryOp::NotEqualTo
        )
    }

    /// The comparison with the opposite truth value, e.g. `==` becomes `!=`.
    ///
    /// Returns `None` for non-comparison operators.
    pub fn negated_comparison(&self) -> Option<AstBinaryOp> {
        match self {
            AstBinaryOp::EqualTo => Some(AstBinaryOp::NotEqualTo),
            AstBinaryOp::NotEqualTo => Some(AstBinaryOp::EqualTo),
            AstBinaryOp::LessThan => Some(AstBinaryOp::GreaterThanOrEqualTo),
            AstBinaryOp::GreaterThan => Some(AstBinaryOp::LessThanOrEqualTo),
            AstBinaryOp::LessThanOrEqualTo => Some(AstBinaryOp::GreaterThan),
            AstBinaryOp::GreaterThanOrEqualTo => Some(AstBinaryOp::LessThan),
            _ => None,
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AstExpression {
    pub loc: SourceLocation,
    pub kind: AstExpressionKind,
}

/// The kind of expression, which may in fact be a subexpression inside a tree of a larger expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AstExpressionKind {
    IntegerLiteral(i32),
    Identifier(String),
    FunctionCall {
        callee: String,
        args: Vec<AstExpression>,
    },
    Unary {
        op: AstUnaryOp,
        operand: Box<AstExpression>,
    },
    Binary {
        op: AstBinaryOp,
        lhs: Box<AstExpression>,
        rhs: Box<AstExpression>,
    },
}

impl AstExpression {
    /// Creates a new expression with the given location and kind.
    pub fn new(loc: SourceLocation, kind: AstExpressionKind) -> Self {
        Self { loc, kind }
    }

    /// Creates an integer literal expression with no source location.
    ///
    /// The optimizer uses this when it folds an expression down to a constant.
    pub fn new_int_literal(value: i32) -> Self {
        Self { loc: SourceLocation::none(), kind: AstExpressionKind::IntegerLiteral(value) }
    }

    /// If the expression is an integer literal, returns its value.
    pub fn as_int_literal(&self) -> Option<i32> {
        match self.kind {
            AstExpressionKind::IntegerLiteral(value) => Some(value),
            _ => None,
        }
    }

    /// Is the expression an identifier with the given name?
    pub fn is_identifier_with_name(&self, name: &str) -> bool {
        matches!(&self.kind, AstExpressionKind::Identifier(id) if id == name)
    }

    /// Does the expression contain a function call anywhere in its tree?
    ///
    /// Calls are the only ToyC expressions with side effects, so this gates every rewrite that
    /// would duplicate, reorder or discard an operand.
    pub fn contains_call(&self) -> bool {
        match &self.kind {
            AstExpressionKind::IntegerLiteral(_) | AstExpressionKind::Identifier(_) => false,
            AstExpressionKind::FunctionCall { .. } => true,
            AstExpressionKind::Unary { operand, .. } => operand.contains_call(),
            AstExpressionKind::Binary { lhs, rhs, .. } => lhs.contains_call() || rhs.contains_call(),
        }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AstStatement {
    pub loc: SourceLocation,
    pub kind: AstStatementKind,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AstStatementKind {
    /// The null statement: a bare ';'.
    Null,
    Expression(AstExpression),
    Compound(Vec<AstStatement>),
    /// A local variable declaration. The initializer is mandatory in ToyC.
    VarDecl {
        name: String,
        init: AstExpression,
    },
    Assign {
        name: String,
        value: AstExpression,
    },
    If {
        condition: AstExpression,
        then_stmt: Box<AstStatement>,
        else_stmt: Option<Box<AstStatement>>,
    },
    While {
        condition: AstExpression,
        body: Box<AstStatement>,
    },
    Break,
    Continue,
    Return(Option<AstExpression>),
}

impl AstStatement {
    /// Creates a new statement with the given location and kind.
    pub fn new(loc: SourceLocation, kind: AstStatementKind) -> Self {
        Self { loc, kind }
    }

    /// Creates a null statement with no source location.
    pub fn new_null() -> Self {
        Self { loc: SourceLocation::none(), kind: AstStatementKind::Null }
    }
}

/// A function parameter. Every ToyC parameter has type 'int'.
#[derive(Debug, Clone, PartialEq)]
pub struct AstParam {
    pub name: String,
    pub loc: SourceLocation,
}

/// A function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AstFunction {
    pub return_type: AstType,
    pub name: String,
    pub params: Vec<AstParam>,
    pub body: Vec<AstStatement>,
    pub loc: SourceLocation,
}

/// The root of the AST contains the translation unit's function definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct AstRoot(pub Vec<AstFunction>);
