// Copyright 2025-2026 Neil Henderson
//
//! The `return_paths` module checks that every control-flow path through a function body returns.

use crate::parser::{AstStatement, AstStatementKind};

/// Does every control-flow path through the function body end in a return statement?
///
/// This is a conservative structural check, not a dataflow analysis. A block returns when its
/// last statement returns; an `if` returns when both arms return; a `while` never counts as
/// returning, even one whose condition is a non-zero constant.
pub fn all_paths_return(body: &[AstStatement]) -> bool {
    body.last().is_some_and(statement_returns)
}

fn statement_returns(statement: &AstStatement) -> bool {
    match &statement.kind {
        AstStatementKind::Return(_) => true,

        AstStatementKind::Compound(statements) => all_paths_return(statements),

        AstStatementKind::If { then_stmt, else_stmt, .. } => match else_stmt {
            Some(else_stmt) => statement_returns(then_stmt) && statement_returns(else_stmt),
            None => false,
        },

        AstStatementKind::Null
        | AstStatementKind::Expression(_)
        | AstStatementKind::VarDecl { .. }
        | AstStatementKind::Assign { .. }
        | AstStatementKind::While { .. }
        | AstStatementKind::Break
        | AstStatementKind::Continue => false,
    }
}
