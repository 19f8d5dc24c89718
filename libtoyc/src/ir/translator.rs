// Copyright 2025-2026 Neil Henderson
//
//! The `translator` module defines the various functions to translate from the parser's AST into
//! ToyTac intermediate representation.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::ICE;
use crate::parser::{
    AstBinaryOp, AstExpression, AstExpressionKind, AstFunction, AstRoot, AstStatement, AstStatementKind, AstType,
    AstUnaryOp,
};
use crate::sema::SymbolTable;

use super::label_maker::LabelMaker;
use super::{TacBinaryOp, TacInstruction, TacOperand, TacProgram, TacUnaryOp};

/// Translates the AST into a ToyTac program.
///
/// After generation, functions unreachable from `main` through `Call` instructions are dropped.
pub fn generate(ast_root: &AstRoot, symbols: &SymbolTable) -> TacProgram {
    let mut translator = Translator {
        instructions: Vec::new(),
        scopes: Vec::new(),
        loop_labels: Vec::new(),
        maker: LabelMaker::new(),
        return_type: AstType::Int,
        symbols,
    };

    for function in &ast_root.0 {
        translator.function(function);
    }

    let program = TacProgram(translator.instructions);
    prune_unused_functions(program)
}

/// The translator manages state for translation from the AST to ToyTac IR.
struct Translator<'a> {
    instructions: Vec<TacInstruction>,

    // Scope stack mapping source names to their scope-mangled IR names.
    scopes: Vec<HashMap<String, String>>,

    // Innermost-last stack of (break target, continue target) pairs.
    loop_labels: Vec<(String, String)>,

    maker: LabelMaker,
    return_type: AstType,
    symbols: &'a SymbolTable,
}

impl Translator<'_> {
    fn emit(&mut self, instruction: TacInstruction) {
        self.instructions.push(instruction);
    }

    fn function(&mut self, function: &AstFunction) {
        self.return_type = function.return_type;
        self.scopes.clear();
        self.scopes.push(HashMap::new());

        let params: Vec<String> = function.params.iter().map(|p| self.define(&p.name)).collect();

        self.emit(TacInstruction::FunctionBegin {
            name: function.name.clone(),
            return_type: function.return_type,
            params,
        });

        for statement in &function.body {
            self.statement(statement);
        }

        // Safety net: the semantic analyzer already rejects an 'int' function that can fall off
        // the end, so the appended return only matters for 'void' functions and for keeping the
        // span well-formed.
        if !matches!(self.instructions.last(), Some(TacInstruction::Return { .. })) {
            let value = match function.return_type {
                AstType::Int => Some(TacOperand::Constant(0)),
                AstType::Void => None,
            };
            self.emit(TacInstruction::Return { value });
        }

        self.emit(TacInstruction::FunctionEnd { name: function.name.clone() });
        self.scopes.pop();
    }

    fn statement(&mut self, statement: &AstStatement) {
        match &statement.kind {
            AstStatementKind::Null => {}

            AstStatementKind::Expression(expression) => {
                self.expression(expression);
            }

            AstStatementKind::Compound(statements) => {
                self.scopes.push(HashMap::new());
                for statement in statements {
                    self.statement(statement);
                }
                self.scopes.pop();
            }

            AstStatementKind::VarDecl { name, init } => {
                let value = self.expression(init);
                let scoped = self.define(name);
                self.emit(TacInstruction::Copy { dst: TacOperand::Variable(scoped), src: value });
            }

            AstStatementKind::Assign { name, value } => {
                let value = self.expression(value);
                let scoped = self.resolve(name);
                self.emit(TacInstruction::Copy { dst: TacOperand::Variable(scoped), src: value });
            }

            AstStatementKind::If { condition, then_stmt, else_stmt } => {
                self.if_statement(condition, then_stmt, else_stmt.as_deref());
            }

            AstStatementKind::While { condition, body } => self.while_statement(condition, body),

            AstStatementKind::Break => {
                let Some((break_label, _)) = self.loop_labels.last().cloned() else {
                    ICE!("IR generator: 'break' outside of a loop survived semantic analysis");
                };
                self.emit(TacInstruction::Goto { target: break_label });
            }

            AstStatementKind::Continue => {
                let Some((_, continue_label)) = self.loop_labels.last().cloned() else {
                    ICE!("IR generator: 'continue' outside of a loop survived semantic analysis");
                };
                self.emit(TacInstruction::Goto { target: continue_label });
            }

            AstStatementKind::Return(value) => {
                let value = value.as_ref().map(|v| self.expression(v));
                self.emit(TacInstruction::Return { value });
            }
        }
    }

    fn if_statement(&mut self, condition: &AstExpression, then_stmt: &AstStatement, else_stmt: Option<&AstStatement>) {
        let condition = self.expression(condition);

        let then_label = self.maker.make_label();
        let end_label = self.maker.make_label();
        // Without an else clause the else label and the end label coincide.
        let else_label = match else_stmt {
            Some(_) => self.maker.make_label(),
            None => end_label.clone(),
        };

        self.emit(TacInstruction::IfTrueGoto { condition, target: then_label.clone() });
        self.emit(TacInstruction::Goto { target: else_label.clone() });

        self.emit(TacInstruction::Label { name: then_label });
        self.statement(then_stmt);

        if let Some(else_stmt) = else_stmt {
            self.emit(TacInstruction::Goto { target: end_label.clone() });
            self.emit(TacInstruction::Label { name: else_label });
            self.statement(else_stmt);
        }

        self.emit(TacInstruction::Label { name: end_label });
    }

    fn while_statement(&mut self, condition: &AstExpression, body: &AstStatement) {
        let head_label = self.maker.make_label();
        let body_label = self.maker.make_label();
        let end_label = self.maker.make_label();

        self.emit(TacInstruction::Label { name: head_label.clone() });
        let condition = self.expression(condition);
        self.emit(TacInstruction::IfTrueGoto { condition, target: body_label.clone() });
        self.emit(TacInstruction::Goto { target: end_label.clone() });

        self.emit(TacInstruction::Label { name: body_label });
        self.loop_labels.push((end_label.clone(), head_label.clone()));
        self.statement(body);
        self.loop_labels.pop();

        self.emit(TacInstruction::Goto { target: head_label });
        self.emit(TacInstruction::Label { name: end_label });
    }

    /// Translates an expression and returns the operand holding its value.
    fn expression(&mut self, expression: &AstExpression) -> TacOperand {
        match &expression.kind {
            AstExpressionKind::IntegerLiteral(value) => TacOperand::Constant(*value),

            AstExpressionKind::Identifier(name) => TacOperand::Variable(self.resolve(name)),

            AstExpressionKind::Unary { op, operand } => self.unary(*op, operand),

            AstExpressionKind::Binary { op, lhs, rhs } => match op {
                AstBinaryOp::LogicalAnd => self.short_circuit_and(lhs, rhs),
                AstBinaryOp::LogicalOr => self.short_circuit_or(lhs, rhs),
                _ => self.binary(*op, lhs, rhs),
            },

            AstExpressionKind::FunctionCall { callee, args } => self.call(callee, args),
        }
    }

    fn unary(&mut self, op: AstUnaryOp, operand: &AstExpression) -> TacOperand {
        let src = self.expression(operand);

        // '+x' forwards its operand with no instruction.
        let op = match op {
            AstUnaryOp::Plus => return src,
            AstUnaryOp::Negate => TacUnaryOp::Neg,
            AstUnaryOp::LogicalNot => TacUnaryOp::Not,
        };

        let dst = self.maker.make_temp();
        self.emit(TacInstruction::Unary { op, dst: dst.clone(), src });
        dst
    }

    fn binary(&mut self, op: AstBinaryOp, lhs: &AstExpression, rhs: &AstExpression) -> TacOperand {
        let lhs = self.expression(lhs);
        let rhs = self.expression(rhs);

        let op = match op {
            AstBinaryOp::Add => TacBinaryOp::Add,
            AstBinaryOp::Subtract => TacBinaryOp::Sub,
            AstBinaryOp::Multiply => TacBinaryOp::Mul,
            AstBinaryOp::Divide => TacBinaryOp::Div,
            AstBinaryOp::Remainder => TacBinaryOp::Rem,
            AstBinaryOp::LessThan => TacBinaryOp::Lt,
            AstBinaryOp::GreaterThan => TacBinaryOp::Gt,
            AstBinaryOp::LessThanOrEqualTo => TacBinaryOp::Le,
            AstBinaryOp::GreaterThanOrEqualTo => TacBinaryOp::Ge,
            AstBinaryOp::EqualTo => TacBinaryOp::Eq,
            AstBinaryOp::NotEqualTo => TacBinaryOp::Ne,
            AstBinaryOp::LogicalAnd | AstBinaryOp::LogicalOr => {
                ICE!("IR generator: logical operator reached non-short-circuit lowering")
            }
        };

        let dst = self.maker.make_temp();
        self.emit(TacInstruction::Binary { op, dst: dst.clone(), lhs, rhs });
        dst
    }

    /// Lowers `lhs && rhs`: the right operand is evaluated only when the left is non-zero, and
    /// the result is normalized to {0, 1}.
    fn short_circuit_and(&mut self, lhs: &AstExpression, rhs: &AstExpression) -> TacOperand {
        let result = self.maker.make_temp();
        let eval_rhs_label = self.maker.make_label();
        let end_label = self.maker.make_label();

        let left = self.expression(lhs);
        self.emit(TacInstruction::IfTrueGoto { condition: left, target: eval_rhs_label.clone() });
        self.emit(TacInstruction::Copy { dst: result.clone(), src: TacOperand::Constant(0) });
        self.emit(TacInstruction::Goto { target: end_label.clone() });

        self.emit(TacInstruction::Label { name: eval_rhs_label });
        let right = self.expression(rhs);
        self.emit(TacInstruction::Binary {
            op: TacBinaryOp::Ne,
            dst: result.clone(),
            lhs: right,
            rhs: TacOperand::Constant(0),
        });

        self.emit(TacInstruction::Label { name: end_label });
        result
    }

    /// Lowers `lhs || rhs`, the dual of [Translator::short_circuit_and].
    fn short_circuit_or(&mut self, lhs: &AstExpression, rhs: &AstExpression) -> TacOperand {
        let result = self.maker.make_temp();
        let true_label = self.maker.make_label();
        let end_label = self.maker.make_label();

        let left = self.expression(lhs);
        self.emit(TacInstruction::IfTrueGoto { condition: left, target: true_label.clone() });
        let right = self.expression(rhs);
        self.emit(TacInstruction::Binary {
            op: TacBinaryOp::Ne,
            dst: result.clone(),
            lhs: right,
            rhs: TacOperand::Constant(0),
        });
        self.emit(TacInstruction::Goto { target: end_label.clone() });

        self.emit(TacInstruction::Label { name: true_label });
        self.emit(TacInstruction::Copy { dst: result.clone(), src: TacOperand::Constant(1) });

        self.emit(TacInstruction::Label { name: end_label });
        result
    }

    fn call(&mut self, callee: &str, args: &[AstExpression]) -> TacOperand {
        // Arguments evaluate left to right before any Param is pushed, so that a nested call in
        // one argument cannot interleave with this call's own Param sequence.
        let values: Vec<TacOperand> = args.iter().map(|arg| self.expression(arg)).collect();

        for value in values {
            self.emit(TacInstruction::Param { value });
        }

        // A call produces a temp only when the callee returns a value; the semantic analyzer has
        // already rejected uses of a void call as an operand.
        let returns_value = match self.symbols.get_function(callee) {
            Some(function) => function.return_type == AstType::Int,
            None => true,
        };

        let dst = if returns_value { Some(self.maker.make_temp()) } else { None };

        self.emit(TacInstruction::Call { dst: dst.clone(), callee: callee.to_string(), arg_count: args.len() });

        dst.unwrap_or(TacOperand::Constant(0))
    }

    /// Binds a source name in the current scope and returns its mangled IR name.
    fn define(&mut self, name: &str) -> String {
        let depth = self.scopes.len();
        let scoped = format!("{name}_s{depth}");
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), scoped.clone());
        }
        scoped
    }

    /// Resolves a source name against the scope stack, innermost scope first.
    fn resolve(&mut self, name: &str) -> String {
        for scope in self.scopes.iter().rev() {
            if let Some(scoped) = scope.get(name) {
                return scoped.clone();
            }
        }
        ICE!("IR generator: name '{name}' survived semantic analysis unresolved");
    }
}

/// Drops the spans of functions unreachable from `main` through `Call` instructions.
pub(crate) fn prune_unused_functions(program: TacProgram) -> TacProgram {
    let spans = program.function_spans();

    // Call graph over the generated spans.
    let mut callees: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, range) in &spans {
        let direct: Vec<&str> = program.0[range.clone()]
            .iter()
            .filter_map(|instruction| match instruction {
                TacInstruction::Call { callee, .. } => Some(callee.as_str()),
                _ => None,
            })
            .collect();
        callees.insert(name.as_str(), direct);
    }

    // Reachability from main.
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::from(["main"]);
    while let Some(name) = queue.pop_front() {
        if !reachable.insert(name) {
            continue;
        }
        for callee in callees.get(name).into_iter().flatten() {
            queue.push_back(callee);
        }
    }

    let dropped = spans.iter().filter(|(name, _)| !reachable.contains(name.as_str())).count();
    if dropped > 0 {
        tracing::debug!(dropped, "pruned functions unreachable from main");
    }

    let mut kept = Vec::new();
    for (name, range) in &spans {
        if reachable.contains(name.as_str()) {
            kept.extend(program.0[range.clone()].iter().cloned());
        }
    }

    TacProgram(kept)
}
