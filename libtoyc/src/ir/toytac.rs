// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `toytac` module defines the types in the "ToyTac" three-address intermediate
//! representation.

use std::fmt;
use std::ops::Range;

use crate::parser::AstType;

/// An operand of a ToyTac instruction.
///
/// Operands are small values and are cheap to copy. Temps are fresh names `%t0, %t1, ...`;
/// labels are fresh `L0, L1, ...`; variables keep their source names augmented with a `_s<depth>`
/// scope suffix to disambiguate shadowing in the flat IR namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TacOperand {
    Constant(i32),
    Variable(String),
    Temp(String),
    Label(String),
}

impl fmt::Display for TacOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacOperand::Constant(value) => write!(f, "{value}"),
            TacOperand::Variable(name) => write!(f, "{name}"),
            TacOperand::Temp(name) => write!(f, "{name}"),
            TacOperand::Label(name) => write!(f, "{name}"),
        }
    }
}

impl TacOperand {
    /// The storage name of a `Variable` or `Temp` operand, or `None` for constants and labels.
    pub fn name(&self) -> Option<&str> {
        match self {
            TacOperand::Variable(name) | TacOperand::Temp(name) => Some(name),
            TacOperand::Constant(_) | TacOperand::Label(_) => None,
        }
    }

    /// The value of a `Constant` operand.
    pub fn as_constant(&self) -> Option<i32> {
        match self {
            TacOperand::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Is this operand a temp?
    pub fn is_temp(&self) -> bool {
        matches!(self, TacOperand::Temp(_))
    }
}

/// Binary operator.
///
/// `And`/`Or` remain in the opcode set after short-circuit lowering: the translator never emits
/// them, but the optimizer and code generator accept them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TacBinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl TacBinaryOp {
    /// The printable mnemonic. The map is total; every opcode has a distinct string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TacBinaryOp::Add => "add",
            TacBinaryOp::Sub => "sub",
            TacBinaryOp::Mul => "mul",
            TacBinaryOp::Div => "div",
            TacBinaryOp::Rem => "rem",
            TacBinaryOp::Lt => "lt",
            TacBinaryOp::Gt => "gt",
            TacBinaryOp::Le => "le",
            TacBinaryOp::Ge => "ge",
            TacBinaryOp::Eq => "eq",
            TacBinaryOp::Ne => "ne",
            TacBinaryOp::And => "and",
            TacBinaryOp::Or => "or",
        }
    }

    /// Is this operator commutative? Used to normalize operands for value numbering.
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            TacBinaryOp::Add
                | TacBinaryOp::Mul
                | TacBinaryOp::Eq
                | TacBinaryOp::Ne
                | TacBinaryOp::And
                | TacBinaryOp::Or
        )
    }

    /// Evaluates the operator over constants with two's-complement wraparound.
    ///
    /// Returns `None` for a division or remainder by zero, which must stay in the program.
    pub fn evaluate(&self, left: i32, right: i32) -> Option<i32> {
        let result = match self {
            TacBinaryOp::Add => left.wrapping_add(right),
            TacBinaryOp::Sub => left.wrapping_sub(right),
            TacBinaryOp::Mul => left.wrapping_mul(right),
            TacBinaryOp::Div => {
                if right == 0 {
                    return None;
                }
                left.wrapping_div(right)
            }
            TacBinaryOp::Rem => {
                if right == 0 {
                    return None;
                }
                left.wrapping_rem(right)
            }
            TacBinaryOp::Lt => (left < right) as i32,
            TacBinaryOp::Gt => (left > right) as i32,
            TacBinaryOp::Le => (left <= right) as i32,
            TacBinaryOp::Ge => (left >= right) as i32,
            TacBinaryOp::Eq => (left == right) as i32,
            TacBinaryOp::Ne => (left != right) as i32,
            TacBinaryOp::And => (left != 0 && right != 0) as i32,
            TacBinaryOp::Or => (left != 0 || right != 0) as i32,
        };
        Some(result)
    }
}

impl fmt::Display for TacBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unary operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TacUnaryOp {
    Neg,
    Not,
}

impl TacUnaryOp {
    /// The printable mnemonic.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TacUnaryOp::Neg => "neg",
            TacUnaryOp::Not => "not",
        }
    }

    /// Evaluates the operator over a constant.
    pub fn evaluate(&self, value: i32) -> i32 {
        match self {
            TacUnaryOp::Neg => value.wrapping_neg(),
            TacUnaryOp::Not => (value == 0) as i32,
        }
    }
}

impl fmt::Display for TacUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ToyTac instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TacInstruction {
    Binary {
        op: TacBinaryOp,
        dst: TacOperand,
        lhs: TacOperand,
        rhs: TacOperand,
    },
    Unary {
        op: TacUnaryOp,
        dst: TacOperand,
        src: TacOperand,
    },
    Copy {
        dst: TacOperand,
        src: TacOperand,
    },
    Goto {
        target: String,
    },
    IfTrueGoto {
        condition: TacOperand,
        target: String,
    },
    /// Pushes one argument for the next `Call`. A `Call` with `arg_count` n is preceded by
    /// exactly n consecutive `Param`s with no intervening control transfer.
    Param {
        value: TacOperand,
    },
    Call {
        dst: Option<TacOperand>,
        callee: String,
        arg_count: usize,
    },
    Return {
        value: Option<TacOperand>,
    },
    Label {
        name: String,
    },
    FunctionBegin {
        name: String,
        return_type: AstType,
        params: Vec<String>,
    },
    FunctionEnd {
        name: String,
    },
}

impl fmt::Display for TacInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacInstruction::Binary { op, dst, lhs, rhs } => write!(f, "{dst} = {op} {lhs}, {rhs}"),
            TacInstruction::Unary { op, dst, src } => write!(f, "{dst} = {op} {src}"),
            TacInstruction::Copy { dst, src } => write!(f, "{dst} = {src}"),
            TacInstruction::Goto { target } => write!(f, "goto {target}"),
            TacInstruction::IfTrueGoto { condition, target } => write!(f, "if {condition} goto {target}"),
            TacInstruction::Param { value } => write!(f, "param {value}"),
            TacInstruction::Call { dst: Some(dst), callee, arg_count } => {
                write!(f, "{dst} = call {callee}, {arg_count}")
            }
            TacInstruction::Call { dst: None, callee, arg_count } => write!(f, "call {callee}, {arg_count}"),
            TacInstruction::Return { value: Some(value) } => write!(f, "return {value}"),
            TacInstruction::Return { value: None } => write!(f, "return"),
            TacInstruction::Label { name } => write!(f, "{name}:"),
            TacInstruction::FunctionBegin { name, return_type, params } => {
                write!(f, "begin {return_type} {name}({})", params.join(", "))
            }
            TacInstruction::FunctionEnd { name } => write!(f, "end {name}"),
        }
    }
}

impl TacInstruction {
    /// The storage names this instruction defines.
    pub fn defined_names(&self) -> Vec<&str> {
        match self {
            TacInstruction::Binary { dst, .. }
            | TacInstruction::Unary { dst, .. }
            | TacInstruction::Copy { dst, .. } => dst.name().into_iter().collect(),
            TacInstruction::Call { dst: Some(dst), .. } => dst.name().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// The storage names this instruction reads.
    pub fn used_names(&self) -> Vec<&str> {
        match self {
            TacInstruction::Binary { lhs, rhs, .. } => lhs.name().into_iter().chain(rhs.name()).collect(),
            TacInstruction::Unary { src, .. } => src.name().into_iter().collect(),
            TacInstruction::Copy { src, .. } => src.name().into_iter().collect(),
            TacInstruction::IfTrueGoto { condition, .. } => condition.name().into_iter().collect(),
            TacInstruction::Param { value } => value.name().into_iter().collect(),
            TacInstruction::Return { value: Some(value) } => value.name().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Does this instruction unconditionally transfer control away?
    pub fn is_control_transfer(&self) -> bool {
        matches!(
            self,
            TacInstruction::Goto { .. } | TacInstruction::IfTrueGoto { .. } | TacInstruction::Return { .. }
        )
    }
}

/// A ToyTac program: a flat sequence of instructions. Function bodies are the spans between
/// matching `FunctionBegin` / `FunctionEnd` instructions.
#[derive(Debug, Clone, Default)]
pub struct TacProgram(pub Vec<TacInstruction>);

impl TacProgram {
    /// Returns `(name, range)` for every function, where the range covers the whole span
    /// including the `FunctionBegin` and `FunctionEnd` instructions.
    pub fn function_spans(&self) -> Vec<(String, Range<usize>)> {
        let mut spans = Vec::new();
        let mut start = None;

        for (index, instruction) in self.0.iter().enumerate() {
            match instruction {
                TacInstruction::FunctionBegin { name, .. } => start = Some((name.clone(), index)),
                TacInstruction::FunctionEnd { .. } => {
                    if let Some((name, begin)) = start.take() {
                        spans.push((name, begin..index + 1));
                    }
                }
                _ => {}
            }
        }

        spans
    }
}
