// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `generate` module lowers ToyTac instructions to RV32 assembly.

use std::collections::HashMap;

use crate::ICE;
use crate::ir::{TacBinaryOp, TacInstruction, TacOperand, TacProgram, TacUnaryOp};
use crate::parser::AstType;

use super::asm_writer::AsmWriter;
use super::frame::FrameLayout;
use super::peephole;
use super::regalloc::{self, RegAllocStrategy};
use super::registers::Register;

/// Generates the RV32 assembly text for the whole program.
pub fn generate_assembly(program: &TacProgram, strategy: RegAllocStrategy) -> String {
    let mut writer = AsmWriter::new();

    writer.comment("Generated by the ToyC compiler");
    writer.comment("RV32 assembly");
    writer.section(".text");

    for (_, range) in program.function_spans() {
        let TacInstruction::FunctionBegin { name, return_type, params } = &program.0[range.start] else {
            ICE!("Codegen: function span does not start with FunctionBegin");
        };

        let body = &program.0[range.start + 1..range.end - 1];
        generate_function(&mut writer, name, *return_type, params, body, strategy);
        writer.blank_line();
    }

    let mut lines = writer.into_lines();
    peephole::run(&mut lines);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Generates one function: allocation, frame, prologue, body, and the single labeled epilogue.
fn generate_function(
    writer: &mut AsmWriter,
    name: &str,
    return_type: AstType,
    params: &[String],
    body: &[TacInstruction],
    strategy: RegAllocStrategy,
) {
    let allocation = regalloc::allocate(strategy, body);
    let frame = FrameLayout::build(body, params, &allocation);

    tracing::debug!(function = name, frame_size = frame.frame_size, allocated = allocation.len(), "codegen");

    let mut generator = FunctionGenerator {
        writer,
        name,
        return_type,
        frame,
        allocation,
        param_queue: Vec::new(),
    };

    generator.writer.directive(format!(".global {name}"));
    generator.writer.label(name);
    generator.prologue(params);

    for instruction in body {
        generator.instruction(instruction);
    }

    generator.writer.label(&format!("{name}_epilogue"));
    generator.epilogue();
}

struct FunctionGenerator<'a> {
    writer: &'a mut AsmWriter,
    name: &'a str,
    return_type: AstType,
    frame: FrameLayout,
    allocation: HashMap<String, Register>,
    param_queue: Vec<TacOperand>,
}

impl FunctionGenerator<'_> {
    fn emit(&mut self, text: String) {
        self.writer.instruction(text);
    }

    // ---- prologue / epilogue ------------------------------------------------

    fn prologue(&mut self, params: &[String]) {
        let frame_size = self.frame.frame_size;

        if frame_size <= 2048 {
            self.emit(format!("addi sp, sp, -{frame_size}"));
        } else {
            self.emit(format!("li t0, -{frame_size}"));
            self.emit("add sp, sp, t0".to_string());
        }

        self.store_at_sp_offset(Register::Ra, frame_size - 4);
        self.store_at_sp_offset(Register::Fp, frame_size - 8);

        // The positive immediate bound is 2047; only the negative sp adjustment above can use
        // the full -2048.
        if frame_size <= 2047 {
            self.emit(format!("addi fp, sp, {frame_size}"));
        } else {
            self.emit(format!("li t0, {frame_size}"));
            self.emit("add fp, sp, t0".to_string());
        }

        for (register, offset) in self.frame.saved_registers().to_vec() {
            self.emit(format!("sw {register}, {offset}(fp)"));
        }

        // Move the incoming arguments into their homes: the first eight arrive in a0..a7, the
        // rest sit in the caller's outgoing area at positive offsets from fp.
        for (index, param) in params.iter().enumerate() {
            let allocated = self.allocation.get(param.as_str()).copied();

            if index < 8 {
                let arg = Register::arg(index);
                match allocated {
                    Some(register) => self.emit(format!("mv {register}, {arg}")),
                    None => {
                        let offset = self.frame.offset_of(param);
                        self.emit(format!("sw {arg}, {offset}(fp)"));
                    }
                }
            } else {
                let caller_offset = ((index - 8) * 4) as i32;
                match allocated {
                    Some(register) => self.emit(format!("lw {register}, {caller_offset}(fp)")),
                    None => {
                        let offset = self.frame.offset_of(param);
                        self.emit(format!("lw t0, {caller_offset}(fp)"));
                        self.emit(format!("sw t0, {offset}(fp)"));
                    }
                }
            }
        }
    }

    fn epilogue(&mut self) {
        let frame_size = self.frame.frame_size;

        for (register, offset) in self.frame.saved_registers().to_vec() {
            self.emit(format!("lw {register}, {offset}(fp)"));
        }

        self.load_at_sp_offset(Register::Fp, frame_size - 8);
        self.load_at_sp_offset(Register::Ra, frame_size - 4);

        if frame_size <= 2047 {
            self.emit(format!("addi sp, sp, {frame_size}"));
        } else {
            self.emit(format!("li t0, {frame_size}"));
            self.emit("add sp, sp, t0".to_string());
        }

        self.emit("ret".to_string());
    }

    fn store_at_sp_offset(&mut self, register: Register, offset: i32) {
        if offset <= 2047 {
            self.emit(format!("sw {register}, {offset}(sp)"));
        } else {
            self.emit(format!("li t0, {offset}"));
            self.emit("add t0, sp, t0".to_string());
            self.emit(format!("sw {register}, 0(t0)"));
        }
    }

    fn load_at_sp_offset(&mut self, register: Register, offset: i32) {
        if offset <= 2047 {
            self.emit(format!("lw {register}, {offset}(sp)"));
        } else {
            self.emit(format!("li t0, {offset}"));
            self.emit("add t0, sp, t0".to_string());
            self.emit(format!("lw {register}, 0(t0)"));
        }
    }

    // ---- operand traffic ----------------------------------------------------

    /// Materializes an operand's value into the given register.
    fn load_operand(&mut self, operand: &TacOperand, register: Register) {
        match operand {
            TacOperand::Constant(value) => self.emit(format!("li {register}, {value}")),

            TacOperand::Variable(name) | TacOperand::Temp(name) => {
                if let Some(source) = self.allocation.get(name.as_str()).copied() {
                    self.emit(format!("mv {register}, {source}"));
                    return;
                }

                let offset = self.frame.offset_of(name);
                if offset.abs() <= 2047 {
                    self.emit(format!("lw {register}, {offset}(fp)"));
                } else {
                    // The target register doubles as the address scratch.
                    self.emit(format!("li {register}, {offset}"));
                    self.emit(format!("add {register}, fp, {register}"));
                    self.emit(format!("lw {register}, 0({register})"));
                }
            }

            TacOperand::Label(_) => ICE!("Codegen: cannot load a label operand"),
        }
    }

    /// Stores a register's value into an operand's home.
    fn store_register(&mut self, register: Register, operand: &TacOperand) {
        match operand {
            TacOperand::Variable(name) | TacOperand::Temp(name) => {
                if let Some(target) = self.allocation.get(name.as_str()).copied() {
                    self.emit(format!("mv {target}, {register}"));
                    return;
                }

                let offset = self.frame.offset_of(name);
                if offset.abs() <= 2047 {
                    self.emit(format!("sw {register}, {offset}(fp)"));
                } else {
                    let scratch = if register == Register::T5 { Register::T6 } else { Register::T5 };
                    self.emit(format!("li {scratch}, {offset}"));
                    self.emit(format!("add {scratch}, fp, {scratch}"));
                    self.emit(format!("sw {register}, 0({scratch})"));
                }
            }

            _ => ICE!("Codegen: cannot store to a non-variable operand"),
        }
    }

    // ---- instruction selection ----------------------------------------------

    fn instruction(&mut self, instruction: &TacInstruction) {
        match instruction {
            TacInstruction::Binary { op, dst, lhs, rhs } => self.binary(*op, dst, lhs, rhs),

            TacInstruction::Unary { op, dst, src } => {
                self.load_operand(src, Register::T1);
                match op {
                    TacUnaryOp::Neg => self.emit("neg t0, t1".to_string()),
                    TacUnaryOp::Not => self.emit("seqz t0, t1".to_string()),
                }
                self.store_register(Register::T0, dst);
            }

            TacInstruction::Copy { dst, src } => {
                self.load_operand(src, Register::T0);
                self.store_register(Register::T0, dst);
            }

            TacInstruction::Goto { target } => self.emit(format!("j {target}")),

            TacInstruction::IfTrueGoto { condition, target } => {
                self.load_operand(condition, Register::T0);
                self.emit(format!("bnez t0, {target}"));
            }

            TacInstruction::Param { value } => self.param_queue.push(value.clone()),

            TacInstruction::Call { dst, callee, arg_count } => self.call(dst.as_ref(), callee, *arg_count),

            TacInstruction::Return { value } => {
                match value {
                    Some(value) => self.load_operand(value, Register::A0),
                    None => {
                        if self.return_type == AstType::Int {
                            self.emit("li a0, 0".to_string());
                        }
                    }
                }
                self.emit(format!("j {}_epilogue", self.name));
            }

            TacInstruction::Label { name } => self.writer.label(name),

            TacInstruction::FunctionBegin { .. } | TacInstruction::FunctionEnd { .. } => {
                ICE!("Codegen: nested function delimiter inside a function body");
            }
        }
    }

    fn binary(&mut self, op: TacBinaryOp, dst: &TacOperand, lhs: &TacOperand, rhs: &TacOperand) {
        self.load_operand(lhs, Register::T1);
        self.load_operand(rhs, Register::T2);

        match op {
            TacBinaryOp::Add => self.emit("add t0, t1, t2".to_string()),
            TacBinaryOp::Sub => self.emit("sub t0, t1, t2".to_string()),
            TacBinaryOp::Mul => self.emit("mul t0, t1, t2".to_string()),
            TacBinaryOp::Div => self.emit("div t0, t1, t2".to_string()),
            TacBinaryOp::Rem => self.emit("rem t0, t1, t2".to_string()),

            TacBinaryOp::Lt => self.emit("slt t0, t1, t2".to_string()),
            TacBinaryOp::Gt => self.emit("slt t0, t2, t1".to_string()),
            TacBinaryOp::Le => {
                self.emit("slt t0, t2, t1".to_string());
                self.emit("xori t0, t0, 1".to_string());
            }
            TacBinaryOp::Ge => {
                self.emit("slt t0, t1, t2".to_string());
                self.emit("xori t0, t0, 1".to_string());
            }

            TacBinaryOp::Eq => {
                self.emit("xor t0, t1, t2".to_string());
                self.emit("seqz t0, t0".to_string());
            }
            TacBinaryOp::Ne => {
                self.emit("xor t0, t1, t2".to_string());
                self.emit("snez t0, t0".to_string());
            }

            // Non-short-circuit logical operators: both operands are already evaluated, so the
            // lowering is branch-free normalization.
            TacBinaryOp::And => {
                self.emit("snez t1, t1".to_string());
                self.emit("snez t2, t2".to_string());
                self.emit("and t0, t1, t2".to_string());
            }
            TacBinaryOp::Or => {
                self.emit("or t0, t1, t2".to_string());
                self.emit("snez t0, t0".to_string());
            }
        }

        self.store_register(Register::T0, dst);
    }

    fn call(&mut self, dst: Option<&TacOperand>, callee: &str, arg_count: usize) {
        if self.param_queue.len() < arg_count {
            ICE!("Codegen: call to '{callee}' expects {arg_count} params, {} queued", self.param_queue.len());
        }
        let args: Vec<TacOperand> = self.param_queue.drain(self.param_queue.len() - arg_count..).collect();

        // Save the caller-saved registers holding allocated variables; every one of them is
        // conservatively treated as live across the call. Temps need no saving: they round-trip
        // through the stack between IR instructions.
        for (register, offset) in self.frame.caller_saved_slots().to_vec() {
            self.emit(format!("sw {register}, {offset}(fp)"));
        }

        // The first eight arguments travel in a0..a7; the rest go to the outgoing stack area.
        for (index, arg) in args.iter().take(8).enumerate() {
            self.load_operand(arg, Register::arg(index));
        }

        for (index, arg) in args.iter().enumerate().skip(8) {
            self.load_operand(arg, Register::T0);
            self.emit(format!("sw t0, {}(sp)", (index - 8) * 4));
        }

        self.emit(format!("call {callee}"));

        // Restore the caller-saved registers before the result leaves a0, which is never in the
        // allocation pool.
        for (register, offset) in self.frame.caller_saved_slots().to_vec() {
            self.emit(format!("lw {register}, {offset}(fp)"));
        }

        if let Some(dst) = dst {
            self.store_register(Register::A0, dst);
        }
    }
}
