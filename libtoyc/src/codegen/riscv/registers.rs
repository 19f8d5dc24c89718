// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `registers` module defines the RV32 hardware registers.

use std::fmt;

/// The RV32 integer registers, by their ABI names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Register {
    Zero,
    Ra,
    Sp,
    Gp,
    Tp,

    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,

    /// s0, reserved as the frame pointer.
    Fp,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
    S11,

    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
}

#[rustfmt::skip]
impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Zero => write!(f, "zero"),
            Register::Ra   => write!(f, "ra"),
            Register::Sp   => write!(f, "sp"),
            Register::Gp   => write!(f, "gp"),
            Register::Tp   => write!(f, "tp"),

            Register::T0   => write!(f, "t0"),
            Register::T1   => write!(f, "t1"),
            Register::T2   => write!(f, "t2"),
            Register::T3   => write!(f, "t3"),
            Register::T4   => write!(f, "t4"),
            Register::T5   => write!(f, "t5"),
            Register::T6   => write!(f, "t6"),

            Register::Fp   => write!(f, "fp"),
            Register::S1   => write!(f, "s1"),
            Register::S2   => write!(f, "s2"),
            Register::S3   => write!(f, "s3"),
            Register::S4   => write!(f, "s4"),
            Register::S5   => write!(f, "s5"),
            Register::S6   => write!(f, "s6"),
            Register::S7   => write!(f, "s7"),
            Register::S8   => write!(f, "s8"),
            Register::S9   => write!(f, "s9"),
            Register::S10  => write!(f, "s10"),
            Register::S11  => write!(f, "s11"),

            Register::A0   => write!(f, "a0"),
            Register::A1   => write!(f, "a1"),
            Register::A2   => write!(f, "a2"),
            Register::A3   => write!(f, "a3"),
            Register::A4   => write!(f, "a4"),
            Register::A5   => write!(f, "a5"),
            Register::A6   => write!(f, "a6"),
            Register::A7   => write!(f, "a7"),
        }
    }
}

impl Register {
    /// Scratch registers used by the per-instruction load/operate/store discipline.
    pub const TEMP_REGS: [Register; 7] =
        [Register::T0, Register::T1, Register::T2, Register::T3, Register::T4, Register::T5, Register::T6];

    /// Argument/return registers, in ABI order.
    pub const ARG_REGS: [Register; 8] = [
        Register::A0,
        Register::A1,
        Register::A2,
        Register::A3,
        Register::A4,
        Register::A5,
        Register::A6,
        Register::A7,
    ];

    /// The pool handed to the register allocators, in allocation order.
    ///
    /// Callee-saved registers come first (s0 stays reserved as the frame pointer): a value in
    /// one of them survives calls for free. The caller-saved t3 and t4 extend the pool under
    /// pressure and are saved and restored around every call. The remaining caller-saved
    /// registers have fixed roles and stay out: t0..t2 are the per-instruction scratch triple,
    /// t5/t6 address out-of-range stack slots, and a0..a7 stage incoming parameters and
    /// outgoing arguments, with a0 reserved at call boundaries for the result.
    pub const ALLOCATABLE: [Register; 13] = [
        Register::S1,
        Register::S2,
        Register::S3,
        Register::S4,
        Register::S5,
        Register::S6,
        Register::S7,
        Register::S8,
        Register::S9,
        Register::S10,
        Register::S11,
        Register::T3,
        Register::T4,
    ];

    /// The argument register for the given 0-based parameter index (< 8).
    pub fn arg(index: usize) -> Register {
        Register::ARG_REGS[index]
    }

    /// Is the register preserved across calls by the callee?
    pub fn is_callee_saved(&self) -> bool {
        matches!(
            self,
            Register::Fp
                | Register::S1
                | Register::S2
                | Register::S3
                | Register::S4
                | Register::S5
                | Register::S6
                | Register::S7
                | Register::S8
                | Register::S9
                | Register::S10
                | Register::S11
        )
    }

    /// Must the caller preserve the register across calls?
    pub fn is_caller_saved(&self) -> bool {
        matches!(
            self,
            Register::Ra
                | Register::T0
                | Register::T1
                | Register::T2
                | Register::T3
                | Register::T4
                | Register::T5
                | Register::T6
                | Register::A0
                | Register::A1
                | Register::A2
                | Register::A3
                | Register::A4
                | Register::A5
                | Register::A6
                | Register::A7
        )
    }

    /// Is the register reserved for a fixed role and unavailable to allocation?
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Register::Zero | Register::Ra | Register::Sp | Register::Gp | Register::Tp | Register::Fp
        )
    }
}
