//! Register names.
//!
//! Registers fall into three disjoint groups. Special registers hold
//! addresses that drive the machine, general-purpose registers hold any
//! storable value, and the flag register holds the result of the last
//! arithmetic or comparison.

use std::fmt;

/// Program counter, base pointer, stack pointer and heap pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialRegister {
    Pc,
    Bp,
    Sp,
    Hp,
}

/// Registers available to programs for arbitrary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralPurposeRegister {
    R1,
    R2,
    R3,
    Acm1,
    Acm2,
}

/// Condition flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagRegister {
    /// Zero flag.
    Zf,
}

/// Any register that can appear as an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Special(SpecialRegister),
    GeneralPurpose(GeneralPurposeRegister),
    Flag(FlagRegister),
}

impl Register {
    pub const PC: Register = Register::Special(SpecialRegister::Pc);
    pub const BP: Register = Register::Special(SpecialRegister::Bp);
    pub const SP: Register = Register::Special(SpecialRegister::Sp);
    pub const HP: Register = Register::Special(SpecialRegister::Hp);
    pub const R1: Register = Register::GeneralPurpose(GeneralPurposeRegister::R1);
    pub const R2: Register = Register::GeneralPurpose(GeneralPurposeRegister::R2);
    pub const R3: Register = Register::GeneralPurpose(GeneralPurposeRegister::R3);
    pub const ACM1: Register = Register::GeneralPurpose(GeneralPurposeRegister::Acm1);
    pub const ACM2: Register = Register::GeneralPurpose(GeneralPurposeRegister::Acm2);
    pub const ZF: Register = Register::Flag(FlagRegister::Zf);

    /// Dense index in `0..REGISTER_COUNT`, used to address a register table.
    pub fn index(&self) -> usize {
        match self {
            Register::Special(SpecialRegister::Pc) => 0,
            Register::Special(SpecialRegister::Bp) => 1,
            Register::Special(SpecialRegister::Sp) => 2,
            Register::Special(SpecialRegister::Hp) => 3,
            Register::GeneralPurpose(GeneralPurposeRegister::R1) => 4,
            Register::GeneralPurpose(GeneralPurposeRegister::R2) => 5,
            Register::GeneralPurpose(GeneralPurposeRegister::R3) => 6,
            Register::GeneralPurpose(GeneralPurposeRegister::Acm1) => 7,
            Register::GeneralPurpose(GeneralPurposeRegister::Acm2) => 8,
            Register::Flag(FlagRegister::Zf) => 9,
        }
    }

    /// Lower-case assembly name.
    pub fn name(&self) -> &'static str {
        match self {
            Register::Special(SpecialRegister::Pc) => "pc",
            Register::Special(SpecialRegister::Bp) => "bp",
            Register::Special(SpecialRegister::Sp) => "sp",
            Register::Special(SpecialRegister::Hp) => "hp",
            Register::GeneralPurpose(GeneralPurposeRegister::R1) => "r1",
            Register::GeneralPurpose(GeneralPurposeRegister::R2) => "r2",
            Register::GeneralPurpose(GeneralPurposeRegister::R3) => "r3",
            Register::GeneralPurpose(GeneralPurposeRegister::Acm1) => "acm1",
            Register::GeneralPurpose(GeneralPurposeRegister::Acm2) => "acm2",
            Register::Flag(FlagRegister::Zf) => "zf",
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Register::Special(_))
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Register::Flag(_))
    }
}

/// Number of registers in the machine.
pub const REGISTER_COUNT: usize = 10;

/// All registers, ordered by [`Register::index`].
pub const ALL_REGISTERS: [Register; REGISTER_COUNT] = [
    Register::PC,
    Register::BP,
    Register::SP,
    Register::HP,
    Register::R1,
    Register::R2,
    Register::R3,
    Register::ACM1,
    Register::ACM2,
    Register::ZF,
];

impl From<SpecialRegister> for Register {
    fn from(r: SpecialRegister) -> Self {
        Register::Special(r)
    }
}

impl From<GeneralPurposeRegister> for Register {
    fn from(r: GeneralPurposeRegister) -> Self {
        Register::GeneralPurpose(r)
    }
}

impl From<FlagRegister> for Register {
    fn from(r: FlagRegister) -> Self {
        Register::Flag(r)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
