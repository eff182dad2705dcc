//! Operand words.
//!
//! An operand follows its opcode in the word stream. The four kinds are
//! disjoint: a register reference, a literal, a stack location relative to
//! BP or SP, or an absolute address.

use std::fmt;

use crate::register::{Register, SpecialRegister};
use crate::storable::Storable;
use crate::type_tag::TypeTag;

/// A literal embedded in the program stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Immediate {
    Integer(i64),
    Char(char),
    Bool(bool),
}

impl Immediate {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Immediate::Integer(_) => TypeTag::Integer,
            Immediate::Char(_) => TypeTag::Char,
            Immediate::Bool(_) => TypeTag::Bool,
        }
    }

    /// The value this literal stores as.
    pub fn to_storable(self) -> Storable {
        match self {
            Immediate::Integer(v) => Storable::Integer(v),
            Immediate::Char(c) => Storable::Char(c),
            Immediate::Bool(b) => Storable::Bool(b),
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_storable(), f)
    }
}

/// The register an [`Offset`] is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetBase {
    Bp,
    Sp,
}

impl OffsetBase {
    pub fn register(&self) -> Register {
        match self {
            OffsetBase::Bp => Register::Special(SpecialRegister::Bp),
            OffsetBase::Sp => Register::Special(SpecialRegister::Sp),
        }
    }
}

/// A stack slot at `base + displacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub base: OffsetBase,
    pub displacement: i64,
}

impl Offset {
    pub fn bp(displacement: i64) -> Self {
        Self {
            base: OffsetBase::Bp,
            displacement,
        }
    }

    pub fn sp(displacement: i64) -> Self {
        Self {
            base: OffsetBase::Sp,
            displacement,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}{:+}]", self.base.register(), self.displacement)
    }
}

/// An absolute location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// Word index in the program. Only meaningful as a jump target.
    Program(usize),
    /// Heap slot. Only meaningful for STORE/LOAD (or as a pushed value).
    Heap(usize),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Program(a) => write!(f, "@{a}"),
            Address::Heap(a) => write!(f, "heap@{a}"),
        }
    }
}

/// Any operand word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(Register),
    Immediate(Immediate),
    Offset(Offset),
    Address(Address),
}

impl From<Register> for Operand {
    fn from(r: Register) -> Self {
        Operand::Register(r)
    }
}

impl From<Immediate> for Operand {
    fn from(i: Immediate) -> Self {
        Operand::Immediate(i)
    }
}

impl From<Offset> for Operand {
    fn from(o: Offset) -> Self {
        Operand::Offset(o)
    }
}

impl From<Address> for Operand {
    fn from(a: Address) -> Self {
        Operand::Address(a)
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Immediate(Immediate::Integer(v))
    }
}

impl From<char> for Operand {
    fn from(c: char) -> Self {
        Operand::Immediate(Immediate::Char(c))
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Immediate(Immediate::Bool(b))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => fmt::Display::fmt(r, f),
            Operand::Immediate(i) => fmt::Display::fmt(i, f),
            Operand::Offset(o) => fmt::Display::fmt(o, f),
            Operand::Address(a) => fmt::Display::fmt(a, f),
        }
    }
}
