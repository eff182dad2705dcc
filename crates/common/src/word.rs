//! The universal unit of program storage.

use std::fmt;

use crate::opcode::Opcode;
use crate::operand::{Address, Immediate, Offset, Operand};
use crate::register::Register;

/// A single program word: an opcode or one of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word {
    Opcode(Opcode),
    Operand(Operand),
}

impl Word {
    pub fn as_opcode(&self) -> Option<Opcode> {
        match self {
            Word::Opcode(op) => Some(*op),
            Word::Operand(_) => None,
        }
    }
}

impl From<Opcode> for Word {
    fn from(op: Opcode) -> Self {
        Word::Opcode(op)
    }
}

macro_rules! operand_word {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Word {
                fn from(value: $t) -> Self {
                    Word::Operand(Operand::from(value))
                }
            }
        )*
    };
}

impl From<Operand> for Word {
    fn from(operand: Operand) -> Self {
        Word::Operand(operand)
    }
}

operand_word!(Register, Immediate, Offset, Address, i64, char, bool);

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Opcode(op) => fmt::Display::fmt(op, f),
            Word::Operand(operand) => fmt::Display::fmt(operand, f),
        }
    }
}
