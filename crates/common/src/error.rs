//! Decode errors for regvm word streams.

use thiserror::Error;

use crate::opcode::Opcode;
use crate::word::Word;

/// Errors that occur while reading instructions out of a word stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// An operand sits where an instruction must start.
    #[error("expected an opcode at word {at}, found {word}")]
    NotAnOpcode { at: usize, word: Word },

    /// The program ends before all operands of the instruction.
    #[error("{opcode} at word {at} needs {expected} operand(s), program ends after {found}")]
    Truncated {
        at: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// An opcode sits where an operand must be.
    #[error("{opcode} at word {at}: operand slot {slot} holds opcode {found}")]
    OpcodeInOperandPosition {
        at: usize,
        opcode: Opcode,
        slot: usize,
        found: Opcode,
    },

    /// Decoding was asked to start past the last word.
    #[error("word {at} is past the end of the program ({len} words)")]
    OutOfRange { at: usize, len: usize },

    /// An instruction was built with the wrong number of operands.
    #[error("{opcode} takes {expected} operand(s), got {found}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::Register;

    #[test]
    fn display_not_an_opcode() {
        assert_eq!(
            DecodeError::NotAnOpcode {
                at: 3,
                word: Word::from(Register::R1)
            }
            .to_string(),
            "expected an opcode at word 3, found r1"
        );
    }

    #[test]
    fn display_truncated() {
        assert_eq!(
            DecodeError::Truncated {
                at: 0,
                opcode: Opcode::Mov,
                expected: 2,
                found: 1
            }
            .to_string(),
            "MOV at word 0 needs 2 operand(s), program ends after 1"
        );
    }

    #[test]
    fn display_arity_mismatch() {
        assert_eq!(
            DecodeError::ArityMismatch {
                opcode: Opcode::Ret,
                expected: 0,
                found: 1
            }
            .to_string(),
            "RET takes 0 operand(s), got 1"
        );
    }
}
