//! Verification errors for regvm programs.
//!
//! Every error carries the word index (`at`) of the instruction it concerns.
//! The verifier collects ALL errors, not just the first.

use regvm_common::{Opcode, Operand, TypeTag, Word};
use thiserror::Error;

/// Problems found by static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Structural ---
    /// An operand word sits where an instruction must start.
    #[error("expected an opcode at word {at}, found {word}")]
    UnsupportedWord { at: usize, word: Word },

    /// The program ends before all operands of the instruction.
    #[error("{opcode} at word {at} needs {expected} operand(s), program ends after {found}")]
    TruncatedInstruction {
        at: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// An opcode word fills an operand slot.
    #[error("{opcode} at word {at}: operand slot {slot} holds opcode {found}")]
    OpcodeInOperandPosition {
        at: usize,
        opcode: Opcode,
        slot: usize,
        found: Opcode,
    },

    // --- Operands ---
    /// The operand kind is not accepted in this position.
    #[error("{opcode} at word {at} does not accept operand {operand}")]
    UnsupportedOperand {
        at: usize,
        opcode: Opcode,
        operand: Operand,
    },

    /// The operand's kind is known statically and is wrong for this position.
    #[error("{opcode} at word {at}: expected {expected}, found {found}")]
    TypeMismatch {
        at: usize,
        opcode: Opcode,
        expected: &'static str,
        found: TypeTag,
    },

    /// ALLOC with a negative immediate size.
    #[error("ALLOC at word {at} requests a negative size {size}")]
    NegativeAllocation { at: usize, size: i64 },

    // --- Control ---
    /// A jump or call target is neither an instruction start nor the
    /// program length.
    #[error("{opcode} at word {at} targets word {target}, which does not start an instruction")]
    InvalidJumpTarget {
        at: usize,
        opcode: Opcode,
        target: usize,
    },
}

impl VerifyError {
    /// Word index of the instruction this error concerns.
    pub fn at(&self) -> usize {
        match self {
            VerifyError::UnsupportedWord { at, .. }
            | VerifyError::TruncatedInstruction { at, .. }
            | VerifyError::OpcodeInOperandPosition { at, .. }
            | VerifyError::UnsupportedOperand { at, .. }
            | VerifyError::TypeMismatch { at, .. }
            | VerifyError::NegativeAllocation { at, .. }
            | VerifyError::InvalidJumpTarget { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regvm_common::{Address, Register};

    #[test]
    fn all_variants_display() {
        let errors: Vec<VerifyError> = vec![
            VerifyError::UnsupportedWord {
                at: 0,
                word: Word::from(Register::R1),
            },
            VerifyError::TruncatedInstruction {
                at: 0,
                opcode: Opcode::Mov,
                expected: 2,
                found: 1,
            },
            VerifyError::OpcodeInOperandPosition {
                at: 0,
                opcode: Opcode::Push,
                slot: 0,
                found: Opcode::Nop,
            },
            VerifyError::UnsupportedOperand {
                at: 0,
                opcode: Opcode::Jmp,
                operand: Operand::from(Address::Heap(0)),
            },
            VerifyError::TypeMismatch {
                at: 0,
                opcode: Opcode::Add,
                expected: "Integer",
                found: TypeTag::Bool,
            },
            VerifyError::NegativeAllocation { at: 0, size: -1 },
            VerifyError::InvalidJumpTarget {
                at: 0,
                opcode: Opcode::Jmp,
                target: 1,
            },
        ];

        for error in &errors {
            let display = error.to_string();
            assert!(!display.is_empty(), "empty display for {error:?}");
            assert_eq!(error.at(), 0);
        }
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn display_unsupported_operand() {
        let err = VerifyError::UnsupportedOperand {
            at: 4,
            opcode: Opcode::Jmp,
            operand: Operand::from(Address::Heap(2)),
        };
        assert_eq!(
            err.to_string(),
            "JMP at word 4 does not accept operand heap@2"
        );
    }
}
