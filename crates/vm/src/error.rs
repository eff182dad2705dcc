//! Runtime and configuration errors for the regvm engine.
//!
//! Every runtime error carries the word index (`at`) of the instruction that
//! faulted. No fault aborts the host process; the caller decides what is
//! fatal.

use regvm_common::{DecodeError, Opcode, Operand, Register, TypeTag, Word};
use thiserror::Error;

/// Faults raised while executing a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An operand's runtime type is not the type the opcode requires.
    #[error("{opcode} at word {at}: expected {expected}, found {found}")]
    TypeMismatch {
        at: usize,
        opcode: Opcode,
        expected: &'static str,
        found: TypeTag,
    },

    /// Read of a register that has never been written.
    #[error("register {register} read before it was written at word {at}")]
    NilRegister { at: usize, register: Register },

    /// Operand shape not valid for this opcode or operand position.
    #[error("{opcode} at word {at} does not accept operand {operand}")]
    UnsupportedOperand {
        at: usize,
        opcode: Opcode,
        operand: Operand,
    },

    /// The program counter landed on a word that is not an opcode.
    #[error("expected an opcode at word {at}, found {word}")]
    UnsupportedWord { at: usize, word: Word },

    /// The instruction at `at` is missing operand words.
    #[error("unexpected end of program in {opcode} at word {at}")]
    UnexpectedEndOfProgram { at: usize, opcode: Opcode },

    /// Push with the stack pointer already at slot 0.
    #[error("stack overflow at word {at}")]
    StackOverflow { at: usize },

    /// Pop with nothing on the stack.
    #[error("stack underflow at word {at}")]
    StackUnderflow { at: usize },

    /// An offset or stack pointer value outside the stack.
    #[error("stack index {index} out of bounds at word {at}")]
    StackOutOfBounds { at: usize, index: i64 },

    /// An offset read hit a slot nothing was pushed into.
    #[error("stack slot {index} read before it was written at word {at}")]
    UninitializedStackSlot { at: usize, index: usize },

    /// Heap access outside `[0, heap_size)`, or heap pointer outside
    /// `[0, heap_size]`.
    #[error("heap address {address} out of bounds at word {at}")]
    HeapOutOfBounds { at: usize, address: i64 },

    /// LOAD from a heap slot that was never stored to.
    #[error("heap slot {address} read before it was written at word {at}")]
    UninitializedHeapSlot { at: usize, address: usize },

    /// Allocation would move the heap pointer past the heap.
    #[error("out of memory at word {at}: requested {requested}, {available} available")]
    OutOfMemory {
        at: usize,
        requested: i64,
        available: usize,
    },

    /// ALLOC with a negative size.
    #[error("negative allocation size {size} at word {at}")]
    NegativeAllocation { at: usize, size: i64 },

    /// Control transfer outside `[0, program length]`.
    #[error("jump target {target} out of range at word {at}")]
    InvalidJumpTarget { at: usize, target: i64 },

    /// Any other failure to read the instruction at `at`.
    #[error("cannot decode instruction at word {at}: {source}")]
    Decode { at: usize, source: DecodeError },
}

impl RuntimeError {
    /// Word index of the instruction that faulted.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::TypeMismatch { at, .. }
            | RuntimeError::NilRegister { at, .. }
            | RuntimeError::UnsupportedOperand { at, .. }
            | RuntimeError::UnsupportedWord { at, .. }
            | RuntimeError::UnexpectedEndOfProgram { at, .. }
            | RuntimeError::StackOverflow { at }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::StackOutOfBounds { at, .. }
            | RuntimeError::UninitializedStackSlot { at, .. }
            | RuntimeError::HeapOutOfBounds { at, .. }
            | RuntimeError::UninitializedHeapSlot { at, .. }
            | RuntimeError::OutOfMemory { at, .. }
            | RuntimeError::NegativeAllocation { at, .. }
            | RuntimeError::InvalidJumpTarget { at, .. }
            | RuntimeError::Decode { at, .. } => *at,
        }
    }
}

/// Rejected VM configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The stack needs at least one slot for the initial stack pointer.
    #[error("stack size must be at least 1")]
    ZeroStackSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::StackOverflow { at: 5 }.to_string(),
            "stack overflow at word 5"
        );
        assert_eq!(
            RuntimeError::NilRegister {
                at: 2,
                register: Register::R3
            }
            .to_string(),
            "register r3 read before it was written at word 2"
        );
        assert_eq!(
            RuntimeError::TypeMismatch {
                at: 0,
                opcode: Opcode::Add,
                expected: "Integer",
                found: TypeTag::Bool
            }
            .to_string(),
            "ADD at word 0: expected Integer, found Bool"
        );
        assert_eq!(
            RuntimeError::OutOfMemory {
                at: 7,
                requested: 3,
                available: 1
            }
            .to_string(),
            "out of memory at word 7: requested 3, 1 available"
        );
        assert_eq!(
            RuntimeError::Decode {
                at: 4,
                source: DecodeError::OutOfRange { at: 4, len: 4 }
            }
            .to_string(),
            "cannot decode instruction at word 4: word 4 is past the end of the program (4 words)"
        );
        assert_eq!(
            ConfigError::ZeroStackSize.to_string(),
            "stack size must be at least 1"
        );
    }

    #[test]
    fn at_reports_fault_location() {
        assert_eq!(RuntimeError::StackUnderflow { at: 9 }.at(), 9);
        assert_eq!(
            RuntimeError::InvalidJumpTarget { at: 4, target: -1 }.at(),
            4
        );
    }
}
