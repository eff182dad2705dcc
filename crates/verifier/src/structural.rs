//! Structural validation pass for regvm programs.
//!
//! Walks the word stream linearly, splits it into instructions, and builds
//! the [`ProgramLayout`] used by later passes.

use crate::error::VerifyError;
use regvm_common::{DecodeError, Instruction, Program, Word};

/// Instructions found by the structural pass.
#[derive(Debug, Clone)]
pub struct ProgramLayout {
    /// Well-formed instructions paired with their starting word index.
    pub instructions: Vec<(usize, Instruction)>,
    /// `boundaries[pc]` is true when a well-formed instruction starts at `pc`.
    pub boundaries: Vec<bool>,
}

impl ProgramLayout {
    /// Whether control may land on `target`: an instruction start, or the
    /// program length (which halts).
    pub fn is_target(&self, target: usize) -> bool {
        target == self.boundaries.len() || self.boundaries.get(target).copied().unwrap_or(false)
    }
}

/// Run the structural validation pass.
///
/// Returns the layout and any errors found. After a malformed instruction
/// the walk resumes at the next opcode word.
pub fn check_structural(program: &Program) -> (ProgramLayout, Vec<VerifyError>) {
    let words = &program.words;
    let mut errors = Vec::new();
    let mut instructions = Vec::new();
    let mut boundaries = vec![false; words.len()];

    let mut pc = 0;
    while pc < words.len() {
        match Instruction::decode(words, pc) {
            Ok(instr) => {
                boundaries[pc] = true;
                let width = instr.width();
                instructions.push((pc, instr));
                pc += width;
            }
            Err(DecodeError::NotAnOpcode { at, word }) => {
                errors.push(VerifyError::UnsupportedWord { at, word });
                pc = next_opcode(words, at + 1);
            }
            Err(DecodeError::OpcodeInOperandPosition {
                at,
                opcode,
                slot,
                found,
            }) => {
                errors.push(VerifyError::OpcodeInOperandPosition {
                    at,
                    opcode,
                    slot,
                    found,
                });
                // The stray opcode may start a valid instruction.
                pc = at + 1 + slot;
            }
            Err(DecodeError::Truncated {
                at,
                opcode,
                expected,
                found,
            }) => {
                errors.push(VerifyError::TruncatedInstruction {
                    at,
                    opcode,
                    expected,
                    found,
                });
                break;
            }
            Err(DecodeError::OutOfRange { .. } | DecodeError::ArityMismatch { .. }) => break,
        }
    }

    (
        ProgramLayout {
            instructions,
            boundaries,
        },
        errors,
    )
}

fn next_opcode(words: &[Word], from: usize) -> usize {
    words
        .iter()
        .skip(from)
        .position(|w| w.as_opcode().is_some())
        .map_or(words.len(), |offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regvm_common::{Opcode, Register};

    #[test]
    fn well_formed_boundaries() {
        let program = Program::new(vec![
            Word::from(Opcode::Nop),
            Word::from(Opcode::Push),
            Word::from(1i64),
            Word::from(Opcode::Ret),
        ]);
        let (layout, errors) = check_structural(&program);
        assert!(errors.is_empty());
        assert_eq!(layout.boundaries, vec![true, true, false, true]);
        assert_eq!(layout.instructions.len(), 3);
        assert!(layout.is_target(4));
        assert!(!layout.is_target(2));
        assert!(!layout.is_target(5));
    }

    #[test]
    fn resync_after_stray_operands() {
        let program = Program::new(vec![
            Word::from(1i64),
            Word::from(Register::R1),
            Word::from(Opcode::Nop),
        ]);
        let (layout, errors) = check_structural(&program);
        assert_eq!(
            errors,
            vec![VerifyError::UnsupportedWord {
                at: 0,
                word: Word::from(1i64)
            }]
        );
        assert_eq!(layout.boundaries, vec![false, false, true]);
    }

    #[test]
    fn resync_at_opcode_in_operand_slot() {
        let program = Program::new(vec![
            Word::from(Opcode::Mov),
            Word::from(Register::R1),
            Word::from(Opcode::Push),
            Word::from(2i64),
        ]);
        let (layout, errors) = check_structural(&program);
        assert_eq!(
            errors,
            vec![VerifyError::OpcodeInOperandPosition {
                at: 0,
                opcode: Opcode::Mov,
                slot: 1,
                found: Opcode::Push
            }]
        );
        assert_eq!(layout.instructions.len(), 1);
        assert_eq!(layout.instructions[0].0, 2);
    }

    #[test]
    fn truncated_tail() {
        let program = Program::new(vec![Word::from(Opcode::Nop), Word::from(Opcode::Store)]);
        let (layout, errors) = check_structural(&program);
        assert_eq!(
            errors,
            vec![VerifyError::TruncatedInstruction {
                at: 1,
                opcode: Opcode::Store,
                expected: 2,
                found: 0
            }]
        );
        assert_eq!(layout.boundaries, vec![true, false]);
    }
}
