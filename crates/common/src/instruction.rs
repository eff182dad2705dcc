//! Instructions: an opcode grouped with its operands.
//!
//! In the program stream an instruction is `1 + arity` consecutive words:
//! ```text
//! word pc:       opcode
//! word pc + 1:   first operand   (arity >= 1)
//! word pc + 2:   second operand  (arity == 2)
//! ```

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;
use crate::operand::Operand;
use crate::word::Word;

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Exactly `opcode.arity()` operands.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create an instruction, checking the operand count against the opcode.
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Result<Self, DecodeError> {
        if operands.len() != opcode.arity() {
            return Err(DecodeError::ArityMismatch {
                opcode,
                expected: opcode.arity(),
                found: operands.len(),
            });
        }
        Ok(Self { opcode, operands })
    }

    /// Read the instruction that starts at word `at`.
    pub fn decode(words: &[Word], at: usize) -> Result<Self, DecodeError> {
        let opcode = match words.get(at) {
            Some(Word::Opcode(op)) => *op,
            Some(word) => return Err(DecodeError::NotAnOpcode { at, word: *word }),
            None => {
                return Err(DecodeError::OutOfRange {
                    at,
                    len: words.len(),
                })
            }
        };

        let arity = opcode.arity();
        let mut operands = Vec::with_capacity(arity);
        for slot in 0..arity {
            match words.get(at + 1 + slot) {
                Some(Word::Operand(operand)) => operands.push(*operand),
                Some(Word::Opcode(found)) => {
                    return Err(DecodeError::OpcodeInOperandPosition {
                        at,
                        opcode,
                        slot,
                        found: *found,
                    })
                }
                None => {
                    return Err(DecodeError::Truncated {
                        at,
                        opcode,
                        expected: arity,
                        found: slot,
                    })
                }
            }
        }

        Ok(Self { opcode, operands })
    }

    /// Number of words this instruction occupies.
    pub fn width(&self) -> usize {
        1 + self.operands.len()
    }

    /// The words this instruction flattens to.
    pub fn words(&self) -> impl Iterator<Item = Word> + '_ {
        std::iter::once(Word::Opcode(self.opcode))
            .chain(self.operands.iter().map(|operand| Word::Operand(*operand)))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
