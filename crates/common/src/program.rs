//! Program representation for regvm word streams.
//!
//! A program is a flat sequence of words. Instructions are not delimited:
//! an opcode word is followed by exactly `arity` operand words, and the
//! next instruction starts right after them.

use std::fmt;

use crate::error::DecodeError;
use crate::instruction::Instruction;
use crate::word::Word;

/// A regvm program: a sequence of words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The word stream.
    pub words: Vec<Word>,
}

impl Program {
    /// Create a program from raw words.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Flatten instructions into a program.
    pub fn from_instructions<I>(instructions: I) -> Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        let mut words = Vec::new();
        for instr in instructions {
            words.extend(instr.words());
        }
        Self { words }
    }

    /// Number of words in the program.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the program has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The word at index `at`, if any.
    pub fn get(&self, at: usize) -> Option<&Word> {
        self.words.get(at)
    }

    /// Decode the instruction starting at word `at`.
    pub fn decode_at(&self, at: usize) -> Result<Instruction, DecodeError> {
        Instruction::decode(&self.words, at)
    }

    /// Decode the whole program linearly from word 0.
    ///
    /// Returns each instruction paired with its starting word index, or the
    /// first decode error.
    pub fn instructions(&self) -> Result<Vec<(usize, Instruction)>, DecodeError> {
        let mut out = Vec::new();
        let mut pc = 0;
        while pc < self.words.len() {
            let instr = self.decode_at(pc)?;
            let width = instr.width();
            out.push((pc, instr));
            pc += width;
        }
        Ok(out)
    }
}

impl fmt::Display for Program {
    /// One instruction per line, prefixed with its word index. Words that do
    /// not decode are listed individually with a `??` marker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pc = 0;
        while pc < self.words.len() {
            match self.decode_at(pc) {
                Ok(instr) => {
                    writeln!(f, "{pc:04}  {instr}")?;
                    pc += instr.width();
                }
                Err(_) => {
                    writeln!(f, "{pc:04}  ?? {}", self.words[pc])?;
                    pc += 1;
                }
            }
        }
        Ok(())
    }
}
