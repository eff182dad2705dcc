//! Opcode definitions for the regvm instruction set.

use std::fmt;

/// Identifies the operation to perform.
///
/// Every opcode has a fixed operand arity. The engine uses it to advance the
/// program counter past the operand words that follow the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// No operation.
    Nop,

    // Data movement
    /// `MOV dst src`: copy a value into a register.
    Mov,
    /// `PUSH src`: push a value onto the stack.
    Push,
    /// `POP dst`: pop the top of the stack into a register.
    Pop,

    // Heap
    /// `ALLOC size`: bump-allocate `size` heap slots and push the base address.
    Alloc,
    /// `STORE addr src`: write a value into a heap slot.
    Store,
    /// `LOAD dst addr`: read a heap slot into a register.
    Load,

    // Calls
    /// `CALL target`: push the return address and jump.
    Call,
    /// `RET`: pop the return address into the program counter.
    Ret,

    // Arithmetic
    /// `ADD dst imm`: integer or address addition, updates ZF.
    Add,
    /// `SUB dst imm`: integer or address subtraction, updates ZF.
    Sub,

    // Jumps
    /// `JMP target`: unconditional jump.
    Jmp,
    /// `JE target`: jump when ZF is set.
    Je,
    /// `JNE target`: jump when ZF is clear.
    Jne,

    // Comparison
    /// `EQ a b`: ZF = (a == b).
    Eq,
    /// `NE a b`: ZF = (a != b).
    Ne,
    /// `LT a b`: ZF = (a < b).
    Lt,
    /// `LE a b`: ZF = (a <= b).
    Le,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 18] = [
    Opcode::Nop,
    Opcode::Mov,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Alloc,
    Opcode::Store,
    Opcode::Load,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Jmp,
    Opcode::Je,
    Opcode::Jne,
    Opcode::Eq,
    Opcode::Ne,
    Opcode::Lt,
    Opcode::Le,
];

impl Opcode {
    /// Number of operand words that follow this opcode in the program.
    pub fn arity(&self) -> usize {
        match self {
            Opcode::Nop | Opcode::Ret => 0,
            Opcode::Push
            | Opcode::Pop
            | Opcode::Alloc
            | Opcode::Call
            | Opcode::Jmp
            | Opcode::Je
            | Opcode::Jne => 1,
            Opcode::Mov
            | Opcode::Store
            | Opcode::Load
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Eq
            | Opcode::Ne
            | Opcode::Lt
            | Opcode::Le => 2,
        }
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Mov => "MOV",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Alloc => "ALLOC",
            Opcode::Store => "STORE",
            Opcode::Load => "LOAD",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Jmp => "JMP",
            Opcode::Je => "JE",
            Opcode::Jne => "JNE",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
        }
    }

    /// Returns true for opcodes whose operand is a program address
    /// (JMP, JE, JNE, CALL).
    pub fn takes_jump_target(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Je | Opcode::Jne | Opcode::Call)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
