//! regvm common types.
//!
//! This crate provides the word model shared by the engine and the
//! verifier:
//!
//! - [`Opcode`]: the 18 operations and their operand arities
//! - [`Register`]: special, general-purpose and flag registers
//! - [`Operand`]: register, immediate, offset or address operand words
//! - [`Word`]: an opcode or an operand, the unit of program storage
//! - [`Storable`]: values that can occupy a register, stack or heap slot
//! - [`TypeTag`]: the kind of a storable or immediate
//! - [`Instruction`]: an opcode grouped with its operands
//! - [`Program`]: a flat sequence of words
//! - [`DecodeError`]: errors from reading instructions out of a word stream

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod register;
pub mod storable;
pub mod type_tag;
pub mod word;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{Address, Immediate, Offset, OffsetBase, Operand};
pub use program::Program;
pub use register::{FlagRegister, GeneralPurposeRegister, Register, SpecialRegister};
pub use storable::Storable;
pub use type_tag::TypeTag;
pub use word::Word;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(opcode::ALL_OPCODES.to_vec())
    }

    fn arb_register() -> impl Strategy<Value = Register> {
        prop::sample::select(register::ALL_REGISTERS.to_vec())
    }

    fn arb_operand() -> impl Strategy<Value = Operand> {
        prop_oneof![
            arb_register().prop_map(Operand::Register),
            any::<i64>().prop_map(Operand::from),
            any::<char>().prop_map(Operand::from),
            any::<bool>().prop_map(Operand::from),
            (any::<bool>(), any::<i64>()).prop_map(|(bp, d)| {
                Operand::Offset(if bp { Offset::bp(d) } else { Offset::sp(d) })
            }),
            (any::<bool>(), 0usize..1024).prop_map(|(heap, a)| {
                Operand::Address(if heap {
                    Address::Heap(a)
                } else {
                    Address::Program(a)
                })
            }),
        ]
    }

    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        arb_opcode().prop_flat_map(|op| {
            prop::collection::vec(arb_operand(), op.arity())
                .prop_map(move |operands| Instruction::new(op, operands).unwrap())
        })
    }

    proptest! {
        /// Flattening instructions and decoding the words linearly gives back
        /// the same instructions, at cumulative word offsets.
        #[test]
        fn flatten_then_decode(instrs in prop::collection::vec(arb_instruction(), 0..40)) {
            let program = Program::from_instructions(instrs.clone());
            let decoded = program.instructions().unwrap();

            let mut expected_pc = 0;
            for ((pc, instr), original) in decoded.iter().zip(&instrs) {
                prop_assert_eq!(*pc, expected_pc);
                prop_assert_eq!(instr, original);
                expected_pc += original.width();
            }
            prop_assert_eq!(decoded.len(), instrs.len());
            prop_assert_eq!(program.len(), expected_pc);
        }

        /// Decoding at any index of an arbitrary word stream returns either an
        /// instruction that fits inside the stream or a decode error; it never
        /// panics.
        #[test]
        fn decode_never_panics(
            words in prop::collection::vec(
                prop_oneof![arb_opcode().prop_map(Word::Opcode), arb_operand().prop_map(Word::Operand)],
                0..30,
            ),
            at in 0usize..35,
        ) {
            match Instruction::decode(&words, at) {
                Ok(instr) => prop_assert!(at + instr.width() <= words.len()),
                Err(e) => match e {
                    DecodeError::NotAnOpcode { .. }
                    | DecodeError::Truncated { .. }
                    | DecodeError::OpcodeInOperandPosition { .. }
                    | DecodeError::OutOfRange { .. }
                    | DecodeError::ArityMismatch { .. } => {}
                },
            }
        }
    }
}
