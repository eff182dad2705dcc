//! Jump-target validation.
//!
//! Every JMP/JE/JNE/CALL target must land on the start of a well-formed
//! instruction, or on the program length, which halts.

use crate::error::VerifyError;
use crate::structural::ProgramLayout;
use regvm_common::{Address, Operand};

/// Run the control pass.
pub fn check_control(layout: &ProgramLayout) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    for (at, instr) in &layout.instructions {
        if !instr.opcode.takes_jump_target() {
            continue;
        }
        // Operand kinds are the operand pass's concern.
        if let Some(Operand::Address(Address::Program(target))) = instr.operands.first() {
            if !layout.is_target(*target) {
                errors.push(VerifyError::InvalidJumpTarget {
                    at: *at,
                    opcode: instr.opcode,
                    target: *target,
                });
            }
        }
    }
    errors
}
