//! regvm verifier: static checks for word streams.
//!
//! The verifier checks a `Program` before execution. It collects ALL
//! errors (not just the first) and returns them. The engine does not
//! depend on it and re-checks everything at run time; a verified program
//! can still fault on register, stack or heap contents.
//!
//! # Usage
//!
//! ```
//! use regvm_common::{Address, Opcode, Program, Register, Word};
//! use regvm_verifier::verify;
//!
//! let program = Program::new(vec![
//!     Word::from(Opcode::Mov),
//!     Word::from(Register::R1),
//!     Word::from(3i64),
//!     Word::from(Opcode::Jmp),
//!     Word::from(Address::Program(0)),
//! ]);
//!
//! assert!(verify(&program).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: instruction boundaries, truncation, stray words
//! 2. **Operands**: operand kinds per position, immediate types
//! 3. **Control**: jump and call targets land on instruction starts

pub mod control;
pub mod error;
pub mod operands;
pub mod structural;

pub use error::VerifyError;

use regvm_common::Program;

/// Verify a program.
///
/// Returns `Ok(())` if the program passes all checks, or
/// `Err(Vec<VerifyError>)` with every error found, ordered by pass.
/// Later passes see only the instructions the structural pass could decode.
pub fn verify(program: &Program) -> Result<(), Vec<VerifyError>> {
    let (layout, mut all_errors) = structural::check_structural(program);
    all_errors.extend(operands::check_operands(&layout));
    all_errors.extend(control::check_control(&layout));

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}
