//! regvm virtual machine: executes assembled word streams.
//!
//! The VM is a register machine with:
//! - A fixed register table (PC, BP, SP, HP, R1-R3, ACM1, ACM2, ZF)
//! - A bounded stack growing toward index 0
//! - A bounded, bump-allocated heap
//!
//! Every fault is returned as a [`RuntimeError`]; nothing panics or aborts
//! the host. The loop is re-entrant per instruction: call
//! [`Runtime::step`] or [`Runtime::run_for`] to interleave execution with
//! other work, or [`Runtime::run`] to go to completion.
//!
//! # Usage
//!
//! ```
//! use regvm_common::{Opcode, Program, Register, Storable, Word};
//! use regvm_vm::{Config, Runtime};
//!
//! let program = Program::new(vec![
//!     Word::from(Opcode::Push),
//!     Word::from(99i64),
//!     Word::from(Opcode::Pop),
//!     Word::from(Register::R3),
//!     Word::from(Opcode::Mov),
//!     Word::from(Register::R1),
//!     Word::from(Register::R3),
//! ]);
//!
//! let mut vm = Runtime::new(&program, Config::default());
//! vm.run().unwrap();
//! assert_eq!(vm.register(Register::R1), Some(Storable::Integer(99)));
//! ```
//!
//! # Tracing
//!
//! Build with `--features trace` to print each executed instruction and
//! each fault to stderr.

macro_rules! vm_trace {
    ($($t:tt)*) => {
        #[cfg(feature = "trace")]
        eprintln!($($t)*);
    };
}

pub mod config;
pub mod error;
pub mod execute;
pub mod machine;
pub mod memory;
pub mod resolve;

pub use config::Config;
pub use error::{ConfigError, RuntimeError};
pub use machine::{Runtime, State};

use regvm_common::Program;

/// Execute a program to completion and return the final machine.
///
/// Use [`Runtime`] directly to inspect the machine after a fault.
///
/// # Errors
///
/// Returns the first [`RuntimeError`] raised by the program.
pub fn run(program: &Program, config: Config) -> Result<Runtime<'_>, RuntimeError> {
    let mut vm = Runtime::new(program, config);
    vm.run()?;
    Ok(vm)
}
