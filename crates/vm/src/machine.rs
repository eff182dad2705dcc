//! VM state: registers, stack, heap, and the operations that move the
//! pointer registers.

use crate::config::Config;
use crate::error::RuntimeError;
use crate::memory::{RegisterTable, Slots};
use regvm_common::{Program, Register, Storable};

/// Where the run loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The program counter indexes a word of the program.
    Running,
    /// The program counter reached the end of the program.
    Halted,
    /// An instruction faulted. The fault is kept in [`Runtime::fault`].
    Faulted,
}

/// The regvm virtual machine.
///
/// Owns its register table, stack and heap exclusively. Separate runtimes
/// share nothing but the (immutable) program.
#[derive(Debug, Clone)]
pub struct Runtime<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) config: Config,
    pub(crate) registers: RegisterTable,
    /// Grows toward index 0; SP indexes the top value.
    pub(crate) stack: Slots,
    /// Bump-allocated; HP is the first unallocated slot.
    pub(crate) heap: Slots,
    /// Word index of the instruction being executed, reported in faults.
    pub(crate) at: usize,
    /// First fault raised; execution stops here.
    pub(crate) fault: Option<RuntimeError>,
    /// Instructions executed successfully.
    pub(crate) steps: u64,
}

impl<'a> Runtime<'a> {
    /// Create a VM for `program` with empty memory areas.
    ///
    /// PC, BP and HP start at `Address(0)`, SP at `Address(stack_size - 1)`,
    /// ZF at `false`; general-purpose registers start unset.
    pub fn new(program: &'a Program, config: Config) -> Self {
        let mut registers = RegisterTable::empty();
        registers.set(Register::PC, Storable::Address(0));
        registers.set(Register::BP, Storable::Address(0));
        registers.set(
            Register::SP,
            Storable::Address(config.stack_size() as i64 - 1),
        );
        registers.set(Register::HP, Storable::Address(0));
        registers.set(Register::ZF, Storable::Bool(false));

        Self {
            program,
            config,
            registers,
            stack: Slots::new(config.stack_size()),
            heap: Slots::new(config.heap_size()),
            at: 0,
            fault: None,
            steps: 0,
        }
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn registers(&self) -> &RegisterTable {
        &self.registers
    }

    /// Current value of `register`, `None` if it was never written.
    pub fn register(&self, register: Register) -> Option<Storable> {
        self.registers.get(register)
    }

    /// Stack slots, index 0 first. The stack grows toward index 0.
    pub fn stack(&self) -> &[Option<Storable>] {
        self.stack.as_slice()
    }

    /// Heap slots, index 0 first.
    pub fn heap(&self) -> &[Option<Storable>] {
        self.heap.as_slice()
    }

    /// The fault that stopped execution, if any.
    pub fn fault(&self) -> Option<&RuntimeError> {
        self.fault.as_ref()
    }

    /// Number of instructions executed successfully so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> State {
        if self.fault.is_some() {
            return State::Faulted;
        }
        match self.registers.get(Register::PC) {
            Some(Storable::Address(pc)) if pc >= 0 && (pc as usize) < self.program.len() => {
                State::Running
            }
            _ => State::Halted,
        }
    }

    /// Read a special register as a raw address.
    pub(crate) fn pointer(&self, register: Register) -> Result<i64, RuntimeError> {
        match self.registers.get(register) {
            Some(Storable::Address(a)) => Ok(a),
            Some(other) => Err(RuntimeError::TypeMismatch {
                at: self.at,
                opcode: self.current_opcode(),
                expected: "Address",
                found: other.type_tag(),
            }),
            None => Err(RuntimeError::NilRegister {
                at: self.at,
                register,
            }),
        }
    }

    /// Opcode at the current instruction, for fault context.
    pub(crate) fn current_opcode(&self) -> regvm_common::Opcode {
        self.program
            .get(self.at)
            .and_then(|word| word.as_opcode())
            .unwrap_or(regvm_common::Opcode::Nop)
    }

    /// Decrement SP and store `value` in the slot it now points at.
    pub fn push(&mut self, value: Storable) -> Result<(), RuntimeError> {
        let sp = self.push_slot()?;
        self.stack.set(sp, value);
        self.registers.set(Register::SP, Storable::Address(sp as i64));
        Ok(())
    }

    /// The slot the next push writes to.
    pub(crate) fn push_slot(&self) -> Result<usize, RuntimeError> {
        let sp = self.pointer(Register::SP)? - 1;
        if sp < 0 {
            return Err(RuntimeError::StackOverflow { at: self.at });
        }
        if sp as usize >= self.stack.capacity() {
            return Err(RuntimeError::StackOutOfBounds {
                at: self.at,
                index: sp,
            });
        }
        Ok(sp as usize)
    }

    /// Take the value SP points at, clear its slot and increment SP.
    ///
    /// Fails with `StackUnderflow` when SP is at the stack size or the slot
    /// holds nothing.
    pub fn pop(&mut self) -> Result<Storable, RuntimeError> {
        let (sp, value) = self.top()?;
        self.stack.take(sp);
        self.registers
            .set(Register::SP, Storable::Address(sp as i64 + 1));
        Ok(value)
    }

    /// The value a pop would return, and the slot it sits in.
    pub(crate) fn top(&self) -> Result<(usize, Storable), RuntimeError> {
        let sp = self.pointer(Register::SP)?;
        if sp < 0 {
            return Err(RuntimeError::StackOutOfBounds {
                at: self.at,
                index: sp,
            });
        }
        let value = self
            .stack
            .get(sp as usize)
            .flatten()
            .ok_or(RuntimeError::StackUnderflow { at: self.at })?;
        Ok((sp as usize, value))
    }

    /// Reserve `size` heap slots and return the base address (HP before
    /// the call).
    pub fn allocate(&mut self, size: i64) -> Result<i64, RuntimeError> {
        if size < 0 {
            return Err(RuntimeError::NegativeAllocation { at: self.at, size });
        }
        let hp = self.pointer(Register::HP)?;
        let available = (self.heap.capacity() as i64 - hp).max(0);
        if size > available {
            return Err(RuntimeError::OutOfMemory {
                at: self.at,
                requested: size,
                available: available as usize,
            });
        }
        self.registers.set(Register::HP, Storable::Address(hp + size));
        Ok(hp)
    }

    /// Write `value` into heap slot `address`.
    pub fn store(&mut self, address: i64, value: Storable) -> Result<(), RuntimeError> {
        let index = self.heap_index(address)?;
        self.heap.set(index, value);
        Ok(())
    }

    /// Read heap slot `address`. `None` if nothing was stored there.
    pub fn load(&self, address: i64) -> Result<Option<Storable>, RuntimeError> {
        let index = self.heap_index(address)?;
        Ok(self.heap.get(index).flatten())
    }

    fn heap_index(&self, address: i64) -> Result<usize, RuntimeError> {
        if address < 0 || address as usize >= self.heap.capacity() {
            return Err(RuntimeError::HeapOutOfBounds {
                at: self.at,
                address,
            });
        }
        Ok(address as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(stack: usize, heap: usize) -> Config {
        Config::new(stack, heap).unwrap()
    }

    #[test]
    fn initial_registers() {
        let program = Program::default();
        let vm = Runtime::new(&program, config(4, 2));
        assert_eq!(vm.register(Register::PC), Some(Storable::Address(0)));
        assert_eq!(vm.register(Register::BP), Some(Storable::Address(0)));
        assert_eq!(vm.register(Register::SP), Some(Storable::Address(3)));
        assert_eq!(vm.register(Register::HP), Some(Storable::Address(0)));
        assert_eq!(vm.register(Register::ZF), Some(Storable::Bool(false)));
        assert_eq!(vm.register(Register::R1), None);
        assert_eq!(vm.register(Register::ACM2), None);
        assert_eq!(vm.stack(), &[None, None, None, None]);
        assert_eq!(vm.heap(), &[None, None]);
    }

    #[test]
    fn empty_program_is_halted() {
        let program = Program::default();
        let vm = Runtime::new(&program, config(1, 0));
        assert_eq!(vm.state(), State::Halted);
    }

    #[test]
    fn push_pop_moves_sp() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(4, 0));
        vm.push(Storable::Integer(1)).unwrap();
        vm.push(Storable::Integer(2)).unwrap();
        assert_eq!(vm.register(Register::SP), Some(Storable::Address(1)));
        assert_eq!(vm.stack()[1], Some(Storable::Integer(2)));
        assert_eq!(vm.pop(), Ok(Storable::Integer(2)));
        assert_eq!(vm.pop(), Ok(Storable::Integer(1)));
        assert_eq!(vm.register(Register::SP), Some(Storable::Address(3)));
        assert_eq!(vm.stack(), &[None, None, None, None]);
    }

    #[test]
    fn push_overflow() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(2, 0));
        vm.push(Storable::Bool(true)).unwrap();
        assert_eq!(
            vm.push(Storable::Bool(true)),
            Err(RuntimeError::StackOverflow { at: 0 })
        );
        // SP is untouched by the failed push.
        assert_eq!(vm.register(Register::SP), Some(Storable::Address(0)));
    }

    #[test]
    fn pop_empty_underflows() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(3, 0));
        assert_eq!(vm.pop(), Err(RuntimeError::StackUnderflow { at: 0 }));
        assert_eq!(vm.register(Register::SP), Some(Storable::Address(2)));
    }

    #[test]
    fn pop_one_past_last_slot_underflows() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(3, 0));
        vm.registers.set(Register::SP, Storable::Address(3));
        assert_eq!(vm.pop(), Err(RuntimeError::StackUnderflow { at: 0 }));
        assert_eq!(vm.register(Register::SP), Some(Storable::Address(3)));
    }

    #[test]
    fn allocate_bumps_hp() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(1, 4));
        assert_eq!(vm.allocate(3), Ok(0));
        assert_eq!(vm.allocate(1), Ok(3));
        assert_eq!(vm.register(Register::HP), Some(Storable::Address(4)));
        assert_eq!(vm.allocate(0), Ok(4));
        assert_eq!(
            vm.allocate(1),
            Err(RuntimeError::OutOfMemory {
                at: 0,
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn allocate_negative() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(1, 4));
        assert_eq!(
            vm.allocate(-1),
            Err(RuntimeError::NegativeAllocation { at: 0, size: -1 })
        );
    }

    #[test]
    fn store_load_bounds() {
        let program = Program::default();
        let mut vm = Runtime::new(&program, config(1, 2));
        vm.store(1, Storable::Char('k')).unwrap();
        assert_eq!(vm.load(1), Ok(Some(Storable::Char('k'))));
        assert_eq!(vm.load(0), Ok(None));
        assert_eq!(
            vm.store(2, Storable::Integer(0)),
            Err(RuntimeError::HeapOutOfBounds { at: 0, address: 2 })
        );
        assert_eq!(
            vm.load(-1),
            Err(RuntimeError::HeapOutOfBounds { at: 0, address: -1 })
        );
    }
}
