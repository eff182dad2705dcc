//! Main execution loop and opcode dispatch for the regvm engine.

use crate::error::RuntimeError;
use crate::machine::{Runtime, State};
use regvm_common::{DecodeError, Immediate, Instruction, Opcode, Operand, Register, Storable, Word};

/// What the program counter does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Advance past the instruction's operands.
    Next,
    /// The instruction already wrote PC.
    Transfer,
}

impl Flow {
    fn after_write(register: Register) -> Self {
        if register == Register::PC {
            Flow::Transfer
        } else {
            Flow::Next
        }
    }
}

impl<'a> Runtime<'a> {
    /// Execute the program until it halts or faults.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        loop {
            if self.step()? != State::Running {
                return Ok(());
            }
        }
    }

    /// Execute at most `max_steps` instructions and report where the
    /// program stands. Lets an embedder bound or interleave execution.
    pub fn run_for(&mut self, max_steps: u64) -> Result<State, RuntimeError> {
        for _ in 0..max_steps {
            if self.step()? != State::Running {
                break;
            }
        }
        Ok(self.state())
    }

    /// Execute exactly one instruction.
    ///
    /// A halted runtime stays halted; a faulted one returns its fault again.
    pub fn step(&mut self) -> Result<State, RuntimeError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.state() == State::Halted {
            return Ok(State::Halted);
        }

        match self.step_inner() {
            Ok(()) => {
                self.steps += 1;
                Ok(self.state())
            }
            Err(e) => {
                vm_trace!("[vm] fault: {e}");
                self.fault = Some(e.clone());
                Err(e)
            }
        }
    }

    fn step_inner(&mut self) -> Result<(), RuntimeError> {
        let pc = self.pointer(Register::PC)? as usize;
        self.at = pc;

        let instr = self
            .program
            .decode_at(pc)
            .map_err(|e| self.decode_fault(e))?;
        vm_trace!("[vm] {pc:04}  {instr}");

        if self.dispatch(&instr)? == Flow::Next {
            let next = (pc + instr.width()) as i64;
            self.registers.set(Register::PC, Storable::Address(next));
        }
        Ok(())
    }

    fn decode_fault(&self, e: DecodeError) -> RuntimeError {
        match e {
            DecodeError::NotAnOpcode { at, word } => RuntimeError::UnsupportedWord { at, word },
            DecodeError::OpcodeInOperandPosition { at, found, .. } => {
                RuntimeError::UnsupportedWord {
                    at,
                    word: Word::Opcode(found),
                }
            }
            DecodeError::Truncated { at, opcode, .. } => {
                RuntimeError::UnexpectedEndOfProgram { at, opcode }
            }
            // `step` only decodes inside the program, and `decode` never
            // checks arity against a caller-built operand list.
            e @ (DecodeError::OutOfRange { .. } | DecodeError::ArityMismatch { .. }) => {
                RuntimeError::Decode {
                    at: self.at,
                    source: e,
                }
            }
        }
    }

    fn dispatch(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let ops = &instr.operands;
        match instr.opcode {
            Opcode::Nop => Ok(Flow::Next),

            // Data movement
            Opcode::Mov => self.exec_mov(ops[0], ops[1]),
            Opcode::Push => self.exec_push(ops[0]),
            Opcode::Pop => self.exec_pop(ops[0]),

            // Heap
            Opcode::Alloc => self.exec_alloc(ops[0]),
            Opcode::Store => self.exec_store(ops[0], ops[1]),
            Opcode::Load => self.exec_load(ops[0], ops[1]),

            // Arithmetic
            Opcode::Add => self.exec_arith(Opcode::Add, ops[0], ops[1], i64::wrapping_add),
            Opcode::Sub => self.exec_arith(Opcode::Sub, ops[0], ops[1], i64::wrapping_sub),

            // Comparison
            Opcode::Eq | Opcode::Ne | Opcode::Lt | Opcode::Le => {
                self.exec_compare(instr.opcode, ops[0], ops[1])
            }

            // Control transfer
            Opcode::Jmp => self.exec_jump(Opcode::Jmp, ops[0], |_| true),
            Opcode::Je => self.exec_jump(Opcode::Je, ops[0], |zf| zf),
            Opcode::Jne => self.exec_jump(Opcode::Jne, ops[0], |zf| !zf),
            Opcode::Call => self.exec_call(ops[0], instr.width()),
            Opcode::Ret => self.exec_ret(),
        }
    }

    // ---- Data movement ----

    fn exec_mov(&mut self, dst: Operand, src: Operand) -> Result<Flow, RuntimeError> {
        let register = self.destination(Opcode::Mov, dst)?;
        let value = self.read_value(Opcode::Mov, src)?;
        self.write_register(Opcode::Mov, register, value)?;
        Ok(Flow::after_write(register))
    }

    fn exec_push(&mut self, src: Operand) -> Result<Flow, RuntimeError> {
        let value = self.read_value(Opcode::Push, src)?;
        self.push(value)?;
        Ok(Flow::Next)
    }

    fn exec_pop(&mut self, dst: Operand) -> Result<Flow, RuntimeError> {
        let register = self.destination(Opcode::Pop, dst)?;
        let (_, value) = self.top()?;
        let value = self.coerce(Opcode::Pop, register, value)?;
        self.pop()?;
        self.registers.set(register, value);
        Ok(Flow::after_write(register))
    }

    // ---- Heap ----

    fn exec_alloc(&mut self, size: Operand) -> Result<Flow, RuntimeError> {
        let size = match self.read_value(Opcode::Alloc, size)? {
            Storable::Integer(n) => n,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    at: self.at,
                    opcode: Opcode::Alloc,
                    expected: "Integer",
                    found: other.type_tag(),
                })
            }
        };
        self.push_slot()?;
        let base = self.allocate(size)?;
        self.push(Storable::Address(base))?;
        Ok(Flow::Next)
    }

    fn exec_store(&mut self, addr: Operand, src: Operand) -> Result<Flow, RuntimeError> {
        let address = self.heap_address(Opcode::Store, addr)?;
        let value = self.read_value(Opcode::Store, src)?;
        self.store(address, value)?;
        Ok(Flow::Next)
    }

    fn exec_load(&mut self, dst: Operand, addr: Operand) -> Result<Flow, RuntimeError> {
        let register = self.destination(Opcode::Load, dst)?;
        let address = self.heap_address(Opcode::Load, addr)?;
        let value = self
            .load(address)?
            .ok_or(RuntimeError::UninitializedHeapSlot {
                at: self.at,
                address: address as usize,
            })?;
        self.write_register(Opcode::Load, register, value)?;
        Ok(Flow::after_write(register))
    }

    // ---- Arithmetic ----

    /// ADD/SUB: `dst op= imm`, keeping the destination's kind, then
    /// ZF = (result == 0).
    fn exec_arith(
        &mut self,
        opcode: Opcode,
        dst: Operand,
        src: Operand,
        op: fn(i64, i64) -> i64,
    ) -> Result<Flow, RuntimeError> {
        let register = self.destination(opcode, dst)?;
        if register.is_flag() {
            return Err(self.unsupported(opcode, dst));
        }

        let imm = match src {
            Operand::Immediate(Immediate::Integer(v)) => v,
            Operand::Immediate(other) => {
                return Err(RuntimeError::TypeMismatch {
                    at: self.at,
                    opcode,
                    expected: "Integer",
                    found: other.type_tag(),
                })
            }
            other => return Err(self.unsupported(opcode, other)),
        };

        let (result, raw) = match self.read_register(register)? {
            Storable::Integer(v) => {
                let r = op(v, imm);
                (Storable::Integer(r), r)
            }
            Storable::Address(a) => {
                let r = op(a, imm);
                (Storable::Address(r), r)
            }
            other => {
                return Err(RuntimeError::TypeMismatch {
                    at: self.at,
                    opcode,
                    expected: "Integer or Address",
                    found: other.type_tag(),
                })
            }
        };

        self.write_register(opcode, register, result)?;
        self.registers.set(Register::ZF, Storable::Bool(raw == 0));
        Ok(Flow::after_write(register))
    }

    // ---- Comparison ----

    /// EQ/NE compare any two values structurally; LT/LE need both sides to
    /// share an ordered kind. The outcome goes to ZF.
    fn exec_compare(
        &mut self,
        opcode: Opcode,
        lhs: Operand,
        rhs: Operand,
    ) -> Result<Flow, RuntimeError> {
        let lhs = self.read_value(opcode, lhs)?;
        let rhs = self.read_value(opcode, rhs)?;

        let outcome = match opcode {
            Opcode::Eq => lhs == rhs,
            Opcode::Ne => lhs != rhs,
            _ => {
                let (a, b) = self.ordinals(opcode, lhs, rhs)?;
                if opcode == Opcode::Lt {
                    a < b
                } else {
                    a <= b
                }
            }
        };

        self.registers.set(Register::ZF, Storable::Bool(outcome));
        Ok(Flow::Next)
    }

    fn ordinals(
        &self,
        opcode: Opcode,
        lhs: Storable,
        rhs: Storable,
    ) -> Result<(i64, i64), RuntimeError> {
        if lhs.type_tag() != rhs.type_tag() {
            return Err(RuntimeError::TypeMismatch {
                at: self.at,
                opcode,
                expected: lhs.type_tag().name(),
                found: rhs.type_tag(),
            });
        }
        match (lhs.ordinal(), rhs.ordinal()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(RuntimeError::TypeMismatch {
                at: self.at,
                opcode,
                expected: "Integer, Char or Address",
                found: lhs.type_tag(),
            }),
        }
    }

    // ---- Control transfer ----

    fn zero_flag(&self) -> Result<bool, RuntimeError> {
        match self.read_register(Register::ZF)? {
            Storable::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeMismatch {
                at: self.at,
                opcode: self.current_opcode(),
                expected: "Bool",
                found: other.type_tag(),
            }),
        }
    }

    fn exec_jump(
        &mut self,
        opcode: Opcode,
        target: Operand,
        taken: fn(bool) -> bool,
    ) -> Result<Flow, RuntimeError> {
        let target = self.jump_target(opcode, target)?;
        if !taken(self.zero_flag()?) {
            return Ok(Flow::Next);
        }
        self.write_register(opcode, Register::PC, Storable::Address(target as i64))?;
        Ok(Flow::Transfer)
    }

    /// Push the address of the word after the CALL, then jump.
    fn exec_call(&mut self, target: Operand, width: usize) -> Result<Flow, RuntimeError> {
        let target = self.jump_target(Opcode::Call, target)?;
        let target = self.coerce(Opcode::Call, Register::PC, Storable::Address(target as i64))?;
        let return_address = (self.at + width) as i64;
        self.push(Storable::Address(return_address))?;
        self.registers.set(Register::PC, target);
        Ok(Flow::Transfer)
    }

    fn exec_ret(&mut self) -> Result<Flow, RuntimeError> {
        let target = match self.top()? {
            (_, Storable::Address(a)) => {
                self.coerce(Opcode::Ret, Register::PC, Storable::Address(a))?
            }
            (_, other) => {
                return Err(RuntimeError::TypeMismatch {
                    at: self.at,
                    opcode: Opcode::Ret,
                    expected: "Address",
                    found: other.type_tag(),
                })
            }
        };
        self.pop()?;
        self.registers.set(Register::PC, target);
        Ok(Flow::Transfer)
    }
}
