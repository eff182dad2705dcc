//! Operand resolution: turning operand words into values, stack slots,
//! heap addresses, registers and jump targets.
//!
//! Resolution reads the live register table, so offsets always see the
//! BP/SP values current at the moment the instruction runs.

use crate::error::RuntimeError;
use crate::machine::Runtime;
use regvm_common::{
    Address, Offset, Opcode, Operand, Register, SpecialRegister, Storable,
};

impl<'a> Runtime<'a> {
    /// Read a register, faulting if it was never written.
    pub(crate) fn read_register(&self, register: Register) -> Result<Storable, RuntimeError> {
        self.registers
            .get(register)
            .ok_or(RuntimeError::NilRegister {
                at: self.at,
                register,
            })
    }

    /// Absolute stack index of `base + displacement`.
    pub(crate) fn stack_index(&self, offset: Offset) -> Result<usize, RuntimeError> {
        let base = self.pointer(offset.base.register())?;
        let index = base.saturating_add(offset.displacement);
        if index < 0 || index as usize >= self.stack.capacity() {
            return Err(RuntimeError::StackOutOfBounds { at: self.at, index });
        }
        Ok(index as usize)
    }

    /// Resolve an operand used as a value source.
    ///
    /// Registers, offsets and immediates yield their value; a heap address
    /// yields itself as `Storable::Address`. Program addresses are not
    /// values.
    pub(crate) fn read_value(
        &self,
        opcode: Opcode,
        operand: Operand,
    ) -> Result<Storable, RuntimeError> {
        match operand {
            Operand::Register(register) => self.read_register(register),
            Operand::Immediate(imm) => Ok(imm.to_storable()),
            Operand::Offset(offset) => {
                let index = self.stack_index(offset)?;
                self.stack
                    .get(index)
                    .flatten()
                    .ok_or(RuntimeError::UninitializedStackSlot { at: self.at, index })
            }
            Operand::Address(Address::Heap(a)) => Ok(Storable::Address(a as i64)),
            Operand::Address(Address::Program(_)) => Err(self.unsupported(opcode, operand)),
        }
    }

    /// Resolve an operand that names a heap slot.
    pub(crate) fn heap_address(
        &self,
        opcode: Opcode,
        operand: Operand,
    ) -> Result<i64, RuntimeError> {
        match self.read_value(opcode, operand)? {
            Storable::Address(a) => Ok(a),
            other => Err(RuntimeError::TypeMismatch {
                at: self.at,
                opcode,
                expected: "Address",
                found: other.type_tag(),
            }),
        }
    }

    /// Resolve a destination operand. Only registers are writable.
    pub(crate) fn destination(
        &self,
        opcode: Opcode,
        operand: Operand,
    ) -> Result<Register, RuntimeError> {
        match operand {
            Operand::Register(register) => Ok(register),
            other => Err(self.unsupported(opcode, other)),
        }
    }

    /// Resolve a jump or call target. Only program addresses qualify.
    pub(crate) fn jump_target(
        &self,
        opcode: Opcode,
        operand: Operand,
    ) -> Result<usize, RuntimeError> {
        match operand {
            Operand::Address(Address::Program(target)) => Ok(target),
            other => Err(self.unsupported(opcode, other)),
        }
    }

    /// Write `value` into `register`, applying the coercion rules of its
    /// group. Nothing changes if the write is rejected.
    pub(crate) fn write_register(
        &mut self,
        opcode: Opcode,
        register: Register,
        value: Storable,
    ) -> Result<(), RuntimeError> {
        let value = self.coerce(opcode, register, value)?;
        self.registers.set(register, value);
        Ok(())
    }

    /// The value `register` would hold after writing `value`.
    ///
    /// - Special: Integer becomes Address, Address is kept, anything else is
    ///   a type mismatch. PC must stay in `[0, program length]`, SP in
    ///   `[0, stack size]`, HP in `[0, heap size]`.
    /// - General purpose: any value, unchanged.
    /// - Flag: Bool only.
    pub(crate) fn coerce(
        &self,
        opcode: Opcode,
        register: Register,
        value: Storable,
    ) -> Result<Storable, RuntimeError> {
        match register {
            Register::Special(special) => {
                let addr = match value {
                    Storable::Integer(v) | Storable::Address(v) => v,
                    other => {
                        return Err(RuntimeError::TypeMismatch {
                            at: self.at,
                            opcode,
                            expected: "Integer or Address",
                            found: other.type_tag(),
                        })
                    }
                };
                self.check_pointer(special, addr)?;
                Ok(Storable::Address(addr))
            }
            Register::GeneralPurpose(_) => Ok(value),
            Register::Flag(_) => match value {
                Storable::Bool(_) => Ok(value),
                other => Err(RuntimeError::TypeMismatch {
                    at: self.at,
                    opcode,
                    expected: "Bool",
                    found: other.type_tag(),
                }),
            },
        }
    }

    fn check_pointer(&self, register: SpecialRegister, addr: i64) -> Result<(), RuntimeError> {
        let in_range = |limit: usize| addr >= 0 && addr as usize <= limit;
        match register {
            SpecialRegister::Pc if !in_range(self.program.len()) => {
                Err(RuntimeError::InvalidJumpTarget {
                    at: self.at,
                    target: addr,
                })
            }
            SpecialRegister::Sp if !in_range(self.stack.capacity()) => {
                Err(RuntimeError::StackOutOfBounds {
                    at: self.at,
                    index: addr,
                })
            }
            SpecialRegister::Hp if !in_range(self.heap.capacity()) => {
                Err(RuntimeError::HeapOutOfBounds {
                    at: self.at,
                    address: addr,
                })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn unsupported(&self, opcode: Opcode, operand: Operand) -> RuntimeError {
        RuntimeError::UnsupportedOperand {
            at: self.at,
            opcode,
            operand,
        }
    }
}
