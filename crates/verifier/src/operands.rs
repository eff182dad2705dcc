//! Operand-shape and immediate-type checks.
//!
//! Only what is knowable without running the program is checked here:
//! operand kinds per position, and the types of immediates and heap
//! addresses. Register and stack contents are left to the engine.

use crate::error::VerifyError;
use crate::structural::ProgramLayout;
use regvm_common::{Address, Immediate, Instruction, Opcode, Operand, Register, TypeTag};

/// Run the operand pass over every well-formed instruction.
pub fn check_operands(layout: &ProgramLayout) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    for (at, instr) in &layout.instructions {
        check_instruction(*at, instr, &mut errors);
    }
    errors
}

fn check_instruction(at: usize, instr: &Instruction, errors: &mut Vec<VerifyError>) {
    let opcode = instr.opcode;
    let ops = &instr.operands;
    let mut ctx = Checker { at, opcode, errors };

    match opcode {
        Opcode::Nop | Opcode::Ret => {}

        Opcode::Mov => {
            if let Some(register) = ctx.destination(ops[0]) {
                if ctx.value_source(ops[1]) {
                    ctx.register_accepts(register, ops[1]);
                }
            } else {
                ctx.value_source(ops[1]);
            }
        }
        Opcode::Push => {
            ctx.value_source(ops[0]);
        }
        Opcode::Pop => {
            ctx.destination(ops[0]);
        }

        Opcode::Alloc => {
            if ctx.value_source(ops[0]) {
                ctx.alloc_size(ops[0]);
            }
        }
        Opcode::Store => {
            ctx.heap_address(ops[0]);
            ctx.value_source(ops[1]);
        }
        Opcode::Load => {
            ctx.destination(ops[0]);
            ctx.heap_address(ops[1]);
        }

        Opcode::Add | Opcode::Sub => {
            if let Some(register) = ctx.destination(ops[0]) {
                if register.is_flag() {
                    ctx.unsupported(ops[0]);
                }
            }
            ctx.integer_immediate(ops[1]);
        }

        Opcode::Eq | Opcode::Ne => {
            ctx.value_source(ops[0]);
            ctx.value_source(ops[1]);
        }
        Opcode::Lt | Opcode::Le => {
            let lhs = ctx.value_source(ops[0]);
            let rhs = ctx.value_source(ops[1]);
            if lhs && rhs {
                ctx.ordered_pair(ops[0], ops[1]);
            }
        }

        Opcode::Jmp | Opcode::Je | Opcode::Jne | Opcode::Call => {
            if !matches!(ops[0], Operand::Address(Address::Program(_))) {
                ctx.unsupported(ops[0]);
            }
        }
    }
}

/// The statically known kind of an operand's value, if any.
fn static_kind(operand: Operand) -> Option<TypeTag> {
    match operand {
        Operand::Immediate(imm) => Some(imm.type_tag()),
        Operand::Address(Address::Heap(_)) => Some(TypeTag::Address),
        _ => None,
    }
}

struct Checker<'e> {
    at: usize,
    opcode: Opcode,
    errors: &'e mut Vec<VerifyError>,
}

impl Checker<'_> {
    fn unsupported(&mut self, operand: Operand) {
        self.errors.push(VerifyError::UnsupportedOperand {
            at: self.at,
            opcode: self.opcode,
            operand,
        });
    }

    fn mismatch(&mut self, expected: &'static str, found: TypeTag) {
        self.errors.push(VerifyError::TypeMismatch {
            at: self.at,
            opcode: self.opcode,
            expected,
            found,
        });
    }

    /// Registers are the only writable operands.
    fn destination(&mut self, operand: Operand) -> Option<Register> {
        match operand {
            Operand::Register(register) => Some(register),
            other => {
                self.unsupported(other);
                None
            }
        }
    }

    /// Everything but a program address can be read as a value.
    fn value_source(&mut self, operand: Operand) -> bool {
        if let Operand::Address(Address::Program(_)) = operand {
            self.unsupported(operand);
            return false;
        }
        true
    }

    /// Immediates written to special or flag registers must survive the
    /// register's coercion.
    fn register_accepts(&mut self, register: Register, source: Operand) {
        let Some(kind) = static_kind(source) else {
            return;
        };
        if register.is_special() && !kind.is_numeric() {
            self.mismatch("Integer or Address", kind);
        } else if register.is_flag() && kind != TypeTag::Bool {
            self.mismatch("Bool", kind);
        }
    }

    fn alloc_size(&mut self, operand: Operand) {
        match operand {
            Operand::Immediate(Immediate::Integer(size)) if size < 0 => {
                self.errors
                    .push(VerifyError::NegativeAllocation { at: self.at, size });
            }
            _ => match static_kind(operand) {
                Some(kind) if kind != TypeTag::Integer => self.mismatch("Integer", kind),
                _ => {}
            },
        }
    }

    fn heap_address(&mut self, operand: Operand) {
        if !self.value_source(operand) {
            return;
        }
        match static_kind(operand) {
            Some(kind) if kind != TypeTag::Address => self.mismatch("Address", kind),
            _ => {}
        }
    }

    fn integer_immediate(&mut self, operand: Operand) {
        match operand {
            Operand::Immediate(Immediate::Integer(_)) => {}
            Operand::Immediate(other) => self.mismatch("Integer", other.type_tag()),
            other => self.unsupported(other),
        }
    }

    fn ordered_pair(&mut self, lhs: Operand, rhs: Operand) {
        let lhs = static_kind(lhs);
        let rhs = static_kind(rhs);
        for kind in [lhs, rhs].into_iter().flatten() {
            if !kind.is_ordered() {
                self.mismatch("Integer, Char or Address", kind);
                return;
            }
        }
        if let (Some(l), Some(r)) = (lhs, rhs) {
            if l != r {
                self.mismatch(l.name(), r);
            }
        }
    }
}
