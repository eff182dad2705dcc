//! Memory areas: the register table, the stack and the heap.
//!
//! These are plain slot containers. Pointer registers, bounds faults and
//! calling conventions live on [`Runtime`](crate::Runtime), which owns one of
//! each.

use regvm_common::register::{ALL_REGISTERS, REGISTER_COUNT};
use regvm_common::{Register, Storable};

/// One optional value per register. `None` means "never written".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterTable {
    slots: [Option<Storable>; REGISTER_COUNT],
}

impl RegisterTable {
    /// A table with every register unset.
    pub fn empty() -> Self {
        Self {
            slots: [None; REGISTER_COUNT],
        }
    }

    pub fn get(&self, register: Register) -> Option<Storable> {
        self.slots[register.index()]
    }

    pub fn set(&mut self, register: Register, value: Storable) {
        self.slots[register.index()] = Some(value);
    }

    /// Every register with its current value, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, Option<Storable>)> + '_ {
        ALL_REGISTERS
            .into_iter()
            .map(move |register| (register, self.slots[register.index()]))
    }
}

/// Fixed-capacity slot array. Used for both the stack and the heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots {
    slots: Vec<Option<Storable>>,
}

impl Slots {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// `None` if `index` is out of bounds, `Some(None)` if the slot is unset.
    pub fn get(&self, index: usize) -> Option<Option<Storable>> {
        self.slots.get(index).copied()
    }

    /// Returns false if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: Storable) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Remove and return the value at `index`, leaving the slot unset.
    pub fn take(&mut self, index: usize) -> Option<Storable> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn as_slice(&self) -> &[Option<Storable>] {
        &self.slots
    }
}
