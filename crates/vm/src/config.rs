//! Memory-area capacities fixed at VM construction.

use crate::error::ConfigError;

/// Default number of stack slots.
pub const DEFAULT_STACK_SIZE: usize = 256;

/// Default number of heap slots.
pub const DEFAULT_HEAP_SIZE: usize = 256;

/// Stack and heap capacities.
///
/// Fields are private so that every `Config` is valid: the stack always has
/// at least one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    stack_size: usize,
    heap_size: usize,
}

impl Config {
    /// Create a configuration. The heap may be empty; the stack may not.
    pub fn new(stack_size: usize, heap_size: usize) -> Result<Self, ConfigError> {
        if stack_size == 0 {
            return Err(ConfigError::ZeroStackSize);
        }
        Ok(Self {
            stack_size,
            heap_size,
        })
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    pub fn heap_size(&self) -> usize {
        self.heap_size
    }

    pub fn with_stack_size(self, stack_size: usize) -> Result<Self, ConfigError> {
        Self::new(stack_size, self.heap_size)
    }

    pub fn with_heap_size(self, heap_size: usize) -> Result<Self, ConfigError> {
        Self::new(self.stack_size, heap_size)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            heap_size: DEFAULT_HEAP_SIZE,
        }
    }
}
