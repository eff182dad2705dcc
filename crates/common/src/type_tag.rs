//! Runtime type tags.
//!
//! Every storable value and every immediate carries exactly one tag.
//! Type checks in the engine and verifier compare tags rather than
//! matching payloads.

use std::fmt;

/// Identifies the kind of a storable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Signed 64-bit integer.
    Integer,
    /// Unicode codepoint.
    Char,
    /// Boolean.
    Bool,
    /// Absolute location (heap slot, stack slot or program word).
    Address,
}

impl TypeTag {
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Integer => "Integer",
            TypeTag::Char => "Char",
            TypeTag::Bool => "Bool",
            TypeTag::Address => "Address",
        }
    }

    /// Returns true if values of this tag support arithmetic (Integer, Address).
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Integer | TypeTag::Address)
    }

    /// Returns true if values of this tag are totally ordered for LT/LE.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, TypeTag::Bool)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
