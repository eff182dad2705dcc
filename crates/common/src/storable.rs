//! Values that can live in a register, stack slot or heap slot.

use std::fmt;

use crate::type_tag::TypeTag;

/// Runtime value representation.
///
/// Opcodes, offsets and program addresses never appear here; they only
/// exist in the program stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storable {
    /// Signed 64-bit integer.
    Integer(i64),
    /// Unicode codepoint.
    Char(char),
    /// Boolean value.
    Bool(bool),
    /// Absolute location. Signed so that pointer arithmetic can step below
    /// zero; bounds are checked when the address is used.
    Address(i64),
}

impl Storable {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Storable::Integer(_) => TypeTag::Integer,
            Storable::Char(_) => TypeTag::Char,
            Storable::Bool(_) => TypeTag::Bool,
            Storable::Address(_) => TypeTag::Address,
        }
    }

    /// Integer view of the value, used for ordering comparisons.
    ///
    /// Bools have no ordering and return `None`.
    pub fn ordinal(&self) -> Option<i64> {
        match self {
            Storable::Integer(v) | Storable::Address(v) => Some(*v),
            Storable::Char(c) => Some(*c as i64),
            Storable::Bool(_) => None,
        }
    }
}

impl fmt::Display for Storable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storable::Integer(v) => write!(f, "{v}"),
            Storable::Char(c) => write!(f, "{c:?}"),
            Storable::Bool(b) => write!(f, "{b}"),
            Storable::Address(a) => write!(f, "@{a:+}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags() {
        assert_eq!(Storable::Integer(42).type_tag(), TypeTag::Integer);
        assert_eq!(Storable::Char('a').type_tag(), TypeTag::Char);
        assert_eq!(Storable::Bool(true).type_tag(), TypeTag::Bool);
        assert_eq!(Storable::Address(0).type_tag(), TypeTag::Address);
    }

    #[test]
    fn equality_is_kind_sensitive() {
        assert_eq!(Storable::Integer(1), Storable::Integer(1));
        assert_ne!(Storable::Integer(1), Storable::Address(1));
        assert_ne!(Storable::Bool(true), Storable::Integer(1));
    }

    #[test]
    fn display() {
        assert_eq!(Storable::Integer(-7).to_string(), "-7");
        assert_eq!(Storable::Char('a').to_string(), "'a'");
        assert_eq!(Storable::Bool(false).to_string(), "false");
        assert_eq!(Storable::Address(0).to_string(), "@+0");
        assert_eq!(Storable::Address(-2).to_string(), "@-2");
    }

    #[test]
    fn ordinals() {
        assert_eq!(Storable::Integer(5).ordinal(), Some(5));
        assert_eq!(Storable::Address(9).ordinal(), Some(9));
        assert_eq!(Storable::Char('A').ordinal(), Some(65));
        assert_eq!(Storable::Bool(true).ordinal(), None);
    }
}
