//! The slang type system: a closed set of primitive types.

use std::fmt;

/// A type. Two types are the same type exactly when they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Int,
    Double,
    Bool,
    String,
    Void,
    /// The type of an expression that failed to bind. Never reported again.
    Error,
}

impl TypeSymbol {
    /// Resolve a type name as written in a type clause.
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        match name {
            "int" => Some(TypeSymbol::Int),
            "double" => Some(TypeSymbol::Double),
            "bool" => Some(TypeSymbol::Bool),
            "string" => Some(TypeSymbol::String),
            "void" => Some(TypeSymbol::Void),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeSymbol::Int => "int",
            TypeSymbol::Double => "double",
            TypeSymbol::Bool => "bool",
            TypeSymbol::String => "string",
            TypeSymbol::Void => "void",
            TypeSymbol::Error => "?",
        }
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == TypeSymbol::Error
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, TypeSymbol::Int | TypeSymbol::Double)
    }

    /// Whether a variable or parameter may have this type.
    #[inline]
    pub fn is_value_type(self) -> bool {
        !matches!(self, TypeSymbol::Void | TypeSymbol::Error)
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_round_trips_names() {
        for ty in [
            TypeSymbol::Int,
            TypeSymbol::Double,
            TypeSymbol::Bool,
            TypeSymbol::String,
            TypeSymbol::Void,
        ] {
            assert_eq!(TypeSymbol::lookup(ty.name()), Some(ty));
        }
        assert_eq!(TypeSymbol::lookup("?"), None);
        assert_eq!(TypeSymbol::lookup("Int"), None);
    }
}
