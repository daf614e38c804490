//! The conversion lattice between types.

use crate::types::TypeSymbol;

/// How a value of one type becomes a value of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// No conversion exists.
    None,
    /// Same type.
    Identity,
    /// Lossless widening, applied without being asked for.
    Implicit,
    /// Lossy or fallible; must be written as `type(value)` except in calls.
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        use TypeSymbol::*;
        if from == to {
            return Conversion::Identity;
        }
        match (from, to) {
            (Void | Error, _) | (_, Void | Error) => Conversion::None,
            (_, String) => Conversion::Explicit,
            (String, Bool | Int | Double) => Conversion::Explicit,
            (Double, Int) => Conversion::Explicit,
            (Int, Double) => Conversion::Implicit,
            _ => Conversion::None,
        }
    }

    /// Overload ranking cost: lower is a closer match. `None` when the
    /// conversion does not exist.
    pub fn cost(self) -> Option<u8> {
        match self {
            Conversion::None => None,
            Conversion::Identity => Some(0),
            Conversion::Implicit => Some(1),
            Conversion::Explicit => Some(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use TypeSymbol::*;

    const VALUE_TYPES: [TypeSymbol; 4] = [Int, Double, Bool, String];

    #[test]
    fn test_int_double() {
        assert_eq!(Conversion::classify(Int, Double), Conversion::Implicit);
        assert_eq!(Conversion::classify(Double, Int), Conversion::Explicit);
    }

    #[test]
    fn test_everything_converts_to_string_explicitly() {
        for from in [Int, Double, Bool] {
            assert_eq!(Conversion::classify(from, String), Conversion::Explicit);
            assert_eq!(Conversion::classify(String, from), Conversion::Explicit);
        }
    }

    #[test]
    fn test_bool_and_numbers_do_not_mix() {
        assert_eq!(Conversion::classify(Bool, Int), Conversion::None);
        assert_eq!(Conversion::classify(Int, Bool), Conversion::None);
        assert_eq!(Conversion::classify(Double, Bool), Conversion::None);
    }

    #[test]
    fn test_implicit_conversions_are_one_way() {
        for from in VALUE_TYPES {
            for to in VALUE_TYPES {
                let there = Conversion::classify(from, to);
                if from == to {
                    assert_eq!(there, Conversion::Identity);
                    continue;
                }
                assert_ne!(there, Conversion::Identity);
                if there == Conversion::Implicit {
                    assert_ne!(Conversion::classify(to, from), Conversion::Implicit, "{} <-> {}", from, to);
                }
            }
        }
    }

    #[test]
    fn test_void_never_converts() {
        for ty in VALUE_TYPES {
            assert_eq!(Conversion::classify(Void, ty), Conversion::None);
            assert_eq!(Conversion::classify(ty, Void), Conversion::None);
        }
    }

    #[test]
    fn test_cost_orders_identity_implicit_explicit() {
        let identity = Conversion::classify(Int, Int).cost();
        let implicit = Conversion::classify(Int, Double).cost();
        let explicit = Conversion::classify(Double, Int).cost();
        assert!(identity < implicit);
        assert!(implicit < explicit);
        assert_eq!(Conversion::classify(Bool, Int).cost(), None);
    }
}
