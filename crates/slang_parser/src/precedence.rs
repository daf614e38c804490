//! Operator precedence for binary and unary operators.

use slang_ast::syntax_kind::SyntaxKind;

/// Operator precedence levels, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    LogicalOr = 10,
    LogicalAnd = 20,
    Equality = 30,
    Relational = 40,
    Additive = 50,
    Multiplicative = 60,
    Unary = 70,
    Invalid = 255,
}

/// Get the binary operator precedence for a given token kind.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::EqualsEqualsToken | SyntaxKind::ExclamationEqualsToken => {
            OperatorPrecedence::Equality
        }
        SyntaxKind::LessThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::GreaterThanEqualsToken => OperatorPrecedence::Relational,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken => OperatorPrecedence::Multiplicative,
        _ => OperatorPrecedence::Invalid,
    }
}

/// Get the prefix operator precedence for a given token kind.
pub fn get_unary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::PlusToken | SyntaxKind::MinusToken | SyntaxKind::ExclamationToken => {
            OperatorPrecedence::Unary
        }
        _ => OperatorPrecedence::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        let or = get_binary_operator_precedence(SyntaxKind::BarBarToken);
        let and = get_binary_operator_precedence(SyntaxKind::AmpersandAmpersandToken);
        let eq = get_binary_operator_precedence(SyntaxKind::EqualsEqualsToken);
        let lt = get_binary_operator_precedence(SyntaxKind::LessThanToken);
        let add = get_binary_operator_precedence(SyntaxKind::PlusToken);
        let mul = get_binary_operator_precedence(SyntaxKind::AsteriskToken);
        let neg = get_unary_operator_precedence(SyntaxKind::MinusToken);
        assert!(or < and && and < eq && eq < lt && lt < add && add < mul && mul < neg);
        assert_eq!(mul as u8, 60);
    }

    #[test]
    fn test_non_operators() {
        assert_eq!(
            get_binary_operator_precedence(SyntaxKind::EqualsToken),
            OperatorPrecedence::Invalid
        );
        assert_eq!(
            get_unary_operator_precedence(SyntaxKind::AsteriskToken),
            OperatorPrecedence::Invalid
        );
    }
}
