//! Operator tables: which operand types each operator accepts and what it yields.

use slang_ast::syntax_kind::SyntaxKind;

use crate::types::TypeSymbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

impl BoundUnaryOperator {
    const fn new(
        syntax_kind: SyntaxKind,
        kind: BoundUnaryOperatorKind,
        operand_type: TypeSymbol,
    ) -> Self {
        Self {
            syntax_kind,
            kind,
            operand_type,
            result_type: operand_type,
        }
    }

    pub fn bind(syntax_kind: SyntaxKind, operand_type: TypeSymbol) -> Option<BoundUnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
            .copied()
    }
}

const UNARY_OPERATORS: &[BoundUnaryOperator] = {
    use BoundUnaryOperatorKind::*;
    use SyntaxKind::*;
    &[
        BoundUnaryOperator::new(PlusToken, Identity, TypeSymbol::Int),
        BoundUnaryOperator::new(PlusToken, Identity, TypeSymbol::Double),
        BoundUnaryOperator::new(MinusToken, Negation, TypeSymbol::Int),
        BoundUnaryOperator::new(MinusToken, Negation, TypeSymbol::Double),
        BoundUnaryOperator::new(ExclamationToken, LogicalNegation, TypeSymbol::Bool),
    ]
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundBinaryOperatorKind,
    /// Both operands have this type once the operator is applied; a mixed
    /// int/double pair is widened to double first.
    pub operand_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

impl BoundBinaryOperator {
    const fn new(
        syntax_kind: SyntaxKind,
        kind: BoundBinaryOperatorKind,
        operand_type: TypeSymbol,
        result_type: TypeSymbol,
    ) -> Self {
        Self {
            syntax_kind,
            kind,
            operand_type,
            result_type,
        }
    }

    pub fn bind(
        syntax_kind: SyntaxKind,
        left_type: TypeSymbol,
        right_type: TypeSymbol,
    ) -> Option<BoundBinaryOperator> {
        let operand_type = if left_type == right_type {
            left_type
        } else if left_type.is_numeric() && right_type.is_numeric() {
            TypeSymbol::Double
        } else {
            return None;
        };
        BINARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
            .copied()
    }
}

const BINARY_OPERATORS: &[BoundBinaryOperator] = {
    use BoundBinaryOperatorKind::*;
    use SyntaxKind::*;
    use TypeSymbol::{Bool, Double, Int};
    const STRING: TypeSymbol = TypeSymbol::String;
    &[
        // Arithmetic
        BoundBinaryOperator::new(PlusToken, Addition, Int, Int),
        BoundBinaryOperator::new(MinusToken, Subtraction, Int, Int),
        BoundBinaryOperator::new(AsteriskToken, Multiplication, Int, Int),
        BoundBinaryOperator::new(SlashToken, Division, Int, Int),
        BoundBinaryOperator::new(PlusToken, Addition, Double, Double),
        BoundBinaryOperator::new(MinusToken, Subtraction, Double, Double),
        BoundBinaryOperator::new(AsteriskToken, Multiplication, Double, Double),
        BoundBinaryOperator::new(SlashToken, Division, Double, Double),
        BoundBinaryOperator::new(PlusToken, Addition, STRING, STRING),
        // Comparison
        BoundBinaryOperator::new(LessThanToken, Less, Int, Bool),
        BoundBinaryOperator::new(LessThanEqualsToken, LessOrEquals, Int, Bool),
        BoundBinaryOperator::new(GreaterThanToken, Greater, Int, Bool),
        BoundBinaryOperator::new(GreaterThanEqualsToken, GreaterOrEquals, Int, Bool),
        BoundBinaryOperator::new(LessThanToken, Less, Double, Bool),
        BoundBinaryOperator::new(LessThanEqualsToken, LessOrEquals, Double, Bool),
        BoundBinaryOperator::new(GreaterThanToken, Greater, Double, Bool),
        BoundBinaryOperator::new(GreaterThanEqualsToken, GreaterOrEquals, Double, Bool),
        // Equality
        BoundBinaryOperator::new(EqualsEqualsToken, Equals, Int, Bool),
        BoundBinaryOperator::new(ExclamationEqualsToken, NotEquals, Int, Bool),
        BoundBinaryOperator::new(EqualsEqualsToken, Equals, Double, Bool),
        BoundBinaryOperator::new(ExclamationEqualsToken, NotEquals, Double, Bool),
        BoundBinaryOperator::new(EqualsEqualsToken, Equals, Bool, Bool),
        BoundBinaryOperator::new(ExclamationEqualsToken, NotEquals, Bool, Bool),
        BoundBinaryOperator::new(EqualsEqualsToken, Equals, STRING, Bool),
        BoundBinaryOperator::new(ExclamationEqualsToken, NotEquals, STRING, Bool),
        // Logical
        BoundBinaryOperator::new(AmpersandAmpersandToken, LogicalAnd, Bool, Bool),
        BoundBinaryOperator::new(BarBarToken, LogicalOr, Bool, Bool),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_arithmetic_widens_to_double() {
        let op = BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::Int, TypeSymbol::Double)
            .expect("operator");
        assert_eq!(op.operand_type, TypeSymbol::Double);
        assert_eq!(op.result_type, TypeSymbol::Double);

        let op = BoundBinaryOperator::bind(SyntaxKind::LessThanToken, TypeSymbol::Double, TypeSymbol::Int)
            .expect("operator");
        assert_eq!(op.result_type, TypeSymbol::Bool);
    }

    #[test]
    fn test_string_concatenation_only() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::String, TypeSymbol::String).is_some());
        assert!(BoundBinaryOperator::bind(SyntaxKind::MinusToken, TypeSymbol::String, TypeSymbol::String).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::String, TypeSymbol::Int).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::LessThanToken, TypeSymbol::String, TypeSymbol::String).is_none());
    }

    #[test]
    fn test_logical_operators_need_bools() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::AmpersandAmpersandToken, TypeSymbol::Int, TypeSymbol::Int).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::BarBarToken, TypeSymbol::Bool, TypeSymbol::Bool).is_some());
    }

    #[test]
    fn test_unary_operators() {
        let op = BoundUnaryOperator::bind(SyntaxKind::MinusToken, TypeSymbol::Double).expect("operator");
        assert_eq!(op.kind, BoundUnaryOperatorKind::Negation);
        assert_eq!(op.result_type, TypeSymbol::Double);
        assert!(BoundUnaryOperator::bind(SyntaxKind::ExclamationToken, TypeSymbol::Int).is_none());
        assert!(BoundUnaryOperator::bind(SyntaxKind::MinusToken, TypeSymbol::Bool).is_none());
    }
}
