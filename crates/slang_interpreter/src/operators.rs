//! Operator and conversion semantics on runtime values.
//!
//! Dispatch is a plain match over operand values. The binder has already
//! picked the operator and widened mixed operands, so a pair of values that
//! matches no arm is an `OperandMismatch`.

use std::rc::Rc;

use slang_binder::{BoundBinaryOperatorKind, BoundUnaryOperatorKind, TypeSymbol};

use crate::value::{parse_bool, parse_double, parse_int, RuntimeValue};

/// Why an operation produced no value. The interpreter attaches the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    DivisionByZero,
    IntegerOverflow,
    InvalidConversion,
    /// The operand of this type is not accepted.
    Mismatch(&'static str),
}

pub type OpResult = Result<RuntimeValue, Fault>;

pub fn evaluate_unary(kind: BoundUnaryOperatorKind, operand: RuntimeValue) -> OpResult {
    use BoundUnaryOperatorKind::*;
    match (kind, operand) {
        (Identity, value @ (RuntimeValue::Int(_) | RuntimeValue::Double(_))) => Ok(value),
        (Negation, RuntimeValue::Int(value)) => value
            .checked_neg()
            .map(RuntimeValue::Int)
            .ok_or(Fault::IntegerOverflow),
        (Negation, RuntimeValue::Double(value)) => Ok(RuntimeValue::Double(-value)),
        (LogicalNegation, RuntimeValue::Bool(value)) => Ok(RuntimeValue::Bool(!value)),
        (_, other) => Err(Fault::Mismatch(other.type_name())),
    }
}

pub fn evaluate_binary(
    kind: BoundBinaryOperatorKind,
    left: &RuntimeValue,
    right: &RuntimeValue,
) -> OpResult {
    match (left, right) {
        (RuntimeValue::Int(a), RuntimeValue::Int(b)) => eval_int_binary(*a, *b, kind),
        (RuntimeValue::Double(a), RuntimeValue::Double(b)) => eval_double_binary(*a, *b, kind),
        (RuntimeValue::Bool(a), RuntimeValue::Bool(b)) => eval_bool_binary(*a, *b, kind),
        (RuntimeValue::String(a), RuntimeValue::String(b)) => eval_string_binary(a, b, kind),
        (RuntimeValue::Int(_) | RuntimeValue::Double(_) | RuntimeValue::Bool(_) | RuntimeValue::String(_), other)
        | (other, _) => Err(Fault::Mismatch(other.type_name())),
    }
}

#[inline]
fn checked_arith(result: Option<i64>) -> OpResult {
    result.map(RuntimeValue::Int).ok_or(Fault::IntegerOverflow)
}

fn eval_int_binary(a: i64, b: i64, kind: BoundBinaryOperatorKind) -> OpResult {
    use BoundBinaryOperatorKind::*;
    match kind {
        Addition => checked_arith(a.checked_add(b)),
        Subtraction => checked_arith(a.checked_sub(b)),
        Multiplication => checked_arith(a.checked_mul(b)),
        Division if b == 0 => Err(Fault::DivisionByZero),
        Division => checked_arith(a.checked_div(b)),
        Equals => Ok(RuntimeValue::Bool(a == b)),
        NotEquals => Ok(RuntimeValue::Bool(a != b)),
        Less => Ok(RuntimeValue::Bool(a < b)),
        LessOrEquals => Ok(RuntimeValue::Bool(a <= b)),
        Greater => Ok(RuntimeValue::Bool(a > b)),
        GreaterOrEquals => Ok(RuntimeValue::Bool(a >= b)),
        LogicalAnd | LogicalOr => Err(Fault::Mismatch("int")),
    }
}

fn eval_double_binary(a: f64, b: f64, kind: BoundBinaryOperatorKind) -> OpResult {
    use BoundBinaryOperatorKind::*;
    let value = match kind {
        Addition => RuntimeValue::Double(a + b),
        Subtraction => RuntimeValue::Double(a - b),
        Multiplication => RuntimeValue::Double(a * b),
        Division => RuntimeValue::Double(a / b),
        Equals => RuntimeValue::Bool(a == b),
        NotEquals => RuntimeValue::Bool(a != b),
        Less => RuntimeValue::Bool(a < b),
        LessOrEquals => RuntimeValue::Bool(a <= b),
        Greater => RuntimeValue::Bool(a > b),
        GreaterOrEquals => RuntimeValue::Bool(a >= b),
        LogicalAnd | LogicalOr => return Err(Fault::Mismatch("double")),
    };
    Ok(value)
}

fn eval_bool_binary(a: bool, b: bool, kind: BoundBinaryOperatorKind) -> OpResult {
    use BoundBinaryOperatorKind::*;
    match kind {
        Equals => Ok(RuntimeValue::Bool(a == b)),
        NotEquals => Ok(RuntimeValue::Bool(a != b)),
        LogicalAnd => Ok(RuntimeValue::Bool(a && b)),
        LogicalOr => Ok(RuntimeValue::Bool(a || b)),
        _ => Err(Fault::Mismatch("bool")),
    }
}

fn eval_string_binary(a: &str, b: &str, kind: BoundBinaryOperatorKind) -> OpResult {
    use BoundBinaryOperatorKind::*;
    match kind {
        Addition => {
            let mut text = String::with_capacity(a.len() + b.len());
            text.push_str(a);
            text.push_str(b);
            Ok(RuntimeValue::String(Rc::from(text)))
        }
        Equals => Ok(RuntimeValue::Bool(a == b)),
        NotEquals => Ok(RuntimeValue::Bool(a != b)),
        _ => Err(Fault::Mismatch("string")),
    }
}

/// Magnitude bound of `i64` as a double; `i64::MAX` itself is not representable.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Convert `value` to `to`. Doubles truncate toward zero; strings are parsed
/// with the grammar of [`parse_int`], [`parse_double`] and [`parse_bool`].
pub fn convert(value: RuntimeValue, to: TypeSymbol) -> OpResult {
    match (value, to) {
        (value @ RuntimeValue::String(_), TypeSymbol::String) => Ok(value),
        (value, TypeSymbol::String) => Ok(RuntimeValue::string(&value.to_string())),
        (RuntimeValue::Int(value), TypeSymbol::Double) => Ok(RuntimeValue::Double(value as f64)),
        (RuntimeValue::Double(value), TypeSymbol::Int) => {
            let truncated = value.trunc();
            if (-I64_LIMIT..I64_LIMIT).contains(&truncated) {
                Ok(RuntimeValue::Int(truncated as i64))
            } else {
                Err(Fault::InvalidConversion)
            }
        }
        (RuntimeValue::String(text), TypeSymbol::Int) => parse_int(&text)
            .map(RuntimeValue::Int)
            .ok_or(Fault::InvalidConversion),
        (RuntimeValue::String(text), TypeSymbol::Double) => parse_double(&text)
            .map(RuntimeValue::Double)
            .ok_or(Fault::InvalidConversion),
        (RuntimeValue::String(text), TypeSymbol::Bool) => parse_bool(&text)
            .map(RuntimeValue::Bool)
            .ok_or(Fault::InvalidConversion),
        (value, to) if value.type_name() == to.name() => Ok(value),
        _ => Err(Fault::InvalidConversion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BoundBinaryOperatorKind::*;

    fn int(value: i64) -> RuntimeValue {
        RuntimeValue::Int(value)
    }

    #[test]
    fn test_int_arithmetic_is_checked() {
        assert_eq!(evaluate_binary(Addition, &int(2), &int(3)), Ok(int(5)));
        assert_eq!(evaluate_binary(Division, &int(-7), &int(2)), Ok(int(-3)));
        assert_eq!(evaluate_binary(Division, &int(1), &int(0)), Err(Fault::DivisionByZero));
        assert_eq!(
            evaluate_binary(Addition, &int(i64::MAX), &int(1)),
            Err(Fault::IntegerOverflow)
        );
        assert_eq!(
            evaluate_binary(Division, &int(i64::MIN), &int(-1)),
            Err(Fault::IntegerOverflow)
        );
        assert_eq!(
            evaluate_unary(BoundUnaryOperatorKind::Negation, int(i64::MIN)),
            Err(Fault::IntegerOverflow)
        );
    }

    #[test]
    fn test_double_arithmetic_follows_ieee() {
        let one = RuntimeValue::Double(1.0);
        let zero = RuntimeValue::Double(0.0);
        assert_eq!(
            evaluate_binary(Division, &one, &zero),
            Ok(RuntimeValue::Double(f64::INFINITY))
        );
        assert_eq!(
            evaluate_binary(Less, &zero, &one),
            Ok(RuntimeValue::Bool(true))
        );
    }

    #[test]
    fn test_string_operators() {
        let a = RuntimeValue::string("ab");
        let b = RuntimeValue::string("cd");
        assert_eq!(evaluate_binary(Addition, &a, &b), Ok(RuntimeValue::string("abcd")));
        assert_eq!(evaluate_binary(Equals, &a, &a), Ok(RuntimeValue::Bool(true)));
        assert_eq!(evaluate_binary(Subtraction, &a, &b), Err(Fault::Mismatch("string")));
    }

    #[test]
    fn test_mismatched_operands() {
        assert_eq!(
            evaluate_binary(Addition, &int(1), &RuntimeValue::Bool(true)),
            Err(Fault::Mismatch("bool"))
        );
        assert_eq!(
            evaluate_binary(Addition, &RuntimeValue::Unit, &int(1)),
            Err(Fault::Mismatch("void"))
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(convert(RuntimeValue::Double(-2.9), TypeSymbol::Int), Ok(int(-2)));
        assert_eq!(convert(RuntimeValue::Double(2.9), TypeSymbol::Int), Ok(int(2)));
        assert_eq!(
            convert(RuntimeValue::Double(f64::NAN), TypeSymbol::Int),
            Err(Fault::InvalidConversion)
        );
        assert_eq!(
            convert(RuntimeValue::Double(1e19), TypeSymbol::Int),
            Err(Fault::InvalidConversion)
        );
        assert_eq!(convert(int(3), TypeSymbol::Double), Ok(RuntimeValue::Double(3.0)));
        assert_eq!(
            convert(RuntimeValue::Double(3.0), TypeSymbol::String),
            Ok(RuntimeValue::string("3.0"))
        );
        assert_eq!(
            convert(RuntimeValue::Bool(false), TypeSymbol::String),
            Ok(RuntimeValue::string("false"))
        );
        assert_eq!(convert(RuntimeValue::string(" 12 "), TypeSymbol::Int), Ok(int(12)));
        assert_eq!(
            convert(RuntimeValue::string("abc"), TypeSymbol::Int),
            Err(Fault::InvalidConversion)
        );
        assert_eq!(
            convert(RuntimeValue::string("true"), TypeSymbol::Bool),
            Ok(RuntimeValue::Bool(true))
        );
    }
}
