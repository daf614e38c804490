//! Runtime values and their textual forms.
//!
//! Rendering and parsing are locale independent: integers are base 10,
//! booleans are `true` and `false`, and doubles use the shortest text that
//! reads back to the same value.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use slang_binder::TypeSymbol;

/// A value produced while running a program.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(Rc<str>),
    /// The result of a `void` call.
    Unit,
}

impl RuntimeValue {
    /// What a variable of type `ty` holds before its declaration runs.
    pub fn default_for(ty: TypeSymbol) -> RuntimeValue {
        match ty {
            TypeSymbol::Int => RuntimeValue::Int(0),
            TypeSymbol::Double => RuntimeValue::Double(0.0),
            TypeSymbol::Bool => RuntimeValue::Bool(false),
            TypeSymbol::String => RuntimeValue::String(Rc::from("")),
            TypeSymbol::Void | TypeSymbol::Error => RuntimeValue::Unit,
        }
    }

    pub fn string(text: &str) -> RuntimeValue {
        RuntimeValue::String(Rc::from(text))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RuntimeValue::Int(_) => "int",
            RuntimeValue::Double(_) => "double",
            RuntimeValue::Bool(_) => "bool",
            RuntimeValue::String(_) => "string",
            RuntimeValue::Unit => "void",
        }
    }
}

/// The canonical textual form, used by `string(x)` and `print`.
impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeValue::Int(value) => write!(f, "{value}"),
            RuntimeValue::Double(value) => f.write_str(&format_double(*value)),
            RuntimeValue::Bool(value) => write!(f, "{value}"),
            RuntimeValue::String(value) => f.write_str(value),
            RuntimeValue::Unit => Ok(()),
        }
    }
}

/// Shortest round-trip text, always with a fractional part or an exponent:
/// `1.0`, `0.5`, `1e21`, `NaN`, `inf`.
pub fn format_double(value: f64) -> String {
    format!("{value:?}")
}

fn trim(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// An optional sign followed by decimal digits, within `i64`.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = trim(text);
    let digits = text.strip_prefix(|c| c == '+' || c == '-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Decimal notation with optional sign, fraction and exponent, within the
/// finite range of `f64`. The `inf` and `nan` spellings `f64::from_str`
/// also reads are rejected, as are exponents that overflow.
pub fn parse_double(text: &str) -> Option<f64> {
    let text = trim(text);
    let is_numeric = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !is_numeric {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_bool(text: &str) -> Option<bool> {
    match trim(text) {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Replace the `\t`, `\r` and `\n` sequences of a string literal with the
/// characters they name. Any other backslash is kept as written.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let replacement = match chars.peek() {
            Some('t') => '\t',
            Some('r') => '\r',
            Some('n') => '\n',
            _ => {
                result.push('\\');
                continue;
            }
        };
        chars.next();
        result.push(replacement);
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(RuntimeValue::Int(-42).to_string(), "-42");
        assert_eq!(RuntimeValue::Double(1.0).to_string(), "1.0");
        assert_eq!(RuntimeValue::Double(0.5).to_string(), "0.5");
        assert_eq!(RuntimeValue::Double(1e21).to_string(), "1e21");
        assert_eq!(RuntimeValue::Double(f64::INFINITY).to_string(), "inf");
        assert_eq!(RuntimeValue::Double(f64::NAN).to_string(), "NaN");
        assert_eq!(RuntimeValue::Bool(true).to_string(), "true");
        assert_eq!(RuntimeValue::string("a\\n").to_string(), "a\\n");
        assert_eq!(RuntimeValue::Unit.to_string(), "");
    }

    #[test]
    fn test_rendered_doubles_read_back() {
        for value in [0.1, 2.5, -3.75, 1e-7, 123456.789, 1e300] {
            let text = format_double(value);
            assert_eq!(parse_double(&text), Some(value), "{}", text);
        }
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -7\n"), Some(-7));
        assert_eq!(parse_int("+3"), Some(3));
        assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int("9223372036854775808"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("1.0"), None);
        assert_eq!(parse_int("0x10"), None);
        assert_eq!(parse_int("1 2"), None);
    }

    #[test]
    fn test_parse_double() {
        assert_eq!(parse_double("1.5"), Some(1.5));
        assert_eq!(parse_double(" 2 "), Some(2.0));
        assert_eq!(parse_double("-1e3"), Some(-1000.0));
        assert_eq!(parse_double(".5"), Some(0.5));
        assert_eq!(parse_double("inf"), None);
        assert_eq!(parse_double("NaN"), None);
        assert_eq!(parse_double("1,5"), None);
        assert_eq!(parse_double(""), None);
        assert_eq!(parse_double("1e400"), None);
        assert_eq!(parse_double("-1e400"), None);
        assert_eq!(parse_double("1e308"), Some(1e308));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" false "), Some(false));
        assert_eq!(parse_bool("True"), None);
        assert_eq!(parse_bool("1"), None);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert!(matches!(unescape("plain"), Cow::Borrowed(_)));
        assert_eq!(unescape("a\\tb\\r\\nc"), "a\tb\r\nc");
        assert_eq!(unescape("keep \\\" and \\x"), "keep \\\" and \\x");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RuntimeValue::default_for(TypeSymbol::Int), RuntimeValue::Int(0));
        assert_eq!(RuntimeValue::default_for(TypeSymbol::String), RuntimeValue::string(""));
        assert_eq!(RuntimeValue::default_for(TypeSymbol::Void), RuntimeValue::Unit);
    }
}
