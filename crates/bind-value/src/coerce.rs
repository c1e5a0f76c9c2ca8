//! Numeric coercion shared by the arithmetic and comparison operations.
//!
//! `int`, `double` and numeric `string` values coerce to a [`Number`];
//! everything else (including `bool`) does not. Integer arithmetic stays
//! integral as long as both operands are integral.

use crate::value::Value;
use std::cmp::Ordering;

/// A coerced numeric operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Double(f64),
}

/// Parses a numeric string. Integers win over doubles, so `"2"` is
/// `Int(2)` and `"2.0"` is `Double(2.0)`.
///
/// Only plain decimal notation is accepted: `"inf"`, `"NaN"` and
/// surrounding whitespace are rejected.
pub fn parse_number(text: &str) -> Option<Number> {
    if text.is_empty()
        || !text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::Int(n));
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(Number::Double(n)),
        _ => None,
    }
}

impl Value {
    /// Coerces `int`, `double` and numeric `string` values.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Double(n) => Some(Number::Double(*n)),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Double(n) => n,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Number::Int(n) => Value::Int(n),
            Number::Double(n) => Value::Double(n),
        }
    }

    /// `None` on integer overflow or a non-finite double result.
    pub fn checked_add(self, rhs: Number) -> Option<Number> {
        self.combine(rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn checked_sub(self, rhs: Number) -> Option<Number> {
        self.combine(rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn checked_mul(self, rhs: Number) -> Option<Number> {
        self.combine(rhs, i64::checked_mul, |a, b| a * b)
    }

    /// Integer division truncates. Division by zero yields `None` for both
    /// kinds.
    pub fn checked_div(self, rhs: Number) -> Option<Number> {
        if rhs.as_f64() == 0.0 {
            return None;
        }
        self.combine(rhs, i64::checked_div, |a, b| a / b)
    }

    fn combine(
        self,
        rhs: Number,
        int_op: fn(i64, i64) -> Option<i64>,
        double_op: fn(f64, f64) -> f64,
    ) -> Option<Number> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int_op(a, b).map(Number::Int),
            (a, b) => {
                let result = double_op(a.as_f64(), b.as_f64());
                result.is_finite().then_some(Number::Double(result))
            }
        }
    }

    /// Integers compare exactly; any double operand compares as `f64`.
    pub fn compare(self, rhs: Number) -> Option<Ordering> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2"), Some(Number::Int(2)));
        assert_eq!(parse_number("-7"), Some(Number::Int(-7)));
        assert_eq!(parse_number("2.0"), Some(Number::Double(2.0)));
        assert_eq!(parse_number("1e3"), Some(Number::Double(1000.0)));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(" 2"), None);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Int(1).as_number(), Some(Number::Int(1)));
        assert_eq!(Value::from("1.5").as_number(), Some(Number::Double(1.5)));
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(Number::Int(6).checked_add(Number::Int(4)), Some(Number::Int(10)));
        assert_eq!(Number::Int(7).checked_div(Number::Int(2)), Some(Number::Int(3)));
    }

    #[test]
    fn test_double_contaminates() {
        assert_eq!(
            Number::Int(4).checked_add(Number::Double(0.5)),
            Some(Number::Double(4.5))
        );
    }

    #[test]
    fn test_overflow_and_division_by_zero() {
        assert_eq!(Number::Int(i64::MAX).checked_add(Number::Int(1)), None);
        assert_eq!(Number::Int(1).checked_div(Number::Int(0)), None);
        assert_eq!(Number::Double(1.0).checked_div(Number::Double(0.0)), None);
    }

    #[test]
    fn test_compare() {
        assert_eq!(Number::Int(2).compare(Number::Int(1)), Some(Ordering::Greater));
        assert_eq!(Number::Int(1).compare(Number::Double(1.0)), Some(Ordering::Equal));
    }
}
