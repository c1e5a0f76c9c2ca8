//! Comparison operations.
//!
//! Ordering operations only compare exactly two operands that both coerce
//! to numbers, and answer `false` in every other case. `eq` compares
//! numerically when it can and structurally otherwise.

use crate::error::OperationError;
use crate::registry::{Arity, OperationDefinition};
use bind_value::Value;
use std::cmp::Ordering;

fn numeric_ordering(parameters: &[Value]) -> Option<Ordering> {
    match parameters {
        [left, right] => left.as_number()?.compare(right.as_number()?),
        _ => None,
    }
}

fn ordering_op(accept: fn(Ordering) -> bool) -> impl Fn(&[Value]) -> Result<Value, OperationError> {
    move |parameters: &[Value]| Ok(Value::Bool(numeric_ordering(parameters).is_some_and(accept)))
}

fn eq_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    if let Some(ordering) = numeric_ordering(parameters) {
        return Ok(Value::Bool(ordering == Ordering::Equal));
    }
    Ok(Value::Bool(matches!(parameters, [left, right] if left == right)))
}

pub fn operators() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition::new("gt", Arity::Any, ordering_op(Ordering::is_gt)),
        OperationDefinition::new("gte", Arity::Any, ordering_op(Ordering::is_ge)),
        OperationDefinition::new("lt", Arity::Any, ordering_op(Ordering::is_lt)),
        OperationDefinition::new("lte", Arity::Any, ordering_op(Ordering::is_le)),
        OperationDefinition::new("eq", Arity::Any, eq_eval),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, parameters: &[Value]) -> Value {
        operators()
            .into_iter()
            .find(|op| op.name == name)
            .unwrap()
            .call(parameters)
            .unwrap()
    }

    #[test]
    fn test_numeric_ordering() {
        assert_eq!(call("gt", &[Value::Int(3), Value::Int(2)]), Value::Bool(true));
        assert_eq!(call("gt", &[Value::Int(2), Value::Int(2)]), Value::Bool(false));
        assert_eq!(call("gte", &[Value::Int(2), Value::Int(2)]), Value::Bool(true));
        assert_eq!(call("lt", &[Value::Double(1.5), Value::Int(2)]), Value::Bool(true));
        assert_eq!(call("lte", &[Value::Int(3), Value::Double(2.5)]), Value::Bool(false));
    }

    #[test]
    fn test_numeric_strings_coerce() {
        assert_eq!(call("gt", &[Value::from("2"), Value::Int(1)]), Value::Bool(true));
        assert_eq!(call("lt", &[Value::from("10"), Value::from("9")]), Value::Bool(false));
    }

    #[test]
    fn test_ordering_without_numbers_is_false() {
        assert_eq!(call("gt", &[Value::Bool(true), Value::Int(2)]), Value::Bool(false));
        assert_eq!(call("lt", &[Value::from("a"), Value::from("b")]), Value::Bool(false));
        assert_eq!(call("gt", &[Value::Int(3)]), Value::Bool(false));
        assert_eq!(
            call("gt", &[Value::Int(3), Value::Int(2), Value::Int(1)]),
            Value::Bool(false)
        );
        assert_eq!(call("lte", &[Value::Null, Value::Null]), Value::Bool(false));
    }

    #[test]
    fn test_eq_numeric_cross_coercion() {
        assert_eq!(call("eq", &[Value::from("1"), Value::from("1.0")]), Value::Bool(true));
        assert_eq!(call("eq", &[Value::Int(1), Value::from("1.0")]), Value::Bool(true));
        assert_eq!(call("eq", &[Value::Int(1), Value::Double(1.0)]), Value::Bool(true));
    }

    #[test]
    fn test_eq_structural_fallback() {
        assert_eq!(call("eq", &[Value::Bool(true), Value::Int(2)]), Value::Bool(false));
        assert_eq!(call("eq", &[Value::Bool(true), Value::Bool(true)]), Value::Bool(true));
        assert_eq!(call("eq", &[Value::from("no"), Value::from("no")]), Value::Bool(true));
        assert_eq!(call("eq", &[Value::Null, Value::Null]), Value::Bool(true));
        assert_eq!(call("eq", &[Value::Null, Value::Int(0)]), Value::Bool(false));
        let list = Value::from(vec![Value::Int(1), Value::from("x")]);
        assert_eq!(call("eq", &[list.clone(), list]), Value::Bool(true));
        assert_eq!(call("eq", &[Value::Int(1)]), Value::Bool(false));
    }

    #[test]
    fn test_eq_is_reflexive_for_doubles_and_objects() {
        for x in [
            Value::Double(0.1),
            Value::Double(f64::NAN),
            Value::from(serde_json::json!({"a": [1, 2.5, {"b": null}]})),
        ] {
            assert_eq!(call("eq", &[x.clone(), x.clone()]), Value::Bool(true), "{x:?}");
        }
        assert_eq!(
            call("eq", &[Value::Double(f64::NAN), Value::Double(1.0)]),
            Value::Bool(false)
        );
    }
}
