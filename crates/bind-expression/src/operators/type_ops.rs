//! Kind inspection and conversion operations.

use super::invalid;
use crate::error::OperationError;
use crate::registry::{Arity, OperationDefinition};
use bind_value::{format_double, parse_number, Number, Value};

fn is_null_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::Bool(parameters[0].is_null()))
}

fn is_empty_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let empty = match &parameters[0] {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        other => return Err(invalid(0, other)),
    };
    Ok(Value::Bool(empty))
}

/// Characters for strings, elements for arrays, entries for objects.
fn length_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let length = match &parameters[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => return Err(invalid(0, other)),
    };
    Ok(Value::from(length))
}

/// Doubles truncate toward zero. Out-of-range doubles fail.
fn int_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let number = match &parameters[0] {
        Value::Int(n) => return Ok(Value::Int(*n)),
        Value::Double(n) => Number::Double(*n),
        Value::String(s) => parse_number(s).ok_or_else(|| invalid(0, &parameters[0]))?,
        other => return Err(invalid(0, other)),
    };
    match number {
        Number::Int(n) => Ok(Value::Int(n)),
        Number::Double(n) => {
            let truncated = n.trunc();
            if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(OperationError::Overflow)
            }
        }
    }
}

fn double_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    match parameters[0].as_number() {
        Some(number) => Ok(Value::Double(number.as_f64())),
        None => Err(invalid(0, &parameters[0])),
    }
}

fn string_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let text = match &parameters[0] {
        Value::String(s) => s.clone(),
        Value::Int(n) => n.to_string(),
        Value::Double(n) => format_double(*n),
        Value::Bool(b) => b.to_string(),
        other => return Err(invalid(0, other)),
    };
    Ok(Value::String(text))
}

pub fn operators() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition::new("isNull", Arity::Fixed(1), is_null_eval),
        OperationDefinition::new("isEmpty", Arity::Fixed(1), is_empty_eval),
        OperationDefinition::new("length", Arity::Fixed(1), length_eval),
        OperationDefinition::new("int", Arity::Fixed(1), int_eval),
        OperationDefinition::new("double", Arity::Fixed(1), double_eval),
        OperationDefinition::new("string", Arity::Fixed(1), string_eval),
    ]
}
