//! Array operations. Each returns a new array; inputs are never mutated.

use super::{expect_array, expect_index, invalid};
use crate::error::OperationError;
use crate::registry::{Arity, OperationDefinition};
use bind_value::Value;

/// `insert(array, value[, index])`: appends, or inserts at `index` which
/// may equal the length.
fn insert_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let mut array = expect_array(parameters, 0)?.clone();
    let value = parameters[1].clone();
    match parameters.get(2) {
        Some(_) => {
            let index = expect_index(parameters, 2)?;
            if index > array.len() {
                return Err(OperationError::OutOfBounds);
            }
            array.insert(index, value);
        }
        None => array.push(value),
    }
    Ok(Value::Array(array))
}

/// `remove(array, value)`: drops every element equal to `value`.
fn remove_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let array = expect_array(parameters, 0)?;
    let target = &parameters[1];
    Ok(array.iter().filter(|item| *item != target).cloned().collect())
}

/// `removeIndex(array[, index])`: removes at `index`, or the last element.
fn remove_index_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let mut array = expect_array(parameters, 0)?.clone();
    let index = match parameters.get(1) {
        Some(_) => expect_index(parameters, 1)?,
        None => array.len().checked_sub(1).ok_or(OperationError::OutOfBounds)?,
    };
    if index >= array.len() {
        return Err(OperationError::OutOfBounds);
    }
    array.remove(index);
    Ok(Value::Array(array))
}

fn contains_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let array = expect_array(parameters, 0)?;
    Ok(Value::Bool(array.contains(&parameters[1])))
}

/// Concatenates every array parameter in order.
fn union_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let mut out = Vec::new();
    for (i, p) in parameters.iter().enumerate() {
        out.extend(p.as_array().ok_or_else(|| invalid(i, p))?.iter().cloned());
    }
    Ok(Value::Array(out))
}

pub fn operators() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition::new("insert", Arity::Range(2, Some(3)), insert_eval),
        OperationDefinition::new("remove", Arity::Fixed(2), remove_eval),
        OperationDefinition::new("removeIndex", Arity::Range(1, Some(2)), remove_index_eval),
        OperationDefinition::new("contains", Arity::Fixed(2), contains_eval),
        OperationDefinition::new("union", Arity::Range(1, None), union_eval),
    ]
}
