//! Logical operations over `bool` parameters.

use super::{expect_bool, invalid};
use crate::error::OperationError;
use crate::registry::{Arity, OperationDefinition};
use bind_value::Value;

fn bools(parameters: &[Value]) -> Result<Vec<bool>, OperationError> {
    parameters
        .iter()
        .enumerate()
        .map(|(i, p)| p.as_bool().ok_or_else(|| invalid(i, p)))
        .collect()
}

fn and_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::Bool(bools(parameters)?.into_iter().all(|b| b)))
}

fn or_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::Bool(bools(parameters)?.into_iter().any(|b| b)))
}

fn not_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::Bool(!expect_bool(parameters, 0)?))
}

/// `condition(test, then, else)`
fn condition_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let branch = if expect_bool(parameters, 0)? { 1 } else { 2 };
    Ok(parameters[branch].clone())
}

pub fn operators() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition::new("and", Arity::Range(1, None), and_eval),
        OperationDefinition::new("or", Arity::Range(1, None), or_eval),
        OperationDefinition::new("not", Arity::Fixed(1), not_eval),
        OperationDefinition::new("condition", Arity::Fixed(3), condition_eval),
    ]
}
