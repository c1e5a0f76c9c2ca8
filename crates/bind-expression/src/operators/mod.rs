//! Built-in operations.

pub mod arithmetic;
pub mod array;
pub mod comparison;
pub mod logical;
pub mod string;
pub mod type_ops;

use crate::error::OperationError;
use crate::registry::OperationDefinition;
use bind_value::Value;

/// All built-in operations combined.
pub fn all_operators() -> Vec<OperationDefinition> {
    let mut ops = Vec::new();
    ops.extend(arithmetic::operators());
    ops.extend(comparison::operators());
    ops.extend(logical::operators());
    ops.extend(string::operators());
    ops.extend(array::operators());
    ops.extend(type_ops::operators());
    ops
}

pub(crate) fn invalid(index: usize, value: &Value) -> OperationError {
    OperationError::InvalidParameter {
        index,
        kind: value.kind(),
    }
}

pub(crate) fn expect_str(parameters: &[Value], index: usize) -> Result<&str, OperationError> {
    let value = &parameters[index];
    value.as_str().ok_or_else(|| invalid(index, value))
}

pub(crate) fn expect_array(parameters: &[Value], index: usize) -> Result<&Vec<Value>, OperationError> {
    let value = &parameters[index];
    value.as_array().ok_or_else(|| invalid(index, value))
}

pub(crate) fn expect_bool(parameters: &[Value], index: usize) -> Result<bool, OperationError> {
    let value = &parameters[index];
    value.as_bool().ok_or_else(|| invalid(index, value))
}

/// Reads a non-negative integer parameter, accepting numeric strings.
pub(crate) fn expect_index(parameters: &[Value], index: usize) -> Result<usize, OperationError> {
    let value = &parameters[index];
    match value.as_number() {
        Some(bind_value::Number::Int(n)) => usize::try_from(n).map_err(|_| OperationError::OutOfBounds),
        _ => Err(invalid(index, value)),
    }
}
