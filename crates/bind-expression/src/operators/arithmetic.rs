//! Arithmetic operations.
//!
//! All four reduce their parameters pairwise from left to right. `subtract`
//! and `divide` seed the reduction with `first * 2` and `first * first` and
//! then fold over *every* parameter, so the first one cancels out:
//! `subtract(a, b)` is `(a * 2) - a - b`. Payloads depend on this exact
//! shape (for instance `divide(0, x)` is a division by zero), so it is kept.

use super::invalid;
use crate::error::OperationError;
use crate::registry::{Arity, OperationDefinition};
use bind_value::{Number, Value};

fn numbers(parameters: &[Value]) -> Result<Vec<Number>, OperationError> {
    parameters
        .iter()
        .enumerate()
        .map(|(i, p)| p.as_number().ok_or_else(|| invalid(i, p)))
        .collect()
}

fn overflow_or_zero(divide: bool) -> OperationError {
    if divide {
        OperationError::DivisionByZero
    } else {
        OperationError::Overflow
    }
}

fn reduce(
    parameters: &[Value],
    seed: impl FnOnce(Number) -> Option<Number>,
    fold_all: bool,
    op: fn(Number, Number) -> Option<Number>,
    divide: bool,
) -> Result<Value, OperationError> {
    let numbers = numbers(parameters)?;
    let (first, rest) = numbers.split_first().ok_or(OperationError::Arity {
        operation: "arithmetic".into(),
        expected: Arity::Range(1, None).to_string(),
        actual: 0,
    })?;
    let start = seed(*first).ok_or(OperationError::Overflow)?;
    let operands = if fold_all { &numbers[..] } else { rest };
    operands
        .iter()
        .try_fold(start, |acc, n| op(acc, *n))
        .map(Number::into_value)
        .ok_or_else(|| overflow_or_zero(divide))
}

fn sum_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    reduce(parameters, Some, false, Number::checked_add, false)
}

fn subtract_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    reduce(
        parameters,
        |first| first.checked_mul(Number::Int(2)),
        true,
        Number::checked_sub,
        false,
    )
}

fn multiply_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    reduce(parameters, Some, false, Number::checked_mul, false)
}

fn divide_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    reduce(
        parameters,
        |first| first.checked_mul(first),
        true,
        Number::checked_div,
        true,
    )
}

pub fn operators() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition::new("sum", Arity::Range(1, None), sum_eval),
        OperationDefinition::new("subtract", Arity::Range(1, None), subtract_eval),
        OperationDefinition::new("multiply", Arity::Range(1, None), multiply_eval),
        OperationDefinition::new("divide", Arity::Range(1, None), divide_eval),
    ]
}
