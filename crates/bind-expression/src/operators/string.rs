//! String operations.
//!
//! Positions and lengths count characters, not bytes.

use super::{expect_index, expect_str, invalid};
use crate::error::OperationError;
use crate::registry::{Arity, OperationDefinition};
use bind_value::Value;

fn concat_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let mut out = String::new();
    for (i, p) in parameters.iter().enumerate() {
        out.push_str(p.as_str().ok_or_else(|| invalid(i, p))?);
    }
    Ok(Value::String(out))
}

fn capitalize_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let text = expect_str(parameters, 0)?;
    let mut chars = text.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

fn uppercase_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::String(expect_str(parameters, 0)?.to_uppercase()))
}

fn lowercase_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::String(expect_str(parameters, 0)?.to_lowercase()))
}

/// `substr(text, from[, length])`
///
/// Without `length` the rest of the string is returned. `from` and
/// `from + length` must both lie within the string.
fn substr_eval(parameters: &[Value]) -> Result<Value, OperationError> {
    let text = expect_str(parameters, 0)?;
    let count = text.chars().count();
    let from = expect_index(parameters, 1)?;
    let length = match parameters.get(2) {
        Some(_) => expect_index(parameters, 2)?,
        None => count.saturating_sub(from),
    };
    let end = from.checked_add(length).ok_or(OperationError::OutOfBounds)?;
    if from > count || end > count {
        return Err(OperationError::OutOfBounds);
    }
    Ok(Value::String(text.chars().skip(from).take(length).collect()))
}

pub fn operators() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition::new("concat", Arity::Range(1, None), concat_eval),
        OperationDefinition::new("capitalize", Arity::Fixed(1), capitalize_eval),
        OperationDefinition::new("uppercase", Arity::Fixed(1), uppercase_eval),
        OperationDefinition::new("lowercase", Arity::Fixed(1), lowercase_eval),
        OperationDefinition::new("substr", Arity::Range(2, Some(3)), substr_eval),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn test_concat() {
        assert_eq!(concat_eval(&[s("a"), s("b"), s("c")]), Ok(s("abc")));
        assert!(concat_eval(&[s("a"), Value::Int(1)]).is_err());
    }

    #[test]
    fn test_case_operations() {
        assert_eq!(capitalize_eval(&[s("hello world")]), Ok(s("Hello world")));
        assert_eq!(capitalize_eval(&[s("hELLO")]), Ok(s("HELLO")));
        assert_eq!(capitalize_eval(&[s("")]), Ok(s("")));
        assert_eq!(uppercase_eval(&[s("MiXed")]), Ok(s("MIXED")));
        assert_eq!(lowercase_eval(&[s("MiXed")]), Ok(s("mixed")));
        assert!(uppercase_eval(&[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_substr() {
        assert_eq!(substr_eval(&[s("hello"), Value::Int(1), Value::Int(3)]), Ok(s("ell")));
        assert_eq!(substr_eval(&[s("hello"), Value::Int(2)]), Ok(s("llo")));
        assert_eq!(substr_eval(&[s("hello"), Value::Int(5)]), Ok(s("")));
        assert_eq!(substr_eval(&[s("héllo"), Value::Int(1), Value::Int(2)]), Ok(s("él")));
        assert_eq!(substr_eval(&[s("hello"), s("1"), s("2")]), Ok(s("el")));
    }

    #[test]
    fn test_substr_out_of_bounds() {
        assert_eq!(
            substr_eval(&[s("hello"), Value::Int(10)]),
            Err(OperationError::OutOfBounds)
        );
        assert_eq!(
            substr_eval(&[s("hello"), Value::Int(3), Value::Int(5)]),
            Err(OperationError::OutOfBounds)
        );
        assert_eq!(
            substr_eval(&[s("hello"), Value::Int(-1)]),
            Err(OperationError::OutOfBounds)
        );
        assert!(substr_eval(&[s("hello"), Value::Double(1.5)]).is_err());
    }
}
