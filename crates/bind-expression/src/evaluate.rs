//! Tree-walking evaluation of parsed expressions.
//!
//! Evaluation never fails. A missing context, an unknown operation or a
//! parameter of the wrong kind turns the affected sub-expression into
//! `Value::Null` and leaves a `tracing` event behind.

use crate::error::OperationError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Binding, Expression, Operation, Parameter, SingleExpression, TemplateNode};
use bind_value::Value;

/// Evaluates an expression.
///
/// - literals evaluate to themselves;
/// - bindings resolve their context, then read the path inside it;
/// - operations evaluate their parameters first, then dispatch by name;
/// - templates concatenate the text form of every node.
pub fn evaluate(expression: &Expression, ctx: &EvalCtx<'_>) -> Value {
    match expression {
        Expression::Literal(value) => value.clone(),
        Expression::Single(single) => evaluate_single(single, ctx),
        Expression::Template(nodes) if nodes.is_empty() => {
            tracing::debug!("empty expression evaluates to null");
            Value::Null
        }
        Expression::Template(nodes) => {
            let mut out = String::new();
            for node in nodes {
                match node {
                    TemplateNode::Text(text) => out.push_str(text),
                    TemplateNode::Expression(single) => {
                        out.push_str(&evaluate_single(single, ctx).to_text())
                    }
                }
            }
            Value::String(out)
        }
    }
}

pub fn evaluate_single(single: &SingleExpression, ctx: &EvalCtx<'_>) -> Value {
    match single {
        SingleExpression::Binding(binding) => evaluate_binding(binding, ctx),
        SingleExpression::Operation(operation) => evaluate_operation(operation, ctx),
    }
}

pub fn evaluate_binding(binding: &Binding, ctx: &EvalCtx<'_>) -> Value {
    match ctx.resolver.context_value(&binding.context) {
        Some(value) => value.value_at(&binding.path),
        None => {
            tracing::debug!(context = %binding.context, "context not found");
            Value::Null
        }
    }
}

pub fn evaluate_operation(operation: &Operation, ctx: &EvalCtx<'_>) -> Value {
    let parameters: Vec<Value> = operation
        .parameters
        .iter()
        .map(|parameter| match parameter {
            Parameter::Literal(value) => value.clone(),
            Parameter::Binding(binding) => evaluate_binding(binding, ctx),
            Parameter::Operation(nested) => evaluate_operation(nested, ctx),
        })
        .collect();

    match ctx.operations.call(&operation.name, &parameters) {
        Ok(value) => value,
        Err(OperationError::NotFound(name)) => {
            tracing::warn!(operation = %name, "operation not found");
            Value::Null
        }
        Err(error) => {
            tracing::debug!(operation = %operation.name, %error, "operation evaluated to null");
            Value::Null
        }
    }
}
